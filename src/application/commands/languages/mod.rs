mod service;

pub use service::{AddLanguageCommand, EditLanguageCommand, LanguageCommandService};
