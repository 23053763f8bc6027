mod categories;
mod media;
mod service;

pub use categories::AddMediaCategoryCommand;
pub use media::{AddMediumCommand, EditMediumCommand};
pub use service::MediaCommandService;
