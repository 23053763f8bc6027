pub mod events;
pub mod graph;
pub mod manifest;
pub mod state;
pub mod version;

pub use events::AddOnEvent;
pub use graph::{DependencyGraph, LoadOrder, Walk};
pub use manifest::{CORE_PACKAGE, Manifest, Requirement};
pub use state::AddOnState;
pub use version::{Constraint, Version};
