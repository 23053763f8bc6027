pub mod article;
pub mod errors;
pub mod language;
pub mod media;
pub mod package;
pub mod slice;
pub mod stamp;
pub mod user;
