pub mod addons;
pub mod articles;
pub mod languages;
pub mod media;
pub mod packages;
pub mod slices;
pub mod users;
