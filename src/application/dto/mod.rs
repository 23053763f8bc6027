pub mod actor;
pub mod packages;
pub mod users;

pub use actor::Actor;
pub use packages::AddOnInfo;
pub use users::UserDto;
