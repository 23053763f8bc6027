mod change_password;
mod create;
mod delete;
mod edit;
mod login;
mod service;

pub use change_password::ChangePasswordCommand;
pub use create::CreateUserCommand;
pub use edit::EditUserCommand;
pub use login::LoginCommand;
pub use service::UserCommandService;
