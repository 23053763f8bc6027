use crate::domain::errors::DomainError;
use sqlx::error::ErrorKind;

const UNIQUE_USER_LOGIN: &str = "sly_user.login";
const UNIQUE_FILE_NAME: &str = "sly_file.filename";

pub fn map_sqlx(err: sqlx::Error) -> DomainError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    if message.contains(UNIQUE_USER_LOGIN) {
                        DomainError::Conflict("login already exists".into())
                    } else if message.contains(UNIQUE_FILE_NAME) {
                        DomainError::Conflict("filename already exists in the media pool".into())
                    } else {
                        DomainError::Conflict("unique constraint violated".into())
                    }
                }
                ErrorKind::ForeignKeyViolation => {
                    DomainError::NotFound("referenced record not found".into())
                }
                ErrorKind::CheckViolation | ErrorKind::NotNullViolation => {
                    DomainError::Validation(format!("constraint violated: {message}"))
                }
                _ => DomainError::Persistence(message.to_string()),
            }
        }
        sqlx::Error::RowNotFound => DomainError::NotFound("record not found".into()),
        _ => DomainError::Persistence(err.to_string()),
    }
}
