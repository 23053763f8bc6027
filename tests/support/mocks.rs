// tests/support/mocks.rs
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;

use sly_core::application::{
    ApplicationError, ApplicationResult,
    ports::{security::PasswordHasher, time::Clock},
};

pub static FIXED_NOW: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());

pub fn fixed_now() -> DateTime<Utc> {
    *FIXED_NOW
}

pub struct TestClock;

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        fixed_now()
    }
}

/// Stores passwords with a marker prefix. Only for tests: real hashing is slow.
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("plain${password}"))
    }

    /// Hashes without the marker are unreadable, like a corrupt argon2 string.
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        match expected_hash.strip_prefix("plain$") {
            None => Err(ApplicationError::infrastructure("unreadable password hash")),
            Some(stored) if stored == password => Ok(()),
            Some(_) => Err(ApplicationError::unauthorized("invalid credentials")),
        }
    }
}
