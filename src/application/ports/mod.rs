// src/application/ports/mod.rs
pub mod cache;
pub mod config_store;
pub mod events;
pub mod media_storage;
pub mod packages;
pub mod security;
pub mod sql;
pub mod time;
pub mod util;

