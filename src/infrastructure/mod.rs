// src/infrastructure/mod.rs
pub mod cache;
pub mod config_store;
pub mod database;
pub mod events;
pub mod packages;
pub mod repositories;
pub mod security;
pub mod storage;
pub mod time;
pub mod util;
