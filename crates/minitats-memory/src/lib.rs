//! # minitats-memory
//!
//! Durable storage for Minitats (JSON documents in one data directory).

pub mod store;

pub use store::{Reminder, Status, Store};
