//! # minitats-channels
//!
//! Messaging platform integrations for Minitats.

pub mod telegram;

pub use telegram::TelegramChannel;
