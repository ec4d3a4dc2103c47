//! # minitats-providers
//!
//! Chat reply providers for Minitats.

pub mod canned;
pub mod openai;

pub use canned::CannedReplies;
pub use openai::OpenAiProvider;
