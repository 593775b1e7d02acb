//! Stream — the pull-based decoder turning raw records into messages.

pub mod decoder;
pub mod error;
pub mod filter;

pub use decoder::Decoder;
pub use error::DecodeError;
pub use filter::{InvalidStreamFilter, StreamFilter};
