pub mod error;
pub mod hanzi;
pub mod lines;
pub mod tones;
pub mod dictionary;
pub mod exclusion;
pub mod frequencies;
pub mod filter;
pub mod pipeline;

pub use crate::error::{Error, Result};
