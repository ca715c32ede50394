pub mod config;
pub mod error;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use source::{CandleSource, JsonCandleFile};
pub use types::*;
