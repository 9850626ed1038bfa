//! # wingman-core
//!
//! Core types, traits, and abstractions for the Wingman video-analysis
//! pipeline. Other wingman crates depend on the data model and error
//! taxonomy defined here.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
