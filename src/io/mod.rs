//! Input/output helpers.
//!
//! - request JSON import and quote JSON export (`quote_file`)

pub mod quote_file;

pub use quote_file::*;
