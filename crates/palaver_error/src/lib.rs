//! Error types for the Palaver library.
//!
//! This crate provides the error types used throughout the Palaver workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use palaver_error::{PalaverResult, ValidationError, ValidationErrorKind};
//!
//! fn parse_role(raw: &str) -> PalaverResult<()> {
//!     Err(ValidationError::new(ValidationErrorKind::InvalidRole(raw.to_string())))?
//! }
//!
//! assert!(parse_role("admin").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod validation;

pub use config::{ConfigError, ConfigErrorKind};
pub use database::{DatabaseError, DatabaseErrorKind, DatabaseResult};
pub use error::{PalaverError, PalaverErrorKind, PalaverResult};
pub use validation::{ValidationError, ValidationErrorKind};
