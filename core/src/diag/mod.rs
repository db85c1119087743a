//! Diagnostic utilities shared across the core crate.
//!
//! This module centralises source locations and the error type returned by
//! tree construction, navigation and dispatch so the builder and every
//! semantic pass agree on a common representation.

pub mod error;
pub mod location;

pub use error::{AstError, AstResult};
pub use location::Location;
