//! Core types shared across facade.
//!
//! Currently this is the error system: [`FacadeError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for CLI presentation.

pub mod error;

pub use error::{ErrorContext, FacadeError, user_friendly_error};

/// Result alias for the resolution core.
pub type Result<T, E = FacadeError> = std::result::Result<T, E>;
