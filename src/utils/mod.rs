//! Path utilities shared by the resolver.
//!
//! - [`paths`] - lexical, forward-slash path manipulation
//! - [`security`] - project boundary checks for relative references

pub mod paths;
pub mod security;

pub use paths::{join, normalize, normalize_slashes};
pub use security::check_within_project;
