//! Error handling for medley.
//!
//! Errors are split into two disjoint families so callers can tell "this
//! does not exist" (resolution-time, [`ResolveError`]) apart from "this
//! failed when called" (invocation-time, [`InvokeError`]). Validator
//! findings are not errors at all; see [`crate::validator::Violation`].

pub mod types;

pub use types::*;
