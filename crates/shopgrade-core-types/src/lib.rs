//! Core types shared across shopgrade facilities
//!
//! This crate provides foundational types used by the error, logging and
//! request-handling layers:
//!
//! - **Correlation types**: RequestId, RequestContext
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction of
//!   bearer tokens and signing secrets
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{RequestContext, RequestId};
pub use sensitive::Sensitive;
