//! Core types shared across tmplx facilities
//!
//! This crate provides the small set of types used by both the error facility
//! and the logging facility of the template engine:
//!
//! - **Correlation**: RequestId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RequestId;
