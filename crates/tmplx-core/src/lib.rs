//! tmplx Core - element template reconciliation kernel
//!
//! This crate reconciles a structured document element against an element
//! template, including:
//! - An in-memory document model with owned and referenced links
//! - A command log with undoable, atomic transactions
//! - The template model and a closed classifier over binding kinds
//! - The keep-or-apply value policy and identity matching across versions
//! - Per-family reconcilers (singleton nodes, keyed collections, messages)
//! - The change-template handler that sequences them
//! - Default-template auto-apply for freshly created elements

pub mod apply;
pub mod auto_apply;
pub mod collaborators;
pub mod command_stack;
pub mod commands;
pub mod errors;
pub mod handler;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod reconcile;
pub mod session;
pub mod template;

// Re-export commonly used types
pub use apply::apply;
pub use auto_apply::{apply_default_template, TemplateCatalog};
pub use command_stack::{CommandLog, CommandStack};
pub use commands::Command;
pub use errors::{ExError, ExErrorKind, Result, TmplxError};
pub use handler::ChangeTemplateHandler;
pub use model::{Node, NodeId, Value};
pub use ops::Document;
pub use session::Session;
pub use template::{Binding, ElementType, PropertyDescriptor, PropertyType, Template};
