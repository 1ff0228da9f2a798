//! Collaborators injected into the change-template handler
//!
//! The handler never swaps element kinds or deletes messages itself. It
//! delegates to these traits so editors can plug in their own rules.

pub mod remove_message;
pub mod replace;

pub use remove_message::{DetachUnusedMessage, MessageRemover};
pub use replace::{DefaultElementReplacer, ElementReplacer};
