pub mod kinds;
pub mod node;
pub mod value;

pub use node::{Fields, Node, NodeId};
pub use value::Value;
