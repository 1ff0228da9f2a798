//! Element template model and binding classifier

pub mod binding;
pub mod descriptor;

pub use binding::{Binding, BindingKind, EntrySlot, Family, FamilyShape};
pub use descriptor::{Choice, ElementType, Icon, PropertyDescriptor, PropertyType, Scalar, Template};
