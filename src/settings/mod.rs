//! Packed configuration words and the fields inside them.
//!
//! The converter's configuration lives in four 8-bit words, one per [`Category`].
//! Each semantic setting is described by a [`Field`]: either a single-bit
//! [`FlagField`] or a multi-bit, bounded [`ValueField`]. All edits go through these
//! descriptors so that bits outside a category's mask are never set.
//!
//! [`Configuration`] holds the live words together with a reference copy taken at
//! the last successful load or save, which the menu uses to mark unsaved changes.

mod defaults;
mod field;
pub mod layout;
mod store;

pub use defaults::{Jumpers, apply_jumpers, load_defaults};
pub use field::{Field, FieldOp, FlagField, ValueField};
pub use store::{Category, Configuration, Snapshot};
