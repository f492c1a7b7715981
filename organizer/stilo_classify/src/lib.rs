//! Member classification for `stilo`.
//!
//! Consumes the line store and pair table produced by `stilo_scan` and
//! segments one declaration's body into typed entities: one main
//! constructor, named constructors, and categorized variables and methods.
//! Classification is line-granular: every body line ends up either inside
//! exactly one [`Entity`]'s range or tagged pass-through (blank, comment,
//! or unrecognized), so the reorderer can regenerate the body from the
//! entity collections alone.
//!
//! Classification failures ([`ClassifyError`]) are per declaration: a body
//! using constructs the heuristics do not recognize aborts only that
//! declaration, never the whole buffer.

mod classifier;
mod entity;
mod error;
mod search;

pub use classifier::{classify, Classification};
pub use entity::{DeclKind, Declaration, Entity};
pub use error::ClassifyError;
pub use search::{find_next, FeatureFind};
