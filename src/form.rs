//! Nested form state for one inspection session.
//!
//! Split the way the concerns split: `types` is the tree itself, `engine`
//! is the path-addressed update algebra, `validate` is the readiness pass.
//! Only engine operations may change a tree; every other component works on
//! snapshots.

mod engine;
mod types;
pub mod validate;

pub use engine::{InstancePath, ItemPath};
pub use types::{
    FollowUpData, FollowUpField, FormTree, HeaderData, HeaderField, Instance, InstanceId, Item,
    PhotoFile, Section, Status,
};
