//! Reordering of editable lists.
//!
//! Three shapes of ordered data are edited by drag and drop:
//! - plain lists, reordered by index ([`move_item`])
//! - page fields carrying an explicit `order` ([`OrderedFields`])
//! - person/place attribute lists ([`AttributeList`])

pub mod attributes;
pub mod fields;
pub mod list;

#[cfg(test)]
mod props;

pub use attributes::{AttributeField, AttributeKind, AttributeList};
pub use fields::{OrderedFields, PageField};
pub use list::move_item;
