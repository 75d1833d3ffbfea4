//! Bidirectional mapping between the backend's weakly-typed JSON schema
//! documents and the typed [`TreeNode`](crate::domain::TreeNode) /
//! [`FieldState`](crate::domain::FieldState) graph.
//!
//! Decoding is tolerant of unknown enum strings (forward compatibility with
//! schema evolution); encoding is strict and fails on any in-memory value
//! with no wire representation. The two policies are deliberately asymmetric
//! and must stay separate.

mod field;
mod tree;
mod value;

pub use field::{decode_field, encode_field};
pub use tree::decode_tree;
pub use value::{sniff_value, wire_value};

pub(crate) use value::parse_datetime;
