//! Format-agnostic mapping between flat passage lists and nested layouts.

pub mod commentary;
pub mod hierarchy;
