//! Concrete implementations of the `MaskingEngine` trait.

pub mod pipeline;
