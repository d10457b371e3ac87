//! Parameter tests
//!
//! Descriptor construction from keywords, persistence and tie expressions.

pub mod builder_tests;
pub mod expression_tests;
pub mod persistence_tests;
