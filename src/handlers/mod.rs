//! HTTP handlers for the dynamic entity routes.

pub mod entity;
pub use entity::*;
