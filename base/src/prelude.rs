//! The prelude exports the structs which are useful in describing a
//! Booth multiplication.  Providing this prelude is the main purpose
//! of the base crate.
pub use super::error::*;
pub use super::format::{format_register, Grouped};
pub use super::geometry::Geometry;
pub use super::operand::{LeadingZeros, Operand};
pub use super::register::{BadRegisterString, Register};
