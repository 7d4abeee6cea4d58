//! The `base` crate defines the value types shared by the Booth
//! multiplication engine and the tools which drive it: fixed-width
//! registers, the register geometry derived from the operand widths,
//! operand parsing, register formatting and the error types.  The
//! idea is that a front end only needs to depend on `base` in order
//! to validate and display things.

mod error;
mod format;
mod geometry;
mod operand;
mod register;

pub mod prelude;
