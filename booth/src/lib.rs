//! This crate simulates the add-and-shift variant of Booth's
//! multiplication algorithm on unsigned binary operands, exposing
//! every intermediate register value.
//!
//! ```
//! let trace = booth::multiply("0111", "0011").expect("valid operands");
//! for record in &trace {
//!     println!("{}", record.expect("the recurrence should not fail"));
//! }
//! assert_eq!(trace.product().map(|p| p.value()), Ok(21));
//! ```
#![crate_name = "booth"]

mod engine;
mod registers;
mod trace;

#[cfg(test)]
mod tests;

use tracing::{event, Level};

use base::prelude::*;

pub use engine::{Action, BoothPair, Engine, IterationState, Step};
pub use registers::Registers;
pub use trace::{Label, MultiplicationTrace, Product, Records, Steps, TraceRecord};

/// Settings which affect how operands are interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub leading_zeros: LeadingZeros,
}

/// Prepare the multiplication of two unsigned binary strings.  Every
/// digit, including leading zeros, counts towards the operand widths.
pub fn multiply(multiplicand: &str, multiplier: &str) -> Result<MultiplicationTrace, Error> {
    multiply_with(multiplicand, multiplier, &Options::default())
}

/// As [`multiply`], but with explicit options.
///
/// Both operands are validated before the register geometry is
/// worked out, so a bad digit is reported in preference to an
/// overflow.
pub fn multiply_with(
    multiplicand: &str,
    multiplier: &str,
    options: &Options,
) -> Result<MultiplicationTrace, Error> {
    let prepare = || -> Result<MultiplicationTrace, Error> {
        let m = Operand::parse(Role::Multiplicand, multiplicand, options.leading_zeros)?;
        let r = Operand::parse(Role::Multiplier, multiplier, options.leading_zeros)?;
        let geometry = Geometry::new(m.width(), r.width())?;
        Ok(MultiplicationTrace::new(m, r, geometry))
    };
    prepare().inspect_err(|e| {
        event!(
            Level::DEBUG,
            "cannot multiply {multiplicand:?} by {multiplier:?}: {e}"
        );
    })
}
