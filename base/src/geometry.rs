//! Register geometry: how wide the registers are and where the
//! multiplicand sits inside them.

use serde::Serialize;

use super::error::{Error, OperandFault, Role, WidthOverflow};
use super::register::Register;

/// The layout shared by the `A`, `S` and `P` registers of a single
/// multiplication.  Once constructed it never changes, and it is
/// passed explicitly to everything which needs it.
///
/// Each register is `total_bits = 2 * product_bits + 1` wide:
///
/// ```text
///  | product_bits | product_bits | 1 |
///  ^ bit total_bits-1                ^ bit 0 (comparison bit)
/// ```
///
/// The multiplicand (and its negation) start at `half_bit`, the
/// multiplier starts at bit 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Geometry {
    multiplicand_bits: u32,
    multiplier_bits: u32,
    product_bits: u32,
    total_bits: u32,
    half_bit: u32,
}

impl Geometry {
    /// Compute the geometry for operands of the given widths.
    ///
    /// Fails if either width is zero (there is no such thing as an
    /// empty operand) or if the resulting registers would be wider
    /// than [`Register::MAX_WIDTH`].
    pub fn new(multiplicand_bits: u32, multiplier_bits: u32) -> Result<Geometry, Error> {
        for (role, bits) in [
            (Role::Multiplicand, multiplicand_bits),
            (Role::Multiplier, multiplier_bits),
        ] {
            if bits == 0 {
                return Err(Error::InvalidOperand {
                    role,
                    fault: OperandFault::Empty,
                });
            }
        }
        // Done in u64 so that this cannot overflow.
        let product_bits = u64::from(multiplicand_bits) + u64::from(multiplier_bits);
        let total_bits = 2 * product_bits + 1;
        match u32::try_from(total_bits) {
            Ok(total) if total <= Register::MAX_WIDTH => {
                // total fits in a u32, so product_bits does too.
                let product_bits = (total - 1) / 2;
                Ok(Geometry {
                    multiplicand_bits,
                    multiplier_bits,
                    product_bits,
                    total_bits: total,
                    half_bit: product_bits + 1,
                })
            }
            _ => Err(Error::from(WidthOverflow {
                required: total_bits,
                available: Register::MAX_WIDTH,
            })),
        }
    }

    pub const fn multiplicand_bits(&self) -> u32 {
        self.multiplicand_bits
    }

    pub const fn multiplier_bits(&self) -> u32 {
        self.multiplier_bits
    }

    /// The number of bits needed to hold the product (m + n).  This
    /// is also the number of steps the Booth recurrence runs for.
    pub const fn product_bits(&self) -> u32 {
        self.product_bits
    }

    pub const fn total_bits(&self) -> u32 {
        self.total_bits
    }

    /// The bit position at which the multiplicand is placed in `A`
    /// and `S`.
    pub const fn half_bit(&self) -> u32 {
        self.half_bit
    }

    /// Make a register of this geometry's width holding `bits`
    /// (masked).
    pub const fn register(&self, bits: u64) -> Register {
        Register::masked(self.total_bits, bits)
    }
}
