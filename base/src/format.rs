//! Human-readable rendering of registers.
use std::fmt::{self, Display, Formatter};

use super::geometry::Geometry;
use super::register::Register;

/// Display adapter which renders a register as three space-separated
/// groups of binary digits: the high product half, the low product
/// half and the comparison bit.
///
/// For example with 4-bit operands, `P + A` might render as
/// `00000111 00000110 0`.
#[derive(Clone, Copy, Debug)]
pub struct Grouped<'a> {
    register: Register,
    geometry: &'a Geometry,
}

impl<'a> Grouped<'a> {
    pub fn new(register: Register, geometry: &'a Geometry) -> Grouped<'a> {
        Grouped { register, geometry }
    }
}

impl Display for Grouped<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        // Re-masking here means that a register of the wrong width
        // still produces exactly total_bits digits.
        let reg = self.geometry.register(self.register.bits());
        let half = self.geometry.product_bits();
        let upper = reg.bits() >> (half + 1);
        let lower = (reg.bits() >> 1) & (u64::MAX >> (u64::BITS - half));
        let width = half as usize;
        write!(
            f,
            "{upper:0width$b} {lower:0width$b} {}",
            u8::from(reg.bit(0))
        )
    }
}

/// Render `register` as three groups of `product_bits`,
/// `product_bits` and 1 digits.
pub fn format_register(register: Register, geometry: &Geometry) -> String {
    Grouped::new(register, geometry).to_string()
}
