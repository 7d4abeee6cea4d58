//! Construction of the initial `A`, `S` and `P` registers.
use serde::Serialize;
use tracing::{event, Level};

use base::prelude::*;

/// The three registers of a Booth multiplication as they stand
/// before the first step.  `a` and `s` never change after this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Registers {
    /// The multiplicand, placed at `half_bit`.
    pub a: Register,
    /// The two's complement of the multiplicand, also at `half_bit`.
    pub s: Register,
    /// The multiplier, placed at bit 1.  Bit 0 starts out as zero.
    pub p: Register,
}

impl Registers {
    pub fn build(multiplicand: &Operand, multiplier: &Operand, geometry: &Geometry) -> Registers {
        let half_bit = geometry.half_bit();
        let a = geometry.register(multiplicand.value()).shift_left(half_bit);
        // The negation is taken at full register width, not at the
        // multiplicand's own width.  Otherwise the high product half
        // would see a positive value whenever the multiplicand is
        // narrower than product_bits.
        let s = geometry
            .register((!multiplicand.value()).wrapping_add(1))
            .shift_left(half_bit);
        let p = geometry.register(multiplier.value()).shift_left(1);
        event!(
            Level::DEBUG,
            "initial registers: A={a:b} S={s:b} P={p:b}"
        );
        Registers { a, s, p }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands(m: &str, r: &str) -> (Operand, Operand, Geometry) {
        let m = Operand::parse(Role::Multiplicand, m, LeadingZeros::Significant)
            .expect("valid multiplicand");
        let r = Operand::parse(Role::Multiplier, r, LeadingZeros::Significant)
            .expect("valid multiplier");
        let g = Geometry::new(m.width(), r.width()).expect("valid widths");
        (m, r, g)
    }

    #[test]
    fn test_seven_by_three() {
        let (m, r, g) = operands("0111", "0011");
        let regs = Registers::build(&m, &r, &g);
        assert_eq!(format_register(regs.a, &g), "00000111 00000000 0");
        assert_eq!(format_register(regs.s, &g), "11111001 00000000 0");
        assert_eq!(format_register(regs.p, &g), "00000000 00000011 0");
    }

    #[test]
    fn test_s_is_negation_of_a() {
        let (m, r, g) = operands("1000", "0010");
        let regs = Registers::build(&m, &r, &g);
        assert_eq!(regs.s, regs.a.negate());
        assert_eq!(regs.s.as_signed(), -(8 << 9));
    }

    #[test]
    fn test_zero_multiplicand() {
        let (m, r, g) = operands("0000", "1111");
        let regs = Registers::build(&m, &r, &g);
        assert!(regs.a.is_zero());
        assert!(regs.s.is_zero());
        assert_eq!(regs.p.bits(), 0b1111_0);
    }

    #[test]
    fn test_registers_share_width() {
        let (m, r, g) = operands("1", "10110");
        let regs = Registers::build(&m, &r, &g);
        for reg in [regs.a, regs.s, regs.p] {
            assert_eq!(reg.width(), g.total_bits());
        }
    }
}
