//! Parsing of user-supplied unsigned binary operands.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use super::error::{Error, Role};
use super::register::{read_binary_digits, BadRegisterString, Register};

/// What to do about leading zeros in an operand.
///
/// Leading zeros make an operand wider, which in turn makes every
/// register wider and the multiplication take more steps.  Whether
/// they should be kept is a policy choice for the caller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LeadingZeros {
    /// Every digit counts towards the operand's width, exactly as
    /// typed.
    #[default]
    Significant,
    /// Drop leading zeros, keeping at least one digit.
    Strip,
}

/// An unsigned operand together with its width in bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Operand {
    role: Role,
    value: u64,
    width: u32,
}

impl Operand {
    /// Parse `text`, which must be a non-empty string of `'0'` and
    /// `'1'` characters.
    pub fn parse(
        role: Role,
        text: &str,
        leading_zeros: LeadingZeros,
    ) -> Result<Operand, Error> {
        // Validate the whole input first, so that a bad digit is
        // reported even when it is preceded by zeros we would strip.
        let (value, width) = match read_binary_digits(text, false) {
            Ok(parsed) => parsed,
            Err(BadRegisterString::Fault(fault)) => {
                return Err(Error::InvalidOperand { role, fault });
            }
            Err(BadRegisterString::Overflow(overflow)) => {
                return Err(Error::RegisterWidthOverflow(overflow));
            }
        };
        let width = match leading_zeros {
            LeadingZeros::Significant => width,
            LeadingZeros::Strip => (u64::BITS - value.leading_zeros()).max(1),
        };
        Ok(Operand { role, value, width })
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub const fn value(&self) -> u64 {
        self.value
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The operand as a register of its own width.
    pub fn as_register(&self) -> Register {
        Register::masked(self.width, self.value)
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} ({})", self.as_register(), self.value)
    }
}
