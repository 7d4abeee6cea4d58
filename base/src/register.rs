//! Fixed-width two's-complement registers.
//!
//! A [`Register`] is logically `width` bits wide but is stored in a
//! `u64`.  All bits above `width - 1` are kept at zero, so native
//! arithmetic can be used as long as the result is masked again
//! afterwards.  In particular the native shift operators know
//! nothing about the logical width, which is why
//! [`Register::arithmetic_shift_right`] has to fix up the sign bit
//! itself.

use std::fmt::{self, Binary, Debug, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use super::error::{Error, OperandFault, WidthOverflow};


/// Returns a mask with the bottom `width` bits set.  `width` must be
/// in the range `1..=64`.
const fn mask(width: u32) -> u64 {
    u64::MAX >> (u64::BITS - width)
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Register {
    bits: u64,
    width: u32,
}

impl Register {
    /// The widest register we can represent.
    pub const MAX_WIDTH: u32 = u64::BITS;

    /// Create a register of the given width.  Bits of `bits` above
    /// the width are discarded.
    pub fn try_new(width: u32, bits: u64) -> Result<Register, Error> {
        if width == 0 || width > Self::MAX_WIDTH {
            Err(Error::from(WidthOverflow {
                required: u64::from(width),
                available: Self::MAX_WIDTH,
            }))
        } else {
            Ok(Register::masked(width, bits))
        }
    }

    /// Callers must already have checked `width`.
    pub(crate) const fn masked(width: u32, bits: u64) -> Register {
        Register {
            bits: bits & mask(width),
            width,
        }
    }

    pub const fn bits(&self) -> u64 {
        self.bits
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn is_zero(&self) -> bool {
        self.bits == 0
    }

    /// Returns bit `pos` (bit 0 is the least significant).  Bits
    /// beyond the register's width read as zero.
    pub const fn bit(&self, pos: u32) -> bool {
        pos < self.width && (self.bits >> pos) & 1 != 0
    }

    /// The two least significant bits, which select the Booth
    /// operation.
    pub const fn two_lsbs(&self) -> u8 {
        (self.bits & 0b11) as u8
    }

    pub const fn sign_bit(&self) -> bool {
        self.bit(self.width - 1)
    }

    /// Add `rhs`, discarding any carry out of the top bit.
    ///
    /// # Panics
    ///
    /// Panics if the two registers have different widths, since that
    /// is always a programming error.
    pub fn wrapping_add(self, rhs: Register) -> Register {
        assert_eq!(
            self.width, rhs.width,
            "cannot add registers of different widths"
        );
        Register::masked(self.width, self.bits.wrapping_add(rhs.bits))
    }

    /// Two's-complement negation within the register's width.
    pub fn negate(self) -> Register {
        Register::masked(self.width, (!self.bits).wrapping_add(1))
    }

    /// Shift left by `n` places, discarding bits which leave the
    /// register.
    pub fn shift_left(self, n: u32) -> Register {
        Register::masked(self.width, self.bits.checked_shl(n).unwrap_or(0))
    }

    /// Arithmetic shift right by one place within the register's
    /// logical width.
    ///
    /// The plain shift leaves a zero in bit `width - 1`.  Bit `width
    /// - 2` now holds the old sign bit, so wherever the two disagree
    /// we flip the top bit to replicate the sign.
    pub fn arithmetic_shift_right(self) -> Register {
        if self.width == 1 {
            // The only bit is the sign bit; it shifts onto itself.
            return self;
        }
        let top = self.width - 1;
        let shifted = self.bits >> 1;
        let penultimate = (shifted >> (top - 1)) & 1;
        let msb = (shifted >> top) & 1;
        let bits = if penultimate != msb {
            shifted ^ (1 << top)
        } else {
            shifted
        };
        Register::masked(self.width, bits)
    }

    /// Extract `len` bits starting at bit `lo` as a new register of
    /// width `len`.
    pub fn field(self, lo: u32, len: u32) -> Result<Register, Error> {
        if lo.saturating_add(len) > self.width {
            return Err(Error::invariant(format!(
                "bit field [{lo}, {}) lies outside a {}-bit register",
                lo.saturating_add(len),
                self.width
            )));
        }
        Register::try_new(len, self.bits >> lo)
    }

    /// Interpret the register as a two's-complement signed value.
    pub fn as_signed(self) -> i64 {
        let unused = u64::BITS - self.width;
        // Move our sign bit into the native sign bit and let the
        // native arithmetic shift bring it back down.
        ((self.bits << unused) as i64) >> unused
    }
}

impl Debug for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Register{{width: {}, bits: {:b}}}", self.width, self)
    }
}

impl Binary for Register {
    /// Always renders exactly `width` digits, most significant first.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        let width = self.width as usize;
        write!(f, "{:0width$b}", self.bits)
    }
}

impl Display for Register {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        Binary::fmt(self, f)
    }
}

/// Why a string could not be read as a register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BadRegisterString {
    Fault(OperandFault),
    Overflow(WidthOverflow),
}

impl Display for BadRegisterString {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            BadRegisterString::Fault(fault) => Display::fmt(fault, f),
            BadRegisterString::Overflow(overflow) => Display::fmt(overflow, f),
        }
    }
}

impl std::error::Error for BadRegisterString {}

/// Accumulate a string of binary digits, most significant first,
/// returning the value and the number of digits.  When `skip_spaces`
/// is set, spaces are ignored (but still count as positions for
/// error reporting).
pub(crate) fn read_binary_digits(
    s: &str,
    skip_spaces: bool,
) -> Result<(u64, u32), BadRegisterString> {
    let mut bits: u64 = 0;
    let mut width: u32 = 0;
    for (position, ch) in s.chars().enumerate() {
        let digit = match ch {
            ' ' if skip_spaces => continue,
            '0' => 0,
            '1' => 1,
            found => {
                return Err(BadRegisterString::Fault(OperandFault::NotBinary {
                    position,
                    found,
                }));
            }
        };
        width = width.saturating_add(1);
        if width > Register::MAX_WIDTH {
            // Keep going; a bad character later on is the more
            // useful diagnostic.
            continue;
        }
        bits = (bits << 1) | digit;
    }
    if width == 0 {
        Err(BadRegisterString::Fault(OperandFault::Empty))
    } else if width > Register::MAX_WIDTH {
        Err(BadRegisterString::Overflow(WidthOverflow {
            required: u64::from(width),
            available: Register::MAX_WIDTH,
        }))
    } else {
        Ok((bits, width))
    }
}

/// Parses a string of binary digits.  Spaces are ignored so that the
/// output of the register formatter can be read back in; the width
/// of the result is the number of digits.
impl FromStr for Register {
    type Err = BadRegisterString;

    fn from_str(s: &str) -> Result<Register, BadRegisterString> {
        let (bits, width) = read_binary_digits(s, true)?;
        Ok(Register::masked(width, bits))
    }
}
