//! Basic error reporting.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Identifies which of the two inputs of a multiplication a problem
/// relates to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    Multiplicand,
    Multiplier,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Role::Multiplicand => "multiplicand",
            Role::Multiplier => "multiplier",
        })
    }
}

/// Describes why an operand string was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandFault {
    Empty,
    /// `position` counts characters (not bytes) from zero.
    NotBinary {
        position: usize,
        found: char,
    },
}

impl Display for OperandFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            OperandFault::Empty => f.write_str("operand is empty"),
            OperandFault::NotBinary { position, found } => write!(
                f,
                "character {found:?} at position {position} is not a binary digit"
            ),
        }
    }
}

/// Some value needs more bits than a register can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WidthOverflow {
    /// The number of bits that would have been needed.
    pub required: u64,
    /// The widest register we can represent.
    pub available: u32,
}

impl Display for WidthOverflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{} bits are needed but registers hold at most {} bits",
            self.required, self.available
        )
    }
}

/// The simulator reached a state which should be impossible.  This
/// indicates a bug rather than a problem with the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InternalInvariant {
    pub detail: String,
}

impl Display for InternalInvariant {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "internal invariant violated: {}", self.detail)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    InvalidOperand { role: Role, fault: OperandFault },
    RegisterWidthOverflow(WidthOverflow),
    InternalInvariant(InternalInvariant),
}

impl Error {
    pub fn invariant(detail: impl Into<String>) -> Error {
        Error::InternalInvariant(InternalInvariant {
            detail: detail.into(),
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Error::InvalidOperand { role, fault } => write!(f, "invalid {role}: {fault}"),
            Error::RegisterWidthOverflow(overflow) => {
                write!(f, "register width overflow: {overflow}")
            }
            Error::InternalInvariant(inv) => Display::fmt(inv, f),
        }
    }
}

impl StdError for Error {}

impl From<WidthOverflow> for Error {
    fn from(overflow: WidthOverflow) -> Error {
        Error::RegisterWidthOverflow(overflow)
    }
}

impl From<InternalInvariant> for Error {
    fn from(inv: InternalInvariant) -> Error {
        Error::InternalInvariant(inv)
    }
}

#[test]
fn test_display_invalid_operand() {
    let e = Error::InvalidOperand {
        role: Role::Multiplier,
        fault: OperandFault::NotBinary {
            position: 2,
            found: '2',
        },
    };
    assert_eq!(
        e.to_string(),
        "invalid multiplier: character '2' at position 2 is not a binary digit"
    );
}

#[test]
fn test_display_width_overflow() {
    let e = Error::from(WidthOverflow {
        required: 67,
        available: 64,
    });
    assert_eq!(
        e.to_string(),
        "register width overflow: 67 bits are needed but registers hold at most 64 bits"
    );
}
