//! The Booth recurrence.
//!
//! Each step looks at the two least significant bits of `P`, adds
//! `A` or `S` to `P` (or leaves it alone), then shifts `P` one place
//! to the right, preserving its sign.  The recurrence always runs
//! for exactly `product_bits` steps.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::{event, Level};

use base::prelude::*;

use super::registers::Registers;

/// The two least significant bits of `P`, which select what a step
/// does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoothPair {
    Zero,     // 00
    RunEnd,   // 01
    RunStart, // 10
    One,      // 11
}

impl TryFrom<u8> for BoothPair {
    type Error = Error;

    fn try_from(bits: u8) -> Result<BoothPair, Error> {
        match bits {
            0b00 => Ok(BoothPair::Zero),
            0b01 => Ok(BoothPair::RunEnd),
            0b10 => Ok(BoothPair::RunStart),
            0b11 => Ok(BoothPair::One),
            other => Err(Error::invariant(format!(
                "{other:#b} is not a two-bit Booth pair"
            ))),
        }
    }
}

/// What a single step did to `P` before shifting it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Action {
    /// `00` or `11`: `P` is left as it is.
    Hold,
    /// `01`: `P = P + A`.
    AddA,
    /// `10`: `P = P + S`.
    AddS,
}

impl From<BoothPair> for Action {
    fn from(pair: BoothPair) -> Action {
        match pair {
            BoothPair::Zero | BoothPair::One => Action::Hold,
            BoothPair::RunEnd => Action::AddA,
            BoothPair::RunStart => Action::AddS,
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(match self {
            Action::Hold => "hold",
            Action::AddA => "P+A",
            Action::AddS => "P+S",
        })
    }
}

/// The result of one step of the recurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    /// Counts from 1 up to `product_bits`.
    pub iteration: u32,
    pub action: Action,
    /// The value of `P` after the addition, if there was one.
    pub sum: Option<Register>,
    /// The value of `P` after the shift.  This is the input to the
    /// next step.
    pub shifted: Register,
}

/// The loop-carried state of the recurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IterationState {
    /// Steps still to run; the recurrence is finished at zero.
    pub remaining: u32,
    pub p: Register,
}

impl IterationState {
    pub const fn is_terminal(&self) -> bool {
        self.remaining == 0
    }
}

/// Runs the recurrence for fixed `A` and `S`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Engine {
    geometry: Geometry,
    a: Register,
    s: Register,
}

impl Engine {
    pub fn new(geometry: Geometry, registers: &Registers) -> Engine {
        Engine {
            geometry,
            a: registers.a,
            s: registers.s,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn initial_state(&self, registers: &Registers) -> IterationState {
        IterationState {
            remaining: self.geometry.product_bits(),
            p: registers.p,
        }
    }

    /// Perform one add-and-shift step on `p`.
    pub fn step(&self, p: Register) -> Result<(Action, Option<Register>, Register), Error> {
        let action = Action::from(BoothPair::try_from(p.two_lsbs())?);
        let sum = match action {
            Action::Hold => None,
            Action::AddA => Some(p.wrapping_add(self.a)),
            Action::AddS => Some(p.wrapping_add(self.s)),
        };
        let shifted = sum.unwrap_or(p).arithmetic_shift_right();
        Ok((action, sum, shifted))
    }

    /// Advance `state` by one step.  Returns `None` once the state is
    /// terminal.
    pub fn advance(&self, state: &mut IterationState) -> Option<Result<Step, Error>> {
        if state.is_terminal() {
            return None;
        }
        let iteration = self.geometry.product_bits() - state.remaining + 1;
        match self.step(state.p) {
            Ok((action, sum, shifted)) => {
                event!(
                    Level::TRACE,
                    iteration,
                    %action,
                    "P={:b} -> {:b}",
                    state.p,
                    shifted
                );
                state.p = shifted;
                state.remaining -= 1;
                Some(Ok(Step {
                    iteration,
                    action,
                    sum,
                    shifted,
                }))
            }
            Err(e) => {
                event!(Level::ERROR, "step {iteration} failed: {e}");
                // There is no sensible way to continue.
                state.remaining = 0;
                Some(Err(e))
            }
        }
    }

    /// Run the recurrence to completion, returning the final value of
    /// `P`.
    pub fn run(&self, mut state: IterationState) -> Result<Register, Error> {
        while let Some(step) = self.advance(&mut state) {
            step?;
        }
        Ok(state.p)
    }
}
