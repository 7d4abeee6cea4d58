//! An inspectable record of a Booth multiplication.
//!
//! A [`MultiplicationTrace`] holds everything needed to replay the
//! multiplication, but computes nothing up front.  Each call to
//! [`MultiplicationTrace::records`] or [`MultiplicationTrace::steps`]
//! starts a fresh run of the recurrence, so a trace can be iterated
//! any number of times and always produces the same sequence.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use tracing::{event, Level};

use base::prelude::*;

use super::engine::{Action, Engine, IterationState, Step};
use super::registers::Registers;

/// Names the register value shown in a trace record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    A,
    S,
    P,
    #[serde(rename = "P+A")]
    PPlusA,
    #[serde(rename = "P+S")]
    PPlusS,
    #[serde(rename = ">>1 P")]
    Shifted,
}

impl Label {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Label::A => "A",
            Label::S => "S",
            Label::P => "P",
            Label::PPlusA => "P+A",
            Label::PPlusS => "P+S",
            Label::Shifted => ">>1 P",
        }
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        // Use pad so that callers can align labels with `{:>5}`.
        f.pad(self.as_str())
    }
}

/// One line of the trace: a labelled register value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    pub label: Label,
    pub register: Register,
    pub geometry: Geometry,
}

impl TraceRecord {
    /// The register value as three groups of binary digits.
    pub fn formatted(&self) -> String {
        format_register(self.register, &self.geometry)
    }
}

impl Display for TraceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(
            f,
            "{:>5}: {}",
            self.label,
            Grouped::new(self.register, &self.geometry)
        )
    }
}

/// The result of a multiplication: bits `[1, product_bits]` of the
/// final value of `P`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Product {
    register: Register,
}

impl Product {
    fn from_final_p(p: Register, geometry: &Geometry) -> Result<Product, Error> {
        Ok(Product {
            register: p.field(1, geometry.product_bits())?,
        })
    }

    /// The product bits, `product_bits` wide.
    pub const fn register(&self) -> Register {
        self.register
    }

    /// The product as an unsigned number.
    pub const fn value(&self) -> u64 {
        self.register.bits()
    }

    /// The product read as a `product_bits`-wide two's-complement
    /// number.
    pub fn as_signed(&self) -> i64 {
        self.register.as_signed()
    }
}

impl Display for Product {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{:b}", self.register)
    }
}

/// A multiplication which is ready to run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiplicationTrace {
    multiplicand: Operand,
    multiplier: Operand,
    geometry: Geometry,
    registers: Registers,
}

impl MultiplicationTrace {
    pub fn new(multiplicand: Operand, multiplier: Operand, geometry: Geometry) -> Self {
        let registers = Registers::build(&multiplicand, &multiplier, &geometry);
        event!(
            Level::DEBUG,
            multiplicand = %multiplicand,
            multiplier = %multiplier,
            product_bits = geometry.product_bits(),
            total_bits = geometry.total_bits(),
            "prepared multiplication"
        );
        MultiplicationTrace {
            multiplicand,
            multiplier,
            geometry,
            registers,
        }
    }

    pub fn multiplicand(&self) -> &Operand {
        &self.multiplicand
    }

    pub fn multiplier(&self) -> &Operand {
        &self.multiplier
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    fn engine(&self) -> Engine {
        Engine::new(self.geometry, &self.registers)
    }

    /// Iterate over the steps of the recurrence.
    pub fn steps(&self) -> Steps {
        let engine = self.engine();
        Steps {
            state: engine.initial_state(&self.registers),
            engine,
            failure: None,
        }
    }

    /// Iterate over the trace: `A`, `S` and `P` first, then for each
    /// step the sum (if any) and the shifted value of `P`.
    pub fn records(&self) -> Records {
        Records {
            geometry: self.geometry,
            initial: [
                (Label::A, self.registers.a),
                (Label::S, self.registers.s),
                (Label::P, self.registers.p),
            ],
            next_initial: 0,
            steps: self.steps(),
            pending: None,
        }
    }

    /// Run the multiplication to completion.
    pub fn product(&self) -> Result<Product, Error> {
        let engine = self.engine();
        let p = engine.run(engine.initial_state(&self.registers))?;
        Product::from_final_p(p, &self.geometry)
    }
}

impl IntoIterator for &MultiplicationTrace {
    type Item = Result<TraceRecord, Error>;
    type IntoIter = Records;

    fn into_iter(self) -> Records {
        self.records()
    }
}

/// Iterator over the steps of a multiplication.  Stops after
/// `product_bits` steps, or immediately after an error.
#[derive(Clone, Debug)]
pub struct Steps {
    engine: Engine,
    state: IterationState,
    /// Set when a step fails; `state.p` is then only a partial result.
    failure: Option<Error>,
}

impl Steps {
    /// The value of `P` after the steps taken so far.
    pub fn current_p(&self) -> Register {
        self.state.p
    }

    /// The product, if the recurrence has finished.  If a step
    /// failed, that failure is returned instead.
    pub fn final_product(&self) -> Option<Result<Product, Error>> {
        if let Some(e) = &self.failure {
            Some(Err(e.clone()))
        } else if self.state.is_terminal() {
            Some(Product::from_final_p(self.state.p, self.engine.geometry()))
        } else {
            None
        }
    }
}

impl Iterator for Steps {
    type Item = Result<Step, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.engine.advance(&mut self.state);
        if let Some(Err(e)) = &item {
            self.failure = Some(e.clone());
        }
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.state.remaining as usize;
        (0, Some(n))
    }
}

/// Iterator over the records of a trace.
#[derive(Clone, Debug)]
pub struct Records {
    geometry: Geometry,
    initial: [(Label, Register); 3],
    next_initial: usize,
    steps: Steps,
    pending: Option<TraceRecord>,
}

impl Records {
    fn record(&self, label: Label, register: Register) -> TraceRecord {
        TraceRecord {
            label,
            register,
            geometry: self.geometry,
        }
    }
}

impl Iterator for Records {
    type Item = Result<TraceRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some((label, register)) = self.initial.get(self.next_initial).copied() {
            self.next_initial += 1;
            return Some(Ok(self.record(label, register)));
        }
        if let Some(rec) = self.pending.take() {
            return Some(Ok(rec));
        }
        match self.steps.next()? {
            Err(e) => Some(Err(e)),
            Ok(step) => {
                let shift = self.record(Label::Shifted, step.shifted);
                let sum_label = match step.action {
                    Action::Hold => None,
                    Action::AddA => Some(Label::PPlusA),
                    Action::AddS => Some(Label::PPlusS),
                };
                match (sum_label, step.sum) {
                    (Some(label), Some(sum)) => {
                        self.pending = Some(shift);
                        Some(Ok(self.record(label, sum)))
                    }
                    _ => Some(Ok(shift)),
                }
            }
        }
    }
}
