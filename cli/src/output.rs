//! Rendering of a multiplication trace, either as (optionally
//! coloured) text or as JSON.
use std::io;

use clap::ValueEnum;
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use tracing::{event, Level};

use base::prelude::*;
use booth::{Label, MultiplicationTrace, Product, TraceRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Colour the output only when writing to a terminal.
    Auto,
    Always,
    Never,
}

fn get_colour_choice(mode: ColorMode) -> ColorChoice {
    match mode {
        ColorMode::Always => ColorChoice::Always,
        ColorMode::Never => ColorChoice::Never,
        ColorMode::Auto => {
            if atty::is(atty::Stream::Stdout) {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
    }
}

pub fn stdout_stream(mode: ColorMode) -> StandardStream {
    StandardStream::stdout(get_colour_choice(mode))
}

/// Writes trace records as lines of text.  Sums are highlighted so
/// that the steps which changed `P` stand out, and the product is
/// shown in bold.
pub struct TraceWriter<W: WriteColor> {
    stream: W,
}

impl<W: WriteColor> TraceWriter<W> {
    pub fn new(stream: W) -> TraceWriter<W> {
        TraceWriter { stream }
    }

    fn set_colour(&mut self, spec: &ColorSpec) {
        if let Err(e) = self.stream.set_color(spec) {
            event!(Level::ERROR, "Failed to select colour {:?}: {}", spec, e);
        }
    }

    fn reset_colour(&mut self) {
        if let Err(e) = self.stream.reset() {
            event!(Level::ERROR, "Failed to reset terminal: {}", e);
        }
    }

    pub fn write_record(&mut self, record: &TraceRecord) -> Result<(), io::Error> {
        let mut colour = ColorSpec::new();
        match record.label {
            Label::PPlusA => {
                colour.set_fg(Some(Color::Green));
            }
            Label::PPlusS => {
                colour.set_fg(Some(Color::Yellow));
            }
            Label::A | Label::S | Label::P => {
                colour.set_fg(Some(Color::Cyan));
            }
            Label::Shifted => (),
        }
        self.set_colour(&colour);
        let result = writeln!(self.stream, "{record}");
        self.reset_colour();
        result
    }

    pub fn write_product(&mut self, product: &Product) -> Result<(), io::Error> {
        self.set_colour(ColorSpec::new().set_bold(true));
        let result = writeln!(self.stream, "Product: {product} ({})", product.value());
        self.reset_colour();
        result.and_then(|()| self.stream.flush())
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.stream
    }
}

#[derive(Debug, Serialize)]
struct RecordReport {
    label: Label,
    bits: String,
}

#[derive(Debug, Serialize)]
struct ProductReport {
    bits: String,
    value: u64,
}

/// Everything about a multiplication, in a form which serialises
/// nicely.
#[derive(Debug, Serialize)]
pub struct Report {
    multiplicand: Operand,
    multiplier: Operand,
    geometry: Geometry,
    records: Vec<RecordReport>,
    product: ProductReport,
}

impl Report {
    pub fn build(trace: &MultiplicationTrace) -> Result<Report, Error> {
        let records = trace
            .records()
            .map(|rec| {
                rec.map(|rec| RecordReport {
                    label: rec.label,
                    bits: rec.formatted(),
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;
        let product = trace.product()?;
        Ok(Report {
            multiplicand: *trace.multiplicand(),
            multiplier: *trace.multiplier(),
            geometry: *trace.geometry(),
            records,
            product: ProductReport {
                bits: product.to_string(),
                value: product.value(),
            },
        })
    }
}
