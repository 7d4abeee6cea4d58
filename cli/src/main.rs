use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead, Write};

use clap::ArgAction::{Set, SetTrue};
use clap::Parser;
use tracing::{event, span, Level};
use tracing_subscriber::prelude::*;

use base::prelude::*;
use booth::{multiply_with, Options};

mod output;

use output::{stdout_stream, ColorMode, Report, TraceWriter};

/// Multiply two unsigned binary numbers using the add-and-shift
/// variant of Booth's method, showing every step.
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Multiplicand, in binary.  Prompted for if omitted.
    #[clap(action = Set)]
    multiplicand: Option<String>,

    /// Multiplier, in binary.  Prompted for if omitted.
    #[clap(action = Set)]
    multiplier: Option<String>,

    /// Ignore leading zeros when working out operand widths.  By
    /// default every digit typed counts.
    #[clap(action = SetTrue, long)]
    strip_leading_zeros: bool,

    /// Print the trace as a JSON document instead of text.
    #[clap(action = SetTrue, long)]
    json: bool,

    /// When to colour the text trace.
    #[clap(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

#[derive(Debug)]
enum Fail {
    /// The multiplication itself could not be done.
    Booth(Error),
    /// We could not read operands or write the trace.
    Io(io::Error),
    Json(serde_json::Error),
    /// We were not able to correctly initialise the program.
    InitialisationFailure(String),
}

impl Display for Fail {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Fail::Booth(e) => e.fmt(f),
            Fail::Io(e) => write!(f, "I/O error: {e}"),
            Fail::Json(e) => write!(f, "failed to generate JSON: {e}"),
            Fail::InitialisationFailure(msg) => f.write_str(msg.as_str()),
        }
    }
}

impl StdError for Fail {}

impl From<Error> for Fail {
    fn from(e: Error) -> Fail {
        if let Error::InternalInvariant(_) = &e {
            event!(Level::ERROR, "this is a bug in the simulator: {e}");
        }
        Fail::Booth(e)
    }
}

impl From<io::Error> for Fail {
    fn from(e: io::Error) -> Fail {
        Fail::Io(e)
    }
}

/// Prompt for an operand on standard input.
fn prompt<R: BufRead>(input: &mut R, role: Role) -> Result<String, Fail> {
    println!("Enter {role}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Fail::InitialisationFailure(format!(
            "end of input while reading the {role}"
        )));
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn run_multiplication() -> Result<(), Fail> {
    let cli = Cli::parse();

    // See
    // https://docs.rs/tracing-subscriber/0.3/tracing_subscriber/fmt/index.html#filtering-events-with-environment-variables
    // for instructions on how to select which trace messages get
    // printed.  They go to stderr so that they don't get mixed up
    // with the trace itself.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            return Err(Fail::InitialisationFailure(format!(
                "failed to initialise tracing filter (perhaps there is a problem with environment variables): {e}"
            )));
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let (multiplicand, multiplier) = match (cli.multiplicand, cli.multiplier) {
        (Some(m), Some(r)) => (m, r),
        (given, None) => {
            println!(
                "This program multiplies 2 unsigned binary numbers using one variation of Booth's Method."
            );
            let mut stdin = io::stdin().lock();
            let m = match given {
                Some(m) => m,
                None => prompt(&mut stdin, Role::Multiplicand)?,
            };
            let r = prompt(&mut stdin, Role::Multiplier)?;
            (m, r)
        }
        // clap fills positionals in order, so a multiplier always
        // comes with a multiplicand.
        (None, Some(r)) => {
            return Err(Fail::InitialisationFailure(format!(
                "multiplier {r:?} was given without a multiplicand"
            )));
        }
    };

    let options = Options {
        leading_zeros: if cli.strip_leading_zeros {
            LeadingZeros::Strip
        } else {
            LeadingZeros::Significant
        },
    };

    let span = span!(Level::ERROR, "multiply", multiplicand = %multiplicand, multiplier = %multiplier);
    let _enter = span.enter();
    let trace = multiply_with(&multiplicand, &multiplier, &options)?;

    if cli.json {
        let report = Report::build(&trace)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, &report).map_err(Fail::Json)?;
        writeln!(handle)?;
    } else {
        let mut writer = TraceWriter::new(stdout_stream(cli.color));
        for record in &trace {
            writer.write_record(&record?)?;
        }
        writer.write_product(&trace.product()?)?;
    }
    event!(
        Level::DEBUG,
        "multiplied {} steps",
        trace.geometry().product_bits()
    );
    Ok(())
}

fn main() {
    match run_multiplication() {
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
        Ok(()) => {
            std::process::exit(0);
        }
    }
}
