use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use rowstore::{CodecError, ExecuteError, Outcome, PrepareError, Statement, Table, execute};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Interactive in-memory row store.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Prompt printed before each statement.
    #[arg(long, default_value = "db > ")]
    prompt: String,
}

enum Input {
    Line,
    InvalidUtf8,
    Eof,
}

struct InputBuffer {
    bytes: Vec<u8>,
    buffer: String,
}

impl InputBuffer {
    fn new() -> Self {
        Self {
            bytes: Vec::new(),
            buffer: String::new(),
        }
    }

    // A line that is not UTF-8 is reported per line, not as a read failure.
    fn read_input(&mut self, reader: &mut impl BufRead) -> io::Result<Input> {
        self.bytes.clear();
        self.buffer.clear();
        if reader.read_until(b'\n', &mut self.bytes)? == 0 {
            return Ok(Input::Eof);
        }
        match std::str::from_utf8(&self.bytes) {
            Ok(line) => {
                self.buffer.push_str(line.trim());
                Ok(Input::Line)
            }
            Err(_) => Ok(Input::InvalidUtf8),
        }
    }
}

// Non-SQL statements like .exit are called “meta-commands”.
enum MetaCommand {
    Exit,
    Unrecognized,
}

impl MetaCommand {
    fn parse(input: &str) -> Option<MetaCommand> {
        match input {
            ".exit" => Some(MetaCommand::Exit),
            _ if input.starts_with('.') => Some(MetaCommand::Unrecognized),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

fn print_prompt(out: &mut impl Write, prompt: &str) -> io::Result<()> {
    write!(out, "{prompt}")?;
    out.flush()
}

fn run_statement(input: &str, table: &mut Table) -> Result<(), ExecuteError> {
    let statement = match Statement::prepare(input) {
        Ok(statement) => statement,
        Err(PrepareError::SyntaxError) => {
            println!("Syntax error. Could not parse statement.");
            return Ok(());
        }
        Err(PrepareError::NegativeId) => {
            println!("ID must be positive.");
            return Ok(());
        }
        Err(PrepareError::Unrecognized) => {
            println!("Unrecognized keyword at start of '{input}'.");
            return Ok(());
        }
    };

    match execute(statement, table) {
        Ok(Outcome::Inserted) => println!("Executed."),
        Ok(Outcome::Selected(rows)) => {
            for row in rows {
                println!("{row}");
            }
            println!("Executed.");
        }
        Err(ExecuteError::TableFull) => println!("Error: Table Full."),
        Err(ExecuteError::Codec(CodecError::ValueTooLong { .. })) => {
            println!("String is too long.")
        }
        Err(ExecuteError::Codec(CodecError::ContainsNul { .. })) => {
            println!("String contains a NUL byte.")
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

fn handle_line(input: &str, table: &mut Table) -> Result<Flow, ExecuteError> {
    match MetaCommand::parse(input) {
        Some(MetaCommand::Exit) => Ok(Flow::Exit),
        Some(MetaCommand::Unrecognized) => {
            println!("Unrecognized command '{input}'");
            Ok(Flow::Continue)
        }
        None => {
            run_statement(input, table)?;
            Ok(Flow::Continue)
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut table = Table::new();
    let mut input_buffer = InputBuffer::new();
    let mut stdin = io::stdin().lock();

    loop {
        if let Err(err) = print_prompt(&mut io::stdout(), &cli.prompt) {
            error!(%err, "failed to write prompt");
            eprintln!("Error writing output!");
            return ExitCode::FAILURE;
        }

        match input_buffer.read_input(&mut stdin) {
            Ok(Input::Line) => {}
            Ok(Input::InvalidUtf8) => {
                println!("Input is not valid UTF-8.");
                continue;
            }
            Ok(Input::Eof) => {
                info!("end of input");
                break;
            }
            Err(err) => {
                error!(%err, "failed to read input");
                eprintln!("Error reading input!");
                return ExitCode::FAILURE;
            }
        }

        match handle_line(&input_buffer.buffer, &mut table) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => break,
            Err(err) => {
                error!(%err, fatal = err.is_fatal(), "statement aborted");
                eprintln!("Fatal: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    info!(rows = table.num_rows(), pages = table.allocated_pages(), "shutting down");
    ExitCode::SUCCESS
}
