//! CLI entry point for the cpu16 assembler and runner.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use cpu16_asm::parser::parse_number;
use cpu16_asm::{assemble_with_listing, AssembleError, Assembly};
use cpu16_core::{
    disassemble_one, run_with_config, CoreConfig, Program, RunResult, TraceEntry,
    DEFAULT_MAX_STEPS, DEFAULT_MEMORY_WORDS,
};
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: cpu16 <command> [options]

Commands:
  build <input> [-o <output>] [--verbose] [--json]  Assemble source to binary
  run   <input> [options]                           Assemble and execute source

Build options:
  -o, --output <file>     Output file path (default: input stem + .bin)
  -v, --verbose           Print listing to stderr
      --json              Print {\"program\": [...]} or {\"error\": ...} on stdout

Run options:
      --input <value>     Queue one console input value (repeatable)
      --inputs <a,b,...>  Queue comma-separated console input values
      --max-steps <n>     Step bound (default 1000)
      --memory-words <n>  Data memory size in words (default 256)
      --json              Print the run result as JSON

  -h, --help              Show this help message

Examples:
  cpu16 build counter.asm -o counter.bin
  cpu16 run echo.asm --inputs 3,$10 --max-steps 200
";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Build(BuildArgs),
    Run(RunArgs),
}

#[derive(Debug, PartialEq, Eq)]
struct BuildArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
    json: bool,
}

#[derive(Debug, PartialEq, Eq)]
struct RunArgs {
    input: PathBuf,
    inputs: Vec<u16>,
    config: CoreConfig,
    json: bool,
}

#[derive(Debug)]
enum ParseResult {
    Command(Command),
    Help,
}

fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<ParseResult, String> {
    let first = args.next().ok_or_else(|| "missing command".to_string())?;

    if first == "--help" || first == "-h" {
        return Ok(ParseResult::Help);
    }

    let command_str = first.to_string_lossy().to_string();

    match command_str.as_str() {
        "build" => parse_build_args(args)
            .map(Command::Build)
            .map(ParseResult::Command),
        "run" => parse_run_args(args)
            .map(Command::Run)
            .map(ParseResult::Command),
        other => Err(format!("unknown command: {other}")),
    }
}

#[allow(clippy::while_let_on_iterator)]
fn parse_build_args(mut args: impl Iterator<Item = OsString>) -> Result<BuildArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut output: Option<PathBuf> = None;
    let mut verbose = false;
    let mut json = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--verbose" || arg == "-v" {
            verbose = true;
            continue;
        }

        if arg == "--json" {
            json = true;
            continue;
        }

        if arg == "-o" || arg == "--output" {
            let value = args
                .next()
                .ok_or_else(|| "missing value for -o".to_string())?;
            output = Some(PathBuf::from(value));
            continue;
        }

        set_input(&mut input, arg)?;
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    Ok(BuildArgs {
        input,
        output,
        verbose,
        json,
    })
}

#[allow(clippy::while_let_on_iterator)]
fn parse_run_args(mut args: impl Iterator<Item = OsString>) -> Result<RunArgs, String> {
    let mut input: Option<PathBuf> = None;
    let mut inputs = Vec::new();
    let mut max_steps = DEFAULT_MAX_STEPS;
    let mut memory_words = DEFAULT_MEMORY_WORDS;
    let mut json = false;

    while let Some(arg) = args.next() {
        if arg == "--help" || arg == "-h" {
            return Err(USAGE_TEXT.to_string());
        }

        if arg == "--json" {
            json = true;
            continue;
        }

        if arg == "--input" {
            let value = option_value(&mut args, "--input")?;
            inputs.push(parse_input_value(&value)?);
            continue;
        }

        if arg == "--inputs" {
            let value = option_value(&mut args, "--inputs")?;
            for item in value.split(',') {
                inputs.push(parse_input_value(item.trim())?);
            }
            continue;
        }

        if arg == "--max-steps" {
            let value = option_value(&mut args, "--max-steps")?;
            max_steps = value
                .parse()
                .map_err(|_| format!("invalid value for --max-steps: {value}"))?;
            continue;
        }

        if arg == "--memory-words" {
            let value = option_value(&mut args, "--memory-words")?;
            memory_words = value
                .parse()
                .map_err(|_| format!("invalid value for --memory-words: {value}"))?;
            continue;
        }

        set_input(&mut input, arg)?;
    }

    let input = input.ok_or_else(|| "missing input path".to_string())?;
    let config = CoreConfig::new(max_steps, memory_words).map_err(|e| e.to_string())?;
    Ok(RunArgs {
        input,
        inputs,
        config,
        json,
    })
}

fn set_input(input: &mut Option<PathBuf>, arg: OsString) -> Result<(), String> {
    if arg.to_string_lossy().starts_with('-') {
        return Err(format!("unknown option: {}", arg.to_string_lossy()));
    }
    if input.is_some() {
        return Err("multiple input paths provided".to_string());
    }
    *input = Some(PathBuf::from(arg));
    Ok(())
}

fn option_value(args: &mut impl Iterator<Item = OsString>, name: &str) -> Result<String, String> {
    args.next()
        .map(|value| value.to_string_lossy().to_string())
        .ok_or_else(|| format!("missing value for {name}"))
}

fn parse_input_value(text: &str) -> Result<u16, String> {
    parse_number(text).ok_or_else(|| format!("invalid input value: {text}"))
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("out");

    let parent = input.parent().unwrap_or_else(|| Path::new(""));

    parent.join(format!("{stem}.bin"))
}

fn read_source(path: &Path) -> Result<String, i32> {
    fs::read_to_string(path).map_err(|e| {
        eprintln!("error: failed to read {}: {e}", path.display());
        1
    })
}

fn assemble_source(source: &str, json: bool) -> Result<Assembly, i32> {
    assemble_with_listing(source).map_err(|e| {
        report_assemble_error(&e, source, json);
        1
    })
}

fn report_assemble_error(e: &AssembleError, source: &str, json: bool) {
    if json {
        println!("{:#}", serde_json::json!({ "error": e.to_string() }));
    } else {
        eprintln!("error: {}", e.render(source));
    }
}

fn run_build(args: BuildArgs) -> Result<(), i32> {
    let source = read_source(&args.input)?;
    let assembly = assemble_source(&source, args.json)?;
    let bytes = assembly.program.as_bytes();

    if args.json {
        println!("{:#}", serde_json::json!({ "program": bytes }));
    }

    // --json alone only reports; -o still writes the file
    if args.json && args.output.is_none() {
        return Ok(());
    }

    let output_path = args
        .output
        .unwrap_or_else(|| default_output_path(&args.input));

    if let Err(e) = fs::write(&output_path, bytes) {
        eprintln!("error: failed to write output: {e}");
        return Err(1);
    }

    if args.verbose {
        print_listing(&assembly);
    }

    if !args.json {
        println!(
            "Assembled {} ({} bytes) -> {}",
            args.input.display(),
            bytes.len(),
            output_path.display()
        );
    }

    Ok(())
}

fn print_listing(assembly: &Assembly) {
    for entry in &assembly.listing {
        let hex_bytes = hex_bytes(&entry.bytes);
        eprintln!(
            "{:04X}: {:<9} {} ; line {}",
            entry.address, hex_bytes, entry.source, entry.line
        );
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn run_program(args: &RunArgs) -> Result<(), i32> {
    let source = read_source(&args.input)?;
    let assembly = assemble_source(&source, args.json)?;
    let result = run_with_config(&assembly.program, &args.inputs, &args.config);

    if args.json {
        match serde_json::to_value(&result) {
            Ok(value) => println!("{value:#}"),
            Err(e) => {
                eprintln!("error: failed to serialize run result: {e}");
                return Err(1);
            }
        }
    } else {
        print_run(&result);
    }

    match result.error {
        Some(cause) => {
            if !args.json {
                eprintln!("error: {cause}");
            }
            Err(1)
        }
        None => Ok(()),
    }
}

fn print_run(result: &RunResult) {
    println!("step  pc    bytes     instruction           A    X    Y    P   cycles");
    for entry in &result.trace {
        println!("{}", format_trace_entry(entry, &result.program));
        for cell in &entry.memory_used {
            println!(
                "      mem[0x{:04X}] = 0x{:04X}",
                cell.address, cell.value
            );
        }
    }

    for output in &result.outputs {
        println!(
            "output: {} (0x{:04X}) from 0x{:04X}",
            output.value, output.value, output.address
        );
    }

    let end = &result.final_state;
    println!(
        "halted: {}  steps: {}  PC={:04X} A={:04X} X={:04X} Y={:04X} P={:02X} cycles={}",
        result.halted,
        result.trace.len(),
        end.pc,
        end.a,
        end.x,
        end.y,
        end.p,
        end.cycles
    );
}

fn format_trace_entry(entry: &TraceEntry, program: &Program) -> String {
    let (bytes, text) = disassemble_one(entry.before.pc, program.as_bytes()).map_or_else(
        || (String::new(), String::from("???")),
        |row| {
            (
                hex_bytes(&row.bytes),
                format!("{} {}", row.mnemonic, row.operands)
                    .trim_end()
                    .to_string(),
            )
        },
    );

    let prefix = format!(
        "{:>4}  {:04X}  {:<8}  {:<20}",
        entry.step, entry.before.pc, bytes, text
    );
    match (&entry.after, &entry.error) {
        (Some(after), _) => format!(
            "{prefix}  {:04X} {:04X} {:04X} {:02X}  {}",
            after.a, after.x, after.y, after.p, after.cycles
        ),
        (None, Some(cause)) => format!("{prefix}  fault: {cause}"),
        (None, None) => prefix,
    }
}

fn main() {
    let exit_code = match parse_args(env::args_os().skip(1)) {
        Ok(ParseResult::Help) => {
            println!("{USAGE_TEXT}");
            0
        }
        Ok(ParseResult::Command(Command::Build(args))) => match run_build(args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Ok(ParseResult::Command(Command::Run(args))) => match run_program(&args) {
            Ok(()) => 0,
            Err(code) => code,
        },
        Err(error) => {
            if error.starts_with("Usage:") {
                println!("{error}");
            } else {
                eprintln!("error: {error}");
                eprintln!("{USAGE_TEXT}");
            }
            1
        }
    };

    std::process::exit(exit_code);
}
