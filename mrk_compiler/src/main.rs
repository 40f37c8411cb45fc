use mrk_compiler::batch::{self, BatchConfig};
use mrk_compiler::config::runtime::{parse_log_level, RuntimeConfig};
use mrk_compiler::file_processor::FileProcessor;
use mrk_compiler::lexical::LexicalAnalyzer;
use mrk_compiler::logging::{self, ProcessingSummary};
use mrk_compiler::syntax::ParseOptions;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, PartialEq)]
struct ParseArgs {
    json: bool,
    parallel: Option<bool>,
    recursive: Option<bool>,
    log_level: Option<String>,
    config: Option<PathBuf>,
    inputs: Vec<PathBuf>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Tokens(PathBuf),
    Parse(ParseArgs),
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("mrkc");

    let command = match parse_command(args.get(1..).unwrap_or(&[])) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Run '{} --help' for usage", program);
            std::process::exit(2);
        }
    };

    let mut runtime = RuntimeConfig::default();
    if let Command::Parse(parse_args) = &command {
        if let Some(path) = &parse_args.config {
            runtime = match RuntimeConfig::load(path) {
                Ok(loaded) => loaded,
                Err(message) => {
                    eprintln!("Error: {}", message);
                    std::process::exit(2);
                }
            };
        }
        apply_overrides(&mut runtime, parse_args);
    }

    if let Err(e) = logging::config::init_runtime_preferences(runtime.logging.clone()) {
        eprintln!("Warning: {}", e);
    }
    if let Err(e) = logging::init_global_logging() {
        eprintln!("Warning: logging unavailable: {}", e);
    }

    let exit_code = match command {
        Command::Help => {
            print_help(program);
            0
        }
        Command::Tokens(path) => dump_tokens(&path, &runtime),
        Command::Parse(parse_args) => run_parse(&parse_args, &runtime),
    };

    std::process::exit(exit_code);
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let Some(first) = args.first() else {
        return Ok(Command::Help);
    };

    match first.as_str() {
        "--help" | "-h" | "help" => Ok(Command::Help),
        "tokens" => match &args[1..] {
            [path] => Ok(Command::Tokens(PathBuf::from(path))),
            _ => Err("'tokens' takes exactly one file".to_string()),
        },
        "parse" => parse_parse_args(&args[1..]).map(Command::Parse),
        other => Err(format!("Unknown command '{}'", other)),
    }
}

fn parse_parse_args(args: &[String]) -> Result<ParseArgs, String> {
    let mut parsed = ParseArgs::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => parsed.json = true,
            "--parallel" => parsed.parallel = Some(true),
            "--sequential" => parsed.parallel = Some(false),
            "--recursive" => parsed.recursive = Some(true),
            "--no-recursive" => parsed.recursive = Some(false),
            "--log-level" => {
                let level = args
                    .get(i + 1)
                    .ok_or_else(|| "--log-level requires a value".to_string())?;
                if parse_log_level(level).is_none() {
                    return Err(format!("Invalid log level '{}'", level));
                }
                parsed.log_level = Some(level.clone());
                i += 1;
            }
            "--config" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a file".to_string())?;
                parsed.config = Some(PathBuf::from(path));
                i += 1;
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
            input => parsed.inputs.push(PathBuf::from(input)),
        }
        i += 1;
    }

    if parsed.inputs.is_empty() {
        return Err("'parse' needs at least one file or directory".to_string());
    }

    Ok(parsed)
}

fn apply_overrides(runtime: &mut RuntimeConfig, args: &ParseArgs) {
    if let Some(parallel) = args.parallel {
        runtime.batch.parallel = parallel;
    }
    if let Some(recursive) = args.recursive {
        runtime.batch.recursive = recursive;
    }
    if let Some(level) = args.log_level.as_deref().and_then(parse_log_level) {
        runtime.logging.min_log_level = level;
    }
}

fn print_help(program: &str) {
    println!("mrkc v{}", env!("CARGO_PKG_VERSION"));
    println!("Tokenizer and declaration parser for mrk sources");
    println!();
    println!("USAGE:");
    println!("    {} tokens <file>                     # Dump the token stream", program);
    println!("    {} parse [options] <file|dir>...     # Parse declarations", program);
    println!();
    println!("PARSE OPTIONS:");
    println!("    --json              Print the declaration skeleton as JSON");
    println!("    --parallel          Parse files on worker threads");
    println!("    --sequential        Parse files on one thread");
    println!("    --recursive         Search subdirectories");
    println!("    --no-recursive      Don't search subdirectories");
    println!("    --log-level LEVEL   error, warning, info or debug");
    println!("    --config FILE       Load runtime preferences from a TOML file");
    println!();
    println!("{}", logging::config::get_config_summary());
}

fn dump_tokens(path: &Path, runtime: &RuntimeConfig) -> i32 {
    let processor = FileProcessor::from_preferences(&runtime.file_processor);
    let loaded = match processor.process_file(&path.display().to_string()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut analyzer = LexicalAnalyzer::with_preferences(runtime.lexical.clone());
    match analyzer.tokenize(&loaded.source) {
        Ok(tokens) => {
            println!("Tokens count: {}", tokens.len());
            println!();
            for (index, token) in tokens.iter().enumerate() {
                println!("{} {}", index, token);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn run_parse(args: &ParseArgs, runtime: &RuntimeConfig) -> i32 {
    let config = BatchConfig::from_preferences(&runtime.batch);
    let processor = FileProcessor::from_preferences(&runtime.file_processor);
    let options = ParseOptions {
        lexical: runtime.lexical.clone(),
        parser: runtime.parser.clone(),
    };

    let results = match batch::collect_inputs(&args.inputs, &config)
        .and_then(|files| batch::process_files(&files, &config, &processor, &options))
    {
        Ok(results) => results,
        Err(e) => {
            eprintln!("Error [{}]: {}", e.error_code(), e);
            return 1;
        }
    };

    for (path, error) in &results.failed_files {
        eprintln!("error[{}]: {}", error.error_code(), error);
        eprintln!("  --> {}", path.display());
    }

    if !results.result.logs.is_empty() {
        println!("Logs:");
        for event in &results.result.logs {
            println!("  {}", event.format());
        }
        println!();
    }

    print!("{}", results.result.format_report());

    if args.json {
        match results.result.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                return 1;
            }
        }
    }

    if let Some(line) = logged_summary(&logging::get_processing_summary()) {
        eprintln!("{}", line);
    }

    if results.has_failures() {
        1
    } else {
        0
    }
}

/// One line over every error and warning the logger collected, including
/// load failures that never reached the parser
fn logged_summary(summary: &ProcessingSummary) -> Option<String> {
    if !summary.has_errors() && !summary.has_warnings() {
        return None;
    }
    Some(format!(
        "logged: {} error(s), {} warning(s); {} of {} file(s) with errors",
        summary.total_errors, summary.total_warnings, summary.failed_files, summary.total_files
    ))
}
