//! Flexcheck CLI - Declarative payload validation
//!
//! Validates JSON objects against a spec file from the command line.

use anyhow::{bail, Context};
use flexcheck::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let program = program_name(&args);

    if args.len() < 2 {
        print_usage(program);
        return ExitCode::from(2);
    }

    match args[1].as_str() {
        "validate" => match validate_command(&args[2..]) {
            Ok(true) => ExitCode::SUCCESS,
            Ok(false) => ExitCode::from(1),
            Err(e) => {
                eprintln!("❌ {:#}", e);
                ExitCode::from(2)
            }
        },
        "rules" => {
            list_rules();
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(program);
            ExitCode::from(2)
        }
    }
}

/// Name to show in usage; argv may be empty.
fn program_name(args: &[String]) -> &str {
    args.first().map_or("flexcheck", String::as_str)
}

fn print_usage(program: &str) {
    println!("Flexcheck v{}", flexcheck::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  validate <spec> <object> [options]  Validate a JSON object (or array of objects)");
    println!("  rules                               List supported rule kinds");
    println!("  help                                Show this help message");
    println!();
    println!("Validate options:");
    println!("  --config <file>   Engine configuration (TOML)");
    println!("  --legacy          Print violations as {{attr, valid, msg}} JSON");
    println!();
    println!("Exit status: 0 valid, 1 violations found, 2 error");
}

fn list_rules() {
    println!("Supported rules:");
    for kind in RuleKind::ALL {
        println!("  • {:<9} {}", kind.name(), kind.description());
    }
}

struct ValidateArgs {
    spec: PathBuf,
    object: PathBuf,
    config: Option<PathBuf>,
    legacy: bool,
}

fn parse_validate_args(args: &[String]) -> anyhow::Result<ValidateArgs> {
    let mut positional = Vec::new();
    let mut config = None;
    let mut legacy = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--legacy" => {
                legacy = true;
                i += 1;
            }
            other if other.starts_with("--") => bail!("unknown option: {}", other),
            other => {
                positional.push(PathBuf::from(other));
                i += 1;
            }
        }
    }

    match <[PathBuf; 2]>::try_from(positional) {
        Ok([spec, object]) => Ok(ValidateArgs {
            spec,
            object,
            config,
            legacy,
        }),
        Err(_) => bail!("validate expects <spec> and <object> paths"),
    }
}

/// Returns whether every object was valid.
fn validate_command(args: &[String]) -> anyhow::Result<bool> {
    let args = parse_validate_args(args)?;

    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    init_logging(&config);

    let validator = Validator::with_config(config);
    let spec = validator
        .loader()
        .load_file(&args.spec)
        .with_context(|| format!("loading spec {}", args.spec.display()))?;

    let text = std::fs::read_to_string(&args.object)
        .with_context(|| format!("reading object {}", args.object.display()))?;
    let input = Value::from_json(&text)
        .with_context(|| format!("parsing object {}", args.object.display()))?;

    let objects = match input {
        Value::Array(items) => items,
        single => vec![single],
    };
    let reports = validator.validate_batch(&spec, &objects)?;

    if args.legacy {
        let legacy: Vec<Vec<LegacyViolation>> = reports.iter().map(ValidationReport::to_legacy).collect();
        let json = if legacy.len() == 1 {
            serde_json::to_string_pretty(&legacy[0])?
        } else {
            serde_json::to_string_pretty(&legacy)?
        };
        println!("{}", json);
    } else {
        for (index, report) in reports.iter().enumerate() {
            if reports.len() > 1 {
                println!("[{}] {}", index, report.summary());
            } else {
                println!("{}", report.summary());
            }
            for line in report.detailed_errors() {
                println!("   {}", line);
            }
        }
    }

    Ok(reports.iter().all(ValidationReport::is_valid))
}

fn init_logging(config: &EngineConfig) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();
}
