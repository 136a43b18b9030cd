//! mpspec Command-Line Interface
//!
//! Entry point for inspecting Molpro input the way the guided editor sees
//! it.
//!
//! # Usage
//!
//! ```bash
//! # Structured form as JSON
//! mpspec parse job.inp
//!
//! # Input text from a (possibly edited) structured form
//! mpspec generate job.json
//!
//! # Canonical form, and equivalence of two inputs
//! mpspec canon job.inp
//! mpspec equiv job.inp job.orig.inp
//!
//! # Whether guided editing is safe, with the derived views
//! mpspec guided job.inp
//!
//! # Settings template
//! mpspec ci mpspec_config.cfg
//! ```
//!
//! # Help System
//!
//! - `mpspec --help` - General help
//! - `mpspec --help keywords` - Statements of the guided subset
//! - `mpspec --help methods` - Methods offered as steps
//! - `mpspec --help features` - Derived views
//! - `mpspec --help examples` - Usage examples

use log::{debug, info};
use mpspec::canonical::{canonicalise, equivalent};
use mpspec::parser::{parse_file, parse_guided, Parsed};
use mpspec::settings::{SettingsManager, CONFIG_FILE_NAME};
use mpspec::{InputSpecification, ParserConfig};
use std::env;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    check_help_flags(&args);

    let settings = SettingsManager::load().unwrap_or_else(|e| {
        eprintln!("Warning: using built-in settings: {}", e);
        SettingsManager::default()
    });
    env_logger::Builder::from_default_env()
        .filter_level(settings.logging().level_filter())
        .target(env_logger::Target::Stdout)
        .format_timestamp_millis()
        .init();
    debug!("Configuration loaded from: {}", settings.config_source());
    let config = settings.parser_config();

    let command = args[1].as_str();
    let result = match (command, args.len()) {
        ("ci", 3) if args[2] == CONFIG_FILE_NAME => run_create_settings_template(),
        ("ci", _) => {
            eprintln!("Usage: {} ci {}", args[0], CONFIG_FILE_NAME);
            process::exit(1);
        }
        ("parse", 3) => run_parse(Path::new(&args[2]), &config),
        ("generate", 3) => run_generate(Path::new(&args[2])),
        ("canon", 3) => run_canon(Path::new(&args[2])),
        ("equiv", 4) => run_equiv(Path::new(&args[2]), Path::new(&args[3])),
        ("guided", 3) => run_guided(Path::new(&args[2]), &config),
        _ => {
            eprintln!("Error: Unknown command or wrong number of arguments: {}", command);
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Check for help flags and print appropriate help
fn check_help_flags(args: &[String]) {
    use mpspec::help::*;

    if args.len() >= 3 && (args[1] == "--help" || args[1] == "-h") {
        match args[2].as_str() {
            "keywords" => print_keyword_help(),
            "methods" => print_method_help(),
            "features" => print_feature_help(),
            "examples" => print_examples(),
            _ => print_global_help(),
        }
        process::exit(0);
    }

    if args.len() == 2 && (args[1] == "--help" || args[1] == "-h") {
        print_global_help();
        process::exit(0);
    }

    if args.len() >= 3 && args[1] == "ci" && (args[2] == "--help" || args[2] == "-h") {
        print_ci_help();
        process::exit(0);
    }
}

/// Prints usage information to stderr.
fn print_usage(program_name: &str) {
    eprintln!("mpspec - guided editing of Molpro input");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} parse <input_file>", program_name);
    eprintln!("                    Print the structured form as JSON");
    eprintln!("  {} generate <json_file>", program_name);
    eprintln!("                    Generate input from a structured form");
    eprintln!("  {} canon <input_file>", program_name);
    eprintln!("                    Print the canonical form");
    eprintln!("  {} equiv <first_file> <second_file>", program_name);
    eprintln!("                    Check whether two inputs are equivalent");
    eprintln!("  {} guided <input_file>", program_name);
    eprintln!("                    Check guided editing and print the derived views");
    eprintln!("  {} ci {}", program_name, CONFIG_FILE_NAME);
    eprintln!("                    Create a settings template file");
    eprintln!();
    eprintln!("  {} --help [keywords|methods|features|examples]", program_name);
}

/// Writes the settings template into the current directory.
fn run_create_settings_template() -> Result<bool, Box<dyn Error>> {
    SettingsManager::create_template(Path::new(CONFIG_FILE_NAME))?;
    println!("✓ Settings template created successfully!");
    println!("  Output file: {}", CONFIG_FILE_NAME);
    println!("\nNext steps:");
    println!("  1. Review and edit the {} file", CONFIG_FILE_NAME);
    println!("  2. Adjust the allowed methods and logging level as needed");
    println!("  3. The settings will be automatically loaded by mpspec");
    Ok(true)
}

/// Prints the structured form; `false` when the input is unrepresentable.
fn run_parse(path: &Path, config: &ParserConfig) -> Result<bool, Box<dyn Error>> {
    match parse_file(path, config)? {
        Parsed::Specification(spec) => {
            println!("{}", serde_json::to_string_pretty(&spec)?);
            Ok(true)
        }
        Parsed::Unrepresentable(reason) => {
            println!("Not representable: {}", reason);
            Ok(false)
        }
    }
}

fn run_generate(path: &Path) -> Result<bool, Box<dyn Error>> {
    let spec: InputSpecification = serde_json::from_str(&fs::read_to_string(path)?)?;
    print!("{}", spec.to_input());
    Ok(true)
}

fn run_canon(path: &Path) -> Result<bool, Box<dyn Error>> {
    print!("{}", canonicalise(&fs::read_to_string(path)?));
    Ok(true)
}

fn run_equiv(first: &Path, second: &Path) -> Result<bool, Box<dyn Error>> {
    let same = equivalent(&fs::read_to_string(first)?, &fs::read_to_string(second)?);
    println!("{}", if same { "equivalent" } else { "different" });
    Ok(same)
}

/// Prints the derived views when the input can be edited in guided mode.
fn run_guided(path: &Path, config: &ParserConfig) -> Result<bool, Box<dyn Error>> {
    let input = fs::read_to_string(path)?;
    let Some(spec) = parse_guided(&input, config) else {
        println!("Guided editing not available: edit {} as text", path.display());
        return Ok(false);
    };
    info!("Guided editing available for {}", path.display());

    // external geometries sit next to the input unless configured otherwise
    let directory = match path.parent() {
        Some(parent) if config.directory == Path::new(".") && !parent.as_os_str().is_empty() => parent,
        _ => config.directory.as_path(),
    };
    println!("{:<20} {}", "Method:", spec.method().unwrap_or_else(|| "(several)".to_string()));
    if let Some(functional) = spec.density_functional() {
        println!("{:<20} {}", "Functional:", functional);
    }
    println!("{:<20} {}", "Job type:", spec.job_type().label());
    println!("{:<20} {}", "Basis quality:", spec.basis_quality());
    println!("{:<20} {}", "Hamiltonian:", spec.basis_hamiltonian().text());
    println!("{:<20} {}", "Density fitting:", spec.density_fitting);
    println!("{:<20} {}", "Spin:", spec.spin(directory));
    Ok(true)
}
