//! bddgen command-line tool: generate Catch test skeletons from `.feature`
//! analysis documents.
//!
//! Usage: bddgen [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -o, --output <FILE>    Write output to specified file
//!   -w, --write            Write output to file with inferred name
//!   -d, --out-dir <DIR>    Directory for files with inferred names
//!   -s, --suffix <SUFFIX>  Suffix replacing the input extension [default: .h]
//!   --check                Check that existing skeletons are well-formed
//!   -v, --verbose          Increase log verbosity (repeatable)
//!   -h, --help             Print help
//!   -V, --version          Print version

use clap::{ArgAction, Parser};
use libbddgen::{generate, read_skeleton_with_filename};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

mod output;

use output::{write_text_output, Sink};

const EXAMPLES: &str = "EXAMPLES:
    # Print the skeleton for one document
    bddgen login.feature

    # Write login.h next to login.feature
    bddgen -w login.feature

    # Generate loginTest.h etc. for every .feature file in a directory
    bddgen --suffix Test.h -d tests/ features/

    # Check generated skeletons after hand edits
    bddgen --check tests/

    # Read a document from stdin
    cat login.feature | bddgen";

#[derive(Parser, Debug)]
#[command(
    name = "bddgen",
    version,
    about = "Generate Catch SCENARIO/GIVEN/WHEN/THEN skeletons from BDD analysis documents",
    after_help = EXAMPLES
)]
struct Cli {
    /// Input file or directory (reads from stdin if not provided or "-").
    /// When a directory is given, processes all .feature files in it.
    #[arg(value_name = "FILE|DIR")]
    input: Option<PathBuf>,

    /// Write output to specified file (not valid with directory input)
    #[arg(short, long, value_name = "FILE", conflicts_with = "write")]
    output: Option<PathBuf>,

    /// Write output to file with inferred name
    #[arg(short, long)]
    write: bool,

    /// Directory for files with inferred names (implies --write)
    #[arg(short = 'd', long, value_name = "DIR", conflicts_with = "output")]
    out_dir: Option<PathBuf>,

    /// Output name is the input file stem followed by this suffix
    #[arg(short, long, default_value = ".h")]
    suffix: String,

    /// Check if skeleton files are well-formed (exit 0 if valid, 1 if invalid)
    #[arg(long, conflicts_with_all = ["output", "write", "out_dir"])]
    check: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn sink(&self, directory_mode: bool) -> Sink<'_> {
        if let Some(path) = &self.output {
            Sink::File(path.as_path())
        } else if self.write || self.out_dir.is_some() || directory_mode {
            Sink::Inferred {
                out_dir: self.out_dir.as_deref(),
                suffix: self.suffix.as_str(),
            }
        } else {
            Sink::Stdout
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input_path = cli.input.as_deref().filter(|p| *p != Path::new("-"));

    // Check if input is a directory
    if let Some(path) = input_path {
        if path.is_dir() {
            if cli.output.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process::exit(process_directory(path, &cli));
        }
    }

    let input = match input_path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            buffer
        }
    };

    let exit_code = if cli.check {
        check_input(&input, input_path)
    } else {
        process_input(&input, input_path, cli.sink(false))
    };
    process::exit(exit_code);
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn process_directory(dir: &Path, cli: &Cli) -> i32 {
    // Checking looks at generated files, generating looks at documents
    let pattern = if cli.check {
        dir.join(format!("*{}", cli.suffix))
    } else {
        dir.join("*.feature")
    };
    let pattern = pattern.to_string_lossy();

    let entries = match glob::glob(&pattern) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: invalid pattern {}: {}", pattern, e);
            return 1;
        }
    };

    let mut files: Vec<PathBuf> = Vec::new();
    let mut had_errors = false;
    for entry in entries {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => {
                eprintln!("Error reading {}: {}", e.path().display(), e.error());
                had_errors = true;
            }
        }
    }
    files.sort();
    tracing::info!(dir = %dir.display(), files = files.len(), "processing directory");

    for path in &files {
        let input = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                had_errors = true;
                continue;
            }
        };

        let exit_code = if cli.check {
            check_input(&input, Some(path.as_path()))
        } else {
            process_input(&input, Some(path.as_path()), cli.sink(true))
        };

        if exit_code != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

fn process_input(input: &str, input_file: Option<&Path>, sink: Sink<'_>) -> i32 {
    let Some(output) = generate(input) else {
        // No scenarios, no output file
        match input_file {
            Some(path) => {
                tracing::info!(path = %path.display(), "no scenarios, nothing generated")
            }
            None => tracing::info!("no scenarios, nothing generated"),
        }
        return 0;
    };

    match write_text_output(&output, sink, input_file) {
        Ok(Some(path)) => {
            if let Some(input_path) = input_file {
                println!("{} -> {}", input_path.display(), path.display());
            }
            0
        }
        Ok(None) => 0,
        Err(e) => {
            match sink {
                Sink::File(path) => eprintln!("Error writing {}: {}", path.display(), e),
                _ => eprintln!("Error: {}", e),
            }
            1
        }
    }
}

fn check_input(input: &str, input_file: Option<&Path>) -> i32 {
    let filename = input_file.map(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.display().to_string())
    });

    match read_skeleton_with_filename(input, filename.as_deref()) {
        Ok(doc) => {
            tracing::debug!(
                scenarios = doc.scenarios.len(),
                steps = doc.step_count(),
                "skeleton is well-formed"
            );
            match input_file {
                Some(path) => println!("{}: ok", path.display()),
                None => println!("ok"),
            }
            0
        }
        Err(e) => {
            match input_file {
                Some(path) => eprintln!("{}: {}", path.display(), e),
                None => eprintln!("{}", e),
            }
            1
        }
    }
}
