//! Stilo CLI
//!
//! Line-granular class member organizer.

use std::path::Path;
use std::sync::Once;

use stilo_order::{organize_source, Options};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing from `STILO_LOG`. Safe to call multiple times.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if STILO_LOG is set
        if std::env::var("STILO_LOG").is_ok() {
            let filter = EnvFilter::from_env("STILO_LOG");
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "organize" => {
            if args.len() < 3 {
                eprintln!("Usage: stilo organize <file.dart> [options]");
                eprintln!();
                eprintln!("Options:");
                eprintln!("  --write                  Rewrite the file in place");
                eprintln!("  --group-getters          Group getters and sort them by name");
                eprintln!("  --sort-other-methods     Sort remaining methods by name");
                eprintln!("  --config=<path>          Read options from a JSON file");
                std::process::exit(1);
            }

            let mut write = false;
            for arg in args.iter().skip(3) {
                if arg == "--write" || arg == "-w" {
                    write = true;
                }
            }

            let options = parse_options(&args[3..]);
            let source = read_source(&args[2]);
            let organized = match organize_source(&source, &options) {
                Ok(organized) => organized,
                Err(e) => {
                    eprintln!("error: {}: {e}", args[2]);
                    std::process::exit(1);
                }
            };

            for (name, reason) in &organized.skipped {
                eprintln!("warning: skipped `{name}`: {reason}");
            }

            if write {
                if organized.text != source {
                    if let Err(e) = std::fs::write(&args[2], &organized.text) {
                        eprintln!("error: failed to write {}: {e}", args[2]);
                        std::process::exit(1);
                    }
                    println!("reorganized {}", args[2]);
                }
            } else {
                print!("{}", organized.text);
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: stilo check <file.dart> [options]");
                std::process::exit(1);
            }

            let options = parse_options(&args[3..]);
            let source = read_source(&args[2]);
            let organized = match organize_source(&source, &options) {
                Ok(organized) => organized,
                Err(e) => {
                    eprintln!("error: {}: {e}", args[2]);
                    std::process::exit(1);
                }
            };

            for (name, reason) in &organized.skipped {
                eprintln!("warning: skipped `{name}`: {reason}");
            }

            if organized.text == source {
                println!("{} is organized", args[2]);
            } else {
                println!("{} would be reorganized", args[2]);
                std::process::exit(1);
            }
        }
        "scan" => {
            if args.len() < 3 {
                eprintln!("Usage: stilo scan <file.dart>");
                std::process::exit(1);
            }

            let source = read_source(&args[2]);
            let result = match stilo_scan::scan(&source) {
                Ok(result) => result,
                Err(e) => {
                    eprintln!("error: {}: {e}", args[2]);
                    std::process::exit(1);
                }
            };

            for (i, line) in result.lines.iter().enumerate() {
                println!("{:>4} {:<24} {}", i + 1, format!("{:?}", line.tag), line.class_level_text);
            }
            println!();
            println!(
                "{} pair(s), {} declaration line(s)",
                result.pairs.len(),
                result.declaration_lines.len()
            );
        }
        "version" | "--version" | "-V" => {
            println!("stilo {}", env!("CARGO_PKG_VERSION"));
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("error: unknown command `{command}`");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

/// Build [`Options`] from trailing command-line flags.
///
/// `--config=<path>` loads a JSON options file first; individual flags then
/// override what it set.
fn parse_options(args: &[String]) -> Options {
    let mut options = Options::default();

    for arg in args {
        if let Some(path) = arg.strip_prefix("--config=") {
            let text = read_source(path);
            options = match Options::from_json(&text) {
                Ok(options) => options,
                Err(e) => {
                    eprintln!("error: invalid options file {path}: {e}");
                    std::process::exit(1);
                }
            };
        }
    }

    for arg in args {
        if arg == "--group-getters" {
            options.group_and_sort_getter_methods = true;
        } else if arg == "--sort-other-methods" {
            options.sort_other_methods = true;
        }
    }

    options
}

fn read_source(path: &str) -> String {
    match std::fs::read_to_string(Path::new(path)) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("error: failed to read {path}: {e}");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Stilo - line-granular class member organizer");
    println!();
    println!("Usage: stilo <command> [arguments]");
    println!();
    println!("Commands:");
    println!("  organize <file.dart>    Print the organized buffer (use --write to rewrite)");
    println!("  check <file.dart>       Exit non-zero if the file would change");
    println!("  scan <file.dart>        Dump per-line tags and class-level views");
    println!("  version                 Print version information");
    println!("  help                    Show this help message");
    println!();
    println!("Options:");
    println!("  --write                 Rewrite the file in place (organize)");
    println!("  --group-getters         Group getters and sort them by name");
    println!("  --sort-other-methods    Sort remaining methods by name");
    println!("  --config=<path>         Read options from a JSON file");
}
