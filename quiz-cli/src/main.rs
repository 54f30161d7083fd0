// Command-line interface for quiz
//
// This binary converts quiz banks between JSON, Moodle XML and Markdown. The conversion itself
// lives in the quiz-babel crate; this crate gathers inputs, resolves formats and writes files.
//
// Converting:
//
// The conversion needs a from and to pair. Both can be inferred from file extensions, while being
// overridable by explicit --from/--to flags or the config file.
// Usage:
//  quiz convert -i <input> -o <output> [--from <fmt>] [--to <fmt>]   - Convert (explicit)
//  quiz -i <input> -o <output>                                      - Same as above
//  quiz <input>... --to md -O <dir>                                 - One Markdown file per question
//  quiz --list-formats                                              - List available formats
//
// Extra Parameters:
//
// Format-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the target codec.
// Example:
//  quiz -i bank.json -o bank.xml --extra-answer-numbering 123

mod convert;

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use quiz_babel::{FormatRegistry, QuizFormat};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

/// Tokens that mean the user already picked a command (or asked clap itself for output).
const NON_INJECTABLE: &[&str] = &["convert", "help", "-h", "--help", "-V", "--version"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

/// Insert the `convert` subcommand when the user left it out.
fn inject_convert(args: Vec<String>) -> Vec<String> {
    if args.len() <= 1 || args[1..].iter().any(|a| NON_INJECTABLE.contains(&a.as_str())) {
        return args;
    }
    let mut injected = Vec::with_capacity(args.len() + 1);
    injected.push(args[0].clone());
    injected.push("convert".to_string());
    injected.extend_from_slice(&args[1..]);
    injected
}

fn parse_format(raw: &str) -> Result<QuizFormat, String> {
    raw.parse()
}

fn build_cli() -> Command {
    Command::new("quiz")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert quiz banks between JSON, Moodle XML and Markdown")
        .long_about(
            "quiz converts question banks between three formats:\n\n\
            Formats:\n  \
            - JSON: structured JSON array of questions (.json)\n  \
            - XML:  Moodle XML quiz format (.xml)\n  \
            - MD:   Markdown, one '# ' heading per question (.md)\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to pass format-specific options.\n  \
            Boolean flags can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            quiz -i bank.json -o bank.xml                 # JSON to Moodle XML\n  \
            quiz -d questions --from md -o bank.json      # Every .md file in a directory\n  \
            quiz bank.xml --to md -O questions            # One Markdown file per question\n  \
            quiz -i bank.md -o bank.xml -c Math/Algebra   # Override the XML category",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a quiz.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between quiz formats (default command)")
                .long_about(
                    "Convert quiz banks between formats.\n\n\
                    The source format is inferred from the input file extension and the\n\
                    target format from the output file extension, unless given explicitly.\n\
                    Every output is computed before anything is written, so a failing run\n\
                    leaves no partial files behind.",
                )
                .arg(
                    Arg::new("inputs")
                        .help("Input file paths (same as -i)")
                        .num_args(0..)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input-file")
                        .short('i')
                        .long("input-file")
                        .value_name("PATH")
                        .help("Input file path (repeatable or comma-separated)")
                        .action(ArgAction::Append)
                        .value_delimiter(',')
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input-path")
                        .short('d')
                        .long("input-path")
                        .value_name("DIR")
                        .help("Read every file of the input format from DIR (repeatable)")
                        .action(ArgAction::Append)
                        .value_delimiter(',')
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("output-file")
                        .short('o')
                        .long("output-file")
                        .visible_alias("output")
                        .value_name("PATH")
                        .help("Output file path")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output-path")
                        .short('O')
                        .long("output-path")
                        .value_name("DIR")
                        .help("Output directory, one <Question_Title>.md file per question")
                        .conflicts_with("output-file")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .visible_alias("input-format")
                        .value_name("FORMAT")
                        .help("Source format: JSON, XML or MD (inferred from the input extension)")
                        .value_parser(parse_format)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .visible_alias("output-format")
                        .value_name("FORMAT")
                        .help("Target format: JSON, XML or MD (inferred from the output extension)")
                        .value_parser(parse_format)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("category")
                        .short('c')
                        .long("category")
                        .value_name("PATH")
                        .help("Category for XML output, '/'-separated (e.g. Math/Algebra)"),
                ),
        )
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let matches = build_cli()
        .try_get_matches_from(inject_convert(cleaned_args))
        .unwrap_or_else(|e| e.exit());

    init_tracing(matches.get_count("verbose"));

    if list_formats_requested(&matches) {
        handle_list_formats_command();
        return;
    }

    let result = match matches.subcommand() {
        Some(("convert", sub_matches)) => convert::handle_convert_command(sub_matches, extra_params),
        _ => Err(anyhow::anyhow!(
            "Unknown subcommand. Use --help for usage information."
        )),
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn list_formats_requested(matches: &ArgMatches) -> bool {
    matches.get_flag("list-formats")
        || matches
            .subcommand()
            .is_some_and(|(_, sub)| sub.get_flag("list-formats"))
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for format in registry.list_formats() {
        let extensions: Vec<String> = format
            .file_extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect();
        println!(
            "  {:<5} {:<18} {}",
            format.format().tag(),
            extensions.join(", "),
            format.description()
        );
    }
}
