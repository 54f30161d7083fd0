use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the format tags accepted by --from/--to in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const FORMAT_TAGS: &[&str] = &["JSON", "XML", "MD"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let format_arg = |id: &'static str, alias: &'static str| {
        Arg::new(id)
            .long(id)
            .visible_alias(alias)
            .value_parser(clap::builder::PossibleValuesParser::new(FORMAT_TAGS))
            .value_hint(ValueHint::Other)
    };

    let mut cmd = Command::new("quiz")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert quiz banks between JSON, Moodle XML and Markdown")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between quiz formats (default command)")
                .arg(
                    Arg::new("inputs")
                        .num_args(0..)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input-file")
                        .short('i')
                        .long("input-file")
                        .action(ArgAction::Append)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("input-path")
                        .short('d')
                        .long("input-path")
                        .action(ArgAction::Append)
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("output-file")
                        .short('o')
                        .long("output-file")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output-path")
                        .short('O')
                        .long("output-path")
                        .value_hint(ValueHint::DirPath),
                )
                .arg(format_arg("from", "input-format"))
                .arg(format_arg("to", "output-format"))
                .arg(Arg::new("category").short('c').long("category")),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "quiz", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "quiz", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "quiz", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
