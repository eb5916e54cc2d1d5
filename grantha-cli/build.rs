use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the command tree in src/main.rs
// We need to duplicate this here since build scripts can't access src/ modules
const FORMATS: &[&str] = &["json", "markdown"];

fn selection_args() -> [Arg; 3] {
    [
        Arg::new("scripts")
            .long("scripts")
            .value_delimiter(',')
            .value_hint(ValueHint::Other),
        Arg::new("commentaries")
            .long("commentaries")
            .value_delimiter(',')
            .value_hint(ValueHint::Other),
        Arg::new("all-commentaries")
            .long("all-commentaries")
            .action(ArgAction::SetTrue),
    ]
}

fn file_arg(name: &'static str, index: usize) -> Arg {
    Arg::new(name)
        .required(true)
        .index(index)
        .value_hint(ValueHint::FilePath)
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("grantha")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lossless conversion of grantha documents between JSON and Markdown")
        .arg(
            Arg::new("config")
                .long("config")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .arg(file_arg("input", 1))
                .arg(
                    Arg::new("from")
                        .long("from")
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS)),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .required(true)
                        .value_parser(clap::builder::PossibleValuesParser::new(FORMATS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_hint(ValueHint::FilePath),
                )
                .args(selection_args())
                .arg(Arg::new("verify").long("verify").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("verify")
                .arg(file_arg("json", 1))
                .arg(file_arg("markdown", 2)),
        )
        .subcommand(
            Command::new("hash")
                .arg(file_arg("input", 1))
                .args(selection_args())
                .arg(
                    Arg::new("per-passage")
                        .long("per-passage")
                        .action(ArgAction::SetTrue),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "grantha", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "grantha", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "grantha", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
