// Command-line interface for grantha
//
// This binary converts grantha documents between canonical JSON and editable Markdown, and checks
// Markdown files against the JSON they were made from.
//
// The codec itself lives in the grantha-codec crate, which does no I/O. Everything that touches the
// outside world (files, stdout, configuration files, logging setup) happens here.
//
// Converting:
//
// The conversion needs a to and from pair. The from is auto-detected from the file extension, while
// being overwrittable by an explicit --from flag. Markdown output only carries the scripts and
// commentaries selected through configuration or flags; JSON output always carries everything.
// Usage:
//  grantha <input> --to <format> [--from <format>] [--output <file>]          - Convert between formats (default)
//  grantha convert <input> --to <format> [--from <format>] [--output <file>]  - Same as above (explicit)
//  grantha verify <json> <markdown>                                           - Check Markdown against its JSON source
//  grantha hash <json> [--per-passage]                                        - Print the validation hash
//
// Selection flags (convert and hash):
//  --scripts devanagari,roman   --commentaries c1,c2   --all-commentaries
//
// Logging goes to stderr. GRANTHA_LOG takes an env-filter directive (default "warn"); -v raises
// the default to "debug".

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use grantha_codec::hasher::{format_hash, hash_grantha, hash_passage};
use grantha_codec::{markdown_to_json, verify, EncodeOptions, FormatRegistry, Grantha, JsonFormat};
use grantha_config::{GranthaConfig, Loader};
use std::fmt::Display;
use std::fs;
use std::process;
use tracing_subscriber::EnvFilter;

const SUBCOMMANDS: &[&str] = &["convert", "verify", "hash", "help"];

fn selection_args() -> [Arg; 3] {
    [
        Arg::new("scripts")
            .long("scripts")
            .value_name("SCRIPTS")
            .help("Comma-separated scripts to write (devanagari, roman, kannada)")
            .value_delimiter(',')
            .value_hint(ValueHint::Other),
        Arg::new("commentaries")
            .long("commentaries")
            .value_name("IDS")
            .help("Comma-separated commentary ids to interleave")
            .value_delimiter(',')
            .value_hint(ValueHint::Other),
        Arg::new("all-commentaries")
            .long("all-commentaries")
            .help("Interleave every commentary in the document")
            .action(ArgAction::SetTrue),
    ]
}

fn build_cli() -> Command {
    Command::new("grantha")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lossless conversion of grantha documents between JSON and Markdown")
        .long_about(
            "grantha converts canonical grantha JSON into Markdown for editing and back,\n\
            proving with an embedded content hash that no text was lost.\n\n\
            Commands:\n  \
            - convert: Transform between json and markdown (default command)\n  \
            - verify:  Check a Markdown file against the JSON it was made from\n  \
            - hash:    Print the validation hash of a JSON document\n\n\
            Examples:\n  \
            grantha isavasya.json --to markdown                      # Devanagari only, to stdout\n  \
            grantha isavasya.json --to markdown --all-commentaries   # With every commentary\n  \
            grantha isavasya.md --to json -o isavasya.json           # Back to JSON\n  \
            grantha verify isavasya.json isavasya.md                 # ✓ or ✗",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a grantha.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between json and markdown (default command)")
                .long_about(
                    "Convert a grantha between formats.\n\n\
                    Supported formats:\n  \
                    - json:     Canonical grantha JSON (.json)\n  \
                    - markdown: Markdown with YAML frontmatter (.md)\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    grantha convert input.json --to markdown --scripts devanagari,roman\n  \
                    grantha convert input.md --to json -o output.json\n  \
                    grantha input.json --to markdown --verify   # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_parser(["json", "markdown"]),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_parser(["json", "markdown"]),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .args(selection_args())
                .arg(
                    Arg::new("verify")
                        .long("verify")
                        .help("Decode the written Markdown again and check it against the input")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Check a Markdown file against the JSON it was made from")
                .long_about(
                    "Recompute the validation hash of the JSON document using the scripts and\n\
                    commentaries recorded in the Markdown frontmatter, and compare it with the\n\
                    hash embedded there. Prints ✓ and exits 0 on a match, ✗ and exits 1 otherwise.",
                )
                .arg(
                    Arg::new("json")
                        .help("Canonical JSON file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("markdown")
                        .help("Markdown file to check")
                        .required(true)
                        .index(2)
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("hash")
                .about("Print the validation hash of a JSON document")
                .arg(
                    Arg::new("input")
                        .help("Canonical JSON file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .args(selection_args())
                .arg(
                    Arg::new("per-passage")
                        .long("per-passage")
                        .help("Also print the hash of every passage")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&args) {
        Ok(m) => m,
        Err(e) => {
            if args.len() > 1 && !args[1].starts_with('-') && !SUBCOMMANDS.contains(&args[1].as_str())
            {
                let mut new_args = vec![args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&args[1..]);
                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));
    let mut config = load_cli_config(matches.get_one::<String>("config").map(String::as_str));

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            apply_selection_overrides(&mut config, sub_matches);
            if sub_matches.get_flag("verify") {
                config.convert.verify = true;
            }
            handle_convert_command(sub_matches, &config);
        }
        Some(("verify", sub_matches)) => {
            let json = required(sub_matches, "json");
            let markdown = required(sub_matches, "markdown");
            handle_verify_command(json, markdown, &config);
        }
        Some(("hash", sub_matches)) => {
            apply_selection_overrides(&mut config, sub_matches);
            let input = required(sub_matches, "input");
            handle_hash_command(input, sub_matches.get_flag("per-passage"), &config);
        }
        _ => fail("Unknown subcommand. Use --help for usage information."),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GRANTHA_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Handle the convert command
fn handle_convert_command(matches: &ArgMatches, config: &GranthaConfig) {
    let input = required(matches, "input");
    let to = required(matches, "to");
    let registry = registry_for(config);

    // Auto-detect --from if not provided
    let from = match matches.get_one::<String>("from") {
        Some(from) => from.clone(),
        None => registry.detect_format_from_filename(input).unwrap_or_else(|| {
            fail(format!(
                "Could not detect format from filename '{input}'. Please specify --from explicitly"
            ))
        }),
    };

    let source = read_file(input);
    let doc = registry
        .parse(&source, &from)
        .unwrap_or_else(|e| fail(format!("Failed to read '{input}' as {from}: {e}")));
    let options = encode_options(config, &doc);

    let output = registry
        .serialize(&doc, to, &options)
        .unwrap_or_else(|e| fail(format!("Failed to write {to}: {e}")));

    if config.convert.verify && to == "markdown" {
        verify_round_trip(&doc, &output, &options);
    }

    match matches.get_one::<String>("output") {
        Some(path) => fs::write(path, output)
            .unwrap_or_else(|e| fail(format!("Error writing file '{path}': {e}"))),
        None => print!("{output}"),
    }
}

/// Decode freshly written Markdown and compare it with what was encoded.
fn verify_round_trip(doc: &Grantha, markdown: &str, options: &EncodeOptions) {
    let decoded = markdown_to_json(markdown)
        .unwrap_or_else(|e| fail(format!("Round trip verification failed: {e}")));
    if decoded != options.selected_view(doc) {
        fail("Round trip verification failed: the decoded document differs from the input");
    }
    eprintln!("✓ Round trip verified");
}

/// Handle the verify command
fn handle_verify_command(json: &str, markdown: &str, config: &GranthaConfig) {
    let registry = registry_for(config);
    let doc = registry
        .parse(&read_file(json), "json")
        .unwrap_or_else(|e| fail(format!("Failed to read '{json}' as json: {e}")));
    let text = read_file(markdown);

    match verify(&doc, &text) {
        Ok(true) => println!("✓ {markdown} matches {json}"),
        Ok(false) => {
            println!("✗ {markdown} does not match {json}");
            process::exit(1);
        }
        Err(e) => fail(format!("Failed to read '{markdown}': {e}")),
    }
}

/// Handle the hash command
fn handle_hash_command(input: &str, per_passage: bool, config: &GranthaConfig) {
    let registry = registry_for(config);
    let doc = registry
        .parse(&read_file(input), "json")
        .unwrap_or_else(|e| fail(format!("Failed to read '{input}' as json: {e}")));
    let options = encode_options(config, &doc);
    let scripts = Some(options.scripts.as_slice());

    if per_passage {
        for passage in doc
            .prefatory_material
            .iter()
            .chain(&doc.passages)
            .chain(&doc.concluding_material)
        {
            println!("{}\t{}", passage.reference, hash_passage(passage, scripts));
        }
    }
    println!(
        "{}",
        format_hash(&hash_grantha(&doc, scripts, options.commentaries.as_deref()))
    );
}

fn registry_for(config: &GranthaConfig) -> FormatRegistry {
    let mut registry = FormatRegistry::with_defaults();
    registry.register(JsonFormat::with_indent(config.output.json_indent));
    registry
}

fn encode_options(config: &GranthaConfig, doc: &Grantha) -> EncodeOptions {
    config
        .convert
        .encode_options(doc)
        .unwrap_or_else(|e| fail(format!("Invalid configuration: {e}")))
}

fn load_cli_config(explicit_path: Option<&str>) -> GranthaConfig {
    let loader = Loader::new().with_optional_file("grantha.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader
        .build()
        .unwrap_or_else(|err| fail(format!("Failed to load configuration: {err}")))
}

/// Command-line selection flags win over configuration files.
fn apply_selection_overrides(config: &mut GranthaConfig, matches: &ArgMatches) {
    if let Some(scripts) = matches.get_many::<String>("scripts") {
        config.convert.scripts = scripts.cloned().collect();
    }
    if let Some(ids) = matches.get_many::<String>("commentaries") {
        config.convert.commentaries = ids.cloned().collect();
    }
    if matches.get_flag("all-commentaries") {
        config.convert.all_commentaries = true;
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> &'a str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("Missing required argument '{name}'")))
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| fail(format!("Error reading file '{path}': {e}")))
}

fn fail(message: impl Display) -> ! {
    eprintln!("Error: {message}");
    process::exit(1)
}
