//! Command-line interface for markdex
//!
//! Inspects Markdoc documentation pages: extracted text, outlines, diff content, file trees,
//! links and the backlink index of a whole docs directory.
//!
//! Usage:
//!   markdex text `<file>` [--rendered]          - Plain text of a page
//!   markdex toc `<file>`                        - Page outline (JSON)
//!   markdex diff `<file>`                       - Resolved diff contents (JSON)
//!   markdex tree `<file>` [--json]              - Draw a file tree listing
//!   markdex links `<file>`                      - Internal links of a page (JSON)
//!   markdex backlinks [`<dir>`] [--path `<route>`] - Backlink index (JSON)
//!   markdex versions `<tag>`...                 - Sort version tags, newest first
//!   markdex completions `<shell>`               - Shell completion script
//!
//! Configuration comes from the built-in defaults, then `markdex.toml` in the working
//! directory if present, or the file given with `--config`.

mod commands;

use clap::{Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use markdex_config::{Loader, MarkdexConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const LOCAL_CONFIG: &str = "markdex.toml";

fn file_arg() -> Arg {
    Arg::new("file")
        .help("Path to the page")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .index(1)
}

fn build_cli() -> Command {
    Command::new("markdex")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect Markdoc documentation pages")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr (RUST_LOG takes precedence)"),
        )
        .subcommand(
            Command::new("text")
                .about("Print the plain text of a page")
                .arg(file_arg())
                .arg(
                    Arg::new("rendered")
                        .long("rendered")
                        .action(ArgAction::SetTrue)
                        .help("Extract from the rendered tree instead of the parsed one"),
                ),
        )
        .subcommand(
            Command::new("toc")
                .about("Print the outline of a page as JSON")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("diff")
                .about("Print the original and new text of every diff in a page")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("tree")
                .about("Parse an indented file tree listing")
                .arg(file_arg().help("File holding the listing"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the parsed tree as JSON"),
                ),
        )
        .subcommand(
            Command::new("links")
                .about("Print the internal links of a page")
                .arg(file_arg()),
        )
        .subcommand(
            Command::new("backlinks")
                .about("Build the backlink index of a docs directory")
                .arg(
                    Arg::new("dir")
                        .help("Docs root (default: docs.root from the configuration)")
                        .value_parser(clap::value_parser!(PathBuf))
                        .index(1),
                )
                .arg(
                    Arg::new("path")
                        .long("path")
                        .short('p')
                        .help("Only print the pages linking to this route"),
                ),
        )
        .subcommand(
            Command::new("versions")
                .about("Sort version tags newest first")
                .arg(
                    Arg::new("tags")
                        .help("Tags such as v1.2.0, 1.3 or main")
                        .required(true)
                        .num_args(1..)
                        .index(1),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate a shell completion script")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(clap::value_parser!(Shell))
                        .index(1),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<MarkdexConfig, String> {
    let loader = match matches.get_one::<PathBuf>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    loader
        .build()
        .map_err(|e| format!("invalid configuration: {}", e))
}

fn file(matches: &ArgMatches) -> &Path {
    matches
        .get_one::<PathBuf>("file")
        .map(PathBuf::as_path)
        .unwrap_or_else(|| Path::new(""))
}

fn run(matches: &ArgMatches) -> Result<String, String> {
    let config = load_config(matches)?;
    tracing::debug!(docs_root = %config.docs.root.display(), "configuration loaded");
    match matches.subcommand() {
        Some(("text", sub)) => commands::text(file(sub), sub.get_flag("rendered"), &config),
        Some(("toc", sub)) => commands::toc(file(sub), &config),
        Some(("diff", sub)) => commands::diff(file(sub), &config),
        Some(("tree", sub)) => commands::tree(file(sub), sub.get_flag("json")),
        Some(("links", sub)) => commands::links(file(sub), &config),
        Some(("backlinks", sub)) => commands::backlinks(
            sub.get_one::<PathBuf>("dir").map(PathBuf::as_path),
            sub.get_one::<String>("path").map(String::as_str),
            &config,
        ),
        Some(("versions", sub)) => {
            let tags: Vec<String> = sub
                .get_many::<String>("tags")
                .map(|tags| tags.cloned().collect())
                .unwrap_or_default();
            commands::versions(&tags)
        }
        Some((name, _)) => Err(format!("Unknown command: {}", name)),
        None => Err("no command given".to_string()),
    }
}

fn main() {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Some(("completions", sub)) = matches.subcommand() {
        if let Some(shell) = sub.get_one::<Shell>("shell").copied() {
            let mut cli = build_cli();
            clap_complete::generate(shell, &mut cli, "markdex", &mut std::io::stdout());
        }
        return;
    }

    match run(&matches) {
        Ok(output) => {
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
        }
        Err(message) => {
            eprintln!("error: {}", message);
            std::process::exit(1);
        }
    }
}
