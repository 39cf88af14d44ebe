//! Slotted CLI
//!
//! Usage:
//!   slotted [OPTIONS] [FILE]
//!
//! The template is read from FILE (or stdin) and split on `${}`; every
//! `${}` is a placeholder bound to the next `--value`.
//!
//! Options:
//!   -c, --config <FILE>   Serializer configuration (TOML format)
//!   -v, --value <VALUE>   Value for the next placeholder (repeatable)
//!   -t, --tree            Print the parsed static tree
//!   -l, --live            Render into an in-memory document and print its markup
//!       --self-close-void Write childless void elements as `<br/>`
//!   -h, --help            Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::rc::Rc;

use clap::{CommandFactory, Parser};

use slotted::dom::Document;
use slotted::error::PLACEHOLDER;
use slotted::{parse, render_to_string_with_config, Renderer, SerializeConfig, Template, Value};

#[derive(Parser)]
#[command(name = "slotted")]
#[command(about = "Parse and render markup templates with placeholders")]
struct Cli {
    /// Template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Serializer configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Value for the next placeholder; missing values are absent
    #[arg(short, long = "value")]
    values: Vec<String>,

    /// Print the parsed static tree instead of rendering
    #[arg(short, long)]
    tree: bool,

    /// Render into an in-memory document and print its markup
    #[arg(short, long)]
    live: bool,

    /// Write childless void elements as `<br/>`
    #[arg(long)]
    self_close_void: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    // Without input and an interactive stdin there is nothing to read
    if cli.input.is_none() && io::stdin().is_terminal() {
        let _ = Cli::command().print_help();
        return;
    }

    let mut config = match &cli.config {
        Some(path) => match SerializeConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => SerializeConfig::default(),
    };
    if cli.self_close_void {
        config = config.with_self_close_void(true);
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let fragments: Vec<&str> = source.split(PLACEHOLDER).collect();
    let statics = match parse(&fragments) {
        Ok(statics) => statics,
        Err(e) => {
            eprint!("{}", e.format(&fragments, &filename));
            std::process::exit(1);
        }
    };

    if cli.tree {
        println!("{:#?}", statics);
        return;
    }

    let mut values: Vec<Value> = cli.values.iter().map(|v| Value::from(v.as_str())).collect();
    if values.len() > statics.slot_count {
        log::warn!(
            "ignoring {} values beyond the {} placeholders",
            values.len() - statics.slot_count,
            statics.slot_count
        );
    }
    values.resize(statics.slot_count, Value::Null);

    let template = match Template::from_tree(Rc::new(statics), values) {
        Ok(template) => template,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if cli.live {
        let mut doc = Document::new();
        let body = doc.body();
        if let Err(e) = Renderer::new().render(&mut doc, template, &body) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        println!("{}", doc.inner_html(body));
    } else {
        println!("{}", render_to_string_with_config(template, &config));
    }
}
