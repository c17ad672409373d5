#![doc = include_str!("../README.md")]

use std::{
    io::{Read, Write},
    path::{Path, PathBuf},
};

use actlite::{Act, Actlite, ActliteFeat, Format, SubtreeQuery};
use anyhow::{Context, Result, bail};
use clap::Parser;

/// Renders an act stored as JSON.
#[derive(Debug, Clone, Parser)]
#[clap(name = "actlite", version, about)]
pub struct RenderArgs {
    /// Path to the act JSON, `-` reads from stdin
    #[clap(value_name = "INPUT")]
    pub input: String,

    /// Path to output file, `-` writes to stdout
    #[clap(value_name = "OUTPUT", default_value = None)]
    pub output: Option<String>,

    /// Output format (`txt`, `md` or `docx`); guessed from the output
    /// extension when omitted
    #[clap(long, short, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Renders only the item with this hierarchical number
    #[clap(long, value_name = "NUMBER")]
    pub number: Option<String>,

    /// Keeps the descendants of the selected item
    #[clap(long, requires = "number")]
    pub recursive: bool,

    /// Deepest kept level below the selected item
    #[clap(long, requires = "recursive", value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Column budget of plain text output
    #[clap(long, default_value_t = 80, value_name = "COLUMNS")]
    pub width: usize,

    /// Leaves Markdown special characters unescaped
    #[clap(long)]
    pub no_escape: bool,
}

fn main() -> Result<()> {
    let args = RenderArgs::parse();

    env_logger::builder()
        .filter_module("actlite", log::LevelFilter::Warn)
        .parse_default_env()
        .try_init()?;

    run(args)
}

fn run(args: RenderArgs) -> Result<()> {
    let is_stdout = args.output.as_deref() == Some("-")
        || (args.output.is_none() && args.input == "-");

    let format = match args.format.as_deref() {
        Some(name) => name.parse::<Format>()?,
        None => args
            .output
            .as_deref()
            .and_then(|output| Format::from_extension(Path::new(output)))
            .unwrap_or_default(),
    };

    let output_path = args
        .output
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&args.input).with_extension(format.extension()));

    let act = Act::from_json(&read_input(&args.input)?)
        .with_context(|| format!("failed to load act from {}", args.input))?;

    let renderer = Actlite::new(&act)
        .with_format(format)
        .with_feature(ActliteFeat {
            text_width: args.width,
            escape_markdown: !args.no_escape,
            ..Default::default()
        });

    let output = match args.number {
        Some(number) => {
            let query = SubtreeQuery {
                number: number.into(),
                recursive: args.recursive,
                max_depth: args.max_depth,
            };
            renderer.render_subtree(&query)?
        }
        None => renderer.render_full()?,
    };
    let result = output.into_bytes()?;

    if is_stdout {
        std::io::stdout()
            .write_all(&result)
            .context("failed to write to stdout")?;
    } else if let Err(err) = std::fs::write(&output_path, &result) {
        bail!("failed to write file {output_path:?}: {err}");
    } else {
        log::info!("wrote {output_path:?}");
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(input).with_context(|| format!("failed to read {input}"))
}
