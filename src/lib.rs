pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod location;
pub mod page;
pub mod render;
pub mod serve;
pub mod table;

use std::{env, io::Write, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, OutputFormat, RenderArgs},
    render::HtmlRenderer,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("payment_dashboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => handle_render(&args),
        Commands::Serve(args) => serve::execute(&args),
    }
}

fn handle_render(args: &RenderArgs) -> Result<()> {
    let source = args.source.to_source()?;
    info!(
        "Rendering dashboard from '{}' with delimiter '{}'",
        source.location(),
        printable_delimiter(source.delimiter())
    );
    let dataset = loader::load_data(&source)
        .with_context(|| format!("Loading payments from {}", source.location()))?;
    let page = page::render_dashboard(&dataset).context("Aggregating payments")?;
    let rendered = match args.format {
        OutputFormat::Html => HtmlRenderer::new()?.render(&page)?,
        OutputFormat::Text => render::text::render(&page),
    };

    let mut output = io_utils::open_output(args.output.as_deref())?;
    output
        .write_all(rendered.as_bytes())
        .and_then(|_| output.flush())
        .context("Writing rendered dashboard")?;
    info!(
        "Rendered {} payment row(s) as {:?}",
        dataset.len(),
        args.format
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
