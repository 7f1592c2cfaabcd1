use std::{net::SocketAddr, path::PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{io_utils, loader::CsvSource, location::DataLocation};

pub const DATA_ENV: &str = "PAYMENT_DASHBOARD_DATA";

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Render the payment analysis dashboard from an order payments CSV",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render the dashboard once to a file or stdout
    Render(RenderArgs),
    /// Serve the dashboard over HTTP, re-rendering on every request
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Payments CSV: a file path, `-` for stdin, or an http(s) URL
    #[arg(short = 'i', long = "input", env = DATA_ENV, value_parser = parse_location)]
    pub input: DataLocation,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Output file (stdout if omitted or `-`)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value = "html")]
    pub format: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8501")]
    pub addr: SocketAddr,
}

impl SourceArgs {
    /// Resolves the encoding and delimiter flags into a loadable source.
    pub fn to_source(&self) -> Result<CsvSource> {
        let encoding = io_utils::resolve_encoding(self.input_encoding.as_deref())?;
        Ok(CsvSource::new(self.input.clone(), self.delimiter, encoding))
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
}

pub fn parse_location(value: &str) -> Result<DataLocation, String> {
    value.parse().map_err(|err: crate::error::DataLoadError| err.to_string())
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
