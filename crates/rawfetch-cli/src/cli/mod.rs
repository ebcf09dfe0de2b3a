//! CLI for rawfetch: `rawfetch [OPTIONS] <URL>...`.

mod commands;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rawfetch_core::config::{self, RawfetchConfig};
use rawfetch_core::url_model::NamingScheme;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use commands::run_fetch;

/// Artifact naming scheme as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NamingArg {
    /// `example.com_a_b_raw.html`; distinct URLs may share a name.
    Verbatim,
    /// Verbatim name qualified by a URL digest; never collides.
    Hashed,
}

impl From<NamingArg> for NamingScheme {
    fn from(arg: NamingArg) -> Self {
        match arg {
            NamingArg::Verbatim => NamingScheme::Verbatim,
            NamingArg::Hashed => NamingScheme::Hashed,
        }
    }
}

fn parse_positive<T>(s: &str) -> Result<T, String>
where
    T: FromStr + Default + PartialEq,
    T::Err: fmt::Display,
{
    match s.parse::<T>() {
        Ok(n) if n == T::default() => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Fetch pages concurrently and save each raw HTML body to disk.
#[derive(Debug, Parser)]
#[command(name = "rawfetch")]
#[command(about = "Async HTTP content fetcher: saves each page's raw HTML", long_about = None)]
pub struct Cli {
    /// One or more URLs to fetch.
    #[arg(value_name = "URL", required = true)]
    pub urls: Vec<String>,

    /// Directory that receives the saved pages (default: ./raw_html_content).
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Keep at most N requests in flight (default: all at once).
    #[arg(long, value_name = "N", value_parser = parse_positive::<usize>)]
    pub max_concurrent: Option<usize>,

    /// Per-request timeout in seconds (at least 1).
    #[arg(long, value_name = "SECS", value_parser = parse_positive::<u64>)]
    pub timeout: Option<u64>,

    /// Report 3xx responses as failures instead of following them.
    #[arg(long)]
    pub no_redirects: bool,

    /// How saved files are named.
    #[arg(long, value_enum, value_name = "SCHEME")]
    pub naming: Option<NamingArg>,
}

impl Cli {
    /// Overlay command-line flags on the loaded config.
    pub fn apply(&self, cfg: &mut RawfetchConfig) {
        if let Some(ref dir) = self.output_dir {
            cfg.output_dir = dir.clone();
        }
        if self.max_concurrent.is_some() {
            cfg.max_concurrent = self.max_concurrent;
        }
        if let Some(secs) = self.timeout {
            cfg.request_timeout_secs = secs;
        }
        if self.no_redirects {
            cfg.follow_redirects = false;
        }
        if let Some(naming) = self.naming {
            cfg.naming = naming.into();
        }
    }

    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = match config::load_or_init() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!("config unavailable, using defaults: {:#}", e);
                RawfetchConfig::default()
            }
        };
        cli.apply(&mut cfg);
        tracing::debug!("effective config: {:?}", cfg);

        run_fetch(cli.urls, cfg).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests;
