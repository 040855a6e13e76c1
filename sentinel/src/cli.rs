// sentinel/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use sentinel_core::application::PageKind;
use sentinel_core::infrastructure::seed::DEFAULT_LAST_LOAD_MINUTES;
use std::path::PathBuf;

/// One year. Keeps demo timestamps well inside the date range.
const MAX_LAST_LOAD_MINUTES: i64 = 525_600;

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Data quality & risk analytics dashboards for the claims pipeline", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding sentinel.yaml (and optionally secrets.yaml)
    #[arg(long, global = true, default_value = ".", env = "SENTINEL_CONFIG_DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🌐 Serves both dashboards with live refresh controls
    Serve {
        /// Listen address (overrides server.bind / SENTINEL_BIND)
        #[arg(long)]
        bind: Option<String>,
    },

    /// 🖼️  Renders one dashboard to a static HTML file
    Render {
        #[arg(long, value_enum, default_value = "quality")]
        page: PageArg,

        /// Output file
        #[arg(long, short)]
        out: PathBuf,
    },

    /// 🩺 Prints the pipeline health summary
    Status {
        /// Exit with code 1 when quality is below GOOD or data is stale
        #[arg(long)]
        check: bool,
    },

    /// 🌱 Loads the demo warehouse (schemas, claims, DMF results, risk scores)
    Seed {
        /// DuckDB file to create or refresh (defaults to warehouse.path)
        #[arg(long)]
        db_path: Option<String>,

        /// How long ago the latest claims load happened (at most one year)
        #[arg(
            long,
            default_value_t = DEFAULT_LAST_LOAD_MINUTES,
            value_parser = clap::value_parser!(i64).range(0..=MAX_LAST_LOAD_MINUTES)
        )]
        last_load_minutes: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PageArg {
    Quality,
    Risk,
}

impl From<PageArg> for PageKind {
    fn from(arg: PageArg) -> Self {
        match arg {
            PageArg::Quality => PageKind::Quality,
            PageArg::Risk => PageKind::Risk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_defaults() -> Result<()> {
        let args = Cli::try_parse_from(["sentinel", "serve"])?;
        assert_eq!(args.config_dir.to_string_lossy(), ".");
        match args.command {
            Commands::Serve { bind } => {
                assert_eq!(bind, None);
                Ok(())
            }
            _ => bail!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_render_risk() -> Result<()> {
        let args = Cli::try_parse_from([
            "sentinel",
            "render",
            "--page",
            "risk",
            "--out",
            "/tmp/risk.html",
            "--config-dir",
            "/etc/sentinel",
        ])?;
        assert_eq!(args.config_dir.to_string_lossy(), "/etc/sentinel");
        match args.command {
            Commands::Render { page, out } => {
                assert_eq!(PageKind::from(page), PageKind::Risk);
                assert_eq!(out.to_string_lossy(), "/tmp/risk.html");
                Ok(())
            }
            _ => bail!("Expected Render command"),
        }
    }

    #[test]
    fn test_cli_parse_seed() -> Result<()> {
        let args = Cli::try_parse_from(["sentinel", "seed", "--last-load-minutes", "150"])?;
        match args.command {
            Commands::Seed {
                db_path,
                last_load_minutes,
            } => {
                assert_eq!(db_path, None);
                assert_eq!(last_load_minutes, 150);
                Ok(())
            }
            _ => bail!("Expected Seed command"),
        }
    }

    #[test]
    fn test_cli_rejects_last_load_beyond_a_year() {
        assert!(Cli::try_parse_from(["sentinel", "seed", "--last-load-minutes", "600000"]).is_err());
        assert!(Cli::try_parse_from(["sentinel", "seed", "--last-load-minutes=-5"]).is_err());
        assert!(Cli::try_parse_from(["sentinel", "seed", "--last-load-minutes", "525600"]).is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_page() {
        assert!(Cli::try_parse_from(["sentinel", "render", "--page", "claims", "--out", "x"]).is_err());
    }
}
