//! Router configuration CLI.
//!
//! Renders `nginx.conf` from a reconciliation snapshot (annotations, config
//! map, routed apps) stored as TOML.
//!
//! ```text
//!   snapshot.toml ──▶ merge ──▶ validate ──▶ render ──▶ nginx.conf / stdout
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use router_config::config::{load_snapshot, LayerSource, Precedence, KEY_TABLE};
use router_config::observability::logging;
use router_config::{reconcile, NginxTemplate};

#[derive(Parser)]
#[command(name = "router-config")]
#[command(about = "Render nginx router configuration from layered settings", long_about = None)]
struct Cli {
    /// Which layer wins when both set the same key.
    #[arg(long, value_enum, default_value_t = PrecedenceArg::ConfigMap)]
    precedence: PrecedenceArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render nginx.conf from a snapshot
    Render {
        /// Snapshot file (TOML)
        snapshot: PathBuf,

        /// Destination file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the merged configuration as JSON
    Merged {
        /// Snapshot file (TOML)
        snapshot: PathBuf,
    },
    /// List every recognized key in both namespaces
    Keys,
}

#[derive(Clone, Copy, ValueEnum)]
enum PrecedenceArg {
    /// Config map > annotations > defaults
    ConfigMap,
    /// Annotations > config map > defaults
    Annotations,
}

impl From<PrecedenceArg> for Precedence {
    fn from(arg: PrecedenceArg) -> Self {
        match arg {
            PrecedenceArg::ConfigMap => Precedence::ConfigMapWins,
            PrecedenceArg::Annotations => Precedence::AnnotationsWin,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init(logging::DEFAULT_FILTER);

    let cli = Cli::parse();
    let precedence = Precedence::from(cli.precedence);

    match cli.command {
        Commands::Render { snapshot, output } => {
            // Fail on a broken template before reading any input.
            let template = NginxTemplate::new()?;
            let snapshot = load_snapshot(&snapshot)?;
            let config = reconcile(&snapshot, precedence)?;

            match output {
                Some(path) => template.write_config(&config, &path)?,
                None => template.render_to(&config, io::stdout().lock())?,
            }
        }
        Commands::Merged { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            let config = reconcile(&snapshot, precedence)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Keys => {
            let mut out = io::stdout().lock();
            for entry in KEY_TABLE {
                writeln!(
                    out,
                    "{:<48} {:<40} {}",
                    LayerSource::Annotations.qualify(entry.path),
                    LayerSource::ConfigMap.qualify(entry.path),
                    entry.kind
                )?;
            }
        }
    }

    Ok(())
}
