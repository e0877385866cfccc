//! Privscope: per-tab browser privacy scoring

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use privscope::render::{render_deductions, render_report, RenderOptions};
use privscope::replay::{replay, ReplayOptions};
use privscope::trace::parse_trace;
use privscope_core::config::StoreBackend;
use privscope_core::PrivscopeConfig;
use privscope_reporter::{calculate_privacy_score, ScoreInputs};
use tokio_util::sync::CancellationToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "privscope", about = "Per-tab browser privacy scoring")]
struct Cli {
    /// Write logs to a file (in addition to stderr)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a browser trace (.jsonl) and report on the focused tab
    Replay {
        /// Path to the trace file
        trace: PathBuf,
        /// Report on this tab instead of the focused one
        #[arg(long)]
        tab: Option<u32>,
        /// Emit the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Use a file-backed store at this path
        #[arg(long)]
        store: Option<PathBuf>,
        /// Path to config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Expand domain, cookie and storage lists
        #[arg(long, default_value_t = false)]
        details: bool,
    },
    /// Score a set of signals directly
    Score {
        #[arg(long, default_value_t = 0)]
        domains: usize,
        #[arg(long, default_value_t = 0)]
        cookies: usize,
        #[arg(long, default_value_t = 0)]
        local_storage: usize,
        #[arg(long, default_value_t = false)]
        canvas: bool,
        #[arg(long, default_value_t = false)]
        hijack: bool,
        /// Emit the score as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the effective configuration as TOML
    DumpConfig {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_tracing(cli.log_file.as_deref())?;

    match cli.command {
        Commands::Replay {
            trace,
            tab,
            json,
            store,
            config,
            details,
        } => {
            let mut config = load_config(config.as_deref());
            if let Some(path) = store {
                config.store.backend = StoreBackend::File;
                config.store.path = Some(path);
            }

            let parsed = parse_trace(&trace)
                .with_context(|| format!("Failed to read trace {}", trace.display()))?;
            for err in &parsed.errors {
                eprintln!("{}:{}: {}", trace.display(), err.line, err.message);
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            let options = ReplayOptions { focus: tab };
            let outcome = replay(&parsed.events, &config, &options, cancel).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                let opts = RenderOptions { details };
                print!("{}", render_report(&outcome.report, outcome.badge.as_ref(), &opts));
            }
        }

        Commands::Score {
            domains,
            cookies,
            local_storage,
            canvas,
            hijack,
            json,
        } => {
            let inputs = ScoreInputs {
                third_party_domains: domains,
                cookies,
                local_storage_items: local_storage,
                session_storage_items: 0,
                canvas_access: canvas,
                hijacking_attempt: hijack,
            };
            let score = calculate_privacy_score(&inputs);
            if json {
                println!("{}", serde_json::to_string_pretty(&score)?);
            } else {
                println!("Privacy score: {}", score);
                print!("{}", render_deductions(&score));
            }
        }

        Commands::DumpConfig { config } => {
            print!("{}", load_config(config.as_deref()).to_toml());
        }

        Commands::Version => {
            println!("privscope v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> PrivscopeConfig {
    match path {
        Some(path) => PrivscopeConfig::load(path),
        None => PrivscopeConfig::default(),
    }
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("--log-file {} does not name a file", path.display()))?;
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "privscope=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(guard)
}
