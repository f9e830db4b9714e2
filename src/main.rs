//! pointer-replay - replay a recorded pointer trace and print what an
//! observer would have delivered.

use anyhow::Context;
use clap::Parser;
use pointer_observer::replay::{self, Trace};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "pointer-replay", version, about = "Replay a pointer event trace")]
struct Args {
    /// JSON trace file with `options` and `events`
    trace: PathBuf,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Print only the pointers left after the last event
    #[arg(long)]
    final_only: bool,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pointer_observer=info,pointer_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    tracing::info!("Starting pointer-replay v{}", env!("CARGO_PKG_VERSION"));

    let trace = Trace::load(&args.trace)
        .with_context(|| format!("Failed to load trace {}", args.trace.display()))?;
    let outcome = replay::replay(&trace).context("Failed to replay trace")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.final_only {
        write_json(&mut out, &outcome.final_pointers, args.pretty)?;
    } else {
        for entry in &outcome.deliveries {
            write_json(&mut out, entry, args.pretty)?;
        }
    }

    Ok(())
}

fn write_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
