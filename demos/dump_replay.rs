//! # Replay Dump
//!
//! Decodes a `.slp` replay file and prints a one-line summary of every frame
//! (or every `--every`th frame), followed by the final snapshot as JSON.
//!
//! Run with: `cargo run --example dump_replay -- path/to/game.slp`

#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::disallowed_macros,
    clippy::expect_used
)]

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use slippstream::telemetry::{
    CollectingObserver, CompositeObserver, TracingObserver, ViolationObserver,
};
use slippstream::{GameState, SessionBuilder, StepResult};

#[derive(Parser)]
struct Opt {
    /// Replay file to decode.
    path: PathBuf,
    /// Accept streams older than 3.0.0.
    #[arg(short, long)]
    allow_old_version: bool,
    /// Print one frame out of this many.
    #[arg(short, long, default_value_t = 60)]
    every: usize,
    /// Print the last snapshot as JSON when the replay ends.
    #[arg(short, long)]
    json: bool,
    /// Log decoder diagnostics at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn summary(state: &GameState) -> String {
    let mut line = format!("frame {:>6} {:?}", state.frame, state.stage);
    for (port, player) in &state.players {
        let body = &player.primary;
        let _ = write!(
            line,
            " | {port} {:?} {:?}@{} {}% x{} ({:.1}, {:.1})",
            body.character,
            body.action,
            body.action_frame,
            body.percent,
            body.stock,
            body.position.x,
            body.position.y,
        );
    }
    let _ = write!(line, " | distance {:.1}", state.distance);
    line
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let opt = Opt::parse();

    // decoder warnings go to stderr, frame summaries to stdout
    let level = if opt.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .expect("setting up tracing subscriber failed");

    // log problems as they happen and count them for the closing line
    let collected = Arc::new(CollectingObserver::new());
    let sinks: Vec<Arc<dyn ViolationObserver>> = vec![Arc::new(TracingObserver), collected.clone()];
    let observer = CompositeObserver::from_observers(sinks);

    let mut session = SessionBuilder::new()
        .with_allow_old_version(opt.allow_old_version)
        .with_violation_observer(Arc::new(observer))
        .start_replay_session(&opt.path)?;

    if let Some(metadata) = session.metadata() {
        println!(
            "started {} on {} ({})",
            metadata.start_at, metadata.played_on, metadata.console_nick
        );
    }

    let mut delivered = 0usize;
    let mut last = None;
    loop {
        match session.next_frame()? {
            StepResult::Frame(state) => {
                if delivered % opt.every.max(1) == 0 {
                    println!("{}", summary(&state));
                }
                delivered += 1;
                last = Some(state);
            },
            StepResult::Pending => continue,
            StepResult::Ended => break,
        }
    }

    println!(
        "{delivered} frames, version {}, last frame {}, {} problems",
        session
            .version()
            .map_or_else(|| "unknown".to_owned(), |version| version.to_string()),
        session.last_frame(),
        collected.len(),
    );
    if let (true, Some(state)) = (opt.json, last) {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    Ok(())
}
