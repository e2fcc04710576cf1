//! transcript-context: print the last few turns of a transcript and send
//! them to the speakable endpoint.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use speakable_hook::config::Config;
use speakable_hook::context::{recent_context, window_size};
use speakable_hook::debug_log;
use speakable_hook::dispatch::Dispatcher;

#[derive(Parser, Debug)]
#[command(
    name = "transcript-context",
    about = "Show and send the most recent conversation turns"
)]
struct Args {
    /// Transcript JSONL file (`~` is expanded)
    transcript: String,

    /// Number of turns to keep (defaults to the configured window)
    #[arg(short = 'n', long)]
    turns: Option<usize>,

    /// Session id sent with the payload
    #[arg(long)]
    session_id: Option<String>,

    /// Working directory sent with the payload
    #[arg(long)]
    cwd: Option<String>,

    /// Print the context without sending it
    #[arg(long)]
    dry_run: bool,

    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    speakable_hook::init_tracing(if args.verbose { "debug" } else { "warn" });

    let config = Config::resolve(args.config.as_deref());
    let log = debug_log::from_config(&config);

    let path = config.expand_home(&args.transcript);
    let n = window_size(args.turns, &config);
    let context = recent_context(&path, n, &config, &*log);

    info!("{} turn(s) from {}", context.turns.len(), path.display());
    if context.is_empty() {
        eprintln!("No conversation turns found in {}", path.display());
        return;
    }
    println!("{}", context.text);

    if args.dry_run {
        return;
    }

    let dispatcher = Dispatcher::new(config.endpoint.clone(), log.clone());
    let payload = context.into_payload(args.session_id, args.cwd);
    dispatcher.dispatch(&payload).await;
}
