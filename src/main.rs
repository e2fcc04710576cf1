//! speakable-hook: Claude Code Stop hook.
//!
//! Reads event JSON from stdin, finds the last assistant message in the
//! transcript and POSTs it to the speakable endpoint. Always exits 0 and
//! prints nothing unless `RUST_LOG` asks for it.

use std::io::{IsTerminal, Read};

use speakable_hook::config::Config;
use speakable_hook::dispatch::Dispatcher;
use speakable_hook::{debug_log, hook};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    speakable_hook::init_tracing("off");

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return;
    }

    let mut input = String::new();
    if stdin.lock().read_to_string(&mut input).is_err() {
        return;
    }

    let config = Config::resolve(None);
    let log = debug_log::from_config(&config);
    let dispatcher = Dispatcher::new(config.endpoint.clone(), log.clone());

    hook::run_stop_hook(&input, &config, &dispatcher, &*log).await;
}
