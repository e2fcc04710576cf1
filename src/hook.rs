//! Stop-hook pipeline: speak the last assistant message.
//!
//! stdin JSON → transcript → last assistant turn → payload → dispatch.
//! Every early exit is a skip, never an error.

use std::time::Instant;

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::debug_log::DebugLog;
use crate::dispatch::{Dispatcher, Payload};
use crate::transcript;

/// Event JSON that Claude Code writes to the hook's stdin.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    pub cwd: Option<String>,
    #[serde(default)]
    pub stop_hook_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// A payload was handed to the dispatcher. Delivery result is not known.
    Dispatched { text_chars: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyInput,
    InvalidInput,
    StopHookActive,
    NoTranscriptPath,
    TranscriptUnreadable,
    NoAssistantText,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyInput => "empty input",
            Self::InvalidInput => "invalid input JSON",
            Self::StopHookActive => "stop hook already active",
            Self::NoTranscriptPath => "no transcript path",
            Self::TranscriptUnreadable => "transcript unreadable",
            Self::NoAssistantText => "no assistant text found",
        }
    }
}

/// Run the hook against raw stdin contents.
pub async fn run_stop_hook(
    input: &str,
    config: &Config,
    dispatcher: &Dispatcher,
    log: &dyn DebugLog,
) -> HookOutcome {
    let t0 = Instant::now();
    let outcome = stop_hook(input, config, dispatcher, log).await;

    let (action, detail, text_chars) = match &outcome {
        HookOutcome::Dispatched { text_chars } => ("dispatched", None, Some(*text_chars)),
        HookOutcome::Skipped(reason) => ("skipped", Some(reason.as_str()), None),
    };
    debug!("Hook finished: {action} {detail:?}");
    log.record(
        "hook_complete",
        json!({
            "action": action,
            "detail": detail,
            "text_chars": text_chars,
            "duration_ms": u64::try_from(t0.elapsed().as_millis()).unwrap_or(u64::MAX),
        }),
    );
    outcome
}

async fn stop_hook(
    input: &str,
    config: &Config,
    dispatcher: &Dispatcher,
    log: &dyn DebugLog,
) -> HookOutcome {
    if input.trim().is_empty() {
        return HookOutcome::Skipped(SkipReason::EmptyInput);
    }

    let event: HookInput = match serde_json::from_str(input) {
        Ok(e) => e,
        Err(e) => {
            log.record("invalid_input", json!({ "error": e.to_string() }));
            return HookOutcome::Skipped(SkipReason::InvalidInput);
        }
    };
    log.record(
        "hook_input",
        json!({
            "session_id": event.session_id,
            "transcript_path": event.transcript_path,
            "cwd": event.cwd,
            "stop_hook_active": event.stop_hook_active,
        }),
    );

    // Speaking from inside a hook-triggered continuation would loop.
    if event.stop_hook_active {
        return HookOutcome::Skipped(SkipReason::StopHookActive);
    }

    let transcript_path = match event.transcript_path.as_deref() {
        Some(p) if !p.trim().is_empty() => config.expand_home(p.trim()),
        _ => return HookOutcome::Skipped(SkipReason::NoTranscriptPath),
    };

    let Some(contents) = transcript::read_transcript(&transcript_path) else {
        log.record(
            "transcript_unreadable",
            json!({ "path": transcript_path.display().to_string() }),
        );
        return HookOutcome::Skipped(SkipReason::TranscriptUnreadable);
    };

    let Some(turn) = transcript::last_assistant_turn(&contents) else {
        return HookOutcome::Skipped(SkipReason::NoAssistantText);
    };
    log.record(
        "last_assistant",
        json!({ "chars": turn.text.chars().count(), "text": turn.text }),
    );

    let payload = Payload::new(turn.text).with_session(event.session_id, event.cwd);
    dispatcher.dispatch(&payload).await;

    HookOutcome::Dispatched {
        text_chars: payload.text.chars().count(),
    }
}
