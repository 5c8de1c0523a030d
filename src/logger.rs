use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber on stderr. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (tests, embedding apps) keeps the existing subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn log_shares_split(words: usize, total_shares: usize, threshold: usize) {
    info!(
        event = "shares_split",
        words = words,
        total_shares = total_shares,
        threshold = threshold,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "Keyphrase split into shares"
    );
}

pub fn log_reconstruct_error(shares: usize, error: &str) {
    error!(
        event = "reconstruct_error",
        shares = shares,
        error = error,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "Keyphrase reconstruction failed"
    );
}

pub fn log_quiz_created(words: usize, groups: usize) {
    info!(
        event = "quiz_created",
        words = words,
        groups = groups,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "Keyphrase quiz created"
    );
}

pub fn log_answer_recorded(group: usize, correct: bool) {
    debug!(
        event = "answer_recorded",
        group = group,
        correct = correct,
        "Quiz answer recorded"
    );
}

pub fn log_step_changed(from: &str, to: &str) {
    info!(
        event = "step_changed",
        from = from,
        to = to,
        timestamp = %chrono::Utc::now().to_rfc3339(),
        "Create wallet step changed"
    );
}

pub fn log_step_rejected(step: &str, action: &str) {
    warn!(
        event = "step_rejected",
        step = step,
        action = action,
        "Create wallet action rejected"
    );
}

pub fn log_event_dispatched(event_name: &str, handlers: usize) {
    debug!(
        event = "signer_event",
        name = event_name,
        handlers = handlers,
        "Signer event dispatched"
    );
}
