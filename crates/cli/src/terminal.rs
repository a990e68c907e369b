//! Terminal notifier and confirmation prompt

use std::io::{self, BufRead, Write};

use stockroom_app::{
    confirm::Confirm,
    notifications::{Notification, Notifier},
};
use tracing::warn;

/// Prints notifications to stderr, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        if let Err(source) = writeln!(io::stderr().lock(), "{notification}") {
            warn!("failed to print notification: {source}");
        }
    }
}

/// Asks on stderr and reads a `y`/`N` answer from stdin. Anything but yes declines.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stderr = io::stderr().lock();

        if let Err(source) = write!(stderr, "{prompt} [y/N] ").and_then(|()| stderr.flush()) {
            warn!("failed to print prompt: {source}");

            return false;
        }

        let mut answer = String::new();

        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(source) => {
                warn!("failed to read confirmation: {source}");

                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
