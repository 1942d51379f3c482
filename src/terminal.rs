// Terminal stand-ins for the page's collaborators.
use std::io::{self, BufRead, Write};
use std::thread;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::feed::{ConfirmDialog, Navigator, Notification, NotificationKind, Notifier, Route};

pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => println!("{}", notification),
            NotificationKind::Error => eprintln!("{}", notification),
        }
    }
}

/// Asks on stdout and reads a y/N answer from stdin.
///
/// The read happens on its own thread so an abandoned prompt (Ctrl-C) never
/// holds up runtime shutdown.
pub struct TerminalConfirm;

#[async_trait]
impl ConfirmDialog for TerminalConfirm {
    async fn confirm(&self, message: &str) -> bool {
        let mut stdout = io::stdout();
        if let Err(e) = write!(stdout, "{} [y/N] ", message).and_then(|_| stdout.flush()) {
            tracing::warn!("Could not write prompt: {}", e);
            return false;
        }

        let Some(answer) = read_line_on_thread(|| io::stdin().lock()) else {
            return false;
        };
        match answer.await {
            Ok(Ok(line)) => parse_answer(&line),
            Ok(Err(e)) => {
                tracing::warn!("Could not read answer: {}", e);
                false
            }
            Err(_) => false,
        }
    }
}

/// Read one line on a detached thread; the receiver resolves once it arrives.
fn read_line_on_thread<R, F>(open: F) -> Option<oneshot::Receiver<io::Result<String>>>
where
    F: FnOnce() -> R + Send + 'static,
    R: BufRead,
{
    let (tx, rx) = oneshot::channel();
    let spawned = thread::Builder::new()
        .name("confirm-prompt".to_string())
        .spawn(move || {
            let mut line = String::new();
            let result = open().read_line(&mut line).map(|_| line);
            // Nobody waiting means the prompt was abandoned
            let _ = tx.send(result);
        });

    match spawned {
        Ok(_) => Some(rx),
        Err(e) => {
            tracing::warn!("Could not start prompt reader: {}", e);
            None
        }
    }
}

/// Confirms without asking (`--yes`).
pub struct AutoConfirm;

#[async_trait]
impl ConfirmDialog for AutoConfirm {
    async fn confirm(&self, _message: &str) -> bool {
        true
    }
}

pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: &Route) {
        println!("{}", route);
    }
}

/// Only an explicit yes confirms; anything else, including EOF, declines.
pub fn parse_answer(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
