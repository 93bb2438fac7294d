use std::{
    io::{self, BufRead},
    str::FromStr,
    sync::Arc,
    thread,
};

use presentation::{SignalFilter, StatusFilter};
use signal_feed::services::{RefreshOutcome, SignalListStore};
use tokio::sync::{Notify, mpsc, watch};
use tracing::{debug, info, warn};

/// One line typed by the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Retry,
    Quit,
    Search(String),
    Status(StatusFilter),
    Help,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word.to_lowercase().as_str() {
            "r" | "retry" => Ok(Command::Retry),
            "q" | "quit" => Ok(Command::Quit),
            "f" | "find" => Ok(Command::Search(rest.to_string())),
            "s" | "status" => Ok(Command::Status(rest.parse().unwrap_or_default())),
            "h" | "help" | "?" => Ok(Command::Help),
            _ => Err(format!("Unknown command: {}", line)),
        }
    }
}

pub const HELP: &str = "Commands: r (retry), f <text> (search symbol/account), \
s <status|all> (status filter), q (quit)";

/// Reads stdin on its own OS thread and forwards each line. A blocked read
/// never holds up runtime shutdown; the thread dies with the process.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to read command: {}", e);
                    break;
                }
            }
        }
        debug!("Command input closed");
    });
    rx
}

/// Applies operator commands until input closes or `q` is typed.
pub async fn run_commands(
    mut lines: mpsc::Receiver<String>,
    store: Arc<SignalListStore>,
    filter_tx: watch::Sender<SignalFilter>,
    quit: Arc<Notify>,
) {
    let mut search = String::new();
    let mut status = StatusFilter::All;

    while let Some(line) = lines.recv().await {
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Retry) => match store.retry().await {
                RefreshOutcome::Skipped => info!("A refresh is already running"),
                outcome => debug!("Retry finished: {:?}", outcome),
            },
            Ok(Command::Quit) => {
                quit.notify_one();
                break;
            }
            Ok(Command::Search(term)) => {
                search = term;
                filter_tx.send_replace(SignalFilter::new(&search, status.clone()));
            }
            Ok(Command::Status(filter)) => {
                status = filter;
                filter_tx.send_replace(SignalFilter::new(&search, status.clone()));
            }
            Ok(Command::Help) => info!("{}", HELP),
            Err(e) => warn!("{}. {}", e, HELP),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use signal_feed::InMemorySignalSource;
    use std::time::Duration;

    #[test]
    fn test_parse_commands() {
        assert_eq!("r".parse::<Command>(), Ok(Command::Retry));
        assert_eq!(" Quit ".parse::<Command>(), Ok(Command::Quit));
        assert_eq!(
            "f  eur usd ".parse::<Command>(),
            Ok(Command::Search("eur usd".to_string()))
        );
        assert_eq!("f".parse::<Command>(), Ok(Command::Search(String::new())));
        assert_eq!(
            "s Pending".parse::<Command>(),
            Ok(Command::Status(StatusFilter::Exact("pending".to_string())))
        );
        assert_eq!("s all".parse::<Command>(), Ok(Command::Status(StatusFilter::All)));
        assert!("x".parse::<Command>().is_err());
    }

    #[tokio::test]
    async fn test_commands_drive_store_and_filter() {
        let source = Arc::new(InMemorySignalSource::new(
            vec![json!({"id": 1, "symbol": "EURUSD"})],
            Duration::ZERO,
        ));
        let store = Arc::new(SignalListStore::new(source, 10));
        let (filter_tx, filter_rx) = watch::channel(SignalFilter::default());
        let quit = Arc::new(Notify::new());

        let (tx, rx) = mpsc::channel(8);
        for line in ["r", "f eur", "", "s executed", "q", "r"] {
            tx.send(line.to_string()).await.unwrap();
        }
        run_commands(rx, store.clone(), filter_tx, quit.clone()).await;

        assert_eq!(store.snapshot().records.len(), 1);
        let filter = filter_rx.borrow().clone();
        let snapshot = store.snapshot();
        let record = &snapshot.records[0];
        assert!(!filter.matches(record));
        assert!(SignalFilter::new("eur", StatusFilter::All).matches(record));

        // quit leaves a permit behind for the shutdown future
        tokio::time::timeout(Duration::from_secs(1), quit.notified())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_closed_input_ends_loop_without_quitting() {
        let store = Arc::new(SignalListStore::new(
            Arc::new(InMemorySignalSource::default()),
            10,
        ));
        let (filter_tx, _filter_rx) = watch::channel(SignalFilter::default());
        let quit = Arc::new(Notify::new());

        let (tx, rx) = mpsc::channel::<String>(1);
        drop(tx);
        tokio::time::timeout(
            Duration::from_secs(1),
            run_commands(rx, store, filter_tx, quit.clone()),
        )
        .await
        .unwrap();

        assert!(
            tokio::time::timeout(Duration::from_millis(50), quit.notified())
                .await
                .is_err()
        );
    }
}
