use snafu::prelude::*;
use std::{path::PathBuf, sync::LazyLock};

pub mod aggregate;
pub mod finder;
pub mod marker;
pub mod report;
pub mod searcher;

pub use aggregate::{search_files, FailurePolicy, FileFailure, SearchReport, SearchRequest};
pub use marker::Marker;
pub use searcher::{FileResult, Match};

static CHAN: LazyLock<(
    async_channel::Sender<Message>,
    async_channel::Receiver<Message>,
)> = LazyLock::new(async_channel::unbounded);

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("Invalid glob pattern '{pattern}': {source}"))]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },

    #[snafu(display("Could not walk the file tree: {source}"))]
    Walk { source: glob::GlobError },

    #[snafu(display("Could not read {}: {source}", path.display()))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not serialize the report: {source}"))]
    Json { source: serde_json::Error },

    #[snafu(display("Could not get the current directory: {source}"))]
    CurrentDir { source: std::io::Error },
}

pub(crate) type Result<T, E = Error> = core::result::Result<T, E>;

/// An external progress message sent from the searcher.
#[derive(Debug)]
pub enum Message {
    FindingFiles {
        pattern: String,
    },
    FoundFiles {
        count: usize,
    },

    SearchedFile {
        path: PathBuf,
        matches: usize,
    },
    FoundMatches {
        files: usize,
        total: usize,
    },
}

impl Message {
    /// Send a status message to the outside world.
    ///
    /// Messages are dropped while nobody holds a [`Message::receiver`].
    pub fn send(self) {
        if CHAN.0.receiver_count() <= 1 {
            return;
        }
        // UNWRAP: safe because this channel is unbounded.
        CHAN.0.try_send(self).unwrap();
    }

    /// Get a clone of the status message receiver. Messages are queued for as
    /// long as the returned receiver (or a clone of it) is alive.
    pub fn receiver() -> async_channel::Receiver<Message> {
        CHAN.1.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain_counts(recv: &async_channel::Receiver<Message>) -> Vec<usize> {
        let mut counts = vec![];
        while let Ok(msg) = recv.try_recv() {
            if let Message::FoundFiles { count } = msg {
                counts.push(count);
            }
        }
        counts
    }

    #[test]
    fn messages_only_queue_while_someone_listens() {
        let recv = Message::receiver();
        Message::FoundFiles { count: 7001 }.send();
        assert!(drain_counts(&recv).contains(&7001));
        drop(recv);

        drain_counts(&CHAN.1);
        Message::FoundFiles { count: 7002 }.send();
        assert!(!drain_counts(&CHAN.1).contains(&7002));
    }
}
