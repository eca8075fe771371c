//! Progress reporting for the in-flight search.
//!
//! The pipeline reports progress synchronously on the worker task through a
//! [`ProgressSink`]; marshaling updates to a presentation layer is the
//! caller's responsibility. [`SearchTracker`] is a small in-memory sink that
//! also records the search status machine and a timestamped message log.

use parking_lot::RwLock;
use std::sync::Arc;

/// Receives progress while the analysis phase enumerates combinations.
pub trait ProgressSink: Send + Sync {
    /// Announce a new pipeline phase, e.g. "Finding asterisms for tiptilt".
    fn phase(&self, _title: &str) {}

    /// One evaluated combination: `count` of `total`, with the score the
    /// combination received.
    fn progress(&self, count: usize, total: usize, score: f64);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn progress(&self, _count: usize, _total: usize, _score: f64) {}
}

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Search status machine. Each invocation moves `Idle -> Searching` and ends
/// in one of the terminal states; starting a new search returns to
/// `Searching` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Searching,
    Completed,
    Cancelled,
    Failed,
}

/// Last reported analysis progress.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct ProgressSnapshot {
    pub count: usize,
    pub total: usize,
    pub score: f64,
}

#[derive(Debug)]
struct TrackerState {
    status: SearchStatus,
    logs: Vec<LogEntry>,
    started_at: Option<chrono::DateTime<chrono::Utc>>,
    finished_at: Option<chrono::DateTime<chrono::Utc>>,
    last_progress: Option<ProgressSnapshot>,
}

/// In-memory status and log store for the single in-flight search.
#[derive(Clone)]
pub struct SearchTracker {
    state: Arc<RwLock<TrackerState>>,
}

impl SearchTracker {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(TrackerState {
                status: SearchStatus::Idle,
                logs: vec![],
                started_at: None,
                finished_at: None,
                last_progress: None,
            })),
        }
    }

    /// Begin a new search, clearing state from the previous one.
    pub fn start_search(&self) {
        let mut state = self.state.write();
        state.status = SearchStatus::Searching;
        state.logs.clear();
        state.started_at = Some(chrono::Utc::now());
        state.finished_at = None;
        state.last_progress = None;
    }

    /// Add a log entry.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let mut state = self.state.write();
        state.logs.push(LogEntry {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
        });
    }

    /// Mark the search as completed.
    pub fn complete(&self, message: impl Into<String>) {
        self.finish(SearchStatus::Completed, LogLevel::Success, message);
    }

    /// Mark the search as cancelled.
    pub fn cancelled(&self, message: impl Into<String>) {
        self.finish(SearchStatus::Cancelled, LogLevel::Warning, message);
    }

    /// Mark the search as failed.
    pub fn fail(&self, message: impl Into<String>) {
        self.finish(SearchStatus::Failed, LogLevel::Error, message);
    }

    fn finish(&self, status: SearchStatus, level: LogLevel, message: impl Into<String>) {
        let mut state = self.state.write();
        state.status = status;
        state.finished_at = Some(chrono::Utc::now());
        state.logs.push(LogEntry {
            timestamp: chrono::Utc::now(),
            level,
            message: message.into(),
        });
    }

    pub fn status(&self) -> SearchStatus {
        self.state.read().status
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.state.read().logs.clone()
    }

    pub fn last_progress(&self) -> Option<ProgressSnapshot> {
        self.state.read().last_progress
    }
}

impl Default for SearchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for SearchTracker {
    fn phase(&self, title: &str) {
        self.log(LogLevel::Info, title);
    }

    fn progress(&self, count: usize, total: usize, score: f64) {
        self.state.write().last_progress = Some(ProgressSnapshot {
            count,
            total,
            score,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_state_machine() {
        let tracker = SearchTracker::new();
        assert_eq!(tracker.status(), SearchStatus::Idle);

        tracker.start_search();
        assert_eq!(tracker.status(), SearchStatus::Searching);

        tracker.complete("done");
        assert_eq!(tracker.status(), SearchStatus::Completed);

        // A new invocation resets logs and status
        tracker.start_search();
        assert_eq!(tracker.status(), SearchStatus::Searching);
        assert!(tracker.logs().is_empty());
    }

    #[test]
    fn test_tracker_records_progress() {
        let tracker = SearchTracker::new();
        tracker.start_search();
        tracker.progress(3, 30, 0.42);
        let last = tracker.last_progress().unwrap();
        assert_eq!(last.count, 3);
        assert_eq!(last.total, 30);
        assert!((last.score - 0.42).abs() < f64::EPSILON);
    }
}
