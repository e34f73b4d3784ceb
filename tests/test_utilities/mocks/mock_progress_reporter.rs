use resolved_sbom::prelude::*;
use std::sync::{Arc, Mutex};

/// One call received by the reporter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportedEvent {
    Status(String),
    Walked { completed: usize, total: usize },
    Problem(String),
    Finished(String),
}

/// ProgressReporter that records every call as a `ReportedEvent`.
/// Clones share one event log.
#[derive(Default, Clone)]
pub struct MockProgressReporter {
    events: Arc<Mutex<Vec<ReportedEvent>>>,
}

impl MockProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportedEvent::Status(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn problems(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ReportedEvent::Problem(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Last module-walk count as `(completed, total)`
    pub fn last_walk(&self) -> Option<(usize, usize)> {
        self.events().into_iter().rev().find_map(|event| match event {
            ReportedEvent::Walked { completed, total } => Some((completed, total)),
            _ => None,
        })
    }

    pub fn run_summary(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|event| match event {
            ReportedEvent::Finished(message) => Some(message),
            _ => None,
        })
    }

    fn record(&self, event: ReportedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, message: &str) {
        self.record(ReportedEvent::Status(message.to_string()));
    }

    fn report_progress(&self, current: usize, total: usize, _message: Option<&str>) {
        self.record(ReportedEvent::Walked {
            completed: current,
            total,
        });
    }

    fn report_error(&self, message: &str) {
        self.record(ReportedEvent::Problem(message.to_string()));
    }

    fn report_completion(&self, message: &str) {
        self.record(ReportedEvent::Finished(message.to_string()));
    }
}
