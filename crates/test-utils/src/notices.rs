use std::sync::{Arc, Mutex};

use chefdag::engine::NoticeSink;
use chefdag::types::Notice;

/// Notice sink that keeps every notice for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotices {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// Rendered notices, one string per line.
    pub fn lines(&self) -> Vec<String> {
        self.notices().iter().map(ToString::to_string).collect()
    }
}

impl NoticeSink for RecordingNotices {
    fn emit(&mut self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}
