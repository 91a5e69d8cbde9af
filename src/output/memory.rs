// src/output/memory.rs

use std::sync::{Arc, Mutex};

use super::{ConsoleStream, OutputSink};

/// In-memory sink recording every emitted line.
///
/// Clones share the same buffer, so one clone can be handed to a session
/// while another is inspected.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(ConsoleStream, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines so far, in emission order.
    pub fn lines(&self) -> Vec<(ConsoleStream, String)> {
        match self.lines.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Lines emitted on one stream.
    pub fn stream(&self, stream: ConsoleStream) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line)
            .collect()
    }

    /// Whether any line on any stream contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, line)| line.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.lines().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OutputSink for MemorySink {
    fn emit(&self, stream: ConsoleStream, line: &str) {
        let mut guard = match self.lines.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((stream, line.to_string()));
    }
}
