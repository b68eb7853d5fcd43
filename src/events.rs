//! Content-change events delivered to external listeners after a
//! committed edit, per §6.

/// A structured notification describing how lines changed after an
/// edit. Delivered only once the buffer is in its post-commit state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentChangeEvent {
    /// A single line's text changed in place.
    LineChanged { line: usize, new_content: Vec<u8> },
    /// Lines `from..=to` were removed (1-based, inclusive).
    LinesDeleted { from: usize, to: usize },
    /// Lines `from..=to` were inserted (1-based, inclusive);
    /// `joined_content` uses `"\n"` as separator between them.
    LinesInserted {
        from: usize,
        to: usize,
        joined_content: Vec<u8>,
    },
}

/// Implemented by observers that want to react to committed edits. The
/// buffer is already in its post-commit state when events are
/// delivered, so a listener may read it but must not mutate it.
pub trait ContentChangeListener {
    fn on_content_change(&mut self, event: &ContentChangeEvent);
}

/// A listener that simply accumulates every event it receives, useful
/// for tests and for callers that want to batch-process events rather
/// than react to each one inline.
#[derive(Debug, Default)]
pub struct RecordingListener {
    pub events: Vec<ContentChangeEvent>,
}

impl ContentChangeListener for RecordingListener {
    fn on_content_change(&mut self, event: &ContentChangeEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
