//! Sinks for the per-frame diagnostic line.

use tracing::debug;

/// Receives the diagnostic text published every frame.
pub trait OutputSink {
    fn write(&mut self, text: &str);
}

/// Logs each line at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn write(&mut self, text: &str) {
        debug!(target: "mannequin::output", "{text}");
    }
}

/// Keeps every line in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The most recent line.
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }
}

/// Fan a line out to two sinks.
impl<A: OutputSink, B: OutputSink> OutputSink for (A, B) {
    fn write(&mut self, text: &str) {
        self.0.write(text);
        self.1.write(text);
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn write(&mut self, text: &str) {
        (**self).write(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        assert_eq!(sink.last(), None);
        sink.write("a");
        sink.write("b");
        assert_eq!(sink.lines(), &["a".to_string(), "b".to_string()]);
        assert_eq!(sink.last(), Some("b"));
    }

    #[test]
    fn test_pair_writes_both() {
        let mut pair = (MemorySink::new(), MemorySink::new());
        pair.write("line");
        assert_eq!(pair.0.last(), Some("line"));
        assert_eq!(pair.1.last(), Some("line"));
    }

    #[test]
    fn test_boxed_sink() {
        let mut sink: Box<dyn OutputSink> = Box::new(TracingSink);
        sink.write("ignored");
    }
}
