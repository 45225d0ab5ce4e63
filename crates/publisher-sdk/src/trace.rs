/// Trace / logging seam used by the publisher.
///
/// The publisher reports its progress through this trait instead of calling
/// `tracing` directly, so tests can capture exactly what an operator would see.
pub trait TraceWriter: Send + Sync {
    /// Log an informational message.
    fn info(&self, message: &str);

    /// Log a verbose / debug message.
    fn verbose(&self, message: &str);

    /// Log a warning message.
    fn warning(&self, message: &str) {
        self.info(&format!("WARNING: {message}"));
    }

    /// Log an error message.
    fn error(&self, message: &str) {
        self.info(&format!("ERROR: {message}"));
    }
}

/// Forwards every message to the `tracing` crate at the matching level.
#[derive(Debug, Clone)]
pub struct TracingTraceWriter;

impl TraceWriter for TracingTraceWriter {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn verbose(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// The level of a collected trace message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceLevel {
    Info,
    Verbose,
    Warning,
    Error,
}

/// A trace writer that keeps every message in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingTraceWriter {
    messages: parking_lot::Mutex<Vec<(TraceLevel, String)>>,
}

impl CollectingTraceWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return all collected messages.
    pub fn messages(&self) -> Vec<(TraceLevel, String)> {
        self.messages.lock().clone()
    }

    /// Whether any message at `level` contains `needle`.
    pub fn contains(&self, level: TraceLevel, needle: &str) -> bool {
        self.messages
            .lock()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn push(&self, level: TraceLevel, message: &str) {
        self.messages.lock().push((level, message.to_string()));
    }
}

impl TraceWriter for CollectingTraceWriter {
    fn info(&self, message: &str) {
        self.push(TraceLevel::Info, message);
    }

    fn verbose(&self, message: &str) {
        self.push(TraceLevel::Verbose, message);
    }

    fn warning(&self, message: &str) {
        self.push(TraceLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.push(TraceLevel::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_writer_keeps_order() {
        let writer = CollectingTraceWriter::new();
        writer.info("bucket ready");
        writer.warning("listing failed");
        writer.error("upload failed");
        writer.verbose("stage");
        let msgs = writer.messages();
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0], (TraceLevel::Info, "bucket ready".into()));
        assert_eq!(msgs[1], (TraceLevel::Warning, "listing failed".into()));
        assert_eq!(msgs[2], (TraceLevel::Error, "upload failed".into()));
        assert_eq!(msgs[3], (TraceLevel::Verbose, "stage".into()));
    }

    #[test]
    fn collecting_writer_filters_by_level() {
        let writer = CollectingTraceWriter::new();
        writer.info("a");
        writer.warning("b");
        writer.warning("c");
        assert!(writer.contains(TraceLevel::Warning, "b"));
        assert!(writer.contains(TraceLevel::Warning, "c"));
        assert!(!writer.contains(TraceLevel::Warning, "a"));
        assert!(!writer.contains(TraceLevel::Info, "c"));
    }

    #[test]
    fn default_warning_routes_through_info() {
        struct InfoOnly(CollectingTraceWriter);
        impl TraceWriter for InfoOnly {
            fn info(&self, message: &str) {
                self.0.info(message);
            }
            fn verbose(&self, _message: &str) {}
        }

        let writer = InfoOnly(CollectingTraceWriter::new());
        writer.warning("slow");
        writer.error("boom");
        assert_eq!(
            writer.0.messages(),
            vec![
                (TraceLevel::Info, "WARNING: slow".to_string()),
                (TraceLevel::Info, "ERROR: boom".to_string()),
            ]
        );
    }
}
