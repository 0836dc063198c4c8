//! Process-wide output sink (SPEC_FULL.md §4.9).
//!
//! Both connection-direction worker threads write whole description blocks
//! through the same sink; the mutex guarantees a block from one direction is
//! never interleaved with a block from the other.

use std::io::{self, Write};
use std::sync::Mutex;

pub struct OutputSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl OutputSink {
    pub fn stdout() -> Self {
        OutputSink { writer: Mutex::new(Box::new(io::stdout())) }
    }

    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        OutputSink { writer: Mutex::new(writer) }
    }

    /// Write one description block followed by a trailing newline, then flush.
    /// Poisoned-lock recovery mirrors the registries: a panicking writer
    /// should not take down every other connection's output.
    pub fn write_block(&self, block: &str) -> io::Result<()> {
        let mut guard = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        writeln!(guard, "{}", block)?;
        guard.flush()
    }
}
