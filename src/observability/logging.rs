//! Diagnostic logging.
//!
//! # Responsibilities
//! - Define the `Logger` capability a client reports configuration problems to
//! - Provide the no-op default plus writer and tracing backed loggers
//! - Initialise the tracing subscriber for binaries
//!
//! # Design Decisions
//! - Internal instrumentation always goes through `tracing`
//! - `Logger` is the caller-facing sink; a client never holds "no logger",
//!   it holds `NopLogger`

use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A sink for formatted diagnostic messages.
pub trait Logger: Send + Sync {
    fn log(&self, args: fmt::Arguments<'_>);

    /// False if messages are dropped unseen.
    fn enabled(&self) -> bool {
        true
    }
}

/// Logger that drops every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn log(&self, _args: fmt::Arguments<'_>) {}

    fn enabled(&self) -> bool {
        false
    }
}

/// Logger writing one line per message to any `Write` sink.
pub struct WriterLogger {
    out: Mutex<Box<dyn Write + Send>>,
}

impl WriterLogger {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Logger printing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl Logger for WriterLogger {
    fn log(&self, args: fmt::Arguments<'_>) {
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        // A failing log sink must not disturb the caller.
        let _ = writeln!(out, "{args}");
    }
}

impl fmt::Debug for WriterLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterLogger").finish_non_exhaustive()
    }
}

/// Logger forwarding messages to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(target: "reqkit::client", "{}", args);
    }
}

/// Shared no-op logger used as the client default.
pub fn nop_logger() -> Arc<dyn Logger> {
    Arc::new(NopLogger)
}

/// Format and send a message to `logger`.
#[macro_export]
macro_rules! logf {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log(format_args!($($arg)*))
    };
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_tracing(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_logger_writes_lines() {
        let buf = SharedBuf::default();
        let logger = WriterLogger::new(buf.clone());
        logf!(logger, "create dump file error: {}", "denied");
        logf!(logger, "second");

        let text = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text, "create dump file error: denied\nsecond\n");
    }

    #[test]
    fn nop_logger_accepts_messages() {
        let logger = nop_logger();
        logf!(logger, "ignored {}", 1);
        assert!(!logger.enabled());
        assert!(WriterLogger::new(std::io::sink()).enabled());
    }
}
