//! Dump destinations.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shared handle to a dump destination.
///
/// Cloning shares the underlying writer. A file sink is closed when the last
/// handle is dropped.
#[derive(Clone)]
pub struct DumpOutput {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
    label: Arc<str>,
}

impl DumpOutput {
    /// Wrap any writer.
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::labelled(writer, "writer")
    }

    fn labelled<W: Write + Send + 'static>(writer: W, label: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
            label: Arc::from(label),
        }
    }

    pub fn stdout() -> Self {
        Self::labelled(io::stdout(), "stdout")
    }

    pub fn stderr() -> Self {
        Self::labelled(io::stderr(), "stderr")
    }

    /// Create (or truncate) `path` and write records to it.
    pub fn create_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Ok(Self::labelled(file, &path.display().to_string()))
    }

    /// Write a complete record and flush it.
    pub fn write_record(&self, record: &[u8]) -> io::Result<()> {
        let mut out = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("dump output lock poisoned"))?;
        out.write_all(record)?;
        out.flush()
    }

    /// Human-readable destination name for logs.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Debug for DumpOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DumpOutput").field(&self.label).finish()
    }
}

impl From<DumpBuffer> for DumpOutput {
    fn from(buffer: DumpBuffer) -> Self {
        Self::labelled(buffer, "memory")
    }
}

impl From<File> for DumpOutput {
    fn from(file: File) -> Self {
        Self::labelled(file, "file")
    }
}

/// In-memory dump sink whose contents stay readable after handing a clone
/// to a client.
#[derive(Debug, Clone, Default)]
pub struct DumpBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl DumpBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Contents decoded lossily as UTF-8.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }

    pub fn len(&self) -> usize {
        self.bytes.lock().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut b) = self.bytes.lock() {
            b.clear();
        }
    }
}

impl Write for DumpBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .bytes
            .lock()
            .map_err(|_| io::Error::other("dump buffer lock poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Where a file-backed output was requested, for configs and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl OutputTarget {
    /// Parse `"stdout"`, `"stderr"` or a file path.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "stdout" | "-" => OutputTarget::Stdout,
            "stderr" => OutputTarget::Stderr,
            path => OutputTarget::File(PathBuf::from(path)),
        }
    }

    /// Open the destination. Only file targets can fail.
    pub fn open(&self) -> io::Result<DumpOutput> {
        match self {
            OutputTarget::Stdout => Ok(DumpOutput::stdout()),
            OutputTarget::Stderr => Ok(DumpOutput::stderr()),
            OutputTarget::File(path) => DumpOutput::create_file(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_shared_between_clones() {
        let buffer = DumpBuffer::new();
        let output = DumpOutput::from(buffer.clone());
        output.write_record(b"GET / HTTP/1.1\r\n").unwrap();
        assert_eq!(buffer.to_string_lossy(), "GET / HTTP/1.1\r\n");

        buffer.clear();
        assert!(buffer.is_empty());
    }

    #[test]
    fn file_output_writes_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.log");
        let output = DumpOutput::create_file(&path).unwrap();
        output.write_record(b"hello").unwrap();
        drop(output);

        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn create_file_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("dump.log");
        assert!(DumpOutput::create_file(path).is_err());
    }

    #[test]
    fn output_target_parse() {
        assert_eq!(OutputTarget::parse("stdout"), OutputTarget::Stdout);
        assert_eq!(OutputTarget::parse("stderr"), OutputTarget::Stderr);
        assert_eq!(
            OutputTarget::parse("/tmp/x.dump"),
            OutputTarget::File(PathBuf::from("/tmp/x.dump"))
        );
    }
}
