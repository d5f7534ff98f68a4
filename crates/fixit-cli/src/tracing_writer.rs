//! Tracing writer for the persistent log file.
//!
//! The terminal layer writes straight to stderr. The file layer gets its own
//! [`MakeWriter`](tracing_subscriber::fmt::MakeWriter) so it can carry an
//! independent `EnvFilter`. Configure it with `.with_ansi(false)`; the
//! writer does no escape stripping.

use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

/// [`MakeWriter`](tracing_subscriber::fmt::MakeWriter) for the file layer.
#[derive(Clone)]
pub struct FileMakeWriter {
    file: Arc<Mutex<File>>,
}

impl FileMakeWriter {
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for FileMakeWriter {
    type Writer = FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter {
            file: Arc::clone(&self.file),
            buf: Vec::with_capacity(256),
        }
    }
}

/// Per-event writer.
///
/// Collects one formatted event and appends it under the lock on [`Drop`],
/// so lines from concurrent tasks never interleave.
pub struct FileWriter {
    file: Arc<Mutex<File>>,
    buf: Vec<u8>,
}

impl Write for FileWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let mut file = self.file.lock();
        let _ = file.write_all(&self.buf);
        let _ = file.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::fmt::MakeWriter;

    #[test]
    fn event_is_written_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixit.log");
        let file = File::create(&path).unwrap();
        let make = FileMakeWriter::new(Arc::new(Mutex::new(file)));

        let mut writer = make.make_writer();
        writer.write_all(b"first ").unwrap();
        writer.write_all(b"line\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        drop(writer);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first line\n");
    }

    #[test]
    fn empty_writer_appends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixit.log");
        let file = File::create(&path).unwrap();
        let make = FileMakeWriter::new(Arc::new(Mutex::new(file)));

        drop(make.make_writer());
        assert!(std::fs::read(&path).unwrap().is_empty());
    }
}
