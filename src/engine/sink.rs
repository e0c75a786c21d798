//! Output sinks.
//!
//! # Responsibilities
//! - Resolve symbolic output paths (`stdout`, `stderr`, file paths, `file://` URLs)
//! - Serialize concurrent writes to one destination
//! - Accept any `tracing_subscriber` `MakeWriter` as a destination
//!
//! # Design Decisions
//! - Every sink is a `BoxMakeWriter`; files come from a non-rotating `tracing_appender`
//! - Files sit behind a `Mutex` so one entry is one uninterrupted write

use std::fmt;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};

use crate::error::LogError;

pub struct Sink {
    name: String,
    writer: BoxMakeWriter,
}

impl Sink {
    /// Opens the sink named by `path`. Files are created if missing and
    /// appended to; their directory must already exist.
    pub fn open(path: &str) -> Result<Self, LogError> {
        match path {
            "stdout" => Ok(Self::stdout()),
            "stderr" => Ok(Self::stderr()),
            _ => {
                let appender = open_appender(Path::new(path.strip_prefix("file://").unwrap_or(path)))
                    .map_err(|source| LogError::OpenSink {
                        path: path.to_string(),
                        source,
                    })?;
                Ok(Self {
                    name: path.to_string(),
                    writer: BoxMakeWriter::new(Mutex::new(appender)),
                })
            }
        }
    }

    /// Opens every path, failing on the first one that can't be opened.
    pub fn open_all(paths: &[String]) -> Result<Vec<Self>, LogError> {
        paths.iter().map(|p| Self::open(p)).collect()
    }

    pub fn stdout() -> Self {
        Self {
            name: "stdout".into(),
            writer: BoxMakeWriter::new(io::stdout),
        }
    }

    pub fn stderr() -> Self {
        Self {
            name: "stderr".into(),
            writer: BoxMakeWriter::new(io::stderr),
        }
    }

    pub fn from_make_writer<M>(make_writer: M) -> Self
    where
        M: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        Self {
            name: "writer".into(),
            writer: BoxMakeWriter::new(make_writer),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut w = self.writer.make_writer();
        w.write_all(buf)?;
        w.flush()
    }

    /// Flushes buffered data down to the destination.
    pub fn sync(&self) -> io::Result<()> {
        self.writer.make_writer().flush()
    }
}

fn open_appender(path: &Path) -> io::Result<RollingFileAppender> {
    let Some(file_name) = path.file_name() else {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"));
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("directory {} does not exist", dir.display()),
        ));
    }
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
        .map_err(io::Error::other)
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sink({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_standard_streams() {
        assert_eq!(Sink::open("stdout").unwrap().name(), "stdout");
        assert_eq!(Sink::open("stderr").unwrap().name(), "stderr");
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        let path_str = path.to_str().unwrap().to_string();

        let sink = Sink::open(&path_str).unwrap();
        sink.write_all(b"one\n").unwrap();
        sink.sync().unwrap();
        drop(sink);

        let sink = Sink::open(&format!("file://{}", path_str)).unwrap();
        sink.write_all(b"two\n").unwrap();
        sink.sync().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn test_missing_directory_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let err = Sink::open(nested.join("app.log").to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LogError::OpenSink { .. }));
        assert!(!nested.exists());
    }

    #[test]
    fn test_path_without_file_name() {
        assert!(matches!(Sink::open("/"), Err(LogError::OpenSink { .. })));
    }

    #[test]
    fn test_unopenable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let bad = blocker.join("app.log");
        let err = Sink::open(bad.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LogError::OpenSink { .. }));
    }
}
