//! Shared utilities for integration tests.

use std::io;
use std::sync::{Arc, Mutex};

use logkit::{Logger, Options};

/// An in-memory `MakeWriter` target shared between the logger and the test.
#[derive(Clone, Default)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// Every line parsed as a JSON object.
    #[allow(dead_code)]
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }
}

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A JSON logger at `level` writing into a fresh buffer.
#[allow(dead_code)]
pub fn json_logger(level: &str) -> (Logger, SharedBuf) {
    let opts = Options {
        level: level.to_string(),
        format: "json".to_string(),
        ..Options::default()
    };
    let buf = SharedBuf::default();
    let out = buf.clone();
    let logger = Logger::with_writer(&opts, move || out.clone()).unwrap();
    (logger, buf)
}
