//! Streaming output fan-out.
//!
//! Child output is relayed chunk by chunk as it arrives, never buffered
//! for the whole run. Reading in dedicated threads also keeps a chatty
//! child from blocking once its pipe buffer (~64 KiB) fills.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

const RELAY_BUF_SIZE: usize = 4096;

/// One log file shared by the stdout and stderr relays. Writes are
/// serialized so chunks from both streams interleave without tearing.
#[derive(Clone)]
pub struct SharedLog(Arc<Mutex<File>>);

impl SharedLog {
    /// Create (truncating) the log file for this run.
    pub fn create(path: &Path) -> io::Result<Self> {
        Ok(Self(Arc::new(Mutex::new(File::create(path)?))))
    }
}

impl Write for SharedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log mutex poisoned"))?;
        file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log mutex poisoned"))?;
        file.flush()
    }
}

/// Writer duplicating every chunk to two sinks.
pub struct Fanout<A: Write, B: Write> {
    pub a: A,
    pub b: B,
}

impl<A: Write, B: Write> Write for Fanout<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.a.write_all(buf)?;
        self.b.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

/// Relay `src` to `dst` in a background thread, flushing each chunk.
/// Returns the number of bytes relayed; ends at EOF or on a sink error.
pub fn spawn_relay<R, W>(mut src: R, mut dst: W) -> JoinHandle<u64>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
{
    thread::spawn(move || {
        let mut relayed: u64 = 0;
        let mut buf = [0u8; RELAY_BUF_SIZE];
        loop {
            match src.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if dst.write_all(&buf[..n]).is_err() {
                        break;
                    }
                    let _ = dst.flush();
                    relayed += n as u64;
                }
                Err(_) => break,
            }
        }
        relayed
    })
}
