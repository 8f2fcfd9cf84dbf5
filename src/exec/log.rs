// src/exec/log.rs

//! Temp-file backed log sinks for command output.
//!
//! [`SharedLog`] accumulates the framed output of every command, across
//! executor runs, in execution order; [`CommandLog`] holds a single command's
//! framed output when individual capture is requested. Both rewind themselves
//! before reading, so they are always readable from the start once a run has
//! finished writing.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::{Arc, Mutex};

use crate::errors::Result;

/// Append-only log shared between the worker and its caller.
///
/// Append is the only mutation. The worker writes entries in execution order;
/// entries from distinct commands never interleave because only one command
/// is ever in flight.
#[derive(Debug, Clone)]
pub struct SharedLog {
    file: Arc<Mutex<File>>,
}

impl SharedLog {
    /// Create a new log backed by an anonymous temp file.
    pub fn new() -> Result<Self> {
        Ok(Self {
            file: Arc::new(Mutex::new(tempfile::tempfile()?)),
        })
    }

    pub fn append(&self, text: &str) -> Result<()> {
        let mut file = self.file.lock().unwrap();
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Rewind and read the whole accumulated log.
    pub fn read_to_string(&self) -> Result<String> {
        let mut file = self.file.lock().unwrap();
        file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Ok(contents)
    }
}

/// Dedicated log for a single command.
#[derive(Debug)]
pub struct CommandLog {
    file: File,
}

impl CommandLog {
    pub fn new() -> Result<Self> {
        Ok(Self {
            file: tempfile::tempfile()?,
        })
    }

    pub fn append(&mut self, text: &str) -> Result<()> {
        self.file.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Rewind and read the whole log.
    pub fn read_to_string(&mut self) -> Result<String> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut contents = String::new();
        self.file.read_to_string(&mut contents)?;
        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_log_appends_in_order_across_clones() {
        let log = SharedLog::new().unwrap();
        let clone = log.clone();
        log.append("first\n").unwrap();
        clone.append("second\n").unwrap();
        assert_eq!(log.read_to_string().unwrap(), "first\nsecond\n");
    }

    #[test]
    fn shared_log_append_after_read_keeps_earlier_entries() {
        let log = SharedLog::new().unwrap();
        log.append("a").unwrap();
        assert_eq!(log.read_to_string().unwrap(), "a");
        log.append("b").unwrap();
        assert_eq!(log.read_to_string().unwrap(), "ab");
    }

    #[test]
    fn command_log_round_trips() {
        let mut log = CommandLog::new().unwrap();
        log.append("hello").unwrap();
        assert_eq!(log.read_to_string().unwrap(), "hello");
    }
}
