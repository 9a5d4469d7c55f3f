//! Text persistence for the transposition table.
//!
//! One record per line: `<hash-hex> <node-type> <depth> <score> <move|->`.
//! During a run every accepted store is appended by a background writer;
//! on restart the file is loaded (later lines win) and may be rewritten
//! compactly with [`TranspositionTable::save_to`].

use std::collections::VecDeque;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, info};
use parking_lot::{Condvar, Mutex};
use thiserror::Error;

use super::{BoundType, PackedMove, TTEntry, TranspositionTable};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("transposition file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("malformed record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("transposition writer thread panicked")]
    WriterPanicked,
}

/// One persisted table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    pub hash: u64,
    pub entry: TTEntry,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:016x} {} {} {} ",
            self.hash, self.entry.bound_type, self.entry.depth, self.entry.score
        )?;
        match self.entry.best_move {
            Some(mv) => write!(f, "{mv}"),
            None => f.write_str("-"),
        }
    }
}

impl FromStr for Record {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let [hash, bound, depth, score, mv] = fields.as_slice() else {
            return Err(format!("expected 5 fields, found {}", fields.len()));
        };
        let hash = u64::from_str_radix(hash, 16).map_err(|e| format!("hash: {e}"))?;
        let bound_type: BoundType = bound.parse()?;
        let depth: i32 = depth.parse().map_err(|e| format!("depth: {e}"))?;
        let score: i32 = score.parse().map_err(|e| format!("score: {e}"))?;
        let best_move = match *mv {
            "-" => None,
            text => Some(text.parse::<PackedMove>()?),
        };
        Ok(Record {
            hash,
            entry: TTEntry {
                depth,
                score,
                bound_type,
                best_move,
            },
        })
    }
}

#[derive(Default)]
struct Queue {
    pending: VecDeque<Record>,
    closed: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    ready: Condvar,
}

/// Background appender for table records.
///
/// `push` never blocks on I/O; the writer thread drains the queue whenever
/// it is signalled. [`RecordWriter::finish`] closes the queue, waits for the
/// drain and returns the number of records written.
pub struct RecordWriter {
    shared: Arc<Shared>,
    handle: JoinHandle<io::Result<usize>>,
}

impl RecordWriter {
    /// Open `path` for appending (creating it) and start the writer thread.
    ///
    /// # Errors
    /// Fails if the file cannot be opened or the thread cannot be spawned.
    pub fn spawn(path: &Path) -> Result<Self, PersistError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue::default()),
            ready: Condvar::new(),
        });

        let worker = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name("tt-writer".to_string())
            .spawn(move || drain(&worker, BufWriter::new(file)))?;
        debug!("transposition writer appending to {}", path.display());

        Ok(RecordWriter { shared, handle })
    }

    pub fn push(&self, record: Record) {
        let mut queue = self.shared.queue.lock();
        if queue.closed {
            return;
        }
        queue.pending.push_back(record);
        self.shared.ready.notify_one();
    }

    /// Close the queue, flush everything pending and join the thread.
    ///
    /// # Errors
    /// Reports the writer's I/O failure or a panic in the thread.
    pub fn finish(self) -> Result<usize, PersistError> {
        {
            let mut queue = self.shared.queue.lock();
            queue.closed = true;
            self.shared.ready.notify_one();
        }
        let written = self
            .handle
            .join()
            .map_err(|_| PersistError::WriterPanicked)??;
        info!("transposition writer flushed {written} records");
        Ok(written)
    }
}

fn drain(shared: &Shared, mut out: BufWriter<File>) -> io::Result<usize> {
    let mut written = 0;
    loop {
        let (batch, closed) = {
            let mut queue = shared.queue.lock();
            while queue.pending.is_empty() && !queue.closed {
                shared.ready.wait(&mut queue);
            }
            (std::mem::take(&mut queue.pending), queue.closed)
        };

        for record in &batch {
            writeln!(out, "{record}")?;
        }
        written += batch.len();
        out.flush()?;

        if closed {
            return Ok(written);
        }
    }
}

impl TranspositionTable {
    /// Load records from `path`; later lines for the same key win.
    ///
    /// Loading ignores the replacement rules and the frozen flag but
    /// respects the capacity. Returns the number of records read.
    ///
    /// # Errors
    /// I/O failures and malformed lines (with their 1-based line number).
    pub fn load_from(&mut self, path: &Path) -> Result<usize, PersistError> {
        let reader = BufReader::new(File::open(path)?);
        let mut read = 0;
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: Record = line.parse().map_err(|reason| PersistError::Malformed {
                line: idx + 1,
                reason,
            })?;
            self.insert_raw(record.hash, record.entry);
            read += 1;
        }
        debug!("loaded {read} transposition records from {}", path.display());
        Ok(read)
    }

    /// Rewrite `path` with one line per entry, sorted by key.
    ///
    /// # Errors
    /// I/O failures.
    pub fn save_to(&self, path: &Path) -> Result<usize, PersistError> {
        let mut records: Vec<Record> = self
            .iter()
            .map(|(hash, entry)| Record { hash, entry: *entry })
            .collect();
        records.sort_by_key(|r| r.hash);

        let mut out = BufWriter::new(File::create(path)?);
        for record in &records {
            writeln!(out, "{record}")?;
        }
        out.flush()?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_line_format() {
        let record = Record {
            hash: 0xabc,
            entry: TTEntry {
                depth: 4,
                score: -35,
                bound_type: BoundType::UpperBound,
                best_move: Some("g1f3".parse().expect("valid")),
            },
        };
        let line = record.to_string();
        assert_eq!(line, "0000000000000abc upper 4 -35 g1f3");
        assert_eq!(line.parse::<Record>(), Ok(record));
    }

    #[test]
    fn record_without_move() {
        let record: Record = "ff exact 2 10 -".parse().expect("valid");
        assert_eq!(record.hash, 0xff);
        assert_eq!(record.entry.best_move, None);
    }

    #[test]
    fn malformed_records_rejected() {
        assert!("ff exact 2 10".parse::<Record>().is_err());
        assert!("zz exact 2 10 -".parse::<Record>().is_err());
        assert!("ff pv 2 10 -".parse::<Record>().is_err());
    }
}
