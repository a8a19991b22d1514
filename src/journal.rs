//! JSON-lines persistence of observations.
//!
//! [`JournalLogger`] is an [`Observer`] that appends one line per new
//! observation; [`load_logs`] reads such files back into a
//! [`ParameterSpace`]. Each line looks like:
//!
//! ```text
//! {"target":-3.5,"params":{"x":2.5,"y":0.0},"datetime":{"datetime":"2024-05-01 12:00:00","elapsed":0.0,"delta":0.0}}
//! ```
//!
//! Several processes may share one file: writes take an exclusive file
//! lock, reads a shared one.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::engine::BayesianOptimization;
use crate::error::{Error, Result};
use crate::observer::{Event, Observer};
use crate::space::ParameterSpace;
use crate::types::{Candidate, Params};

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    target: f64,
    params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datetime: Option<Timestamp>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Timestamp {
    datetime: String,
    /// Seconds since the logger saw its first event.
    elapsed: f64,
    /// Seconds since the previous record.
    delta: f64,
}

fn storage_error(e: impl core::fmt::Display) -> Error {
    Error::Storage(e.to_string())
}

/// Observer that appends every new observation to a JSONL file.
///
/// Write failures are logged and otherwise ignored so that a full disk
/// never aborts an optimization run.
///
/// # Examples
///
/// ```no_run
/// use bayes_opt::{BayesianOptimization, JournalLogger, Params};
///
/// let objective = |p: &Params| Ok::<_, String>(-p["x"].powi(2));
/// let mut optimizer = BayesianOptimization::new(objective, [("x", (-1.0, 1.0))]).unwrap();
/// optimizer.subscribe_all(JournalLogger::create("runs.jsonl").unwrap());
/// optimizer.maximize(3, 5).unwrap();
/// ```
#[derive(Debug)]
pub struct JournalLogger {
    path: PathBuf,
    start: Option<Instant>,
    previous: Option<Instant>,
}

impl JournalLogger {
    /// Log to `path`, appending to whatever it already holds.
    ///
    /// The file is created on the first write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            start: None,
            previous: None,
        }
    }

    /// Log to `path`, truncating it first.
    ///
    /// # Errors
    ///
    /// [`Error::Storage`] if the file cannot be created.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        File::create(path.as_ref()).map_err(storage_error)?;
        Ok(Self::new(path))
    }

    /// The file being written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp(&mut self) -> Timestamp {
        let now = Instant::now();
        let start = *self.start.get_or_insert(now);
        let previous = self.previous.replace(now).unwrap_or(now);
        Timestamp {
            datetime: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            elapsed: round_centis(now.duration_since(start).as_secs_f64()),
            delta: round_centis(now.duration_since(previous).as_secs_f64()),
        }
    }

    fn append(&self, record: &Record) -> Result<()> {
        let line = serde_json::to_string(record).map_err(storage_error)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(storage_error)?;
        file.lock_exclusive().map_err(storage_error)?;
        let written = writeln!(file, "{line}").and_then(|()| file.flush());
        file.unlock().map_err(storage_error)?;
        written.map_err(storage_error)
    }
}

impl<F> Observer<F> for JournalLogger {
    fn update(&mut self, event: Event, optimizer: &BayesianOptimization<F>) {
        match event {
            Event::OptimizationStart => {
                self.start.get_or_insert_with(Instant::now);
            }
            Event::OptimizationStep => {
                let Some(latest) = optimizer.observations().last() else {
                    return;
                };
                let record = Record {
                    target: latest.target,
                    params: optimizer
                        .space()
                        .keys()
                        .iter()
                        .cloned()
                        .zip(latest.point.iter().copied())
                        .collect(),
                    datetime: Some(self.timestamp()),
                };
                if let Err(_error) = self.append(&record) {
                    trace_warn!(path = %self.path.display(), error = %_error, "failed to write journal record");
                }
            }
            Event::OptimizationEnd => {}
        }
    }
}

fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}

/// Register every record of the given JSONL files in `space`.
///
/// Files are read in order; points already present are skipped as usual.
/// All files are parsed and validated before anything is registered, so on
/// error `space` is unchanged. Returns the number of records read.
///
/// # Errors
///
/// - [`Error::Storage`] if a file cannot be read or a line is not a valid
///   record.
/// - [`Error::UnknownParameter`] if a record's names differ from the
///   space's.
pub fn load_logs<I, P>(space: &mut ParameterSpace, paths: I) -> Result<usize>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut pending = Vec::new();
    for path in paths {
        for record in read_records(path.as_ref())? {
            let point = space.to_point(Candidate::Params(record.params))?;
            pending.push((point, record.target));
        }
    }

    let n = pending.len();
    for (point, target) in pending {
        space.register(point, target)?;
    }
    trace_info!(records = n, observations = space.len(), "journal loaded");
    Ok(n)
}

fn read_records(path: &Path) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(storage_error)?;
    file.lock_shared().map_err(storage_error)?;

    let mut records: Vec<Record> = Vec::new();
    let parsed = BufReader::new(&file).lines().try_for_each(|line| {
        let line = line.map_err(storage_error)?;
        let line = line.trim();
        if !line.is_empty() {
            records.push(serde_json::from_str(line).map_err(storage_error)?);
        }
        Ok::<(), Error>(())
    });
    file.unlock().map_err(storage_error)?;
    parsed.map(|()| records)
}
