//! Report generation for job results
//!
//! - **JSON**: every result in full, including the computed samples
//! - **CSV**: one summary row per job (kind, status, peak, energy, timing)
//!
//! # Usage
//!
//! ```ignore
//! use fourierlab::report;
//!
//! // Picks the format from the extension
//! report::generate("report.json", &results)?;  // JSON
//! report::generate("report.csv", &results)?;   // CSV
//! ```

pub mod csv;
pub mod json;

use crate::job::{JobResult, Status};
use std::io::{self, BufWriter};
use std::path::Path;

/// Write `results` to `path`, `.json` as JSON and anything else as CSV.
pub fn generate<P: AsRef<Path>>(path: P, results: &[JobResult]) -> io::Result<()> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut file = BufWriter::new(std::fs::File::create(path)?);

    match ext.as_str() {
        "json" => json::write(&mut file, results),
        _ => csv::write(&mut file, results),
    }
}

/// Counts for a batch of results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub ok: usize,
    pub error: usize,
    pub series: usize,
    pub transform: usize,
    pub convolution: usize,
}

impl Summary {
    pub fn from_results(results: &[JobResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        for r in results {
            match r.status {
                Status::Ok => summary.ok += 1,
                Status::Error => summary.error += 1,
            }
            match r.kind.as_str() {
                "series" => summary.series += 1,
                "transform" => summary.transform += 1,
                "convolution" => summary.convolution += 1,
                _ => {}
            }
        }

        summary
    }
}
