//! Batch outcome reporting.
//!
//! Mirrors what happened during generation: how many images each job asked
//! for, how many were written, and why the others were skipped.

use serde::Serialize;
use std::fmt;

use crate::scene::Polarity;

/// A generated image that could not be produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FailedImage {
    pub index: usize,
    pub message: String,
}

/// Outcome of one generation job.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JobReport {
    pub polarity: Polarity,
    pub requested: usize,
    pub succeeded: usize,
    /// Label rows written across all successful images.
    pub boxes: usize,
    pub failures: Vec<FailedImage>,
}

impl JobReport {
    pub fn new(polarity: Polarity, requested: usize) -> Self {
        Self {
            polarity,
            requested,
            succeeded: 0,
            boxes: 0,
            failures: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Outcome of a whole run.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Seed that reproduces this run.
    pub seed: u64,
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    pub fn requested(&self) -> usize {
        self.jobs.iter().map(|job| job.requested).sum()
    }

    pub fn succeeded(&self) -> usize {
        self.jobs.iter().map(|job| job.succeeded).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "  {}: {}/{} image(s), {} box(es)",
            self.polarity.as_str(),
            self.succeeded,
            self.requested,
            self.boxes
        )?;
        for failure in &self.failures {
            writeln!(f, "    - #{}: {}", failure.index, failure.message)?;
        }
        Ok(())
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Generated {}/{} image(s) (seed {})",
            self.succeeded(),
            self.requested(),
            self.seed
        )?;
        for job in &self.jobs {
            write!(f, "{job}")?;
        }
        Ok(())
    }
}
