//! Service implementations
//!
//! File I/O for the assessment pipeline: loading the survey dataset and
//! persisting run results.

pub mod dataset;
pub mod result_writer;

#[cfg(test)]
pub mod tests;

pub use dataset::CsvDatasetLoader;
pub use result_writer::{MockResultWriter, RealResultWriter, ResultWriter};
