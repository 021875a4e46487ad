//! Service-specific tests

#[cfg(test)]
mod dataset;
#[cfg(test)]
mod result_writer;

#[cfg(test)]
pub mod common {
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Write `content` to a temporary CSV file kept alive by the returned handle
    pub fn csv_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write temp csv");
        file
    }
}
