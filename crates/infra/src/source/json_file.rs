use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;

use storepulse_catalog::RawProduct;

use super::{RecordSource, SourceBatch, SourceConnection, SourceError};

/// Product export on disk.
///
/// Two layouts are accepted:
/// - a JSON array of documents
/// - newline-delimited documents (one per line, blank lines ignored)
///
/// The layout is picked from the first non-whitespace byte.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for JsonFileSource {
    fn connect(&self) -> Result<Box<dyn SourceConnection + '_>, SourceError> {
        let file = File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SourceError::Unavailable(format!("{} does not exist", self.path.display()))
            } else {
                SourceError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;
        tracing::debug!(path = %self.path.display(), "opened product export");

        Ok(Box::new(FileConnection {
            path: &self.path,
            reader: BufReader::new(file),
        }))
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

struct FileConnection<'a> {
    path: &'a Path,
    reader: BufReader<File>,
}

impl FileConnection<'_> {
    fn io_error(&self, source: std::io::Error) -> SourceError {
        SourceError::Io {
            path: self.path.to_path_buf(),
            source,
        }
    }
}

impl SourceConnection for FileConnection<'_> {
    fn fetch_products(&mut self) -> Result<SourceBatch, SourceError> {
        let mut content = String::new();
        self.reader
            .read_to_string(&mut content)
            .map_err(|e| self.io_error(e))?;

        if content.trim_start().starts_with('[') {
            parse_array(&content)
        } else {
            parse_lines(content.as_bytes()).map_err(|e| self.io_error(e))
        }
    }
}

impl Drop for FileConnection<'_> {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "closed product export");
    }
}

fn parse_array(content: &str) -> Result<SourceBatch, SourceError> {
    let values: Vec<Value> = serde_json::from_str(content)
        .map_err(|e| SourceError::Malformed(format!("invalid JSON array: {e}")))?;

    let mut batch = SourceBatch::default();
    for (idx, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawProduct>(value) {
            Ok(doc) => batch.documents.push(doc),
            Err(e) => {
                tracing::warn!(index = idx, error = %e, "skipping undecodable document");
                batch.unparseable += 1;
            }
        }
    }
    Ok(batch)
}

fn parse_lines(reader: impl BufRead) -> Result<SourceBatch, std::io::Error> {
    let mut batch = SourceBatch::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawProduct>(line) {
            Ok(doc) => batch.documents.push(doc),
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "skipping undecodable line");
                batch.unparseable += 1;
            }
        }
    }
    Ok(batch)
}
