//! Submission CSV writer.

use crate::error::{Error, Result};
use crate::output::{OutputWriter, Prediction};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `image_id,identity` rows.
pub struct CsvWriter {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl CsvWriter {
    /// Create a new CSV writer, truncating any existing file.
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| Error::SubmissionWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
        })
    }

    fn write_error(&self, source: std::io::Error) -> Error {
        Error::SubmissionWrite {
            path: self.path.clone(),
            source,
        }
    }
}

impl OutputWriter for CsvWriter {
    fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "image_id,identity").map_err(|e| self.write_error(e))
    }

    fn write_prediction(&mut self, prediction: &Prediction) -> Result<()> {
        writeln!(
            self.writer,
            "{},{}",
            escape_csv(&prediction.image_id),
            escape_csv(&prediction.identity),
        )
        .map_err(|e| self.write_error(e))
    }

    fn finalize(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| self.write_error(e))
    }
}

/// Write a complete submission file.
pub fn write_submission(path: &Path, predictions: &[Prediction]) -> Result<()> {
    let mut writer = CsvWriter::new(path)?;
    writer.write_header()?;
    for prediction in predictions {
        writer.write_prediction(prediction)?;
    }
    writer.finalize()
}

/// Escape a value for CSV output.
fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    fn prediction(image_id: &str, identity: &str) -> Prediction {
        Prediction {
            image_id: image_id.to_string(),
            identity: identity.to_string(),
            score: 0.5,
            species: "LynxID2025".to_string(),
        }
    }

    #[test]
    fn test_csv_writer_basic() {
        let file = NamedTempFile::new().unwrap();
        let mut writer = CsvWriter::new(file.path()).unwrap();

        writer.write_header().unwrap();
        writer
            .write_prediction(&prediction("q1", "LynxID2025_lynx_37"))
            .unwrap();
        writer
            .write_prediction(&prediction("q2", "new_individual"))
            .unwrap();
        writer.finalize().unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(
            contents,
            "image_id,identity\nq1,LynxID2025_lynx_37\nq2,new_individual\n"
        );
    }

    #[test]
    fn test_write_submission_escapes_values() {
        let file = NamedTempFile::new().unwrap();
        write_submission(file.path(), &[prediction("q,1", "say \"hi\"")]).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(contents, "image_id,identity\n\"q,1\",\"say \"\"hi\"\"\"\n");
    }

    #[test]
    fn test_write_submission_empty() {
        let file = NamedTempFile::new().unwrap();
        write_submission(file.path(), &[]).unwrap();
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "image_id,identity\n"
        );
    }

    #[test]
    fn test_unwritable_path_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            CsvWriter::new(&path),
            Err(Error::SubmissionWrite { .. })
        ));
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }
}
