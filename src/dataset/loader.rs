//! Metadata CSV loading.
//!
//! The metadata file lists every image with columns
//! `image_id,identity,path,split,dataset` and an optional `orientation`.
//! Uses the `csv` crate for parsing.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::dataset::{Dataset, ImageRecord, Orientation, SpeciesTag, Split};
use crate::error::{Error, Result};

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct MetadataRow {
    image_id: String,
    #[serde(default)]
    identity: Option<String>,
    #[serde(default)]
    path: String,
    split: String,
    dataset: String,
    #[serde(default)]
    orientation: Option<String>,
}

/// Load all records from a metadata CSV.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read or a row cannot be parsed
/// - A `split` or `orientation` value is not recognised
/// - An `image_id` appears more than once
pub fn load_metadata(path: &Path) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::MetadataRead {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut records = Vec::new();
    let mut seen = HashSet::new();

    for (line_num, result) in reader.deserialize::<MetadataRow>().enumerate() {
        let row = result.map_err(|e| Error::MetadataRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let invalid = |message: String| Error::InvalidMetadata {
            path: path.to_path_buf(),
            message: format!("line {}: {message}", line_num + 2),
        };

        let split: Split = row.split.parse().map_err(invalid)?;
        let orientation: Orientation = row
            .orientation
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(invalid)?;

        if !seen.insert(row.image_id.clone()) {
            return Err(Error::DuplicateImageId {
                path: path.to_path_buf(),
                image_id: row.image_id,
            });
        }

        records.push(ImageRecord {
            image_id: row.image_id,
            identity: row.identity.filter(|s| !s.is_empty()),
            path: row.path,
            split,
            species: SpeciesTag::from_name(&row.dataset),
            orientation,
        });
    }

    debug!("Loaded {} metadata records from {}", records.len(), path.display());
    Ok(Dataset::new(records))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_metadata_basic() {
        let file = write_csv(
            "image_id,identity,path,split,dataset,orientation\n\
             1,LynxID2025_lynx_37,images/1,database,LynxID2025,\n\
             2,,images/2,query,SalamanderID2025,left\n",
        );

        let data = load_metadata(file.path()).unwrap();
        assert_eq!(data.len(), 2);

        let db = data.get(0).unwrap();
        assert_eq!(db.identity.as_deref(), Some("LynxID2025_lynx_37"));
        assert_eq!(db.split, Split::Database);
        assert_eq!(db.species, SpeciesTag::Lynx);
        assert_eq!(db.orientation, Orientation::Top);

        let query = data.get(1).unwrap();
        assert!(query.identity.is_none());
        assert_eq!(query.orientation, Orientation::Left);
    }

    #[test]
    fn test_load_metadata_without_orientation_column() {
        let file = write_csv(
            "image_id,identity,path,split,dataset\n\
             a,T1,images/a,database,SeaTurtleID2022\n",
        );

        let data = load_metadata(file.path()).unwrap();
        assert_eq!(data.get(0).unwrap().orientation, Orientation::Top);
    }

    #[test]
    fn test_load_metadata_unknown_split() {
        let file = write_csv(
            "image_id,identity,path,split,dataset\n\
             a,T1,images/a,train,SeaTurtleID2022\n",
        );

        let err = load_metadata(file.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidMetadata { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_metadata_duplicate_id() {
        let file = write_csv(
            "image_id,identity,path,split,dataset\n\
             a,T1,images/a,database,SeaTurtleID2022\n\
             a,,images/a,query,SeaTurtleID2022\n",
        );

        let err = load_metadata(file.path()).unwrap_err();
        assert!(matches!(err, Error::DuplicateImageId { ref image_id, .. } if image_id == "a"));
    }

    #[test]
    fn test_load_metadata_missing_file() {
        let result = load_metadata(Path::new("/nonexistent/metadata.csv"));
        assert!(matches!(result, Err(Error::MetadataRead { .. })));
    }
}
