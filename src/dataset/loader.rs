// src/dataset/loader.rs

//! CSV loading: comma-delimited, `"`-quoted, every record the same width.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::errors::{CsvwatchError, Result};
use crate::fs::FileSystem;

/// Lazily parse records from any reader.
///
/// The first line is *not* treated specially; callers decide what the header
/// is. Ragged rows surface as `csv::ErrorKind::UnequalLengths`.
pub fn records<R: Read>(reader: R) -> impl Iterator<Item = csv::Result<Vec<String>>> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(reader)
        .into_records()
        .map(|res| res.map(|record| record.iter().map(str::to_string).collect()))
}

/// Read a whole source file into memory.
pub fn read_source(fs: &dyn FileSystem, path: &Path) -> Result<Vec<u8>> {
    let read_err = |source| CsvwatchError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs.open_read(path).map_err(read_err)?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf).map_err(read_err)?;
    Ok(buf)
}

/// Open `path` and materialize every record.
pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Vec<Vec<String>>> {
    let file = fs.open_read(path).map_err(|source| CsvwatchError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    records(file)
        .collect::<csv::Result<Vec<_>>>()
        .map_err(|source| parse_error(path, source))
}

/// Classify a `csv::Error` raised while parsing `path`.
pub fn parse_error(path: &Path, source: csv::Error) -> CsvwatchError {
    // csv wraps read failures in its own error; keep the read/parse split.
    if let csv::ErrorKind::Io(io) = source.kind() {
        return CsvwatchError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(io.kind(), io.to_string()),
        };
    }
    CsvwatchError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;

    #[test]
    fn parses_quoted_fields() {
        let input = "name,quote\nbob,\"hello, \"\"world\"\"\"\n";
        let rows: Vec<Vec<String>> = records(input.as_bytes()).collect::<csv::Result<_>>().unwrap();
        assert_eq!(rows[1], vec!["bob".to_string(), "hello, \"world\"".to_string()]);
    }

    #[test]
    fn records_are_lazy() {
        // The broken second row is never reached when only the first is taken.
        let input = "a,b\n1\n";
        let mut iter = records(input.as_bytes());
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_err());
    }

    #[test]
    fn load_reports_ragged_rows_as_parse_error() {
        let fs = MockFileSystem::new();
        fs.add_file("data/bad.csv", "a,b\n1,2,3\n");

        let err = load(&fs, Path::new("data/bad.csv")).unwrap_err();
        assert!(matches!(err, CsvwatchError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn load_reports_missing_file_as_read_error() {
        let fs = MockFileSystem::new();
        let err = load(&fs, Path::new("data/none.csv")).unwrap_err();
        assert!(matches!(err, CsvwatchError::Read { .. }), "got {err:?}");
    }

    #[test]
    fn invalid_utf8_is_a_parse_error() {
        let fs = MockFileSystem::new();
        fs.add_file("data/bin.csv", vec![b'a', b'\n', 0xff, 0xfe, b'\n']);
        let err = load(&fs, Path::new("data/bin.csv")).unwrap_err();
        assert!(matches!(err, CsvwatchError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn read_source_returns_bytes() {
        let fs = MockFileSystem::new();
        fs.add_file("data/a.csv", "x\n1\n");
        assert_eq!(read_source(&fs, Path::new("data/a.csv")).unwrap(), b"x\n1\n");
    }
}
