//! File ingest and validation.
//!
//! This module is responsible for deciding whether a candidate file becomes the
//! active `UploadedFile`, and for decoding its bytes into text.
//!
//! Rules, checked in order (first failure wins):
//! 1. the name ends in `.csv` (any case) **or** the declared MIME type is CSV
//! 2. the size is at most `MAX_FILE_SIZE`
//!
//! Validation runs on metadata only, so an oversized file is rejected before
//! any of its bytes are read.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::{CandidateSource, FileCandidate, MAX_FILE_SIZE, UploadedFile};
use crate::error::IngestError;

/// Validate a candidate and decode it into a new `UploadedFile`.
pub fn ingest(candidate: &FileCandidate) -> Result<UploadedFile, IngestError> {
    validate_candidate(candidate)?;
    let content = read_content(candidate)?;
    let file = UploadedFile::new(candidate.name.clone(), candidate.size, content);
    info!(
        name = file.name(),
        size = file.size(),
        rows = file.row_count(),
        "file accepted"
    );
    Ok(file)
}

/// Build a candidate from a filesystem path and ingest it.
pub fn ingest_path(path: &Path, mime: Option<&str>) -> Result<UploadedFile, IngestError> {
    let candidate = candidate_from_path(path, mime)?;
    ingest(&candidate)
}

/// Check type and size, without touching the file contents.
pub fn validate_candidate(candidate: &FileCandidate) -> Result<(), IngestError> {
    if !has_csv_extension(&candidate.name) && !is_csv_mime(candidate.mime.as_deref()) {
        debug!(name = %candidate.name, mime = ?candidate.mime, "rejected: not a csv");
        return Err(IngestError::InvalidFileType {
            name: candidate.name.clone(),
        });
    }

    if candidate.size > MAX_FILE_SIZE {
        debug!(name = %candidate.name, size = candidate.size, "rejected: too large");
        return Err(IngestError::FileTooLarge {
            size: candidate.size,
            limit: MAX_FILE_SIZE,
        });
    }

    Ok(())
}

/// Describe a file on disk as an upload candidate.
///
/// The display name is the final path component, as a browser file handle
/// would report it.
pub fn candidate_from_path(path: &Path, mime: Option<&str>) -> Result<FileCandidate, IngestError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let meta = fs::metadata(path).map_err(|e| IngestError::Read {
        name: name.clone(),
        message: e.to_string(),
    })?;
    if meta.is_dir() {
        return Err(IngestError::Read {
            name,
            message: "expected a file, got a directory".to_string(),
        });
    }

    Ok(FileCandidate {
        name,
        size: meta.len(),
        mime: mime.map(str::to_string),
        source: CandidateSource::Path(path.to_path_buf()),
    })
}

/// Decode the candidate's bytes as UTF-8 text.
///
/// Invalid sequences are replaced rather than rejected, and a leading byte-order
/// mark is dropped (spreadsheet exports often carry one).
pub fn read_content(candidate: &FileCandidate) -> Result<String, IngestError> {
    let text = match &candidate.source {
        CandidateSource::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        CandidateSource::Path(path) => {
            let bytes = fs::read(path).map_err(|e| IngestError::Read {
                name: candidate.name.clone(),
                message: e.to_string(),
            })?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}

fn has_csv_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        == Some(true)
}

fn is_csv_mime(mime: Option<&str>) -> bool {
    let Some(mime) = mime else { return false };
    // Ignore parameters such as `; charset=utf-8`.
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    matches!(
        essence.as_str(),
        "text/csv" | "application/csv" | "text/x-csv" | "application/x-csv" | "text/comma-separated-values"
    )
}
