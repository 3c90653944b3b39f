use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions offered by the file picker. Advisory only: selection never rejects a file.
pub const ACCEPTED_EXTENSIONS: [&str; 6] = ["edf", "csv", "txt", "mat", "json", "xdf"];

/// Multipart field name the prediction service expects the recording under.
pub const UPLOAD_FIELD_NAME: &str = "eeg_file";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// File chosen by the user. Only metadata is held; contents are never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    /// MIME type as reported by the picker; empty or absent when unknown.
    pub mime_type: Option<String>,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, mime_type: Option<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            mime_type,
            size_bytes,
            path: None,
        }
    }

    /// Describe an on-disk file from its metadata.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("reading metadata for {}", path.display()))?;
        if !metadata.is_file() {
            bail!("{} is not a regular file", path.display());
        }
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = extension_of(&name)
            .and_then(|ext| mime_for_extension(&ext))
            .map(str::to_string);
        Ok(Self {
            name,
            mime_type,
            size_bytes: metadata.len(),
            path: Some(path.to_path_buf()),
        })
    }

    /// The MIME type, treating an empty string as unknown.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref().filter(|mime| !mime.trim().is_empty())
    }

    pub fn has_accepted_extension(&self) -> bool {
        has_accepted_extension(&self.name)
    }
}

/// Type a browser would report for the extension. EEG formats have none registered.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "csv" => Some("text/csv"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        _ => None,
    }
}

pub fn has_accepted_extension(name: &str) -> bool {
    extension_of(name)
        .map(|ext| ACCEPTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Single-part multipart payload describing one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadForm {
    field_name: &'static str,
    file: SelectedFile,
}

impl UploadForm {
    pub fn new(file: SelectedFile) -> Self {
        Self {
            field_name: UPLOAD_FIELD_NAME,
            file,
        }
    }

    pub fn field_name(&self) -> &str {
        self.field_name
    }

    pub fn file(&self) -> &SelectedFile {
        &self.file
    }

    pub fn content_type(&self) -> &str {
        self.file.mime_type().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn from_path_reads_size_and_infers_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.csv");
        std::fs::write(&path, "t,fp1\n0,1.5\n").unwrap();
        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "session.csv");
        assert_eq!(file.size_bytes, 12);
        assert_eq!(file.mime_type(), Some("text/csv"));
        assert_eq!(file.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn edf_has_no_registered_type() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("patient_042.EDF");
        std::fs::write(&path, [0u8; 256]).unwrap();
        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.mime_type(), None);
        assert!(file.has_accepted_extension());
    }

    #[test]
    fn from_path_rejects_directories() {
        let dir = tempdir().unwrap();
        assert!(SelectedFile::from_path(dir.path()).is_err());
    }

    #[test]
    fn empty_mime_counts_as_unknown() {
        let file = SelectedFile::new("a.edf", Some(String::new()), 1);
        assert_eq!(file.mime_type(), None);
    }

    #[test]
    fn accepted_extensions_are_case_insensitive() {
        assert!(has_accepted_extension("run-01.XDF"));
        assert!(has_accepted_extension("notes.txt"));
        assert!(!has_accepted_extension("scan.dcm"));
        assert!(!has_accepted_extension("README"));
    }

    #[test]
    fn form_uses_fixed_field_name() {
        let form = UploadForm::new(SelectedFile::new("rec.edf", None, 10));
        assert_eq!(form.field_name(), "eeg_file");
        assert_eq!(form.content_type(), "application/octet-stream");
        assert_eq!(form.file().name, "rec.edf");
    }
}
