//! Input documents: raw bytes plus a declared format.

use crate::error::AtsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The two handled upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Resolve a file extension (without the dot), case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An uploaded resume. Lives for one analysis only.
///
/// The byte buffer is only ever borrowed by the pipeline, so the same
/// document can be extracted and then highlighted without re-reading it.
#[derive(Clone)]
pub struct Document {
    pub name: String,
    pub format: DocumentFormat,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, format: DocumentFormat, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            format,
            bytes,
        }
    }

    /// Build a document from a file name and its bytes, taking the format
    /// from the name's extension.
    ///
    /// # Errors
    /// [`AtsError::UnsupportedFormat`] when the extension is not `pdf`/`docx`.
    pub fn from_named_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, AtsError> {
        let name = name.into();
        let extension = Path::new(&name)
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        let format = DocumentFormat::from_extension(&extension)
            .ok_or_else(|| AtsError::UnsupportedFormat {
                name: name.clone(),
                extension,
            })?;
        Ok(Self::new(name, format, bytes))
    }

    /// Read a document from disk. The extension is checked before any I/O.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AtsError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        // Validate the extension first so an unsupported file is never read.
        let probe = Self::from_named_bytes(name, Vec::new())?;

        let bytes = std::fs::read(path).map_err(|source| AtsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { bytes, ..probe })
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("format", &self.format)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}
