use crate::{config::Config, engine::Extractor, error::ExtractionError, postprocess, util::file_stem};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Word,
    Pdf,
}

impl DocumentKind {
    /// Declared type of an upload, taken from its extension.
    pub fn from_file_name(name: &str) -> Result<Self, ExtractionError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_lowercase())
            .ok_or_else(|| ExtractionError::UnsupportedFormat(name.to_string()))?;

        match ext.as_str() {
            "txt" => Ok(DocumentKind::Text),
            "docx" => Ok(DocumentKind::Word),
            "pdf" => Ok(DocumentKind::Pdf),
            _ => Err(ExtractionError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Text => "txt",
            DocumentKind::Word => "docx",
            DocumentKind::Pdf => "pdf",
        }
    }
}

/// One uploaded file, held in memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { file_name, bytes })
    }

    /// File name without its last extension.
    pub fn basename(&self) -> &str {
        file_stem(&self.file_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: u64,
    pub text: String,
}

pub fn extract_upload<X: Extractor + ?Sized>(
    cfg: &Config,
    extractor: &X,
    upload: &Upload,
) -> Result<ExtractedDocument, ExtractionError> {
    let kind = DocumentKind::from_file_name(&upload.file_name)?;

    let size = upload.bytes.len() as u64;
    if size > cfg.limits.max_input_bytes {
        return Err(ExtractionError::TooLarge {
            size,
            max: cfg.limits.max_input_bytes,
        });
    }

    let raw = match kind {
        DocumentKind::Text => String::from_utf8(upload.bytes.clone())?,
        DocumentKind::Word | DocumentKind::Pdf => extractor.extract_text(&upload.bytes, kind)?,
    };

    let text = postprocess::normalize_text(cfg, &raw)
        .map_err(|e| ExtractionError::Failed(format!("{e:#}")))?;

    debug!(
        "extracted file={} kind={} bytes={} chars={}",
        upload.file_name,
        kind.as_str(),
        size,
        text.chars().count()
    );

    Ok(ExtractedDocument {
        file_name: upload.file_name.clone(),
        kind,
        bytes: size,
        text,
    })
}
