use crate::{extract::DocumentKind, language::Language};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub input: InputReport,
    pub language: Language,
    pub language_code: String,
    pub started: String,
    pub finished: String,
    pub chunk_reports: Vec<ChunkReport>,
    pub artifacts: Vec<ArtifactReport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputReport {
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: u64,
    pub chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkReport {
    pub chunk_index: u32,
    pub source_chars: usize,
    pub translated_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactReport {
    pub format: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: u64,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}
