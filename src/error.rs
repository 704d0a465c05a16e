use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("upload exceeds max_input_bytes ({size} > {max})")]
    TooLarge { size: u64, max: u64 },
    #[error("text file is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
    #[error("text extraction failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation service error: {0}")]
    Service(String),
    #[error("chunk {index} of {total} failed: {source}")]
    Chunk {
        index: usize,
        total: usize,
        #[source]
        source: Box<TranslationError>,
    },
    #[error("translation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("font registration failed for {font}: {message}")]
    Font { font: String, message: String },
    #[error("{format} writer failed: {message}")]
    Writer { format: String, message: String },
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("speech synthesis does not support language: {0}")]
    UnsupportedLanguage(String),
    #[error("speech synthesis failed: {0}")]
    Failed(String),
}

/// Failure of one user-initiated action, caught at the session boundary.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error("nothing has been translated yet")]
    NoTranslation,
}

impl ActionError {
    /// Message shown to the user; each failure kind reads differently.
    pub fn user_message(&self) -> String {
        match self {
            ActionError::Extraction(e) => format!("File processing failed: {e}"),
            ActionError::Translation(e) => format!("Translation failed: {e}"),
            ActionError::Render(e) => format!("Document generation failed: {e}"),
            ActionError::Synthesis(SynthesisError::UnsupportedLanguage(lang)) => {
                format!("Audio is not available for {lang}")
            }
            ActionError::Synthesis(e) => format!("Audio generation failed: {e}"),
            ActionError::NoTranslation => "Translate a document first".to_string(),
        }
    }
}
