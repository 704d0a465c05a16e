pub mod python;
pub mod types;

use crate::error::{ExtractionError, RenderError, SynthesisError, TranslationError};
use crate::extract::DocumentKind;
use crate::language::Language;

pub use types::{DocDiag, FontHint, SpeechSpeed};

/// Turns the bytes of a word-processor or PDF upload into plain text.
pub trait Extractor {
    fn extract_text(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError>;
}

/// Translates one span of text. `source` is a language code or "auto".
pub trait Translator {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: Language,
    ) -> Result<String, TranslationError>;
}

pub trait Synthesizer {
    /// Returns the MP3 stream for `text` spoken in `language`.
    fn synthesize_speech(
        &self,
        text: &str,
        language: Language,
        speed: SpeechSpeed,
    ) -> Result<Vec<u8>, SynthesisError>;
}

/// Serializes lines of text into document bytes; each line becomes a paragraph.
pub trait DocumentWriter {
    fn write_word_document(&self, lines: &[&str], font: &FontHint) -> Result<Vec<u8>, RenderError>;
    fn write_page_document(&self, lines: &[&str], font: &FontHint) -> Result<Vec<u8>, RenderError>;
}
