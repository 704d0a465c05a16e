use crate::{
    config::Config,
    engine::{DocumentWriter, FontHint, SpeechSpeed, Synthesizer},
    error::{RenderError, SynthesisError},
    language::Language,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Document formats the translated text can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Txt,
    Docx,
    Pdf,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Txt, Format::Docx, Format::Pdf];

    pub fn extension(&self) -> &'static str {
        match self {
            Format::Txt => "txt",
            Format::Docx => "docx",
            Format::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Txt => "text/plain",
            Format::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Format::Pdf => "application/pdf",
        }
    }

    pub fn file_name(&self, language: Language) -> String {
        format!("translated_{}.{}", language.name(), self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "txt" | "text" => Ok(Format::Txt),
            "docx" | "word" => Ok(Format::Docx),
            "pdf" => Ok(Format::Pdf),
            other => Err(format!("unknown output format: {other} (expected txt, docx or pdf)")),
        }
    }
}

/// A generated download: bytes plus the metadata needed to offer it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

pub fn render_text(text: &str, language: Language) -> Artifact {
    Artifact {
        bytes: text.as_bytes().to_vec(),
        content_type: Format::Txt.content_type().to_string(),
        file_name: Format::Txt.file_name(language),
    }
}

pub fn render<W: DocumentWriter + ?Sized>(
    cfg: &Config,
    writer: &W,
    text: &str,
    language: Language,
    format: Format,
) -> Result<Artifact, RenderError> {
    let lines: Vec<&str> = text.split('\n').collect();
    let script = language.script();

    let bytes = match format {
        Format::Txt => return Ok(render_text(text, language)),
        Format::Docx => {
            let font = FontHint {
                family: cfg.fonts.word_font(script).to_string(),
                size_pt: cfg.fonts.size_pt,
            };
            writer.write_word_document(&lines, &font)?
        }
        Format::Pdf => {
            let font = FontHint {
                family: cfg.fonts.pdf_font(script).to_string(),
                size_pt: cfg.fonts.size_pt,
            };
            writer.write_page_document(&lines, &font)?
        }
    };

    info!(
        "rendered {} lines={} bytes={}",
        format.extension(),
        lines.len(),
        bytes.len()
    );

    Ok(Artifact {
        bytes,
        content_type: format.content_type().to_string(),
        file_name: format.file_name(language),
    })
}

pub fn synthesize_audio<S: Synthesizer + ?Sized>(
    cfg: &Config,
    synthesizer: &S,
    text: &str,
    language: Language,
    source_basename: &str,
) -> Result<Artifact, SynthesisError> {
    let speed = if cfg.speech.slow {
        SpeechSpeed::Slow
    } else {
        SpeechSpeed::Normal
    };

    let bytes = synthesizer.synthesize_speech(text, language, speed)?;
    if bytes.is_empty() {
        return Err(SynthesisError::Failed("synthesizer returned no audio".into()));
    }

    info!("synthesized {} audio bytes={}", language.code(), bytes.len());

    Ok(Artifact {
        bytes,
        content_type: AUDIO_CONTENT_TYPE.to_string(),
        file_name: format!("{}_{}.mp3", source_basename, language.name()),
    })
}
