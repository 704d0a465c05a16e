#![allow(dead_code)]

use doc_translate::{
    engine::{DocumentWriter, Extractor, FontHint, SpeechSpeed, Synthesizer, Translator},
    error::{ExtractionError, RenderError, SynthesisError, TranslationError},
    extract::DocumentKind,
    language::Language,
};
use std::cell::RefCell;

/// Records every chunk it is asked to translate.
#[derive(Default)]
pub struct FakeTranslator {
    pub calls: RefCell<Vec<(String, String, Language)>>,
    /// 1-based call number that fails.
    pub fail_on: Option<usize>,
    /// Fixed answer; otherwise the input is echoed with a language tag.
    pub reply: Option<String>,
}

impl FakeTranslator {
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on: Some(call),
            ..Default::default()
        }
    }

    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Translator for FakeTranslator {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: Language,
    ) -> Result<String, TranslationError> {
        let mut calls = self.calls.borrow_mut();
        calls.push((text.to_string(), source.to_string(), target));
        if Some(calls.len()) == self.fail_on {
            return Err(TranslationError::Service("quota exceeded".into()));
        }
        Ok(match &self.reply {
            Some(r) => r.clone(),
            None => format!("<{}>{}", target.code(), text),
        })
    }
}

pub struct FakeExtractor {
    pub text: String,
    pub calls: RefCell<Vec<DocumentKind>>,
}

impl FakeExtractor {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl Extractor for FakeExtractor {
    fn extract_text(&self, _bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
        self.calls.borrow_mut().push(kind);
        Ok(self.text.clone())
    }
}

#[derive(Default)]
pub struct FakeWriter {
    pub fail_pdf_font: bool,
    pub fail_word: bool,
    pub seen: RefCell<Vec<(String, Vec<String>, FontHint)>>,
}

impl FakeWriter {
    fn record(&self, kind: &str, lines: &[&str], font: &FontHint) -> Vec<u8> {
        self.seen.borrow_mut().push((
            kind.to_string(),
            lines.iter().map(|l| l.to_string()).collect(),
            font.clone(),
        ));
        format!("{kind}|{}|{}", font.family, lines.join("\n")).into_bytes()
    }
}

impl DocumentWriter for FakeWriter {
    fn write_word_document(&self, lines: &[&str], font: &FontHint) -> Result<Vec<u8>, RenderError> {
        if self.fail_word {
            return Err(RenderError::Writer {
                format: "docx".into(),
                message: "disk full".into(),
            });
        }
        Ok(self.record("docx", lines, font))
    }

    fn write_page_document(&self, lines: &[&str], font: &FontHint) -> Result<Vec<u8>, RenderError> {
        if self.fail_pdf_font {
            return Err(RenderError::Font {
                font: font.family.clone(),
                message: "not installed".into(),
            });
        }
        Ok(self.record("pdf", lines, font))
    }
}

#[derive(Default)]
pub struct FakeSynthesizer {
    pub unsupported: Vec<Language>,
    pub fail: bool,
    pub seen: RefCell<Vec<(String, Language, SpeechSpeed)>>,
}

impl Synthesizer for FakeSynthesizer {
    fn synthesize_speech(
        &self,
        text: &str,
        language: Language,
        speed: SpeechSpeed,
    ) -> Result<Vec<u8>, SynthesisError> {
        self.seen
            .borrow_mut()
            .push((text.to_string(), language, speed));
        if self.unsupported.contains(&language) {
            return Err(SynthesisError::UnsupportedLanguage(language.name().into()));
        }
        if self.fail {
            return Err(SynthesisError::Failed("service unavailable".into()));
        }
        Ok(b"ID3-fake-mp3".to_vec())
    }
}
