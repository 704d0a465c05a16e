use crate::{
    config::Config,
    engine::{DocumentWriter, Extractor, Synthesizer, Translator},
    error::ActionError,
    extract::{extract_upload, ExtractedDocument, Upload},
    language::Language,
    pipeline::{Pipeline, Progress, TranslationOutput},
    render::{self, Artifact, Format},
    util::file_stem,
};
use tracing::{info, warn};

/// State of one user session: the latest completed translation.
///
/// Only a successful translation writes the slot, and it replaces it whole.
/// Downloads and audio read it. Writers take `&mut self`, so a session shared
/// across threads has to sit behind a lock.
#[derive(Debug, Default)]
pub struct Session {
    translated_text: String,
    language: Option<Language>,
    source_basename: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translated_text(&self) -> &str {
        &self.translated_text
    }

    pub fn language(&self) -> Option<Language> {
        self.language
    }

    pub fn has_translation(&self) -> bool {
        !self.translated_text.is_empty()
    }

    /// Extract the text of an upload. The session is not touched.
    pub fn load_document<X: Extractor + ?Sized>(
        &self,
        cfg: &Config,
        extractor: &X,
        upload: &Upload,
    ) -> Result<ExtractedDocument, ActionError> {
        extract_upload(cfg, extractor, upload).map_err(|e| {
            warn!("extraction failed for {}: {e}", upload.file_name);
            ActionError::from(e)
        })
    }

    pub fn translate<T: Translator + ?Sized>(
        &mut self,
        cfg: &Config,
        translator: &T,
        document: &ExtractedDocument,
        language: Language,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<TranslationOutput, ActionError> {
        let pipeline = Pipeline::new(cfg, translator);
        let out = pipeline
            .translate_document(&document.text, language, on_progress)
            .map_err(|e| {
                warn!("translation of {} failed: {e}", document.file_name);
                ActionError::from(e)
            })?;

        self.translated_text = out.text.clone();
        self.language = Some(language);
        self.source_basename = Some(file_stem(&document.file_name).to_string());
        info!(
            "session updated language={} chars={}",
            language.code(),
            self.translated_text.chars().count()
        );
        Ok(out)
    }

    /// Extract then translate in one action.
    pub fn translate_upload<X: Extractor + ?Sized, T: Translator + ?Sized>(
        &mut self,
        cfg: &Config,
        extractor: &X,
        translator: &T,
        upload: &Upload,
        language: Language,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<TranslationOutput, ActionError> {
        let document = self.load_document(cfg, extractor, upload)?;
        self.translate(cfg, translator, &document, language, on_progress)
    }

    pub fn download<W: DocumentWriter + ?Sized>(
        &self,
        cfg: &Config,
        writer: &W,
        format: Format,
    ) -> Result<Artifact, ActionError> {
        let language = self.current_language()?;
        Ok(render::render(cfg, writer, &self.translated_text, language, format)?)
    }

    pub fn generate_audio<S: Synthesizer + ?Sized>(
        &self,
        cfg: &Config,
        synthesizer: &S,
    ) -> Result<Artifact, ActionError> {
        let language = self.current_language()?;
        let basename = self.source_basename.as_deref().unwrap_or("translated");
        Ok(render::synthesize_audio(
            cfg,
            synthesizer,
            &self.translated_text,
            language,
            basename,
        )?)
    }

    fn current_language(&self) -> Result<Language, ActionError> {
        match self.language {
            Some(language) if self.has_translation() => Ok(language),
            _ => Err(ActionError::NoTranslation),
        }
    }
}
