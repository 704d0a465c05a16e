use crate::{
    chunk_plan::split_text,
    config::Config,
    engine::Translator,
    error::TranslationError,
    language::Language,
    report::ChunkReport,
};
use std::time::Instant;
use tracing::{debug, info};

/// Separator placed between translated chunks.
pub const CHUNK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.done as f64 / self.total as f64
    }
}

#[derive(Debug)]
pub struct TranslationOutput {
    pub text: String,
    pub chunk_reports: Vec<ChunkReport>,
}

/// Drives the translator over a document one chunk at a time, in order.
pub struct Pipeline<'a, T: Translator + ?Sized> {
    cfg: &'a Config,
    translator: &'a T,
}

impl<'a, T: Translator + ?Sized> Pipeline<'a, T> {
    pub fn new(cfg: &'a Config, translator: &'a T) -> Self {
        Self { cfg, translator }
    }

    pub fn translate_document(
        &self,
        text: &str,
        target: Language,
        on_progress: &mut dyn FnMut(Progress),
    ) -> Result<TranslationOutput, TranslationError> {
        let started = Instant::now();
        let chunks = split_text(text, self.cfg.chunking.max_chars);
        let total = chunks.len();

        if total == 0 {
            debug!("nothing to translate");
            return Ok(TranslationOutput {
                text: String::new(),
                chunk_reports: Vec::new(),
            });
        }

        info!(
            "translating {} chunk(s) max_chars={} target={}",
            total,
            self.cfg.chunking.max_chars,
            target.code()
        );

        // Results stay local until every chunk has succeeded.
        let mut translated = Vec::with_capacity(total);
        let mut chunk_reports = Vec::with_capacity(total);

        for (i, chunk) in chunks.iter().enumerate() {
            let limit = self.cfg.limits.job_timeout_seconds;
            if limit > 0 && started.elapsed().as_secs() > limit {
                return Err(TranslationError::Timeout { seconds: limit });
            }

            let out = self
                .translator
                .translate(chunk, &self.cfg.translation.source_lang, target)
                .map_err(|e| TranslationError::Chunk {
                    index: i + 1,
                    total,
                    source: Box::new(e),
                })?;

            info!(
                "chunk {}/{} chars={} translated_chars={}",
                i + 1,
                total,
                chunk.chars().count(),
                out.chars().count()
            );

            chunk_reports.push(ChunkReport {
                chunk_index: i as u32,
                source_chars: chunk.chars().count(),
                translated_chars: out.chars().count(),
            });
            translated.push(out);

            on_progress(Progress {
                done: i + 1,
                total,
            });
        }

        Ok(TranslationOutput {
            text: translated.join(CHUNK_SEPARATOR),
            chunk_reports,
        })
    }
}
