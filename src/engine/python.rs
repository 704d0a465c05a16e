use super::{types::*, DocumentWriter, Extractor, Synthesizer, Translator};
use crate::config::Config;
use crate::error::{ExtractionError, RenderError, SynthesisError, TranslationError};
use crate::extract::DocumentKind;
use crate::language::Language;
use crate::util::{ensure_dir, sha256_hex};
use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SCRIPTS: [&str; 6] = [
    "doctor.py",
    "extract_text.py",
    "translate_text.py",
    "synthesize_speech.py",
    "write_docx.py",
    "write_pdf.py",
];

/// Collaborators backed by helper scripts speaking JSON over stdin/stdout.
pub struct PythonEngine {
    cfg: Config,
    scripts_dir: PathBuf,
    work_dir: PathBuf,
    python_exe: PathBuf,
}

impl PythonEngine {
    pub fn new(cfg: &Config) -> Result<Self> {
        let scripts_dir = PathBuf::from(&cfg.paths.scripts_dir);
        if cfg.security.pin_scripts_dir {
            let cwd = std::env::current_dir().with_context(|| "current_dir")?;
            let canon = scripts_dir
                .canonicalize()
                .with_context(|| format!("canonicalize scripts_dir: {}", scripts_dir.display()))?;
            if !canon.starts_with(&cwd) {
                return Err(anyhow!(
                    "scripts_dir is outside cwd while pin_scripts_dir=true: {}",
                    canon.display()
                ));
            }
        }
        for script in SCRIPTS {
            let path = scripts_dir.join(script);
            if !path.exists() {
                return Err(anyhow!("missing script: {}", path.display()));
            }
        }
        let work_dir = PathBuf::from(&cfg.paths.work_dir);
        ensure_dir(&work_dir)?;
        let python_exe = resolve_python_exe(&cfg.engine.python_exe);
        Ok(Self {
            cfg: cfg.clone(),
            scripts_dir,
            work_dir,
            python_exe,
        })
    }

    pub fn doctor(&self) -> Result<DocDiag> {
        let script = self.script("doctor.py");
        self.run_json::<serde_json::Value, DocDiag>(
            &script,
            &serde_json::json!({"cmd": "doctor"}),
            Some(self.cfg.engine.doctor_timeout_seconds),
        )
    }

    fn script(&self, name: &str) -> PathBuf {
        self.scripts_dir.join(name)
    }

    /// Path in the work dir for a payload, named after its content.
    fn work_file(&self, seed: &[u8], ext: &str) -> PathBuf {
        let hash = sha256_hex(seed);
        self.work_dir.join(format!("{}.{}", &hash[..16], ext))
    }

    fn cleanup(&self, path: &Path) {
        if !self.cfg.global.keep_intermediates {
            let _ = std::fs::remove_file(path);
        }
    }

    /// Run a writer script that leaves its result at `out_path`, then read it back.
    fn run_to_file<I: serde::Serialize>(
        &self,
        script: &Path,
        input: &I,
        out_path: &Path,
        timeout_seconds: u64,
    ) -> Result<std::result::Result<Vec<u8>, ScriptOut>> {
        let res: Result<ScriptOut> = self.run_json(script, input, timeout_opt(timeout_seconds));
        match res {
            Ok(out) if out.ok => {}
            Ok(out) => {
                self.cleanup(out_path);
                return Ok(Err(out));
            }
            Err(e) => {
                // A crashed or timed-out writer may leave a partial file behind.
                self.cleanup(out_path);
                return Err(e);
            }
        }
        let bytes = std::fs::read(out_path)
            .with_context(|| format!("reading script output: {}", out_path.display()));
        self.cleanup(out_path);
        Ok(Ok(bytes?))
    }

    fn run_json<I: serde::Serialize, O: for<'de> serde::Deserialize<'de>>(
        &self,
        script: &Path,
        input: &I,
        timeout_seconds: Option<u64>,
    ) -> Result<O> {
        debug!(
            "python run {} timeout={:?}",
            script.display(),
            timeout_seconds
        );
        let mut cmd = Command::new(&self.python_exe);
        cmd.arg(script);
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        for (k, v) in &self.cfg.engine.env {
            cmd.env(k, v);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning python: {}", script.display()))?;

        {
            let mut stdin = child.stdin.take().ok_or_else(|| anyhow!("no stdin"))?;
            let bytes = serde_json::to_vec(input)?;
            use std::io::Write;
            stdin.write_all(&bytes)?;
            stdin.flush().ok();
        }

        let output = if let Some(secs) = timeout_seconds {
            wait_with_timeout(&mut child, Duration::from_secs(secs))?
        } else {
            child
                .wait_with_output()
                .with_context(|| "waiting for python")?
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "python script failed: {}\n{}",
                script.display(),
                stderr
            ));
        }

        if self.cfg.debug.keep_python_stderr && !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("python stderr {}: {}", script.display(), stderr.trim());
        }

        let out: O = serde_json::from_slice(&output.stdout)
            .with_context(|| format!("parsing python JSON output: {}", script.display()))?;
        Ok(out)
    }
}

impl Extractor for PythonEngine {
    fn extract_text(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
        let input_path = self.work_file(bytes, kind.as_str());
        std::fs::write(&input_path, bytes)
            .map_err(|e| ExtractionError::Failed(format!("staging upload: {e}")))?;

        let req = ExtractIn {
            input_path: input_path.display().to_string(),
            kind: kind.as_str().to_string(),
        };
        let res: Result<ScriptOut> = self.run_json(
            &self.script("extract_text.py"),
            &req,
            timeout_opt(self.cfg.engine.extract_timeout_seconds),
        );
        self.cleanup(&input_path);

        let out = res.map_err(|e| ExtractionError::Failed(format!("{e:#}")))?;
        if !out.ok {
            return Err(ExtractionError::Failed(out.error_message("extract_text failed")));
        }
        Ok(out.text.unwrap_or_default())
    }
}

impl Translator for PythonEngine {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: Language,
    ) -> Result<String, TranslationError> {
        let req = TranslateIn {
            text,
            source,
            target: target.code(),
        };
        let out: ScriptOut = self
            .run_json(
                &self.script("translate_text.py"),
                &req,
                timeout_opt(self.cfg.translation.call_timeout_seconds),
            )
            .map_err(|e| TranslationError::Service(format!("{e:#}")))?;

        if !out.ok {
            return Err(TranslationError::Service(
                out.error_message("translate_text failed"),
            ));
        }
        out.text
            .ok_or_else(|| TranslationError::Service("translator returned no text".into()))
    }
}

impl Synthesizer for PythonEngine {
    fn synthesize_speech(
        &self,
        text: &str,
        language: Language,
        speed: SpeechSpeed,
    ) -> Result<Vec<u8>, SynthesisError> {
        let out_path = self.work_file(
            format!("{}:{}", language.code(), text).as_bytes(),
            "mp3",
        );
        let req = SpeechIn {
            text,
            lang: language.code(),
            slow: speed == SpeechSpeed::Slow,
            out_path: out_path.display().to_string(),
        };

        let res = self
            .run_to_file(
                &self.script("synthesize_speech.py"),
                &req,
                &out_path,
                self.cfg.speech.timeout_seconds,
            )
            .map_err(|e| SynthesisError::Failed(format!("{e:#}")))?;

        res.map_err(|out| match out.error_kind.as_deref() {
            Some("unsupported_language") => {
                SynthesisError::UnsupportedLanguage(language.name().to_string())
            }
            _ => SynthesisError::Failed(out.error_message("synthesize_speech failed")),
        })
    }
}

impl DocumentWriter for PythonEngine {
    fn write_word_document(&self, lines: &[&str], font: &FontHint) -> Result<Vec<u8>, RenderError> {
        self.write_document("write_docx.py", "docx", lines, font)
    }

    fn write_page_document(&self, lines: &[&str], font: &FontHint) -> Result<Vec<u8>, RenderError> {
        self.write_document("write_pdf.py", "pdf", lines, font)
    }
}

impl PythonEngine {
    fn write_document(
        &self,
        script: &str,
        ext: &str,
        lines: &[&str],
        font: &FontHint,
    ) -> Result<Vec<u8>, RenderError> {
        let out_path = self.work_file(lines.join("\n").as_bytes(), ext);
        let req = WriteIn {
            lines,
            font,
            out_path: out_path.display().to_string(),
        };

        let writer_failed = |message: String| RenderError::Writer {
            format: ext.to_string(),
            message,
        };

        let res = self
            .run_to_file(
                &self.script(script),
                &req,
                &out_path,
                self.cfg.engine.write_timeout_seconds,
            )
            .map_err(|e| writer_failed(format!("{e:#}")))?;

        res.map_err(|out| match out.error_kind.as_deref() {
            Some("font") => RenderError::Font {
                font: font.family.clone(),
                message: out.error_message("font registration failed"),
            },
            _ => writer_failed(out.error_message("writer failed")),
        })
    }
}

fn timeout_opt(seconds: u64) -> Option<u64> {
    if seconds > 0 { Some(seconds) } else { None }
}

fn resolve_python_exe(raw: &str) -> PathBuf {
    let raw = raw.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("auto") {
        if let Ok(env_val) = std::env::var("DOC_TRANSLATE_PYTHON") {
            let p = expand_tilde(&env_val);
            if p.exists() {
                return p;
            }
        }
        let venv = PathBuf::from(".venv/bin/python");
        if venv.exists() {
            return venv;
        }
        return PathBuf::from("python3");
    }
    expand_tilde(raw)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    // Drain both pipes while waiting; a chatty child must not block on a full buffer.
    let stdout_reader = child.stdout.take();
    let stderr_reader = child.stderr.take();

    let stdout_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut out) = stdout_reader {
            out.read_to_end(&mut buf).with_context(|| "read stdout")?;
        }
        Ok(buf)
    });

    let stderr_thread = std::thread::spawn(move || -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr_reader {
            err.read_to_end(&mut buf).with_context(|| "read stderr")?;
        }
        Ok(buf)
    });

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().with_context(|| "try_wait")? {
            let stdout = stdout_thread
                .join()
                .map_err(|_| anyhow!("stdout reader thread panicked"))??;
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Ok(Output {
                status,
                stdout,
                stderr,
            });
        }

        if start.elapsed() > timeout {
            warn!("python process timed out after {:?}", timeout);
            let _ = child.kill();
            child.wait().with_context(|| "wait after kill")?;
            let _ = stdout_thread.join();
            let stderr = stderr_thread
                .join()
                .map_err(|_| anyhow!("stderr reader thread panicked"))??;
            return Err(anyhow!(
                "python process exceeded timeout ({:?}); stderr: {}",
                timeout,
                String::from_utf8_lossy(&stderr)
            ));
        }

        std::thread::sleep(Duration::from_millis(50));
    }
}
