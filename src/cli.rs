use crate::{
    chunk_plan::ChunkPlan,
    config::Config,
    engine::python::PythonEngine,
    extract::Upload,
    language::Language,
    render::{Artifact, Format},
    report::{ArtifactReport, InputReport, JobReport},
    session::Session,
    util::{ensure_dir, now_rfc3339, sha256_hex},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "doc-translate")]
#[command(about = "Translate a txt/docx/pdf document and export it as txt, docx, pdf and mp3")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./doc-translate.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the Python helpers and their libraries.
    Doctor {},
    /// List the supported target languages.
    Languages {},
    /// Show how a document would be chunked for translation.
    Split {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        max_chars: Option<usize>,
    },
    Translate {
        #[arg(long)]
        input: PathBuf,
        /// Target language, by name or code (e.g. tamil, ta).
        #[arg(long)]
        lang: Option<Language>,
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Output format; repeat for several. Defaults to output.formats.
        #[arg(long = "format")]
        formats: Vec<Format>,
        /// Also synthesize an mp3 of the translation.
        #[arg(long)]
        audio: bool,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    match &args.cmd {
        Command::Doctor {} => {
            let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg, None).as_deref())?;
            doctor(&cfg)
        }
        Command::Languages {} => languages(),
        Command::Split { input, max_chars } => {
            let _guard = init_logging(&args, &cfg, resolve_log_path(&cfg, None).as_deref())?;
            split(&cfg, input, *max_chars)
        }
        Command::Translate {
            input,
            lang,
            out_dir,
            formats,
            audio,
        } => {
            let lang = lang.unwrap_or(cfg.translation.default_target);
            let formats = if formats.is_empty() {
                cfg.output
                    .formats
                    .iter()
                    .map(|f| f.parse::<Format>().map_err(|e| anyhow!(e)))
                    .collect::<Result<Vec<_>>>()?
            } else {
                formats.clone()
            };
            let job = TranslateJob {
                input,
                lang,
                out_override: out_dir.as_deref(),
                formats: &formats,
                audio: *audio || cfg.output.audio,
            };
            translate(&args, &cfg, &job)
        }
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("doc-translate.toml");
    if default.exists() { Some(default) } else { None }
}

fn init_logging(args: &Args, cfg: &Config, file_path: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if let Some(path) = file_path {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<()> {
    let engine = PythonEngine::new(cfg)?;
    let diag = engine.doctor()?;
    println!("{}", serde_json::to_string_pretty(&diag)?);
    Ok(())
}

fn languages() -> Result<()> {
    let table: Vec<_> = Language::ALL
        .iter()
        .map(|l| {
            serde_json::json!({
                "name": l.name(),
                "code": l.code(),
                "script": l.script(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

fn split(cfg: &Config, input: &Path, max_chars: Option<usize>) -> Result<()> {
    validate_input(cfg, input)?;
    let upload = Upload::read(input).with_context(|| format!("reading {}", input.display()))?;
    let engine = PythonEngine::new(cfg)?;
    let document = Session::new()
        .load_document(cfg, &engine, &upload)
        .map_err(|e| anyhow!(e.user_message()))?;

    let plan = ChunkPlan::from_text(&document.text, max_chars.unwrap_or(cfg.chunking.max_chars));
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

struct TranslateJob<'a> {
    input: &'a Path,
    lang: Language,
    out_override: Option<&'a Path>,
    formats: &'a [Format],
    audio: bool,
}

fn translate(args: &Args, cfg: &Config, job: &TranslateJob<'_>) -> Result<()> {
    validate_input(cfg, job.input)?;
    let upload =
        Upload::read(job.input).with_context(|| format!("reading {}", job.input.display()))?;

    let cfg_hash = sha256_hex(cfg.normalized_for_hash().as_bytes());
    let input_hash = sha256_hex(&upload.bytes);
    let job_id = sha256_hex(format!("{}:{}:{}", cfg_hash, input_hash, job.lang.code()).as_bytes());

    let out_root = job
        .out_override
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.paths.out_dir));
    let job_dir = out_root.join(&job_id);
    ensure_dir(&job_dir.join("final"))?;
    ensure_dir(&job_dir.join("logs"))?;

    let log_path = resolve_log_path(cfg, Some(&job_dir));
    let _guard = init_logging(args, cfg, log_path.as_deref())?;

    info!("job_id={job_id} out={}", job_dir.display());

    if cfg.debug.dump_effective_config {
        let raw = toml::to_string(cfg).unwrap_or_default();
        std::fs::write(job_dir.join("effective-config.toml"), raw)?;
    }

    let engine = PythonEngine::new(cfg)?;
    let mut session = Session::new();
    let started = now_rfc3339();

    let document = session
        .load_document(cfg, &engine, &upload)
        .map_err(|e| anyhow!(e.user_message()))?;

    let mut on_progress = |p: crate::pipeline::Progress| {
        info!("progress {}/{} ({:.0}%)", p.done, p.total, p.fraction() * 100.0);
    };
    let translation = session
        .translate(cfg, &engine, &document, job.lang, &mut on_progress)
        .map_err(|e| anyhow!(e.user_message()))?;

    let mut artifacts = Vec::new();
    for &format in job.formats {
        let report = match session.download(cfg, &engine, format) {
            Ok(artifact) => write_artifact(&job_dir, format.extension(), &artifact),
            Err(e) => failed_artifact(format.extension(), e.user_message()),
        };
        artifacts.push(report);
    }

    if job.audio {
        let report = match session.generate_audio(cfg, &engine) {
            Ok(artifact) => write_artifact(&job_dir, "mp3", &artifact),
            Err(e) => failed_artifact("mp3", e.user_message()),
        };
        artifacts.push(report);
    }

    let report = JobReport {
        input: InputReport {
            file_name: document.file_name.clone(),
            kind: document.kind,
            bytes: document.bytes,
            chars: document.text.chars().count(),
        },
        language: job.lang,
        language_code: job.lang.code().to_string(),
        started: started.clone(),
        finished: now_rfc3339(),
        chunk_reports: translation.chunk_reports,
        artifacts,
    };

    if cfg.output.write_report_json {
        std::fs::write(
            job_dir.join("final").join(&cfg.output.report_filename),
            serde_json::to_string_pretty(&report)?,
        )?;
    }

    let written: Vec<String> = report
        .artifacts
        .iter()
        .filter(|a| a.ok)
        .map(|a| format!("final/{}", a.filename))
        .collect();
    let status = if report.artifacts.iter().all(|a| a.ok) {
        "ok"
    } else {
        "partial"
    };

    if cfg.output.write_index_json {
        let index = serde_json::json!({
            "job_id": job_id,
            "started": started,
            "finished": report.finished,
            "language": job.lang.name(),
            "artifacts": written,
            "report": format!("final/{}", cfg.output.report_filename),
        });
        std::fs::write(job_dir.join("index.json"), serde_json::to_string_pretty(&index)?)?;
    }

    if cfg.global.print_summary {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "job_id": job_id,
                "job_dir": job_dir,
                "status": status,
            }))?
        );
    }

    Ok(())
}

fn write_artifact(job_dir: &Path, format: &str, artifact: &Artifact) -> ArtifactReport {
    let path = job_dir.join("final").join(&artifact.file_name);
    match std::fs::write(&path, &artifact.bytes) {
        Ok(()) => {
            info!("wrote {} ({} bytes)", path.display(), artifact.bytes.len());
            ArtifactReport {
                format: format.to_string(),
                filename: artifact.file_name.clone(),
                content_type: artifact.content_type.clone(),
                bytes: artifact.bytes.len() as u64,
                ok: true,
                error: None,
            }
        }
        Err(e) => failed_artifact(format, format!("writing {}: {e}", path.display())),
    }
}

fn failed_artifact(format: &str, message: String) -> ArtifactReport {
    warn!("{format} output failed: {message}");
    ArtifactReport {
        format: format.to_string(),
        filename: String::new(),
        content_type: String::new(),
        bytes: 0,
        ok: false,
        error: Some(message),
    }
}

fn validate_input(cfg: &Config, input: &Path) -> Result<()> {
    let input_str = input.display().to_string();

    if cfg.security.reject_url_inputs && looks_like_url(&input_str) {
        return Err(anyhow!("URL inputs are disabled: {input_str}"));
    }

    if !input.exists() {
        return Err(anyhow!("input does not exist: {}", input.display()));
    }

    Ok(())
}

fn looks_like_url(s: &str) -> bool {
    let s = s.to_ascii_lowercase();
    s.starts_with("http://") || s.starts_with("https://") || s.starts_with("file://")
}

fn resolve_log_path(cfg: &Config, job_dir: Option<&Path>) -> Option<PathBuf> {
    if !cfg.logging.write_to_file {
        return None;
    }

    if !cfg.logging.file_path.is_empty() {
        return Some(PathBuf::from(&cfg.logging.file_path));
    }

    job_dir.map(|dir| dir.join("logs").join("doc-translate.log"))
}
