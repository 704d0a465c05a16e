use crate::language::{Language, Script};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: Global,
    #[serde(default)]
    pub paths: Paths,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub chunking: Chunking,
    #[serde(default)]
    pub translation: Translation,
    #[serde(default)]
    pub normalize: Normalize,
    #[serde(default)]
    pub fonts: Fonts,
    #[serde(default)]
    pub speech: Speech,
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub engine: Engine,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub debug: Debug,
    #[serde(default)]
    pub security: Security,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let cfg: Config = toml::from_str(&raw).with_context(|| "parsing TOML")?;
        Ok(cfg)
    }

    /// A stable, normalization-friendly string for hashing.
    pub fn normalized_for_hash(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Global {
    pub keep_intermediates: bool,
    pub print_summary: bool,
}
impl Default for Global {
    fn default() -> Self {
        Self {
            keep_intermediates: false,
            print_summary: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paths {
    pub out_dir: String,
    pub work_dir: String,
    pub scripts_dir: String,
}
impl Default for Paths {
    fn default() -> Self {
        Self {
            out_dir: "out".into(),
            work_dir: ".doc-translate-work".into(),
            scripts_dir: "scripts".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    pub max_input_bytes: u64,
    pub job_timeout_seconds: u64,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            job_timeout_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunking {
    pub max_chars: usize,
}
impl Default for Chunking {
    fn default() -> Self {
        Self { max_chars: 4500 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub source_lang: String,
    pub default_target: Language,
    pub call_timeout_seconds: u64,
}
impl Default for Translation {
    fn default() -> Self {
        Self {
            source_lang: "auto".into(),
            default_target: Language::Tamil,
            call_timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Normalize {
    pub normalize_newlines: bool,
    pub normalize_unicode: bool,
    pub collapse_blank_lines: bool,
    pub control_chars_to_sanitize: Vec<u8>,
}
impl Default for Normalize {
    fn default() -> Self {
        Self {
            normalize_newlines: true,
            normalize_unicode: true,
            collapse_blank_lines: false,
            control_chars_to_sanitize: (0u8..32)
                .chain(std::iter::once(127))
                .filter(|c| !matches!(c, b'\n' | b'\r' | b'\t'))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fonts {
    pub word_default: String,
    pub pdf_default: String,
    pub size_pt: f32,
    /// Script name (e.g. "tamil", "arabic") to font family for Word output.
    #[serde(default)]
    pub word_by_script: BTreeMap<String, String>,
    /// Script name to a CID font name or a .ttf path for PDF output.
    #[serde(default)]
    pub pdf_by_script: BTreeMap<String, String>,
}
impl Default for Fonts {
    fn default() -> Self {
        Self {
            word_default: "Nirmala UI".into(),
            pdf_default: "HeiseiMin-W3".into(),
            size_pt: 11.0,
            word_by_script: Default::default(),
            pdf_by_script: Default::default(),
        }
    }
}

impl Fonts {
    pub fn word_font(&self, script: Script) -> &str {
        self.word_by_script
            .get(script.as_str())
            .map(String::as_str)
            .unwrap_or(&self.word_default)
    }

    pub fn pdf_font(&self, script: Script) -> &str {
        self.pdf_by_script
            .get(script.as_str())
            .map(String::as_str)
            .unwrap_or(&self.pdf_default)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Speech {
    pub slow: bool,
    pub timeout_seconds: u64,
}
impl Default for Speech {
    fn default() -> Self {
        Self {
            slow: false,
            timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Output {
    pub formats: Vec<String>,
    pub audio: bool,
    pub write_report_json: bool,
    pub write_index_json: bool,
    pub report_filename: String,
}
impl Default for Output {
    fn default() -> Self {
        Self {
            formats: vec!["txt".into(), "docx".into(), "pdf".into()],
            audio: false,
            write_report_json: true,
            write_index_json: true,
            report_filename: "report.json".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    pub python_exe: String,
    pub doctor_timeout_seconds: u64,
    pub extract_timeout_seconds: u64,
    pub write_timeout_seconds: u64,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}
impl Default for Engine {
    fn default() -> Self {
        Self {
            python_exe: "auto".into(),
            doctor_timeout_seconds: 60,
            extract_timeout_seconds: 120,
            write_timeout_seconds: 120,
            env: Default::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Logging {
    pub level: String,
    pub json: bool,
    pub write_to_file: bool,
    pub file_path: String,
}
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            write_to_file: true,
            file_path: "".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debug {
    pub keep_python_stderr: bool,
    pub dump_effective_config: bool,
}
impl Default for Debug {
    fn default() -> Self {
        Self {
            keep_python_stderr: true,
            dump_effective_config: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Security {
    pub reject_url_inputs: bool,
    pub pin_scripts_dir: bool,
}
impl Default for Security {
    fn default() -> Self {
        Self {
            reject_url_inputs: true,
            pin_scripts_dir: true,
        }
    }
}
