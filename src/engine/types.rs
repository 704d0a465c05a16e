use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocDiag {
    pub python_exe: String,
    pub python_version: String,
    #[serde(default)]
    pub modules: std::collections::BTreeMap<String, Option<String>>,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontHint {
    pub family: String,
    pub size_pt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechSpeed {
    Normal,
    Slow,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractIn {
    pub input_path: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslateIn<'a> {
    pub text: &'a str,
    pub source: &'a str,
    pub target: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeechIn<'a> {
    pub text: &'a str,
    pub lang: &'a str,
    pub slow: bool,
    pub out_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WriteIn<'a> {
    pub lines: &'a [&'a str],
    pub font: &'a FontHint,
    pub out_path: String,
}

/// Shape every helper script answers with.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptOut {
    pub ok: bool,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_kind: Option<String>,
}

impl ScriptOut {
    pub fn error_message(&self, fallback: &str) -> String {
        self.error.clone().unwrap_or_else(|| fallback.to_string())
    }
}
