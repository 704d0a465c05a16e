use crate::config::Config;
use anyhow::Result;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Clean extracted document text before it is chunked.
pub fn normalize_text(cfg: &Config, text: &str) -> Result<String> {
    let mut out = text.to_string();

    if cfg.normalize.normalize_newlines {
        out = out.replace("\r\n", "\n").replace('\r', "\n");
    }

    if cfg.normalize.normalize_unicode {
        out = out.nfc().collect::<String>();
    }

    out = sanitize_control_chars(&out, &cfg.normalize.control_chars_to_sanitize);

    if cfg.normalize.collapse_blank_lines {
        let blank_runs = Regex::new(r"\n[ \t]*(?:\n[ \t]*){2,}")?;
        out = blank_runs.replace_all(&out, "\n\n").into_owned();
    }

    Ok(out)
}

fn sanitize_control_chars(s: &str, codes: &[u8]) -> String {
    if codes.is_empty() {
        return s.to_string();
    }

    let mut mask = [false; 128];
    for &code in codes {
        if (code as usize) < mask.len() {
            mask[code as usize] = true;
        }
    }

    s.chars()
        .filter(|&ch| {
            // Structural whitespace always survives.
            if ch == '\n' || ch == '\r' || ch == '\t' {
                return true;
            }
            let cp = ch as u32;
            if cp < 128 { !mask[cp as usize] } else { true }
        })
        .collect()
}
