#![cfg(unix)]

use doc_translate::{
    config::Config,
    engine::{python::PythonEngine, DocumentWriter, FontHint},
    error::RenderError,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

const OUT_PATH: &str = r#"out=$(cat | sed -n 's/.*"out_path":"\([^"]*\)".*/\1/p')"#;

/// Lay out a scripts dir whose helpers are shell scripts run through `sh`.
fn engine_with_writer(name: &str, write_docx: &str) -> (PythonEngine, PathBuf) {
    let root = std::env::temp_dir().join(format!("doc-translate-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&root);
    let scripts = root.join("scripts");
    std::fs::create_dir_all(&scripts).unwrap();
    for script in [
        "doctor.py",
        "extract_text.py",
        "translate_text.py",
        "synthesize_speech.py",
        "write_pdf.py",
    ] {
        std::fs::write(scripts.join(script), "exit 1\n").unwrap();
    }
    std::fs::write(scripts.join("write_docx.py"), write_docx).unwrap();

    let work = root.join("work");
    let mut cfg = Config::default();
    cfg.paths.scripts_dir = scripts.display().to_string();
    cfg.paths.work_dir = work.display().to_string();
    cfg.engine.python_exe = "sh".into();
    cfg.security.pin_scripts_dir = false;

    (PythonEngine::new(&cfg).unwrap(), work)
}

fn work_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn font() -> FontHint {
    FontHint {
        family: "Nirmala UI".into(),
        size_pt: 11.0,
    }
}

#[test]
fn writer_output_is_read_back_and_removed() {
    let script = format!("{OUT_PATH}\nprintf 'DOCX' > \"$out\"\necho '{{\"ok\": true}}'\n");
    let (engine, work) = engine_with_writer("writer-ok", &script);

    let bytes = engine.write_word_document(&["வணக்கம்"], &font()).unwrap();

    assert_eq!(bytes, b"DOCX".to_vec());
    assert!(work_files(&work).is_empty());
}

#[test]
fn crashed_writer_leaves_no_partial_file() {
    let script = format!("{OUT_PATH}\nprintf 'PART' > \"$out\"\nexit 3\n");
    let (engine, work) = engine_with_writer("writer-crash", &script);

    let err = engine.write_word_document(&["one", "two"], &font()).unwrap_err();

    assert!(matches!(err, RenderError::Writer { ref format, .. } if format == "docx"));
    assert_eq!(work_files(&work), Vec::<String>::new());
}

#[test]
fn font_failure_is_reported_as_font_error() {
    let script = format!(
        "{OUT_PATH}\necho '{{\"ok\": false, \"error\": \"no glyphs\", \"error_kind\": \"font\"}}'\n"
    );
    let (engine, work) = engine_with_writer("writer-font", &script);

    let err = engine.write_word_document(&["x"], &font()).unwrap_err();

    match err {
        RenderError::Font { font, message } => {
            assert_eq!(font, "Nirmala UI");
            assert_eq!(message, "no glyphs");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(work_files(&work).is_empty());
}
