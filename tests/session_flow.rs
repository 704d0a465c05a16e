mod support;

use doc_translate::{
    config::Config,
    error::{ActionError, ExtractionError, SynthesisError},
    extract::{DocumentKind, Upload},
    language::Language,
    render::Format,
    session::Session,
};
use pretty_assertions::assert_eq;
use support::{FakeExtractor, FakeSynthesizer, FakeTranslator, FakeWriter};

fn txt_upload(name: &str, body: &str) -> Upload {
    Upload::new(name, body.as_bytes().to_vec())
}

#[test]
fn new_session_has_nothing_to_download() {
    let cfg = Config::default();
    let session = Session::new();
    assert_eq!(session.translated_text(), "");

    let err = session
        .download(&cfg, &FakeWriter::default(), Format::Txt)
        .unwrap_err();
    assert!(matches!(err, ActionError::NoTranslation));
    let err = session
        .generate_audio(&cfg, &FakeSynthesizer::default())
        .unwrap_err();
    assert!(matches!(err, ActionError::NoTranslation));
}

#[test]
fn text_upload_is_translated_into_the_session() {
    let cfg = Config::default();
    let extractor = FakeExtractor::new("unused");
    let translator = FakeTranslator::replying("வணக்கம்");
    let mut session = Session::new();

    session
        .translate_upload(
            &cfg,
            &extractor,
            &translator,
            &txt_upload("notes.txt", "Hello"),
            Language::Tamil,
            &mut |_| {},
        )
        .unwrap();

    assert_eq!(session.translated_text(), "வணக்கம்");
    assert_eq!(session.language(), Some(Language::Tamil));
    // Plain text never goes through the extraction collaborator.
    assert!(extractor.calls.borrow().is_empty());

    let txt = session.download(&cfg, &FakeWriter::default(), Format::Txt).unwrap();
    assert_eq!(txt.bytes, "வணக்கம்".as_bytes());
    assert_eq!(txt.file_name, "translated_tamil.txt");
}

#[test]
fn word_and_pdf_uploads_use_the_extractor() {
    let cfg = Config::default();
    let extractor = FakeExtractor::new("Quarterly report");
    let translator = FakeTranslator::default();
    let mut session = Session::new();

    for name in ["report.DOCX", "scan.pdf"] {
        session
            .translate_upload(
                &cfg,
                &extractor,
                &translator,
                &Upload::new(name, vec![0x50, 0x4b]),
                Language::Marathi,
                &mut |_| {},
            )
            .unwrap();
    }

    assert_eq!(
        *extractor.calls.borrow(),
        vec![DocumentKind::Word, DocumentKind::Pdf]
    );
    assert_eq!(session.translated_text(), "<mr>Quarterly report");
}

#[test]
fn unsupported_extension_leaves_session_untouched() {
    let cfg = Config::default();
    let extractor = FakeExtractor::new("x");
    let translator = FakeTranslator::default();
    let mut session = Session::new();

    session
        .translate_upload(
            &cfg,
            &extractor,
            &translator,
            &txt_upload("first.txt", "Good morning"),
            Language::Gujarati,
            &mut |_| {},
        )
        .unwrap();
    let before = session.translated_text().to_string();

    let err = session
        .translate_upload(
            &cfg,
            &extractor,
            &translator,
            &txt_upload("slides.pptx", "whatever"),
            Language::Hindi,
            &mut |_| {},
        )
        .unwrap_err();

    assert!(matches!(
        err,
        ActionError::Extraction(ExtractionError::UnsupportedFormat(_))
    ));
    assert!(err.user_message().starts_with("File processing failed"));
    assert_eq!(session.translated_text(), before);
    assert_eq!(session.language(), Some(Language::Gujarati));
    assert_eq!(translator.call_count(), 1);
}

#[test]
fn failed_translation_keeps_previous_text() {
    let mut cfg = Config::default();
    let extractor = FakeExtractor::new("x");
    let ok = FakeTranslator::replying("first result");
    let mut session = Session::new();

    session
        .translate_upload(
            &cfg,
            &extractor,
            &ok,
            &txt_upload("a.txt", "short"),
            Language::Tamil,
            &mut |_| {},
        )
        .unwrap();

    cfg.chunking.max_chars = 6;
    let failing = FakeTranslator::failing_on(3);
    let err = session
        .translate_upload(
            &cfg,
            &extractor,
            &failing,
            &txt_upload("b.txt", "one two three four"),
            Language::Hindi,
            &mut |_| {},
        )
        .unwrap_err();

    assert!(matches!(err, ActionError::Translation(_)));
    assert!(err.user_message().starts_with("Translation failed"));
    assert_eq!(session.translated_text(), "first result");
    assert_eq!(session.language(), Some(Language::Tamil));
}

#[test]
fn invalid_utf8_text_is_an_extraction_error() {
    let cfg = Config::default();
    let session = Session::new();
    let err = session
        .load_document(
            &cfg,
            &FakeExtractor::new("x"),
            &Upload::new("bad.txt", vec![0xff, 0xfe, 0x00]),
        )
        .unwrap_err();
    assert!(matches!(err, ActionError::Extraction(ExtractionError::Decode(_))));
}

#[test]
fn oversized_upload_is_rejected() {
    let mut cfg = Config::default();
    cfg.limits.max_input_bytes = 4;
    let err = Session::new()
        .load_document(&cfg, &FakeExtractor::new("x"), &txt_upload("big.txt", "12345"))
        .unwrap_err();
    assert!(matches!(
        err,
        ActionError::Extraction(ExtractionError::TooLarge { size: 5, max: 4 })
    ));
}

#[test]
fn audio_uses_upload_basename_and_session_language() {
    let cfg = Config::default();
    let mut session = Session::new();
    session
        .translate_upload(
            &cfg,
            &FakeExtractor::new("x"),
            &FakeTranslator::replying("ನಮಸ್ಕಾರ"),
            &txt_upload("Master File.v2.txt", "Hello"),
            Language::Kannada,
            &mut |_| {},
        )
        .unwrap();

    let synth = FakeSynthesizer::default();
    let audio = session.generate_audio(&cfg, &synth).unwrap();
    assert_eq!(audio.file_name, "Master File.v2_kannada.mp3");
    assert_eq!(synth.seen.borrow()[0].1, Language::Kannada);

    let unsupported = FakeSynthesizer {
        unsupported: vec![Language::Kannada],
        ..Default::default()
    };
    let err = session.generate_audio(&cfg, &unsupported).unwrap_err();
    assert!(matches!(
        err,
        ActionError::Synthesis(SynthesisError::UnsupportedLanguage(_))
    ));
    assert_eq!(err.user_message(), "Audio is not available for kannada");
}

#[test]
fn document_failure_does_not_touch_the_slot() {
    let cfg = Config::default();
    let mut session = Session::new();
    session
        .translate_upload(
            &cfg,
            &FakeExtractor::new("x"),
            &FakeTranslator::replying("line one\nline two"),
            &txt_upload("a.txt", "hi"),
            Language::Malayalam,
            &mut |_| {},
        )
        .unwrap();

    let writer = FakeWriter {
        fail_word: true,
        ..Default::default()
    };
    let err = session.download(&cfg, &writer, Format::Docx).unwrap_err();
    assert!(err.user_message().starts_with("Document generation failed"));
    assert_eq!(session.translated_text(), "line one\nline two");

    let pdf = session.download(&cfg, &writer, Format::Pdf).unwrap();
    assert_eq!(pdf.file_name, "translated_malayalam.pdf");
}
