//! Tests for the multipart forms of upload queries.

use ncore::multipart::{Content, Part};
use narwhal_schema::{
    AudioResponseFormat, AudioTranscriptionQuery, AudioTranslationQuery, FileType,
    ImageEditsQuery, ImageResponseFormat, ImageVariationsQuery, InputFile,
};

fn names(parts: &[Part]) -> Vec<&str> {
    parts.iter().map(Part::name).collect()
}

fn text<'p>(parts: &'p [Part], field: &str) -> Option<&'p str> {
    parts.iter().find_map(|part| match part {
        Part::Text { name, value } if name == field => Some(value.as_str()),
        _ => None,
    })
}

#[test]
fn image_edit_puts_the_image_before_the_mask() {
    let mut query = ImageEditsQuery::new(InputFile::bytes("cat.png", vec![1u8, 2]), "add a hat")
        .mask(InputFile::bytes("mask.png", vec![3u8]));
    query.n = Some(2);
    query.response_format = Some(ImageResponseFormat::Url);
    let form = query.form();

    assert_eq!(
        names(form.parts()),
        ["image", "mask", "prompt", "n", "response_format"]
    );
    assert_eq!(text(form.parts(), "prompt"), Some("add a hat"));
    assert_eq!(text(form.parts(), "n"), Some("2"));
    assert_eq!(text(form.parts(), "response_format"), Some("url"));

    match &form.parts()[0] {
        Part::File {
            filename,
            content_type,
            content: Content::Bytes(bytes),
            ..
        } => {
            assert_eq!(filename, "cat.png");
            assert_eq!(content_type, "image/png");
            assert_eq!(bytes.as_ref(), [1, 2]);
        }
        other => panic!("unexpected first part: {other:?}"),
    }
}

#[test]
fn image_edit_without_mask() {
    let query = ImageEditsQuery::new(InputFile::bytes("cat.png", vec![0u8]), "p");
    assert_eq!(names(query.form().parts()), ["image", "prompt"]);
}

#[test]
fn image_variation_form() {
    let mut query = ImageVariationsQuery::new(InputFile::path("/tmp/narwhal.png"));
    query.size = Some("256x256".into());
    let form = query.form();
    assert_eq!(names(form.parts()), ["image", "size"]);
    match &form.parts()[0] {
        Part::File {
            filename, content, ..
        } => {
            assert_eq!(filename, "narwhal.png");
            assert!(matches!(content, Content::Path(_)));
        }
        other => panic!("unexpected first part: {other:?}"),
    }
}

#[test]
fn transcription_form_carries_the_audio_type() {
    let file = InputFile::bytes("memo.m4a", vec![9u8; 4]);
    let mut query =
        AudioTranscriptionQuery::new(file, FileType::M4a, "whisper-1").language("en");
    query.response_format = Some(AudioResponseFormat::VerboseJson);
    let form = query.form();

    assert_eq!(
        names(form.parts()),
        ["file", "model", "language", "response_format"]
    );
    assert_eq!(text(form.parts(), "model"), Some("whisper-1"));
    assert_eq!(text(form.parts(), "response_format"), Some("verbose_json"));
    match &form.parts()[0] {
        Part::File {
            filename,
            content_type,
            ..
        } => {
            assert_eq!(filename, "memo.m4a");
            assert_eq!(content_type, "audio/m4a");
        }
        other => panic!("unexpected first part: {other:?}"),
    }
}

#[test]
fn translation_form_defers_reading_the_file() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"RIFF").unwrap();
    let mut query =
        AudioTranslationQuery::new(InputFile::path(file.path()), FileType::Wav, "whisper-1");
    query.temperature = Some(0.3);
    let form = query.form();
    assert_eq!(names(form.parts()), ["file", "model", "temperature"]);
    assert_eq!(text(form.parts(), "temperature"), Some("0.3"));

    match &form.parts()[0] {
        Part::File {
            content_type,
            content: Content::Path(path),
            ..
        } => {
            assert_eq!(content_type, "audio/wav");
            assert_eq!(path, file.path());
        }
        other => panic!("unexpected first part: {other:?}"),
    }
    assert!(form.to_multipart().is_ok());
}

#[test]
fn file_types_map_to_mime_types() {
    assert_eq!(FileType::Mp3.content_type(), "audio/mpeg");
    assert_eq!(FileType::Mpga.content_type(), "audio/mpeg");
    assert_eq!(FileType::Webm.extension(), "webm");
}
