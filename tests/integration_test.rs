use bin2hpp::codec::{pack_bytes, WordWidth};
use bin2hpp::document::parse_document;
use bin2hpp::embed::{convert, default_output_path, self_test, EmbedOptions, SelfTestSource};
use bin2hpp::{CodecError, EncodingTag};
use std::fs;
use tempfile::TempDir;

fn write_input(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_convert_writes_parseable_header() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "three.bin", &[0x01, 0x02, 0x03]);
    let output = default_output_path(&input);
    assert_eq!(output.file_name().unwrap(), "three.hpp");

    let opts = EmbedOptions { word_width: WordWidth::W16, ..EmbedOptions::default() };
    let summary = convert(&input, &output, &opts).unwrap();
    assert_eq!(summary.struct_name, "three");
    assert_eq!(summary.total_byte_count, 3);
    assert_eq!(summary.words, 2);
    assert_eq!(summary.encoding, EncodingTag::Raw);

    let text = fs::read_to_string(&output).unwrap();
    let parsed = parse_document(&text).unwrap();
    assert_eq!(parsed.struct_name, "three");
    assert_eq!(parsed.word_width, WordWidth::W16);
    assert_eq!(parsed.total_byte_count, 3);
    assert_eq!(parsed.words, vec![0x0102, 0x0300]);
    assert_eq!(parsed.encoding, None);
}

#[test]
fn test_convert_tags_gzip_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "payload.gz", &[0x1F, 0x8B, 0x08, 0x00]);
    let output = dir.path().join("payload.hpp");

    let summary = convert(&input, &output, &EmbedOptions::default()).unwrap();
    assert_eq!(summary.encoding, EncodingTag::Gzip);
    let parsed = parse_document(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(parsed.encoding.as_deref(), Some("gzip"));
}

#[test]
fn test_convert_mismatched_gz_is_raw() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "fake.gz", b"not gzip");
    let output = dir.path().join("fake.hpp");

    let summary = convert(&input, &output, &EmbedOptions::default()).unwrap();
    assert_eq!(summary.encoding, EncodingTag::Raw);
    assert!(!fs::read_to_string(&output).unwrap().contains("encoding"));
}

#[test]
fn test_convert_tags_brotli_by_extension() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "style.css.br", b"anything");
    let output = dir.path().join("style.hpp");

    let summary = convert(&input, &output, &EmbedOptions::default()).unwrap();
    assert_eq!(summary.encoding, EncodingTag::Brotli);
    assert!(fs::read_to_string(&output).unwrap().contains("encoding{\"br\"}"));
}

#[test]
fn test_decoder_for_byte_width_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "data.bin", b"abc");
    let output = dir.path().join("data.hpp");

    let opts = EmbedOptions { word_width: WordWidth::W8, decoder: true, ..EmbedOptions::default() };
    let err = convert(&input, &output, &opts).unwrap_err();
    assert!(matches!(err, CodecError::Config(_)));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = convert(
        &dir.path().join("absent.bin"),
        &dir.path().join("absent.hpp"),
        &EmbedOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, CodecError::Io(_)));
}

#[test]
fn test_decoder_is_embedded_in_struct() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "words.bin", &[0xAA, 0xBB, 0xCC, 0xDD]);
    let output = dir.path().join("words.hpp");

    let opts = EmbedOptions {
        word_width: WordWidth::W32,
        decoder: true,
        struct_name: Some("Words".into()),
        ..EmbedOptions::default()
    };
    convert(&input, &output, &opts).unwrap();
    let text = fs::read_to_string(&output).unwrap();

    assert!(text.contains("#include <bit>"));
    assert!(text.contains("#include <cstring>"));
    assert!(text.contains("struct Words {"));
    assert!(text.contains("class reader {"));
    assert!(text.contains("std::endian::native == std::endian::big"));
    let parsed = parse_document(&text).unwrap();
    assert_eq!(parsed.words, vec![0xAABB_CCDD]);
    assert_eq!(parsed.declared_len, 2);
}

#[test]
fn test_selftest_on_file_input() {
    let dir = TempDir::new().unwrap();
    let data: Vec<u8> = (0..=255u8).rev().cycle().take(777).collect();
    let input = write_input(&dir, "sample.bin", &data);

    for word_width in [WordWidth::W16, WordWidth::W32, WordWidth::W64] {
        let opts = EmbedOptions { word_width, decoder: true, ..EmbedOptions::default() };
        let report = self_test(&SelfTestSource::File(input.clone()), &opts).unwrap();
        assert!(report.all_passed(), "{word_width:?}: {:?}", report.failures);
    }
}

#[test]
fn test_selftest_on_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "empty.bin", &[]);
    let opts = EmbedOptions { word_width: WordWidth::W64, ..EmbedOptions::default() };
    let report = self_test(&SelfTestSource::File(input), &opts).unwrap();
    assert!(report.all_passed(), "{:?}", report.failures);
}

#[test]
fn test_document_declares_one_more_than_whole_words() {
    let packed = pack_bytes(&[0u8; 8], WordWidth::W32);
    assert_eq!(packed.words.len(), 2);
    assert_eq!(packed.declared_len(), 3);
}

#[test]
fn test_selftest_on_compressed_inputs() {
    let dir = TempDir::new().unwrap();
    let gz = write_input(&dir, "asset.gz", &[0x1F, 0x8B, 0x08, 0x00, 0x42]);
    let br = write_input(&dir, "asset.br", &[0x0B, 0x02, 0x80]);
    let opts = EmbedOptions { word_width: WordWidth::W32, decoder: true, ..EmbedOptions::default() };

    for input in [gz, br] {
        let report = self_test(&SelfTestSource::File(input.clone()), &opts).unwrap();
        assert!(report.all_passed(), "{}: {:?}", input.display(), report.failures);
    }
}

#[test]
fn test_convert_sanitizes_given_name() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "logo.png", b"\x89PNG");
    let output = dir.path().join("logo.hpp");
    let opts = EmbedOptions { struct_name: Some("my logo-v2".into()), ..EmbedOptions::default() };

    let summary = convert(&input, &output, &opts).unwrap();
    assert_eq!(summary.struct_name, "my_logo_v2");
    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("struct my_logo_v2 {"));
    assert_eq!(parse_document(&text).unwrap().struct_name, "my_logo_v2");
}

#[test]
fn test_bare_invocation_prints_usage() {
    let out = std::process::Command::new(env!("CARGO_BIN_EXE_bin2hpp")).output().unwrap();
    assert!(out.status.success());
    let usage = String::from_utf8_lossy(&out.stdout);
    assert!(usage.contains("Usage:"), "{usage}");
    assert!(usage.contains("--selftest"));
}

#[test]
fn test_output_without_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let out = std::process::Command::new(env!("CARGO_BIN_EXE_bin2hpp"))
        .arg("-o")
        .arg(dir.path().join("x.hpp"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("no input file given"));
}
