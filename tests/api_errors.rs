// API error path tests
// These test loading, decoding and diagnostic rendering in the API layer

use miette::{Diagnostic, Report};
use rdl_core::error::{DecodeError, InputError};
use rdl_core::{analyze, analyze_file, load, parse_service, Format, SpecError};
use std::io::Write;

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    match load(&path) {
        Err(InputError::FileNotFound { path: reported }) => {
            assert!(reported.ends_with("absent.yaml"));
        }
        other => panic!("Expected FileNotFound, got {:?}", other),
    }
}

#[test]
fn test_load_unsupported_extension() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "name = \"Shop\"").unwrap();
    match load(file.path()) {
        Err(InputError::UnsupportedExtension { extension, .. }) => assert_eq!(extension, "toml"),
        other => panic!("Expected UnsupportedExtension, got {:?}", other),
    }
}

#[test]
fn test_load_detects_format() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, "{{\"name\": \"Shop\"}}").unwrap();
    let document = load(file.path()).unwrap();
    assert_eq!(document.format, Format::Json);
    assert_eq!(document.source, "{\"name\": \"Shop\"}");
}

#[test]
fn test_analyze_file_from_disk() {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    write!(
        file,
        "name: Notes\nresources:\n  - name: Notes\n    operations: [Read]\n    fields:\n      - name: body\n        type: String\n        operations: [Read]\n"
    )
    .unwrap();
    let result = analyze_file(file.path()).unwrap();
    assert!(result.expanded.has_object("NotesFilter"));
}

#[test]
fn test_analyze_file_surfaces_input_error() {
    let result = analyze_file("does/not/exist.yaml");
    assert!(matches!(result, Err(SpecError::Input(InputError::FileNotFound { .. }))));
}

#[test]
fn test_yaml_decode_error_wraps_message() {
    let err = parse_service("name: [unclosed", "bad.yaml", Format::Yaml).unwrap_err();
    match &err {
        DecodeError::Yaml { message, .. } => assert!(!message.is_empty()),
        DecodeError::Json { .. } => panic!("Expected a YAML error"),
    }
    assert_eq!(err.code().unwrap().to_string(), "decode::yaml");
}

#[test]
fn test_wrong_shape_is_decode_error() {
    let result = analyze("resources: 42\n", "shape.yaml");
    assert!(matches!(result, Err(SpecError::Decode(_))));
}

#[test]
fn test_validation_report_renders_location() {
    let source = "name: Shop\nobjects:\n  - name: Address\n    fields:\n      - name: zip\n        type: Zip\n";
    let err = analyze(source, "shop.yaml").unwrap_err();
    assert_eq!(err.code().unwrap().to_string(), "validation::invalid_type");
    let rendered = format!("{:?}", Report::new(err));
    assert!(rendered.contains("shop.yaml"), "{rendered}");
}

#[test]
fn test_empty_document_is_valid() {
    let result = analyze("{}", "");
    assert!(result.is_ok(), "{:?}", result.err());
    let expanded = result.unwrap().expanded;
    assert_eq!(expanded.objects.len(), 4);
    assert_eq!(expanded.enums.len(), 2);
}
