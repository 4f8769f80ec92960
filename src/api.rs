use crate::error::{DecodeError, InputError, SpecError, ValidationError};
use crate::model::Service;
use crate::overlay::Overlay;
use crate::position;
use crate::security::{self, ProcessedSecurity};
use crate::utils::get_byte_offset;
use crate::validator;
use miette::{NamedSource, SourceSpan};
use serde::Serialize;
use std::fmt::Display;
use std::path::Path;

/// The two accepted document serializations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Picks the format from a file extension (`yaml`, `yml` or `json`).
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    /// Picks the format from a file name, defaulting to YAML when the name
    /// has no recognised extension. YAML also accepts JSON input.
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Self {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
            .unwrap_or(Format::Yaml)
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Yaml => f.write_str("YAML"),
            Format::Json => f.write_str("JSON"),
        }
    }
}

/// A document read from disk.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: String,
    pub format: Format,
    pub source: String,
}

/// Switches for [`analyze_with_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Validate the expanded tree as well as the input.
    pub post_validate: bool,
    /// Attach line and column to validation errors of YAML documents.
    pub track_positions: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions {
            post_validate: true,
            track_positions: true,
        }
    }
}

/// The result of a successful analysis: the decoded input, its complete
/// expansion, and the normalized security requirements.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub input: Service,
    pub expanded: Service,
    pub security: ProcessedSecurity,
}

impl AnalysisResult {
    /// Serializes the expanded service into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.expanded)
    }

    /// Serializes the expanded service into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.expanded)
    }
}

/// Reads a document from disk and detects its format from the extension.
///
/// # Errors
/// Returns an `InputError` if the file does not exist, has an unsupported
/// extension, or cannot be read.
pub fn load(path: impl AsRef<Path>) -> Result<SourceDocument, InputError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    if !path.is_file() {
        return Err(InputError::FileNotFound { path: display });
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let format = Format::from_extension(extension).ok_or_else(|| InputError::UnsupportedExtension {
        path: display.clone(),
        extension: extension.to_string(),
    })?;

    let source = std::fs::read_to_string(path).map_err(|source| InputError::Io {
        path: display.clone(),
        source,
    })?;

    log::debug!("loaded {display} as {format} ({} bytes)", source.len());
    Ok(SourceDocument {
        path: display,
        format,
        source,
    })
}

/// Decodes a service definition.
///
/// # Errors
/// Returns a `DecodeError` carrying the decoder's message and, when the
/// decoder reports one, the location of the failure.
pub fn parse_service(source: &str, file_name: &str, format: Format) -> Result<Service, DecodeError> {
    let src = || NamedSource::new(file_name, source.to_string());
    match format {
        Format::Yaml => serde_yaml::from_str(source).map_err(|err| {
            let span = err
                .location()
                .map(|loc| SourceSpan::from((loc.index().min(source.len()), 0)));
            DecodeError::Yaml {
                message: err.to_string(),
                src: src(),
                span,
            }
        }),
        Format::Json => serde_json::from_str(source).map_err(|err| {
            let span = (err.line() > 0)
                .then(|| SourceSpan::from((get_byte_offset(source, err.line(), err.column()), 0)));
            DecodeError::Json {
                message: err.to_string(),
                src: src(),
                span,
            }
        }),
    }
}

fn check(
    service: &Service,
    source: &str,
    file_name: &str,
    format: Format,
    track_positions: bool,
) -> Result<(), ValidationError> {
    validator::validate(service).map_err(|err| {
        if track_positions && format == Format::Yaml {
            position::enhance(err, source, file_name)
        } else {
            err
        }
    })
}

/// Decodes and validates a document without expanding it.
///
/// # Errors
/// Returns a `SpecError` if decoding or validation fails. Validation errors of
/// YAML documents carry a line and column when the offending key is found.
pub fn validate_document(source: &str, file_name: &str) -> Result<Service, SpecError> {
    let format = Format::from_file_name(file_name);
    let service = parse_service(source, file_name, format)?;
    check(&service, source, file_name, format, true)?;
    Ok(service)
}

/// Decodes, validates and expands a document with the default pipeline.
///
/// # Errors
/// Returns a `SpecError` if decoding, validation or security processing fails.
pub fn analyze(source: &str, file_name: &str) -> Result<AnalysisResult, SpecError> {
    analyze_with_options(source, file_name, &Overlay::new(), AnalyzeOptions::default())
}

/// Like [`analyze`], with a caller-supplied pipeline and options.
///
/// # Errors
/// Returns a `SpecError` if decoding, validation or security processing fails.
pub fn analyze_with_options(
    source: &str,
    file_name: &str,
    overlay: &Overlay,
    options: AnalyzeOptions,
) -> Result<AnalysisResult, SpecError> {
    let format = Format::from_file_name(file_name);
    let input = parse_service(source, file_name, format)?;
    check(&input, source, file_name, format, options.track_positions)?;

    let security = security::process(input.security.as_ref())?;
    let expanded = overlay.expand(&input);

    if options.post_validate {
        validator::validate(&expanded)?;
    }

    log::debug!(
        "analyzed {file_name}: {} objects, {} resources",
        expanded.objects.len(),
        expanded.resources.len()
    );
    Ok(AnalysisResult {
        input,
        expanded,
        security,
    })
}

/// Loads a document from disk and analyzes it.
///
/// # Errors
/// Returns a `SpecError` if loading, decoding, validation or security
/// processing fails.
pub fn analyze_file(path: impl AsRef<Path>) -> Result<AnalysisResult, SpecError> {
    let document = load(path)?;
    analyze(&document.source, &document.path)
}
