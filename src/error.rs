use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use std::fmt::Display;
use thiserror::Error;

/// Every failure the engine can report. Nothing is recovered locally: the
/// first error aborts the call and no partially expanded tree is returned.
#[derive(Error, Debug, Diagnostic)]
pub enum SpecError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Security(#[from] SecurityConfigError),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InputError {
    #[error("File not found: {path}")]
    #[diagnostic(
        code(input::file_not_found),
        help("Check that the path is correct and the file exists.")
    )]
    FileNotFound { path: String },

    #[error("Unsupported file extension '{extension}' for {path}")]
    #[diagnostic(
        code(input::unsupported_extension),
        help("Use a .yaml, .yml or .json document.")
    )]
    UnsupportedExtension { path: String, extension: String },

    #[error("Failed to read {path}")]
    #[diagnostic(code(input::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, Diagnostic)]
pub enum DecodeError {
    #[error("Malformed YAML document: {message}")]
    #[diagnostic(
        code(decode::yaml),
        help("The document could not be decoded into a service definition.")
    )]
    Yaml {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("Malformed JSON document: {message}")]
    #[diagnostic(
        code(decode::json),
        help("The document could not be decoded into a service definition.")
    )]
    Json {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
    },
}

/// Failures of the line-oriented document parser used for position tracking.
/// These never abort validation; the tracker falls back to the plain message.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ParserError {
    #[error("Unterminated quoted scalar")]
    #[diagnostic(
        code(parser::unterminated_string),
        help("A quoted scalar must be closed on the same line.")
    )]
    UnterminatedString {
        #[source_code]
        src: NamedSource<String>,
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("Tab character in indentation")]
    #[diagnostic(
        code(parser::tab_indentation),
        help("Indent block documents with spaces only.")
    )]
    TabIndentation {
        #[source_code]
        src: NamedSource<String>,
        #[label("tab found here")]
        span: SourceSpan,
    },
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum SecurityConfigError {
    #[error("security group '{group}': scheme {index} must have a 'name' field")]
    #[diagnostic(
        code(security::missing_name),
        help("Every scheme listed under a security group needs a `name`.")
    )]
    MissingName { group: String, index: usize },
}

/// The rule family a validation failure belongs to. Each maps to the document
/// key the position tracker searches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationCategory {
    InvalidOperation,
    InvalidType,
    InvalidModifier,
    InvalidRetry,
    InvalidTimeout,
}

impl ValidationCategory {
    /// The document key most closely associated with this category.
    pub fn key(self) -> &'static str {
        match self {
            ValidationCategory::InvalidOperation => "operations",
            ValidationCategory::InvalidType => "type",
            ValidationCategory::InvalidModifier => "modifiers",
            ValidationCategory::InvalidRetry => "retry",
            ValidationCategory::InvalidTimeout => "timeout",
        }
    }
}

impl Display for ValidationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ValidationCategory::InvalidOperation => "invalid operation",
            ValidationCategory::InvalidType => "invalid type",
            ValidationCategory::InvalidModifier => "invalid modifier",
            ValidationCategory::InvalidRetry => "invalid retry policy",
            ValidationCategory::InvalidTimeout => "invalid timeout",
        };
        f.write_str(text)
    }
}

/// A structural rule violation. `line`/`column` are 1-based and only present
/// when the position tracker located the offending key.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub category: ValidationCategory,
    pub message: String,
    /// The document key associated with the failure, e.g. `operations`.
    pub path: String,
    /// The offending token as written, when there is one.
    pub value: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub(crate) src: Option<NamedSource<String>>,
    pub(crate) span: Option<SourceSpan>,
}

impl ValidationError {
    pub fn new(category: ValidationCategory, message: impl Into<String>) -> Self {
        ValidationError {
            category,
            message: message.into(),
            path: category.key().to_string(),
            value: None,
            line: None,
            column: None,
            src: None,
            span: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attaches a position inside `src`. Used by the position tracker.
    pub fn located(
        mut self,
        src: NamedSource<String>,
        span: SourceSpan,
        line: usize,
        column: usize,
    ) -> Self {
        self.src = Some(src);
        self.span = Some(span);
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn has_position(&self) -> bool {
        self.line.is_some()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => {
                write!(f, "line {line}, column {column}: {}", self.message)
            }
            _ => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ValidationError {}

impl Diagnostic for ValidationError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let code = match self.category {
            ValidationCategory::InvalidOperation => "validation::invalid_operation",
            ValidationCategory::InvalidType => "validation::invalid_type",
            ValidationCategory::InvalidModifier => "validation::invalid_modifier",
            ValidationCategory::InvalidRetry => "validation::invalid_retry",
            ValidationCategory::InvalidTimeout => "validation::invalid_timeout",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        let help = match self.category {
            ValidationCategory::InvalidOperation => {
                "Operations are case-sensitive and must be one of Create, Read, Update, Delete."
            }
            ValidationCategory::InvalidType => {
                "A field type must be a primitive (UUID, Date, Timestamp, String, Int, Bool) or a declared enum or object."
            }
            ValidationCategory::InvalidModifier => {
                "Modifiers are case-sensitive and must be Nullable or Array."
            }
            ValidationCategory::InvalidRetry => {
                "Retry intervals must be non-negative, the initial interval must not exceed the maximum, and status codes look like 5XX or 503."
            }
            ValidationCategory::InvalidTimeout => "Timeouts must be non-negative.",
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.src.as_ref().map(|src| src as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(self.category.to_string()),
            span,
        ))))
    }
}
