pub mod api;
pub mod ast;
pub mod defaults;
pub mod endpoints;
pub mod error;
pub mod filters;
pub mod graph;
pub mod lexer;
pub mod materialize;
pub mod model;
pub mod overlay;
pub mod parser;
pub mod position;
pub mod request_errors;
pub mod security;
pub mod types;
pub mod utils;
pub mod validator;

pub use api::{
    analyze, analyze_file, analyze_with_options, load, parse_service, validate_document,
    AnalysisResult, AnalyzeOptions, Format,
};
pub use error::SpecError;
pub use overlay::Overlay;
