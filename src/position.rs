//! Best-effort mapping of validation failures back to source positions.
//!
//! This is a heuristic, not a source map: the decoded tree carries no
//! positions, so the tracker searches the document for the first key
//! associated with the failure's category. When the failure names an
//! offending token, a key whose value mentions that token wins over an
//! earlier bare occurrence of the key.

use crate::ast::{DocDocument, DocNode, DocNodeKind};
use crate::error::ValidationError;
use crate::parser::Parser;
use crate::utils::get_line_and_column;
use miette::NamedSource;

/// Attaches line and column to `error` when the document reveals where it
/// came from. Any failure to parse or to find a match returns the error
/// unchanged.
pub fn enhance(error: ValidationError, source: &str, file_name: &str) -> ValidationError {
    if error.has_position() {
        return error;
    }

    let mut parser = Parser::new_with_name(source, file_name.to_string());
    let document = match parser.parse_document() {
        Ok(document) => document,
        Err(err) => {
            log::warn!("position tracking skipped for {file_name}: {err}");
            return error;
        }
    };

    match locate(&document, &error) {
        Some(node) => {
            let (line, column) = get_line_and_column(source, node.pos_start);
            let span = (node.pos_start, key_len(node)).into();
            log::debug!("located '{}' failure at {line}:{column}", error.path);
            error.located(
                NamedSource::new(file_name, source.to_string()),
                span,
                line,
                column,
            )
        }
        None => {
            log::warn!(
                "no '{}' key found in {file_name}; reporting without position",
                error.path
            );
            error
        }
    }
}

/// Finds the node the error most plausibly refers to.
pub fn locate<'a>(document: &'a DocDocument, error: &ValidationError) -> Option<&'a DocNode> {
    let key = error.path.as_str();

    if let Some(token) = error.value.as_deref() {
        let with_token = document.find(&|node| node.key() == Some(key) && mentions(node, token));
        if with_token.is_some() {
            return with_token;
        }
    }

    document.find(&|node| node.key() == Some(key))
}

/// Whether an entry's inline value or any of its direct list items carries `token`.
fn mentions(node: &DocNode, token: &str) -> bool {
    if node.value().is_some_and(|v| contains_word(v, token)) {
        return true;
    }
    node.children.iter().any(|child| match &child.kind {
        DocNodeKind::Item => child
            .children
            .first()
            .and_then(DocNode::value)
            .is_some_and(|v| contains_word(v, token)),
        DocNodeKind::Scalar(v) => contains_word(v, token),
        DocNodeKind::Entry { .. } => false,
    })
}

/// Word match so that `create` does not hit `Created`.
fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    text.match_indices(word).any(|(i, _)| {
        let before = text[..i].chars().next_back();
        let after = text[i + word.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn key_len(node: &DocNode) -> usize {
    node.key().map_or(node.pos_end - node.pos_start, str::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationCategory;

    const SOURCE: &str = "\
name: Shop
resources:
  - name: Users
    operations: [Read]
    fields:
      - name: email
        type: String
        operations: [Read]
  - name: Orders
    operations: [Create, Read]
    fields:
      - name: status
        type: String
        operations:
          - create
";

    #[test]
    fn test_first_key_occurrence() {
        let error = ValidationError::new(ValidationCategory::InvalidType, "bad type");
        let located = enhance(error, SOURCE, "shop.yaml");
        assert_eq!(located.line, Some(7));
        assert_eq!(located.column, Some(9));
    }

    #[test]
    fn test_offending_token_preferred() {
        let error = ValidationError::new(ValidationCategory::InvalidOperation, "bad op")
            .with_value("create");
        let located = enhance(error, SOURCE, "shop.yaml");
        assert_eq!(located.line, Some(14));
        assert_eq!(located.column, Some(9));
    }

    #[test]
    fn test_missing_key_returns_plain_error() {
        let error = ValidationError::new(ValidationCategory::InvalidModifier, "bad modifier");
        let plain = enhance(error, SOURCE, "shop.yaml");
        assert!(!plain.has_position());
        assert_eq!(plain.to_string(), "bad modifier");
    }

    #[test]
    fn test_unparseable_document_returns_plain_error() {
        let error = ValidationError::new(ValidationCategory::InvalidType, "bad type");
        let plain = enhance(error, "a:\n\ttype: x\n", "tabs.yaml");
        assert!(!plain.has_position());
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("[Read, create]", "create"));
        assert!(!contains_word("[Created]", "create"));
        assert!(!contains_word("anything", ""));
    }
}
