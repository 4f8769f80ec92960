use crate::ast::{DocDocument, DocNode, DocNodeKind};
use crate::error::ParserError;
use crate::lexer::{Lexer, Token, TokenType};
use miette::NamedSource;

/// A piece of text with its byte span.
#[derive(Debug, Clone)]
struct Spanned {
    text: String,
    pos_start: usize,
    pos_end: usize,
}

/// One logical line of the document: optional dash, optional key, optional scalar.
#[derive(Debug, Clone)]
struct Line {
    indent: usize,
    /// Column where the content after a dash starts.
    content_column: usize,
    dash: Option<(usize, usize)>,
    key: Option<Spanned>,
    value: Option<Spanned>,
}

impl Line {
    fn has_content(&self) -> bool {
        self.dash.is_some() || self.key.is_some() || self.value.is_some()
    }

    fn key_column(&self) -> usize {
        if self.dash.is_some() {
            self.content_column
        } else {
            self.indent
        }
    }

    /// `|` and `>` introduce block scalars whose lines are plain text.
    fn opens_block_scalar(&self) -> bool {
        self.value
            .as_ref()
            .is_some_and(|v| v.text.starts_with('|') || v.text.starts_with('>'))
    }

    fn pos_end(&self) -> usize {
        self.value
            .as_ref()
            .map(|v| v.pos_end)
            .or_else(|| self.key.as_ref().map(|k| k.pos_end))
            .or_else(|| self.dash.map(|(_, end)| end))
            .unwrap_or(0)
    }
}

/// Builds a position-annotated tree out of a block-style document by indentation.
#[derive(Debug)]
pub struct Parser<'a> {
    source: NamedSource<String>,
    tokens: Vec<Token>,
    source_text: &'a str,
    lines: Vec<Line>,
    position: usize,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, "source.yaml".to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        let source = NamedSource::new(name, source_text.to_string());
        let mut lexer = Lexer::new(source_text);
        let tokens = lexer
            .lex()
            .into_iter()
            .filter(|t| !matches!(t.ttype, TokenType::Comment(_)))
            .collect();

        Self {
            source,
            tokens,
            source_text,
            lines: Vec::new(),
            position: 0,
        }
    }

    pub fn parse_document(&mut self) -> Result<DocDocument, ParserError> {
        self.lines = self.collect_lines()?;
        self.position = 0;

        let mut nodes = Vec::new();
        while let Some(indent) = self.peek_line().map(|l| l.indent) {
            nodes.extend(self.parse_block(indent));
        }
        Ok(DocDocument { nodes })
    }

    // === Line grouping ===

    fn collect_lines(&self) -> Result<Vec<Line>, ParserError> {
        let mut lines = Vec::new();
        let mut current: Option<Line> = None;
        let mut line_start = 0;
        let mut marker_line = false;
        let mut pending_error: Option<ParserError> = None;
        // Lines deeper than this belong to a block scalar.
        let mut block_scalar_indent: Option<usize> = None;

        for token in &self.tokens {
            match &token.ttype {
                TokenType::Indent(width) => {
                    line_start = token.pos_start;
                    marker_line = false;
                    pending_error = None;
                    current = Some(Line {
                        indent: *width,
                        content_column: *width,
                        dash: None,
                        key: None,
                        value: None,
                    });
                }
                TokenType::Newline | TokenType::Eof => {
                    let Some(line) = current.take() else { continue };
                    let unterminated =
                        matches!(pending_error, Some(ParserError::UnterminatedString { .. }));
                    if marker_line || !(line.has_content() || unterminated) {
                        continue;
                    }
                    if let Some(indent) = block_scalar_indent {
                        if line.indent > indent {
                            continue;
                        }
                        block_scalar_indent = None;
                    }
                    if let Some(err) = pending_error.take() {
                        return Err(err);
                    }
                    if line.opens_block_scalar() {
                        block_scalar_indent = Some(line.key_column());
                    }
                    lines.push(line);
                }
                TokenType::Whitespace => {
                    let Some(line) = current.as_ref() else { continue };
                    let text = &self.source_text[token.pos_start..token.pos_end];
                    if !line.has_content() && text.contains('\t') && pending_error.is_none() {
                        pending_error = Some(ParserError::TabIndentation {
                            src: self.source.clone(),
                            span: (token.pos_start, token.pos_end - token.pos_start).into(),
                        });
                    }
                }
                TokenType::DocumentMarker => marker_line = true,
                TokenType::Unknown => {
                    if pending_error.is_none() {
                        pending_error = Some(ParserError::UnterminatedString {
                            src: self.source.clone(),
                            span: (token.pos_start, token.pos_end - token.pos_start).into(),
                        });
                    }
                }
                TokenType::Dash => {
                    let Some(line) = current.as_mut() else { continue };
                    if line.dash.is_none() && line.key.is_none() && line.value.is_none() {
                        line.dash = Some((token.pos_start, token.pos_end));
                    }
                }
                TokenType::Key(text) => {
                    let Some(line) = current.as_mut() else { continue };
                    if line.key.is_none() && line.value.is_none() {
                        line.content_column = token.pos_start - line_start;
                        line.key = Some(spanned(text, token));
                    }
                }
                TokenType::Scalar(text) => {
                    let Some(line) = current.as_mut() else { continue };
                    if line.value.is_none() {
                        if line.key.is_none() {
                            line.content_column = token.pos_start - line_start;
                        }
                        line.value = Some(spanned(text, token));
                    }
                }
                TokenType::Comment(_) => {}
            }
        }
        Ok(lines)
    }

    // === Tree building ===

    /// Block ::= { Line at `indent` [ deeper Block ] }
    fn parse_block(&mut self, indent: usize) -> Vec<DocNode> {
        let mut nodes: Vec<DocNode> = Vec::new();
        while let Some(next_indent) = self.peek_line().map(|l| l.indent) {
            if next_indent < indent {
                break;
            }
            if next_indent > indent {
                // Over-indented lines hang off the previous node.
                let children = self.parse_block(next_indent);
                match nodes.last_mut() {
                    Some(last) => last.children.extend(children),
                    None => nodes.extend(children),
                }
                continue;
            }
            if let Some(line) = self.next_line() {
                nodes.push(self.parse_line(line));
            }
        }
        nodes
    }

    /// Item ::= "-" [ Content { Line at content column } ]
    fn parse_line(&mut self, line: Line) -> DocNode {
        let Some((dash_start, dash_end)) = line.dash else {
            return self.parse_content(&line, line.indent);
        };

        let mut children = Vec::new();
        if line.key.is_some() || line.value.is_some() {
            let column = line.content_column;
            children.push(self.parse_content(&line, column));
            if self.peek_line().is_some_and(|l| l.indent == column) {
                children.extend(self.parse_block(column));
            }
        } else if let Some(next_indent) = self.peek_line().map(|l| l.indent) {
            if next_indent > line.indent {
                children = self.parse_block(next_indent);
            }
        }

        DocNode {
            kind: DocNodeKind::Item,
            children,
            pos_start: dash_start,
            pos_end: line.pos_end().max(dash_end),
        }
    }

    /// Content ::= Key [ Scalar ] [ nested Block | same-column Items ] | Scalar
    fn parse_content(&mut self, line: &Line, column: usize) -> DocNode {
        let Some(key) = &line.key else {
            let value = line.value.clone().map(|v| (v.text, v.pos_start, v.pos_end));
            let (text, start, end) = value.unwrap_or_default();
            return DocNode {
                kind: DocNodeKind::Scalar(text),
                children: Vec::new(),
                pos_start: start,
                pos_end: end,
            };
        };

        let mut node = DocNode {
            kind: DocNodeKind::Entry {
                key: key.text.clone(),
                value: line.value.as_ref().map(|v| v.text.clone()),
            },
            children: Vec::new(),
            pos_start: key.pos_start,
            pos_end: line.pos_end(),
        };

        if let Some((next_indent, next_is_item)) =
            self.peek_line().map(|l| (l.indent, l.dash.is_some()))
        {
            if next_indent > column {
                node.children = self.parse_block(next_indent);
            } else if next_indent == column && next_is_item && line.value.is_none() {
                // `key:` followed by `- item` at the same column
                node.children = self.parse_items(column);
            }
        }
        node
    }

    fn parse_items(&mut self, indent: usize) -> Vec<DocNode> {
        let mut nodes = Vec::new();
        while self
            .peek_line()
            .is_some_and(|l| l.indent == indent && l.dash.is_some())
        {
            if let Some(line) = self.next_line() {
                nodes.push(self.parse_line(line));
            }
        }
        nodes
    }

    // === Line cursor helpers ===

    fn peek_line(&self) -> Option<&Line> {
        self.lines.get(self.position)
    }

    fn next_line(&mut self) -> Option<Line> {
        let line = self.lines.get(self.position).cloned();
        if line.is_some() {
            self.position += 1;
        }
        line
    }
}

fn spanned(text: &str, token: &Token) -> Spanned {
    Spanned {
        text: text.to_string(),
        pos_start: token.pos_start,
        pos_end: token.pos_end,
    }
}
