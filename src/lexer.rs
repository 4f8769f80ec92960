/// Represents the different kinds of tokens produced for a line-oriented document.
/// The lexer understands just enough block-style YAML to locate keys: indentation,
/// sequence dashes, `key:` pairs and the scalar that follows them.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // == Special Tokens ==
    /// Represents the end of the input.
    Eof,
    /// A line break. The next token is always an `Indent`.
    Newline,
    /// Leading spaces of a line. The associated value is the number of spaces.
    Indent(usize),
    /// Spaces, tabs or carriage returns that are not leading indentation.
    Whitespace,
    /// A comment, starting with `#` and continuing to the end of the line.
    /// The associated `String` contains the content of the comment.
    Comment(String),
    /// A `---` or `...` document marker line.
    DocumentMarker,
    /// A quoted scalar that is never closed.
    Unknown,

    // == Structure ==
    /// A sequence entry marker: `- `
    Dash,
    /// A mapping key, without its trailing colon. Quotes are removed.
    Key(String),
    /// Scalar text: the value after a key, a bare sequence item, or a flow collection.
    Scalar(String),
}

/// A token with its type and byte position
#[derive(Debug, Clone)]
pub struct Token {
    pub ttype: TokenType,
    pub pos_start: usize,
    pub pos_end: usize,
}

impl Token {
    pub fn new(ttype: TokenType, pos_start: usize, pos_end: usize) -> Token {
        Token {
            ttype,
            pos_start,
            pos_end,
        }
    }
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    at_line_start: bool,
    // After a key, the rest of the line is a single scalar.
    in_value: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            at_line_start: true,
            in_value: false,
        }
    }

    pub fn lex(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.ttype == TokenType::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    pub fn next_token(&mut self) -> Token {
        let start_pos = self.position;

        if self.at_line_start {
            self.at_line_start = false;
            self.in_value = false;
            let mut width = 0;
            while self.peek() == Some(' ') {
                self.advance();
                width += 1;
            }
            return Token::new(TokenType::Indent(width), start_pos, self.position);
        }

        let ttype = if let Some(c) = self.peek() {
            match c {
                '\n' => {
                    self.advance();
                    self.at_line_start = true;
                    TokenType::Newline
                }
                ' ' | '\t' | '\r' => self.read_whitespace(),
                '#' if self.follows_whitespace() => self.read_comment(),
                '-' if self.is_document_marker() => self.read_document_marker(),
                '.' if self.is_document_marker() => self.read_document_marker(),
                '-' if !self.in_value && self.dash_ends_here() => {
                    self.advance();
                    TokenType::Dash
                }
                _ if self.in_value => self.read_value(),
                '"' | '\'' => self.read_quoted(c),
                '[' | '{' => {
                    self.in_value = true;
                    self.read_value()
                }
                _ => self.read_plain(),
            }
        } else {
            TokenType::Eof
        };

        Token::new(ttype, start_pos, self.position)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn follows_whitespace(&self) -> bool {
        self.input[..self.position]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace)
    }

    fn dash_ends_here(&self) -> bool {
        matches!(self.rest()[1..].chars().next(), None | Some(' ' | '\n' | '\r'))
    }

    fn is_document_marker(&self) -> bool {
        let line_start = self.input[..self.position]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        if line_start != self.position {
            return false;
        }
        let rest = self.rest();
        (rest.starts_with("---") || rest.starts_with("..."))
            && matches!(rest[3..].chars().next(), None | Some(' ' | '\n' | '\r'))
    }

    fn read_whitespace(&mut self) -> TokenType {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
        TokenType::Whitespace
    }

    fn read_comment(&mut self) -> TokenType {
        self.advance(); // Consume the '#'
        let comment_text = self.take_line();
        TokenType::Comment(comment_text.trim().to_string())
    }

    fn read_document_marker(&mut self) -> TokenType {
        self.take_line();
        TokenType::DocumentMarker
    }

    /// Consumes up to (not including) the next line break.
    fn take_line(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.find('\n').unwrap_or(rest.len());
        self.position += len;
        &rest[..len]
    }

    /// The remainder of a line after a key, minus any trailing comment.
    fn read_value(&mut self) -> TokenType {
        let rest = self.rest();
        let line_len = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_len];
        let len = find_comment(line).unwrap_or(line.len());
        self.position += len;
        TokenType::Scalar(unquote(line[..len].trim_end()).to_string())
    }

    fn read_quoted(&mut self, quote: char) -> TokenType {
        self.advance(); // Consume the opening quote
        let mut value = String::new();
        loop {
            if matches!(self.peek(), Some('\n') | None) {
                return TokenType::Unknown;
            }
            match self.advance() {
                Some('\\') if quote == '"' => {
                    if let Some(escaped) = self.advance() {
                        value.push(escaped);
                    }
                }
                Some(c) if c == quote => {
                    // '' is an escaped quote inside single-quoted scalars
                    if quote == '\'' && self.peek() == Some('\'') {
                        self.advance();
                        value.push('\'');
                        continue;
                    }
                    break;
                }
                Some(c) => value.push(c),
                None => return TokenType::Unknown,
            }
        }

        let after = self.rest();
        let trimmed = after.trim_start_matches([' ', '\t']);
        if let Some(tail) = trimmed.strip_prefix(':') {
            if matches!(tail.chars().next(), None | Some(' ' | '\n' | '\r')) {
                self.position += after.len() - tail.len();
                self.in_value = true;
                return TokenType::Key(value);
            }
        }
        self.in_value = true;
        TokenType::Scalar(value)
    }

    /// Plain text up to `: `, a comment, or the end of the line.
    fn read_plain(&mut self) -> TokenType {
        let rest = self.rest();
        let line_len = rest.find('\n').unwrap_or(rest.len());
        let line = &rest[..line_len];
        let bytes = line.as_bytes();

        for (i, &b) in bytes.iter().enumerate() {
            if b == b':' && matches!(bytes.get(i + 1), None | Some(b' ' | b'\t' | b'\r')) {
                self.position += i + 1;
                self.in_value = true;
                return TokenType::Key(line[..i].trim_end().to_string());
            }
            if b == b'#' && i > 0 && matches!(bytes[i - 1], b' ' | b'\t') {
                self.position += i;
                return TokenType::Scalar(line[..i].trim_end().to_string());
            }
        }

        self.position += line_len;
        TokenType::Scalar(line.trim_end().to_string())
    }
}

/// Byte offset of a ` #` comment start inside a value, ignoring quoted text.
fn find_comment(line: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut prev = ' ';
    for (i, c) in line.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '#' && (prev == ' ' || prev == '\t') => return Some(i),
            None => {}
        }
        prev = c;
    }
    None
}

fn unquote(s: &str) -> &str {
    for q in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(q) && s.ends_with(q) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
