/// Calculates the 1-based line and column number for a given byte position in the source text.
/// This function is designed to be called only when an error occurs, as it iterates through
/// the source text to determine the position.
pub fn get_line_and_column(source: &str, position: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;
    for (i, c) in source.char_indices() {
        if i >= position {
            break;
        }
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}

/// The inverse of [`get_line_and_column`]: byte offset of a 1-based line and
/// column, clamped to the end of the source.
pub fn get_byte_offset(source: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map_or(text.len(), |(idx, _)| idx);
            return offset + within;
        }
        offset += text.len();
    }
    source.len()
}

/// `OrderItems` -> `order-items`, `HTTPServer` -> `http-server`.
pub fn to_kebab_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' {
            if !result.is_empty() && !result.ends_with('-') {
                result.push('-');
            }
            continue;
        }
        if c.is_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_lowercase() || chars[i - 1].is_ascii_digit());
            let acronym_end = i > 0
                && chars[i - 1].is_uppercase()
                && chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if (prev_lower || acronym_end) && !result.ends_with('-') {
                result.push('-');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Turns a singular noun into its plural. Injected into the endpoint
/// synthesizer, which uses it for list and search wording.
pub trait Pluralizer {
    fn pluralize(&self, word: &str) -> String;
}

impl<F> Pluralizer for F
where
    F: Fn(&str) -> String,
{
    fn pluralize(&self, word: &str) -> String {
        self(word)
    }
}

/// Suffix-rule English pluralization. Words that already look plural
/// (`Users`, `orders`) are returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.is_empty() {
            return String::new();
        }
        if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
            return lower;
        }
        if lower.ends_with('y') {
            let before_y = lower.chars().rev().nth(1);
            if before_y.is_some_and(|c| !"aeiou".contains(c)) {
                return format!("{}ies", &lower[..lower.len() - 1]);
            }
            return format!("{lower}s");
        }
        if lower.ends_with('s')
            || lower.ends_with('x')
            || lower.ends_with('z')
            || lower.ends_with("sh")
            || lower.ends_with("ch")
        {
            return format!("{lower}es");
        }
        format!("{lower}s")
    }
}
