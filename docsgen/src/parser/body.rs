//! Body extraction for a block.

/// Every documentation line starts with this.
pub const COMMENT_PREFIX: &str = "//";

/// Minimum indentation of a body line, and the width below which an
/// indented comment line stops being a candidate body line.
const MIN_INDENT: usize = 2;

/// The body lines of one block and the index of the first line after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub lines: Vec<String>,
    pub next: usize,
}

/// A comment line indented less than the block's first body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnderIndented {
    /// Index of the offending line; scanning resumes here.
    pub line: usize,
}

/// Consume the body that follows a header.
///
/// `start` is the index right after the header. The first body line fixes
/// the indent width; every consumed line loses the comment prefix plus
/// exactly that many characters, and its trailing whitespace.
pub fn extract_body<S: AsRef<str>>(lines: &[S], start: usize) -> Result<Body, UnderIndented> {
    let mut indent = MIN_INDENT;
    let mut first_line = true;
    let mut body = Vec::new();
    let mut idx = start;

    while let Some(line) = lines.get(idx) {
        let Some(rest) = line.as_ref().strip_prefix(COMMENT_PREFIX) else {
            break;
        };
        let spaces = rest.bytes().take_while(|b| *b == b' ').count();
        if spaces < indent {
            if spaces >= MIN_INDENT {
                return Err(UnderIndented { line: idx });
            }
            break;
        }
        if first_line {
            first_line = false;
            indent = rest.len() - rest.trim_start().len();
        }
        body.push(rest[indent..].trim_end().to_string());
        idx += 1;
    }

    Ok(Body { lines: body, next: idx })
}
