//! Skeleton Reader
//!
//! Reads a generated (and possibly hand-edited) skeleton back into a
//! [`Document`]. Nesting comes from braces rather than keyword order, so
//! reading the emitter's output reproduces the tree it was rendered from.
//!
//! A call line is `NAME("title") {` on a line of its own. Extra string
//! arguments (Catch tags) are accepted and ignored, a `//` comment may follow
//! the brace, and the brace may sit alone on the next line. A line that
//! starts with a call name and an opening parenthesis but has none of these
//! shapes is an error. Every other line is test code: its braces open and
//! close anonymous blocks so that code written into a block body does not
//! disturb the structure.

use crate::error::{ReadContext, Result, SkeletonError};
use crate::keyword::{is_header, is_story, Level};
use crate::tree::{Document, TreeBuilder};

/// An open brace and what opened it.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Wrapper { level: Level, line: usize, col: usize },
    Code { line: usize, col: usize },
}

/// A recognized call, located at its name.
#[derive(Debug)]
struct Call {
    level: Level,
    title: String,
    line: usize,
    col: usize,
}

impl Call {
    fn malformed(&self, ctx: &ReadContext) -> SkeletonError {
        SkeletonError::MalformedCall(self.level.call_name().to_string(), String::new())
            .with_location(ctx, self.line, self.col)
    }
}

/// Read a skeleton from a string.
pub fn read_skeleton(source: &str) -> Result<Document> {
    read_skeleton_with_filename(source, None)
}

/// Read a skeleton from a string with a filename for error messages.
pub fn read_skeleton_with_filename(source: &str, filename: Option<&str>) -> Result<Document> {
    let ctx = ReadContext::new(filename);
    let mut reader = SkeletonReader {
        ctx: &ctx,
        builder: TreeBuilder::default(),
        frames: Vec::new(),
        pending: None,
        in_block_comment: false,
    };

    for (line_idx, line) in source.lines().enumerate() {
        let line = if line_idx == 0 {
            line.trim_start_matches('\u{feff}')
        } else {
            line
        };
        reader.read_line(line, line_idx)?;
    }

    reader.finish()
}

struct SkeletonReader<'a> {
    ctx: &'a ReadContext,
    builder: TreeBuilder,
    frames: Vec<Frame>,
    /// Call whose opening brace is expected on a following line.
    pending: Option<Call>,
    in_block_comment: bool,
}

impl SkeletonReader<'_> {
    fn read_line(&mut self, line: &str, line_idx: usize) -> Result<()> {
        if let Some(call) = self.pending.take() {
            return self.read_pending_brace(call, line, line_idx);
        }

        if !self.in_block_comment {
            if let Some((call, has_brace)) = parse_call(line, line_idx, self.ctx)? {
                self.builder.end_story();
                if has_brace {
                    return self.open_wrapper(call);
                }
                self.pending = Some(call);
                return Ok(());
            }

            if let Some(comment) = line.trim_start().strip_prefix("//") {
                self.read_comment(comment);
                return Ok(());
            }
        }

        self.builder.end_story();
        self.scan_code(line, line_idx, 0)
    }

    /// Header and user story lines, copied as `// <text>` comments.
    fn read_comment(&mut self, comment: &str) {
        let text = comment.strip_prefix(' ').unwrap_or(comment);
        if self.builder.story_line(text) {
            return;
        }
        let text = text.trim();
        if is_header(text) {
            self.builder.set_header(text);
        } else if is_story(text) {
            self.builder.begin_story(text);
        }
    }

    fn read_pending_brace(&mut self, call: Call, line: &str, line_idx: usize) -> Result<()> {
        let rest = line.trim_start();
        if rest.is_empty() {
            self.pending = Some(call);
            return Ok(());
        }
        if !rest.starts_with('{') {
            return Err(call.malformed(self.ctx));
        }

        let brace_col = line[..line.len() - rest.len()].chars().count();
        self.open_wrapper(call)?;
        self.scan_code(line, line_idx, brace_col + 1)
    }

    fn open_wrapper(&mut self, call: Call) -> Result<()> {
        let Call {
            level,
            title,
            line,
            col,
        } = call;
        let in_wrapper = self
            .frames
            .iter()
            .any(|f| matches!(f, Frame::Wrapper { .. }));

        if level == Level::Scenario {
            if in_wrapper {
                return Err(
                    SkeletonError::NestedScenario(String::new()).with_location(self.ctx, line, col)
                );
            }
            self.builder.open_scenario(&title);
        } else {
            if !in_wrapper {
                return Err(SkeletonError::StepOutsideScenario(
                    level.call_name().to_string(),
                    String::new(),
                )
                .with_location(self.ctx, line, col));
            }
            self.builder.push_step(level, &title);
        }

        self.frames.push(Frame::Wrapper { level, line, col });
        Ok(())
    }

    /// Track braces in a line of test code from char index `start`,
    /// skipping literals and comments.
    fn scan_code(&mut self, line: &str, line_idx: usize, start: usize) -> Result<()> {
        let chars: Vec<char> = line.chars().collect();
        let mut i = start;

        while i < chars.len() {
            let c = chars[i];

            if self.in_block_comment {
                if c == '*' && chars.get(i + 1) == Some(&'/') {
                    self.in_block_comment = false;
                    i += 1;
                }
                i += 1;
                continue;
            }

            match c {
                '/' if chars.get(i + 1) == Some(&'/') => break,
                '/' if chars.get(i + 1) == Some(&'*') => {
                    self.in_block_comment = true;
                    i += 1;
                }
                '"' | '\'' => {
                    i = skip_literal(&chars, i);
                    continue;
                }
                '{' => self.frames.push(Frame::Code {
                    line: line_idx,
                    col: i,
                }),
                '}' => self.close_brace(line_idx, i)?,
                _ => {}
            }
            i += 1;
        }

        Ok(())
    }

    fn close_brace(&mut self, line: usize, col: usize) -> Result<()> {
        match self.frames.pop() {
            Some(Frame::Wrapper { .. }) => {
                self.builder.close_innermost();
                Ok(())
            }
            Some(Frame::Code { .. }) => Ok(()),
            None => {
                Err(SkeletonError::UnmatchedBrace(String::new()).with_location(self.ctx, line, col))
            }
        }
    }

    fn finish(self) -> Result<Document> {
        if let Some(call) = &self.pending {
            return Err(call.malformed(self.ctx));
        }
        if let Some(frame) = self.frames.last() {
            let (what, line, col) = match *frame {
                Frame::Wrapper { level, line, col } => (level.call_name(), line, col),
                Frame::Code { line, col } => ("code", line, col),
            };
            return Err(SkeletonError::UnclosedBlock(what.to_string(), String::new())
                .with_location(self.ctx, line, col));
        }
        Ok(self.builder.finish())
    }
}

/// Recognize a call line. Returns the call and whether its opening brace
/// is on the same line, or `Ok(None)` when the line does not start with a
/// call name followed by `(`.
fn parse_call(line: &str, line_idx: usize, ctx: &ReadContext) -> Result<Option<(Call, bool)>> {
    let rest = line.trim_start_matches([' ', '\t']);
    let name_end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    let Some(level) = Level::from_call_name(&rest[..name_end]) else {
        return Ok(None);
    };
    let Some(args) = rest[name_end..].trim_start().strip_prefix('(') else {
        return Ok(None);
    };

    let mut call = Call {
        level,
        title: String::new(),
        line: line_idx,
        col: line[..line.len() - rest.len()].chars().count(),
    };

    let mut tail = args.trim_start();
    if let Some(after) = tail.strip_prefix(')') {
        tail = after;
    } else {
        let mut first = true;
        loop {
            let Some(literal) = tail.strip_prefix('"') else {
                return Err(call.malformed(ctx));
            };
            let quote_col = line[..line.len() - tail.len()].chars().count();
            let (text, consumed) = decode_c_string(literal)
                .map_err(|e| e.with_location(ctx, line_idx, quote_col))?;
            // Later arguments are tags
            if first {
                call.title = text;
                first = false;
            }

            tail = literal[consumed..].trim_start();
            if let Some(after) = tail.strip_prefix(',') {
                tail = after.trim_start();
            } else if let Some(after) = tail.strip_prefix(')') {
                tail = after;
                break;
            } else {
                return Err(call.malformed(ctx));
            }
        }
    }

    let tail = tail.trim();
    if tail.is_empty() {
        return Ok(Some((call, false)));
    }
    match tail.strip_prefix('{').map(str::trim_start) {
        Some(after) if after.is_empty() || after.starts_with("//") => Ok(Some((call, true))),
        _ => Err(call.malformed(ctx)),
    }
}

/// Decode the body of a C string literal whose opening quote has already
/// been consumed. Returns the text and the number of bytes consumed,
/// including the closing quote.
fn decode_c_string(s: &str) -> Result<(String, usize)> {
    let mut out = String::new();
    let mut chars = s.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' => return Ok((out, idx + 1)),
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    return Err(SkeletonError::UnterminatedString(String::new()));
                };
                let decoded = match esc {
                    '"' => '"',
                    '\\' => '\\',
                    '\'' => '\'',
                    '?' => '?',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'b' => '\x08',
                    'f' => '\x0c',
                    '0'..='7' => {
                        let mut digits = esc.to_string();
                        digits.push_str(&take_digits(&mut chars, 8, 2));
                        code_point(&digits, 8)?
                    }
                    'x' => code_point(&take_digits(&mut chars, 16, usize::MAX), 16)?,
                    'u' => fixed_code_point(&take_digits(&mut chars, 16, 4), 4)?,
                    'U' => fixed_code_point(&take_digits(&mut chars, 16, 8), 8)?,
                    _ => return Err(SkeletonError::BadEscape(String::new())),
                };
                out.push(decoded);
            }
            c => out.push(c),
        }
    }

    Err(SkeletonError::UnterminatedString(String::new()))
}

/// Consume up to `max` digits of the given radix.
fn take_digits(chars: &mut std::str::CharIndices<'_>, radix: u32, max: usize) -> String {
    let mut digits = String::new();
    while digits.len() < max {
        match chars.clone().next() {
            Some((_, d)) if d.is_digit(radix) => {
                digits.push(d);
                chars.next();
            }
            _ => break,
        }
    }
    digits
}

fn code_point(digits: &str, radix: u32) -> Result<char> {
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| SkeletonError::BadEscape(String::new()))
}

fn fixed_code_point(digits: &str, width: usize) -> Result<char> {
    if digits.len() != width {
        return Err(SkeletonError::BadEscape(String::new()));
    }
    code_point(digits, 16)
}

/// Skip a string or character literal starting at `start`. Returns the
/// index just past the closing quote, or the end of the line.
fn skip_literal(chars: &[char], start: usize) -> usize {
    let quote = chars[start];
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}
