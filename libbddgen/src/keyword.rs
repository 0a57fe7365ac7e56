//! Keyword Matcher
//!
//! Holds the table of recognized keyword spellings per structural level and
//! matches a single line against it. A line is recognized when its first
//! word-like token (after leading spaces and tabs) equals one of the forms,
//! ignoring case. Anything between the keyword and the first colon is
//! ignored; the title is whatever follows that colon.

/// Structural level of a recognized keyword line.
///
/// Ordered from coarsest to finest, so `Precondition < Action < Expectation`
/// and the tree builder can compare nesting with plain `>=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Top-level scenario wrapper.
    Scenario,
    /// Given / Dáno.
    Precondition,
    /// When / Když.
    Action,
    /// Then / Pak.
    Expectation,
}

impl Level {
    /// All levels, coarsest first.
    pub const ALL: [Level; 4] = [
        Level::Scenario,
        Level::Precondition,
        Level::Action,
        Level::Expectation,
    ];

    /// Name of the Catch macro that opens a block of this level.
    pub fn call_name(self) -> &'static str {
        match self {
            Level::Scenario => "SCENARIO",
            Level::Precondition => "GIVEN",
            Level::Action => "WHEN",
            Level::Expectation => "THEN",
        }
    }

    /// Inverse of [`Level::call_name`]. Case-sensitive, as the macros are.
    pub fn from_call_name(name: &str) -> Option<Level> {
        Level::ALL.into_iter().find(|level| level.call_name() == name)
    }
}

/// Recognized spellings for one structural level.
#[derive(Debug, Clone, Copy)]
pub struct KeywordVariant {
    pub level: Level,
    pub forms: &'static [&'static str],
}

/// The keyword table. Supporting another language means adding forms here.
pub static KEYWORDS: [KeywordVariant; 4] = [
    KeywordVariant {
        level: Level::Scenario,
        forms: &["Scénář", "Scenario", "Příklad", "Example"],
    },
    KeywordVariant {
        level: Level::Precondition,
        forms: &["Dáno", "Given"],
    },
    KeywordVariant {
        level: Level::Action,
        forms: &["Když", "When"],
    },
    KeywordVariant {
        level: Level::Expectation,
        forms: &["Pak", "Then"],
    },
];

/// Spellings of the feature header line (`Feature: ...`). Not a structural
/// level; the line is copied into the generated file as a comment.
pub static HEADER_FORMS: &[&str] = &["Feature", "Požadavek"];

/// Spellings of the line opening a user story block. Multi-word forms match
/// word by word; the block is copied into the generated file as comments.
pub static STORY_FORMS: &[&str] = &["User story", "Story", "Uživatelský požadavek"];

/// Result of matching one line against the keyword table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    pub level: Level,
    pub title: String,
}

/// Match a line against the keyword table.
///
/// Returns `None` for plain content, which is a normal outcome.
pub fn match_keyword(line: &str) -> Option<KeywordMatch> {
    let token = leading_token(line)?;
    let level = KEYWORDS
        .iter()
        .find(|variant| variant.forms.iter().any(|form| same_word(form, token)))?
        .level;

    Some(KeywordMatch {
        level,
        title: extract_title(line),
    })
}

/// Returns `true` when the line starts with a feature header keyword.
pub fn is_header(line: &str) -> bool {
    leading_token(line)
        .map(|token| HEADER_FORMS.iter().any(|form| same_word(form, token)))
        .unwrap_or(false)
}

/// Returns `true` when the line opens a user story (`User story: ...`).
///
/// The words before the first colon must start with one of the story forms;
/// anything after those words is ignored, as for keywords.
pub fn is_story(line: &str) -> bool {
    let Some((label, _)) = line.split_once(':') else {
        return false;
    };
    let words: Vec<&str> = label.split_whitespace().collect();
    STORY_FORMS.iter().any(|form| {
        let form_words: Vec<&str> = form.split_whitespace().collect();
        words.len() >= form_words.len()
            && form_words
                .iter()
                .zip(&words)
                .all(|(f, w)| same_word(f, w))
    })
}

/// Text after the first colon, trimmed. Empty when there is no colon.
pub fn extract_title(line: &str) -> String {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    }
}

/// The maximal run of alphabetic characters after leading spaces and tabs.
fn leading_token(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches([' ', '\t']);
    let end = rest
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if end == 0 {
        None
    } else {
        Some(&rest[..end])
    }
}

/// Case-insensitive comparison. Full Unicode lowercasing, so `SCÉNÁŘ`
/// matches `Scénář` but `Scenar` does not.
fn same_word(form: &str, token: &str) -> bool {
    form.to_lowercase() == token.to_lowercase()
}
