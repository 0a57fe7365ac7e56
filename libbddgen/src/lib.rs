//! Catch test skeleton generator for BDD analysis documents.
//!
//! Requirement authors describe behavior as scenarios in plain text, in
//! Czech or English:
//!
//! ```text
//! Scénář: přihlášení
//!     Dáno: registrovaný uživatel
//!     Když: zadá správné heslo
//!     Pak: je přihlášen
//! ```
//!
//! This crate turns such a document into nested Catch blocks
//! (`SCENARIO`, `GIVEN`, `WHEN`, `THEN`) ready to be filled with test code.
//!
//! # Pipeline
//!
//! Generation runs in three phases over one document:
//!
//! 1. **Classifier**: Tags each line as a scenario line, a step line, or
//!    plain content, using the keyword table.
//!
//! 2. **Tree Builder**: Folds the tagged lines into scenarios with nested
//!    steps. Nesting follows keyword order; indentation is irrelevant.
//!
//! 3. **Emitter**: Renders the tree as Catch blocks, or nothing at all when
//!    the document has no scenarios.
//!
//! Generation cannot fail. The skeleton reader, which parses generated
//! files back into a [`Document`], is the only fallible entry point.

mod classify;
mod emit;
mod error;
mod keyword;
mod skeleton;
mod tree;

pub use classify::{classify, classify_line, ClassifiedLine};
pub use emit::render;
pub use error::{ReadContext, Result, SkeletonError};
pub use keyword::{
    extract_title, is_header, is_story, match_keyword, KeywordMatch, KeywordVariant, Level,
    HEADER_FORMS, KEYWORDS, STORY_FORMS,
};
pub use skeleton::{read_skeleton, read_skeleton_with_filename};
pub use tree::{build, Document, ScenarioNode, StepNode};

/// Parse an analysis document into its scenario tree.
///
/// # Example
///
/// ```
/// use libbddgen::parse;
///
/// let doc = parse("Scenario: login\n  Given: a user\n");
/// assert_eq!(doc.scenarios[0].children[0].title, "a user");
/// ```
pub fn parse(input: &str) -> Document {
    // Phase 1: Classify lines
    let lines = classify(input);

    // Phase 2: Build the scenario tree
    build(&lines)
}

/// Generate the skeleton for an analysis document.
///
/// Returns `None` when the document contains no scenarios; callers must not
/// create an output file in that case.
pub fn generate(input: &str) -> Option<String> {
    // Phase 3: Render
    render(&parse(input))
}
