//! Phase 2: Scenario Tree Builder
//!
//! Folds the classified lines into a forest of scenarios. Steps carry no
//! indentation information, so nesting is reconstructed from keyword order
//! alone: a new step closes every open step of the same or a finer level and
//! then nests under whatever is still open.

use crate::classify::ClassifiedLine;
use crate::keyword::Level;

/// A precondition, action, or expectation block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNode {
    pub level: Level,
    pub title: String,
    pub children: Vec<StepNode>,
}

impl StepNode {
    pub fn new(level: Level, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            children: Vec::new(),
        }
    }
}

/// A top-level scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioNode {
    pub title: String,
    pub children: Vec<StepNode>,
}

impl ScenarioNode {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }
}

/// Everything recognized in one input document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// First `Feature:` line of the document, trimmed.
    pub header: Option<String>,
    /// User story block before the first scenario: the `User story:` line,
    /// trimmed, then each following line up to the first blank one, with
    /// trailing whitespace removed.
    pub story: Vec<String>,
    /// Scenarios in source order.
    pub scenarios: Vec<ScenarioNode>,
}

impl Document {
    /// Returns `true` if the document contains no scenarios. A header or a
    /// user story alone does not count.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Total number of step nodes at any depth.
    pub fn step_count(&self) -> usize {
        fn count(steps: &[StepNode]) -> usize {
            steps.iter().map(|s| 1 + count(&s.children)).sum()
        }
        self.scenarios.iter().map(|s| count(&s.children)).sum()
    }
}

/// Build the scenario tree from classified lines.
pub fn build(lines: &[ClassifiedLine]) -> Document {
    let mut builder = TreeBuilder::default();
    for line in lines {
        builder.feed(line);
    }
    let doc = builder.finish();
    tracing::debug!(
        scenarios = doc.scenarios.len(),
        steps = doc.step_count(),
        "built scenario tree"
    );
    doc
}

/// Open scenario plus the stack of open steps on the active nesting path.
/// A step is attached to its parent when it is closed, which keeps siblings
/// in source order because a sibling is always closed before the next one
/// opens.
#[derive(Default)]
pub(crate) struct TreeBuilder {
    doc: Document,
    scenario: Option<ScenarioNode>,
    open: Vec<StepNode>,
    in_story: bool,
}

impl TreeBuilder {
    fn feed(&mut self, line: &ClassifiedLine) {
        if line.level.is_some() {
            self.end_story();
        }
        match line.level {
            Some(Level::Scenario) => self.open_scenario(&line.title),
            Some(level) => self.open_step(level, &line.title, line.line_num),
            None => {
                if self.story_line(&line.raw) {
                    return;
                }
                if line.header {
                    self.set_header(line.raw.trim());
                } else if line.story {
                    self.begin_story(line.raw.trim());
                }
            }
        }
    }

    pub(crate) fn set_header(&mut self, header: &str) {
        if self.doc.header.is_none() {
            self.doc.header = Some(header.to_string());
        }
    }

    /// Start collecting the user story. Only the first story before any
    /// scenario is kept.
    pub(crate) fn begin_story(&mut self, first: &str) {
        if !self.doc.story.is_empty() || self.scenario.is_some() || !self.doc.scenarios.is_empty()
        {
            return;
        }
        self.doc.story.push(first.to_string());
        self.in_story = true;
    }

    /// Add a line to the user story being collected. A blank line ends the
    /// story. Returns `false` when no story is being collected.
    pub(crate) fn story_line(&mut self, line: &str) -> bool {
        if !self.in_story {
            return false;
        }
        if line.trim().is_empty() {
            self.in_story = false;
        } else {
            self.doc.story.push(line.trim_end().to_string());
        }
        true
    }

    pub(crate) fn end_story(&mut self) {
        self.in_story = false;
    }

    pub(crate) fn open_scenario(&mut self, title: &str) {
        self.close_scenario();
        self.scenario = Some(ScenarioNode::new(title));
    }

    fn open_step(&mut self, level: Level, title: &str, line_num: usize) {
        if self.scenario.is_none() {
            tracing::debug!(line_num, ?level, "step line before any scenario, discarded");
            return;
        }

        // Close same-or-finer steps
        while self.open.last().map_or(false, |top| top.level >= level) {
            self.close_step();
        }
        self.push_step(level, title);
    }

    /// Open a step under the innermost open node without applying the
    /// same-or-finer rule. Used when nesting is explicit in the input.
    pub(crate) fn push_step(&mut self, level: Level, title: &str) {
        self.open.push(StepNode::new(level, title));
    }

    /// Close the innermost open step, or the scenario when no step is open.
    pub(crate) fn close_innermost(&mut self) {
        if self.open.is_empty() {
            self.close_scenario();
        } else {
            self.close_step();
        }
    }

    fn close_step(&mut self) {
        let Some(node) = self.open.pop() else {
            return;
        };
        match self.open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => {
                if let Some(scenario) = self.scenario.as_mut() {
                    scenario.children.push(node);
                }
            }
        }
    }

    fn close_scenario(&mut self) {
        while !self.open.is_empty() {
            self.close_step();
        }
        if let Some(scenario) = self.scenario.take() {
            self.doc.scenarios.push(scenario);
        }
    }

    pub(crate) fn finish(mut self) -> Document {
        self.close_scenario();
        self.doc
    }
}
