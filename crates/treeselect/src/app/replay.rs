//! Replaying selection scripts against an outline tree.

use std::cell::RefCell;
use std::fmt;
use std::fmt::Write as _;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::app::events::SelectionEvent;
use crate::app::range::RangeSummary;
use crate::app::selection::{SelectionOptions, TreeSelection};
use crate::domain::tree::{ArenaTree, NodeId};

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ReplayFormat {
    /// Human readable step log.
    Plain,
    /// Pretty-printed JSON report.
    Json,
}

impl ReplayFormat {
    /// Return a stable identifier for configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplayFormat::Plain => "plain",
            ReplayFormat::Json => "json",
        }
    }
}

impl FromStr for ReplayFormat {
    type Err = ReplayFormatParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" | "txt" => Ok(ReplayFormat::Plain),
            "json" => Ok(ReplayFormat::Json),
            other => Err(ReplayFormatParseError::UnknownFormat(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ReplayFormatParseError {
    #[error("unknown replay format: {0}")]
    UnknownFormat(String),
}

/// One instruction of a selection script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Remove(String),
    Toggle(String),
    Span(String, String),
    /// `None` defers to the configured `include_root`.
    SelectAll(Option<bool>),
    Clear,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Add(label) => write!(f, "add {label}"),
            Command::Remove(label) => write!(f, "remove {label}"),
            Command::Toggle(label) => write!(f, "toggle {label}"),
            Command::Span(anchor, target) => write!(f, "span {anchor} {target}"),
            Command::SelectAll(None) => f.write_str("select-all"),
            Command::SelectAll(Some(true)) => f.write_str("select-all with-root"),
            Command::SelectAll(Some(false)) => f.write_str("select-all without-root"),
            Command::Clear => f.write_str("clear"),
        }
    }
}

/// A parsed command and the script line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub line: usize,
    pub command: Command,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{verb}`")]
    UnknownCommand { line: usize, verb: String },
    #[error("line {line}: `{verb}` expects {expected} argument(s), got {found}")]
    Arity {
        line: usize,
        verb: String,
        expected: &'static str,
        found: usize,
    },
    #[error("line {line}: select-all mode must be `with-root` or `without-root`, got `{mode}`")]
    SelectAllMode { line: usize, mode: String },
}

/// Parse a selection script. Blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Returns the first [`ScriptError`] encountered.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let mut steps = Vec::new();
    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut words = trimmed.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();
        let arity = |expected: &'static str| ScriptError::Arity {
            line,
            verb: verb.to_string(),
            expected,
            found: args.len(),
        };

        let command = match (verb, args.as_slice()) {
            ("add", [label]) => Command::Add((*label).to_string()),
            ("remove", [label]) => Command::Remove((*label).to_string()),
            ("toggle", [label]) => Command::Toggle((*label).to_string()),
            ("span", [anchor, target]) => {
                Command::Span((*anchor).to_string(), (*target).to_string())
            }
            ("select-all", []) => Command::SelectAll(None),
            ("select-all", ["with-root"]) => Command::SelectAll(Some(true)),
            ("select-all", ["without-root"]) => Command::SelectAll(Some(false)),
            ("select-all", [mode]) => {
                return Err(ScriptError::SelectAllMode {
                    line,
                    mode: (*mode).to_string(),
                });
            }
            ("clear", []) => Command::Clear,
            ("add" | "remove" | "toggle", _) => return Err(arity("1")),
            ("span", _) => return Err(arity("2")),
            ("select-all", _) => return Err(arity("0 or 1")),
            ("clear", _) => return Err(arity("0")),
            (other, _) => {
                return Err(ScriptError::UnknownCommand {
                    line,
                    verb: other.to_string(),
                });
            }
        };
        steps.push(ScriptStep { line, command });
    }
    Ok(steps)
}

/// Outcome of one replayed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub line: usize,
    pub command: String,
    pub events: Vec<SelectionEvent>,
    pub ranges: Vec<RangeSummary>,
}

/// Every step of a replay plus the final selection by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub selected: Vec<String>,
}

/// Applies script steps to a tree and records the emitted events.
#[derive(Debug)]
pub struct Replayer {
    tree: ArenaTree,
    selection: TreeSelection<NodeId>,
    recorded: Rc<RefCell<Vec<SelectionEvent>>>,
}

impl Replayer {
    pub fn new(tree: ArenaTree, options: SelectionOptions) -> Self {
        let mut selection = TreeSelection::with_options(options);
        let recorded = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&recorded);
        selection.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Self {
            tree,
            selection,
            recorded,
        }
    }

    pub fn tree(&self) -> &ArenaTree {
        &self.tree
    }

    pub fn selection(&self) -> &TreeSelection<NodeId> {
        &self.selection
    }

    /// Run every step in order, stopping at the first failure.
    pub fn run(&mut self, steps: &[ScriptStep]) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();
        for step in steps {
            report.steps.push(self.apply(step)?);
        }
        report.selected = self
            .selection
            .selected_nodes()
            .into_iter()
            .filter_map(|node| self.tree.label(node).map(str::to_owned))
            .collect();
        tracing::info!(
            steps = report.steps.len(),
            selected = report.selected.len(),
            "replay finished"
        );
        Ok(report)
    }

    /// Apply a single step and report its events and the resulting ranges.
    pub fn apply(&mut self, step: &ScriptStep) -> Result<StepReport> {
        let context = || format!("line {}: {}", step.line, step.command);
        match &step.command {
            Command::Add(label) => {
                let node = self.resolve(label, step.line)?;
                if !self.selection.add(&mut self.tree, node).with_context(context)? {
                    tracing::info!(line = step.line, label = %label, "node already selected");
                }
            }
            Command::Remove(label) => {
                let node = self.resolve(label, step.line)?;
                self.selection
                    .remove(&mut self.tree, node)
                    .with_context(context)?;
            }
            Command::Toggle(label) => {
                let node = self.resolve(label, step.line)?;
                self.selection
                    .toggle(&mut self.tree, node)
                    .with_context(context)?;
            }
            Command::Span(anchor, target) => {
                let anchor = self.resolve(anchor, step.line)?;
                let target = self.resolve(target, step.line)?;
                self.selection
                    .select_span(&mut self.tree, anchor, target)
                    .with_context(context)?;
            }
            Command::SelectAll(mode) => {
                let include_root = mode.unwrap_or(self.selection.options().include_root);
                let root = self.tree.root();
                self.selection
                    .select_all(&mut self.tree, root, include_root)
                    .with_context(context)?;
            }
            Command::Clear => self.selection.clear(&mut self.tree),
        }

        let events = std::mem::take(&mut *self.recorded.borrow_mut());
        tracing::debug!(line = step.line, events = events.len(), "applied step");
        Ok(StepReport {
            line: step.line,
            command: step.command.to_string(),
            events,
            ranges: self.selection.summary().ranges,
        })
    }

    fn resolve(&self, label: &str, line: usize) -> Result<NodeId> {
        self.tree
            .find(label)
            .ok_or_else(|| anyhow!("line {line}: unknown node `{label}`"))
    }
}

/// Render a report in the requested format.
pub fn render(report: &ReplayReport, format: ReplayFormat) -> Result<String> {
    match format {
        ReplayFormat::Plain => Ok(render_plain(report)),
        ReplayFormat::Json => {
            serde_json::to_string_pretty(report).context("failed to serialize replay report")
        }
    }
}

/// Human readable step log.
pub fn render_plain(report: &ReplayReport) -> String {
    let mut out = String::new();
    for step in &report.steps {
        let _ = writeln!(out, "line {}: {}", step.line, step.command);
        if step.events.is_empty() {
            out.push_str("  (no events)\n");
        }
        for event in &step.events {
            let _ = writeln!(out, "  {event}");
        }
        let ranges = if step.ranges.is_empty() {
            "(none)".to_string()
        } else {
            step.ranges
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let _ = writeln!(out, "  ranges: {ranges}");
    }
    let selected = if report.selected.is_empty() {
        "(none)".to_string()
    } else {
        report.selected.join(", ")
    };
    let _ = writeln!(out, "selected: {selected}");
    out
}
