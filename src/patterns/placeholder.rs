//! Placeholder patterns
//!
//! Function bodies that only pretend to exist, classes made entirely of such
//! bodies, and comment markers for unfinished work. Body checks read the
//! body shape computed once at parse time.

use super::base::{issue_at, Pattern, PatternKind};
use crate::metrics::ldr::is_interface_class;
use crate::models::{Axis, Issue, Severity};
use crate::parsers::{BodyShape, DefKind, Definition, SourceUnit};
use anyhow::Result;
use regex::Regex;
use std::sync::OnceLock;

/// Issues at every function whose body has `shape`
fn functions_with_shape<P: Pattern>(
    pattern: &P,
    unit: &SourceUnit,
    shape: BodyShape,
    message: &str,
    suggestion: &str,
) -> Vec<Issue> {
    unit.definitions()
        .iter()
        .filter(|d| d.is_function() && d.body_shape == shape)
        .map(|d| issue_at(pattern, unit, d.line, d.column, message, Some(suggestion)))
        .collect()
}

macro_rules! body_shape_pattern {
    ($name:ident, $id:literal, $severity:expr, $shape:expr, $message:literal, $suggestion:literal) => {
        pub struct $name;

        impl Pattern for $name {
            fn id(&self) -> &'static str {
                $id
            }

            fn severity(&self) -> Severity {
                $severity
            }

            fn axis(&self) -> Axis {
                Axis::Quality
            }

            fn kind(&self) -> PatternKind {
                PatternKind::Tree
            }

            fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
                Ok(functions_with_shape(self, unit, $shape, $message, $suggestion))
            }
        }
    };
}

body_shape_pattern!(
    PassPlaceholderPattern,
    "pass_placeholder",
    Severity::High,
    BodyShape::Pass,
    "Empty function with only pass - placeholder not implemented",
    "Implement the function or remove it"
);

body_shape_pattern!(
    EllipsisPlaceholderPattern,
    "ellipsis_placeholder",
    Severity::High,
    BodyShape::Ellipsis,
    "Empty function with only ... - placeholder not implemented",
    "Implement the function or remove it"
);

body_shape_pattern!(
    NotImplementedPattern,
    "not_implemented",
    Severity::Medium,
    BodyShape::Raises,
    "Function only raises NotImplementedError",
    "Implement the function, or mark it @abstractmethod on an abstract base"
);

body_shape_pattern!(
    ReturnNonePlaceholderPattern,
    "return_none_placeholder",
    Severity::Medium,
    BodyShape::ReturnsNone,
    "Function only returns None - placeholder not implemented",
    "Implement the function or remove it"
);

/// Class with two or more methods, every one a placeholder, and no
/// abstract base to explain it
pub struct InterfaceOnlyClassPattern;

impl InterfaceOnlyClassPattern {
    const MIN_METHODS: usize = 2;

    fn is_hollow(class: &Definition, definitions: &[Definition]) -> bool {
        if is_interface_class(class) {
            return false;
        }
        let methods: Vec<_> = definitions
            .iter()
            .filter(|d| d.is_function() && d.parent_class.as_deref() == Some(class.qualified_name.as_str()))
            .collect();
        methods.len() >= Self::MIN_METHODS && methods.iter().all(|m| m.body_shape.is_stub())
    }
}

impl Pattern for InterfaceOnlyClassPattern {
    fn id(&self) -> &'static str {
        "interface_only_class"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn axis(&self) -> Axis {
        Axis::Quality
    }

    fn kind(&self) -> PatternKind {
        PatternKind::Tree
    }

    fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
        let definitions = unit.definitions();
        Ok(definitions
            .iter()
            .filter(|d| d.kind == DefKind::Class && Self::is_hollow(d, definitions))
            .map(|class| {
                issue_at(
                    self,
                    unit,
                    class.line,
                    class.column,
                    &format!("Class {} has only placeholder methods", class.name),
                    Some("Implement the methods, or declare the class as an ABC or Protocol"),
                )
            })
            .collect())
    }
}

static TODO_PATTERN: OnceLock<Regex> = OnceLock::new();
static FIXME_PATTERN: OnceLock<Regex> = OnceLock::new();
static XXX_PATTERN: OnceLock<Regex> = OnceLock::new();
static HACK_PATTERN: OnceLock<Regex> = OnceLock::new();

fn todo_pattern() -> &'static Regex {
    TODO_PATTERN.get_or_init(|| Regex::new(r"(?i)#\s*TODO\b").expect("valid regex"))
}

fn fixme_pattern() -> &'static Regex {
    FIXME_PATTERN.get_or_init(|| Regex::new(r"(?i)#\s*FIXME\b").expect("valid regex"))
}

fn xxx_pattern() -> &'static Regex {
    XXX_PATTERN.get_or_init(|| Regex::new(r"(?i)#\s*XXX\b").expect("valid regex"))
}

fn hack_pattern() -> &'static Regex {
    HACK_PATTERN.get_or_init(|| Regex::new(r"(?i)#\s*HACK\b").expect("valid regex"))
}

/// Issues for every comment token matching `regex`
fn comment_marker_issues<P: Pattern>(
    pattern: &P,
    unit: &SourceUnit,
    regex: &Regex,
    message: &str,
    suggestion: Option<&str>,
) -> Vec<Issue> {
    unit.comments()
        .iter()
        .filter_map(|comment| {
            regex.find(&comment.text).map(|m| {
                issue_at(
                    pattern,
                    unit,
                    comment.line,
                    comment.column + m.start(),
                    message,
                    suggestion,
                )
            })
        })
        .collect()
}

macro_rules! comment_marker_pattern {
    ($name:ident, $id:literal, $severity:expr, $axis:expr, $regex:ident, $message:literal, $suggestion:expr) => {
        pub struct $name;

        impl Pattern for $name {
            fn id(&self) -> &'static str {
                $id
            }

            fn severity(&self) -> Severity {
                $severity
            }

            fn axis(&self) -> Axis {
                $axis
            }

            fn kind(&self) -> PatternKind {
                PatternKind::Text
            }

            fn check(&self, unit: &SourceUnit) -> Result<Vec<Issue>> {
                Ok(comment_marker_issues(self, unit, $regex(), $message, $suggestion))
            }
        }
    };
}

comment_marker_pattern!(
    TodoCommentPattern,
    "todo_comment",
    Severity::Medium,
    Axis::Noise,
    todo_pattern,
    "TODO comment - incomplete implementation",
    Some("Complete the TODO or create a ticket")
);

comment_marker_pattern!(
    FixmeCommentPattern,
    "fixme_comment",
    Severity::Medium,
    Axis::Noise,
    fixme_pattern,
    "FIXME comment - known issue not addressed",
    Some("Fix the issue or create a ticket")
);

comment_marker_pattern!(
    XxxCommentPattern,
    "xxx_comment",
    Severity::Low,
    Axis::Noise,
    xxx_pattern,
    "XXX comment - potential code smell",
    None
);

comment_marker_pattern!(
    HackCommentPattern,
    "hack_comment",
    Severity::High,
    Axis::Style,
    hack_pattern,
    "HACK comment - technical debt indicator",
    Some("Refactor the hacky solution properly")
);
