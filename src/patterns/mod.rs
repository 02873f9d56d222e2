//! Slop patterns
//!
//! Each pattern is an independent rule over a parsed file. The registry
//! runs the enabled ones and collects their issues; adding a pattern never
//! touches the scorer.

pub mod base;
pub mod cross_language;
pub mod placeholder;
pub mod registry;
pub mod structural;

pub use base::{issue_at, Pattern, PatternKind, PatternResult};
pub use registry::PatternRegistry;

use cross_language::cross_language_patterns;
use placeholder::{
    EllipsisPlaceholderPattern, FixmeCommentPattern, HackCommentPattern,
    InterfaceOnlyClassPattern, NotImplementedPattern, PassPlaceholderPattern,
    ReturnNonePlaceholderPattern, TodoCommentPattern, XxxCommentPattern,
};
use structural::{
    BareExceptPattern, EmptyExceptPattern, ExecEvalPattern, GlobalStatementPattern,
    MutableDefaultArgPattern, StarImportPattern,
};

/// Every built-in pattern in registration order
pub fn get_all_patterns() -> Vec<Box<dyn Pattern>> {
    let mut patterns: Vec<Box<dyn Pattern>> = vec![
        // Structural (critical/high)
        Box::new(BareExceptPattern),
        Box::new(MutableDefaultArgPattern),
        Box::new(StarImportPattern),
        Box::new(GlobalStatementPattern),
        Box::new(EmptyExceptPattern),
        Box::new(ExecEvalPattern),
        // Placeholder (high/medium)
        Box::new(PassPlaceholderPattern),
        Box::new(EllipsisPlaceholderPattern),
        Box::new(NotImplementedPattern),
        Box::new(ReturnNonePlaceholderPattern),
        Box::new(InterfaceOnlyClassPattern),
        Box::new(TodoCommentPattern),
        Box::new(FixmeCommentPattern),
        Box::new(XxxCommentPattern),
        Box::new(HackCommentPattern),
    ];
    // Cross-language (high)
    patterns.extend(
        cross_language_patterns()
            .into_iter()
            .map(|p| Box::new(p) as Box<dyn Pattern>),
    );
    patterns
}
