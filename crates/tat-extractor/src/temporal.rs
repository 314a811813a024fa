//! Temporal expression extraction
//!
//! Two sources, concatenated in this order:
//! 1. structured date parses from the syntactic source (`parsed_date`)
//! 2. a regex battery run over the whole original text, one rule at a time
//!
//! Overlap between rules is kept: "2024-05-01" is reported as a `date` and its
//! "2024" again as a `year`.
//!
//! Digits and word boundaries are ASCII only.

use once_cell::sync::Lazy;
use tat_core::{
    get_context_with_window, sanitize, PipelineStage, Result, TemporalExpression, TemporalType, DEFAULT_CONTEXT_WINDOW,
};

use crate::rules::RuleSet;
use crate::syntax::{Document, SyntacticSource};
use crate::Extractor;

/// Bound reported when a parsed date has no start or end
pub const UNKNOWN_BOUND: &str = "unknown";

pub const TEMPORAL_PATTERNS: &[(&str, TemporalType)] = &[
    // ISO dates
    (r"(?-u)\b\d{4}-\d{2}-\d{2}\b", TemporalType::Date),
    // May 15, 2023
    (
        r"(?-u)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* \d{1,2},? \d{4}\b",
        TemporalType::Month,
    ),
    // 15 May 2023
    (
        r"(?-u)\b\d{1,2} (?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* \d{4}\b",
        TemporalType::Month,
    ),
    (
        r"(?i-u)\b(?:today|tomorrow|yesterday|next week|last week|this week|next month|last month|this month|next year|last year|this year)\b",
        TemporalType::RelativeDate,
    ),
    (
        r"(?i-u)\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\b",
        TemporalType::DayOfWeek,
    ),
    (r"(?i-u)\b(?:Mon|Tue|Wed|Thu|Fri|Sat|Sun)\b", TemporalType::DayOfWeek),
    (r"(?i-u)\b\d{1,2}:\d{2}(?::\d{2})?(?u:\s)?(?:AM|PM)?\b", TemporalType::Time),
    (r"(?-u)\b\d{4}\b", TemporalType::Year),
    (r"(?-u)\b\d{4}s\b", TemporalType::Decade),
    (
        r"(?i-u)\b(?:morning|afternoon|evening|night|midnight|noon)\b",
        TemporalType::TimeOfDay,
    ),
];

static TEMPORAL_RULES: Lazy<RuleSet<TemporalType>> = Lazy::new(|| RuleSet::from_table(TEMPORAL_PATTERNS));

/// Temporal expression extractor
#[derive(Debug, Clone)]
pub struct TemporalExtractor {
    context_window: usize,
}

impl TemporalExtractor {
    pub fn new() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }

    /// Records from the regex battery only
    pub fn match_patterns(&self, text: &str) -> Vec<TemporalExpression> {
        TEMPORAL_RULES
            .all_matches(text)
            .map(|(temporal_type, m)| TemporalExpression {
                text: sanitize(m.as_str()),
                temporal_type,
                start: None,
                end: None,
                context: get_context_with_window(text, m.as_str(), self.context_window),
            })
            .collect()
    }
}

impl Default for TemporalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for TemporalExtractor {
    type Output = TemporalExpression;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Temporal
    }

    fn extract(&self, doc: &Document, original_text: &str) -> Result<Vec<TemporalExpression>> {
        let mut expressions = Vec::new();

        match doc.date_parses() {
            Some(parses) => {
                for parse in parses {
                    expressions.push(TemporalExpression {
                        text: sanitize(&parse.text),
                        temporal_type: TemporalType::ParsedDate,
                        start: Some(parse.start.clone().unwrap_or_else(|| UNKNOWN_BOUND.to_string())),
                        end: Some(parse.end.clone().unwrap_or_else(|| UNKNOWN_BOUND.to_string())),
                        context: get_context_with_window(original_text, &parse.text, self.context_window),
                    });
                }
            }
            None => tracing::warn!("Date parsing not available; skipping parsed dates"),
        }

        expressions.extend(self.match_patterns(original_text));

        tracing::debug!("Extracted {} temporal expressions", expressions.len());
        Ok(expressions)
    }
}

impl TemporalExtractor {
    /// Parsed dates (when `source` supports them) followed by pattern matches
    pub fn extract_from(&self, source: &dyn SyntacticSource, text: &str) -> Result<Vec<TemporalExpression>> {
        if source.supports_dates() {
            self.extract_text(source, text)
        } else {
            tracing::warn!("{} does not parse dates; using patterns only", source.name());
            Ok(self.match_patterns(text))
        }
    }
}

/// [`TemporalExtractor::extract_from`] with the default context window
pub fn extract_temporal_expressions(source: &dyn SyntacticSource, text: &str) -> Result<Vec<TemporalExpression>> {
    TemporalExtractor::new().extract_from(source, text)
}
