//! Ordered regex rule tables
//!
//! Classifier cascades (POS tags, trigger words, temporal patterns) are kept as
//! plain `(pattern, label)` tables and compiled into a [`RuleSet`]. Evaluation
//! order is table order; nothing is scored or reordered.

use regex::{Match, Regex};

/// A compiled `(pattern, label)` pair
#[derive(Debug, Clone)]
pub struct Rule<L> {
    pub pattern: Regex,
    pub label: L,
}

/// Rules evaluated in insertion order
#[derive(Debug, Clone)]
pub struct RuleSet<L> {
    rules: Vec<Rule<L>>,
}

impl<L: Copy> RuleSet<L> {
    /// Compile a rule table, preserving its order
    pub fn from_table(table: &[(&str, L)]) -> Self {
        let mut set = Self { rules: Vec::with_capacity(table.len()) };
        for (pattern, label) in table {
            set.add_rule(pattern, *label);
        }
        set
    }

    /// Append a rule; invalid patterns are logged and skipped
    pub fn add_rule(&mut self, pattern: &str, label: L) {
        match Regex::new(pattern) {
            Ok(regex) => self.rules.push(Rule { pattern: regex, label }),
            Err(e) => tracing::error!("Skipping invalid rule pattern {}: {}", pattern, e),
        }
    }

    /// Label of the first rule matching anywhere in `text`
    pub fn first_match(&self, text: &str) -> Option<L> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.is_match(text))
            .map(|rule| rule.label)
    }

    /// Every match of every rule, grouped by rule in table order.
    ///
    /// Matches of different rules may overlap; each rule scans the whole text.
    pub fn all_matches<'r, 't>(&'r self, text: &'t str) -> impl Iterator<Item = (L, Match<'t>)> + 'r
    where
        't: 'r,
    {
        self.rules.iter().flat_map(move |rule| {
            rule.pattern
                .find_iter(text)
                .map(move |m| (rule.label, m))
        })
    }

    /// Labels in evaluation order
    pub fn labels(&self) -> Vec<L> {
        self.rules.iter().map(|rule| rule.label).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
