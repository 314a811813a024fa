//! Part-of-speech tagging
//!
//! Penn Treebank inspired, purely lexical: every term is tested against an
//! ordered rule table and takes the tag of the first rule that matches. Several
//! rules overlap on purpose ("-ing" before the adjective suffixes, "-s" before
//! "-ous"), so the table order is the tagging policy.
//!
//! Digit, word and boundary classes are ASCII only.

use once_cell::sync::Lazy;
use tat_core::{get_context_with_window, sanitize, PennTag, PipelineStage, PosTag, Result, DEFAULT_CONTEXT_WINDOW};

use crate::rules::RuleSet;
use crate::syntax::Document;
use crate::Extractor;

pub const POS_PATTERNS: &[(&str, PennTag)] = &[
    (r"^[.,!?;:]+$", PennTag::Punct),
    (r"(?-u)^\d+(\.\d+)?$", PennTag::Cd),
    (r"(?i-u)\b(?:the|a|an|this|that|these|those)\b", PennTag::Dt),
    (r"(?i-u)\b(?:I|me|you|he|she|it|we|they|him|her|us|them)\b", PennTag::Prp),
    (r"(?i-u)\b(?:my|your|his|her|its|our|their)\b", PennTag::PrpPossessive),
    (r"(?i-u)\b(?:oh|ah|wow|oops|ouch|yay|hmm|ugh|huh|whoa)\b", PennTag::Uh),
    (r"(?i-u)\b(?:can|could|shall|should|will|would|may|might|must)\b", PennTag::Md),
    (
        r"(?i-u)\b(?:in|on|at|by|with|about|against|between|through|during|before|after|above|below|under|over|into|out|onto|off)\b",
        PennTag::In,
    ),
    (r"(?i-u)\b(?:and|or|but|nor|yet|so|for)\b", PennTag::Cc),
    (r"(?i-u)\b(?:who|whom|whose|which|what|where|when|why|how)\b", PennTag::Wp),
    (r".*'s$", PennTag::Pos),
    (r"(?i-u)\b\w+ly\b", PennTag::Rb),
    (r"(?i-u)\b\w+ing\b", PennTag::Vbg),
    (r"(?i-u)\b\w+ed\b", PennTag::Vbd),
    (r"(?i-u)\b\w+en\b", PennTag::Vbn),
    (r"(?i-u)\b\w+s\b", PennTag::Vbz),
    (r"(?i-u)\b\w+(able|ible|al|ful|ic|ive|less|ous)\b", PennTag::Jj),
    (r"(?i-u)\b\w+er\b", PennTag::Jjr),
    (r"(?i-u)\b\w+est\b", PennTag::Jjs),
    (r"^[A-Z][a-z]+$", PennTag::Nnp),
    // Also covers abbreviations such as "Inc." and "U.S."
    (r"^[A-Za-z]+(?:\.[A-Za-z]+)*\.?$", PennTag::Nn),
];

static POS_RULES: Lazy<RuleSet<PennTag>> = Lazy::new(|| RuleSet::from_table(POS_PATTERNS));

/// Tag a single token; `Unknown` when no rule matches
pub fn tag_token(token: &str) -> PennTag {
    POS_RULES.first_match(token).unwrap_or(PennTag::Unknown)
}

/// Tags every term of a document
#[derive(Debug, Clone)]
pub struct PosTagger {
    context_window: usize,
}

impl PosTagger {
    pub fn new() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }
}

impl Default for PosTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PosTagger {
    type Output = PosTag;

    fn stage(&self) -> PipelineStage {
        PipelineStage::PosTags
    }

    fn extract(&self, doc: &Document, original_text: &str) -> Result<Vec<PosTag>> {
        let terms = doc.terms();
        if terms.is_empty() {
            tracing::warn!("No terms to tag");
        }

        let tags: Vec<PosTag> = terms
            .iter()
            .map(|term| PosTag {
                text: sanitize(term.text()),
                tag: tag_token(term.text()),
                context: get_context_with_window(original_text, term.text(), self.context_window),
            })
            .collect();

        tracing::debug!("Tagged {} terms", tags.len());
        Ok(tags)
    }
}

/// Tag all terms with the default context window
pub fn extract_pos_tags(doc: &Document, original_text: &str) -> Result<Vec<PosTag>> {
    PosTagger::new().extract(doc, original_text)
}
