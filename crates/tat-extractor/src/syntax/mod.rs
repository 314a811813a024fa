//! Syntactic source abstraction
//!
//! Extractors never see a raw parser. They consume a [`Document`], which is only
//! obtainable through [`DocumentBuilder::build`]; every span it hands out has been
//! checked against the text once, at the adapter boundary.

pub mod dates;
pub mod heuristic;
pub mod lexicon;

pub use dates::DateParse;
pub use heuristic::HeuristicParser;

use serde::{Deserialize, Serialize};
use tat_core::{PipelineStage, Result, TatError};

// ============================================================================
// Trait
// ============================================================================

/// A provider of sentences, terms and categorized spans for a text
pub trait SyntacticSource: Send + Sync {
    /// Adapter name for logging
    fn name(&self) -> &str;

    /// Parse text into a validated document
    fn parse(&self, text: &str) -> Result<Document>;

    /// Whether parsed documents carry structured date parses
    fn supports_dates(&self) -> bool;
}

// ============================================================================
// Spans
// ============================================================================

/// Categories of spans a source can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanCategory {
    Person,
    Organization,
    Place,
    Date,
    Value,
    Verb,
}

impl SpanCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Place => "place",
            Self::Date => "date",
            Self::Value => "value",
            Self::Verb => "verb",
        }
    }
}

impl std::fmt::Display for SpanCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A byte range of the document text with its surface string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    text: String,
    start: usize,
    end: usize,
}

impl Span {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// True when the span has no surface string
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

// ============================================================================
// Sentences
// ============================================================================

/// One sentence with its categorized spans, each in text order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    span: Span,
    people: Vec<Span>,
    organizations: Vec<Span>,
    places: Vec<Span>,
    dates: Vec<Span>,
    values: Vec<Span>,
    verbs: Vec<Span>,
}

impl Sentence {
    pub fn text(&self) -> &str {
        self.span.text()
    }

    pub fn start(&self) -> usize {
        self.span.start()
    }

    pub fn end(&self) -> usize {
        self.span.end()
    }

    pub fn people(&self) -> &[Span] {
        &self.people
    }

    pub fn organizations(&self) -> &[Span] {
        &self.organizations
    }

    pub fn places(&self) -> &[Span] {
        &self.places
    }

    pub fn dates(&self) -> &[Span] {
        &self.dates
    }

    pub fn values(&self) -> &[Span] {
        &self.values
    }

    pub fn verbs(&self) -> &[Span] {
        &self.verbs
    }

    /// Spans of one category
    pub fn spans(&self, category: SpanCategory) -> &[Span] {
        match category {
            SpanCategory::Person => &self.people,
            SpanCategory::Organization => &self.organizations,
            SpanCategory::Place => &self.places,
            SpanCategory::Date => &self.dates,
            SpanCategory::Value => &self.values,
            SpanCategory::Verb => &self.verbs,
        }
    }

    fn spans_mut(&mut self, category: SpanCategory) -> &mut Vec<Span> {
        match category {
            SpanCategory::Person => &mut self.people,
            SpanCategory::Organization => &mut self.organizations,
            SpanCategory::Place => &mut self.places,
            SpanCategory::Date => &mut self.dates,
            SpanCategory::Value => &mut self.values,
            SpanCategory::Verb => &mut self.verbs,
        }
    }
}

// ============================================================================
// Document
// ============================================================================

/// Validated output of a syntactic source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    sentences: Vec<Sentence>,
    terms: Vec<Span>,
    date_parses: Option<Vec<DateParse>>,
}

impl Document {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    /// Tokens in text order
    pub fn terms(&self) -> &[Span] {
        &self.terms
    }

    /// Spans of one category across all sentences, in sentence order
    pub fn spans(&self, category: SpanCategory) -> impl Iterator<Item = &Span> {
        self.sentences
            .iter()
            .flat_map(move |sentence| sentence.spans(category).iter())
    }

    pub fn people(&self) -> impl Iterator<Item = &Span> {
        self.spans(SpanCategory::Person)
    }

    pub fn organizations(&self) -> impl Iterator<Item = &Span> {
        self.spans(SpanCategory::Organization)
    }

    pub fn places(&self) -> impl Iterator<Item = &Span> {
        self.spans(SpanCategory::Place)
    }

    pub fn dates(&self) -> impl Iterator<Item = &Span> {
        self.spans(SpanCategory::Date)
    }

    pub fn values(&self) -> impl Iterator<Item = &Span> {
        self.spans(SpanCategory::Value)
    }

    pub fn verbs(&self) -> impl Iterator<Item = &Span> {
        self.spans(SpanCategory::Verb)
    }

    /// Structured date parses, `None` when the source has no date support
    pub fn date_parses(&self) -> Option<&[DateParse]> {
        self.date_parses.as_deref()
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug, Clone)]
struct SentenceDraft {
    start: usize,
    end: usize,
    spans: Vec<(SpanCategory, usize, usize)>,
}

/// Assembles a [`Document`] from byte ranges reported by an adapter
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    text: String,
    sentences: Vec<SentenceDraft>,
    terms: Vec<(usize, usize)>,
    date_parses: Option<Vec<DateParse>>,
}

impl DocumentBuilder {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sentences: Vec::new(),
            terms: Vec::new(),
            date_parses: None,
        }
    }

    /// Open a sentence covering `start..end`; returns its index
    pub fn sentence(&mut self, start: usize, end: usize) -> usize {
        self.sentences.push(SentenceDraft {
            start,
            end,
            spans: Vec::new(),
        });
        self.sentences.len() - 1
    }

    /// Attach a categorized span to a sentence
    pub fn span(&mut self, sentence: usize, category: SpanCategory, start: usize, end: usize) -> &mut Self {
        match self.sentences.get_mut(sentence) {
            Some(draft) => draft.spans.push((category, start, end)),
            // Reported at build time as an out-of-range sentence
            None => self.sentences.push(SentenceDraft {
                start: usize::MAX,
                end: usize::MAX,
                spans: vec![(category, start, end)],
            }),
        }
        self
    }

    pub fn term(&mut self, start: usize, end: usize) -> &mut Self {
        self.terms.push((start, end));
        self
    }

    /// Enable structured date parses (possibly empty)
    pub fn date_parses(&mut self, parses: Vec<DateParse>) -> &mut Self {
        self.date_parses = Some(parses);
        self
    }

    /// Validate every range and produce the document
    pub fn build(self) -> Result<Document> {
        let text = self.text;

        let mut sentences = Vec::with_capacity(self.sentences.len());
        for (index, draft) in self.sentences.into_iter().enumerate() {
            let span = make_span(&text, draft.start, draft.end)
                .map_err(|e| invalid(format!("sentence {index}: {e}")))?;

            let mut sentence = Sentence {
                span,
                people: Vec::new(),
                organizations: Vec::new(),
                places: Vec::new(),
                dates: Vec::new(),
                values: Vec::new(),
                verbs: Vec::new(),
            };

            for (category, start, end) in draft.spans {
                if start < draft.start || end > draft.end {
                    return Err(invalid(format!(
                        "{category} span {start}..{end} lies outside sentence {index} ({}..{})",
                        draft.start, draft.end
                    )));
                }
                let span = make_span(&text, start, end)
                    .map_err(|e| invalid(format!("{category} span in sentence {index}: {e}")))?;
                sentence.spans_mut(category).push(span);
            }

            sentence.people.sort_by_key(|s| s.start);
            sentence.organizations.sort_by_key(|s| s.start);
            sentence.places.sort_by_key(|s| s.start);
            sentence.dates.sort_by_key(|s| s.start);
            sentence.values.sort_by_key(|s| s.start);
            sentence.verbs.sort_by_key(|s| s.start);
            sentences.push(sentence);
        }

        let mut terms = Vec::with_capacity(self.terms.len());
        for (start, end) in self.terms {
            terms.push(make_span(&text, start, end).map_err(|e| invalid(format!("term: {e}")))?);
        }

        Ok(Document {
            text,
            sentences,
            terms,
            date_parses: self.date_parses,
        })
    }
}

fn make_span(text: &str, start: usize, end: usize) -> std::result::Result<Span, String> {
    if start > end || end > text.len() {
        return Err(format!("range {start}..{end} out of bounds (len {})", text.len()));
    }
    if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
        return Err(format!("range {start}..{end} splits a character"));
    }
    Ok(Span {
        text: text[start..end].to_string(),
        start,
        end,
    })
}

fn invalid(message: String) -> TatError {
    TatError::upstream(PipelineStage::Parse, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Tim Cook visited Cupertino. He left.";

    #[test]
    fn test_build_valid_document() {
        let mut builder = DocumentBuilder::new(TEXT);
        let s = builder.sentence(0, 27);
        builder
            .span(s, SpanCategory::Place, 17, 26)
            .span(s, SpanCategory::Person, 0, 8)
            .term(0, 3);
        builder.sentence(28, 36);

        let doc = builder.build().unwrap();
        assert_eq!(doc.sentences().len(), 2);
        assert_eq!(doc.sentences()[0].text(), "Tim Cook visited Cupertino.");
        assert_eq!(doc.people().next().map(Span::text), Some("Tim Cook"));
        assert_eq!(doc.places().next().map(Span::text), Some("Cupertino"));
        assert_eq!(doc.terms()[0].text(), "Tim");
        assert!(doc.date_parses().is_none());
    }

    #[test]
    fn test_span_outside_sentence_rejected() {
        let mut builder = DocumentBuilder::new(TEXT);
        let s = builder.sentence(0, 27);
        builder.span(s, SpanCategory::Verb, 31, 35);

        let err = builder.build().unwrap_err();
        assert_eq!(err.stage(), Some(PipelineStage::Parse));
        assert!(err.to_string().contains("outside sentence 0"));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut builder = DocumentBuilder::new(TEXT);
        builder.sentence(0, 500);
        assert!(matches!(builder.build(), Err(TatError::UpstreamParse { .. })));
    }

    #[test]
    fn test_char_boundary_rejected() {
        let mut builder = DocumentBuilder::new("José");
        builder.sentence(0, 4);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_unknown_sentence_index_rejected() {
        let mut builder = DocumentBuilder::new(TEXT);
        builder.span(3, SpanCategory::Person, 0, 3);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_empty_span_is_kept() {
        let mut builder = DocumentBuilder::new(TEXT);
        let s = builder.sentence(0, 27);
        builder.span(s, SpanCategory::Person, 4, 4);

        let doc = builder.build().unwrap();
        let span = doc.people().next().unwrap();
        assert!(span.is_empty());
    }
}
