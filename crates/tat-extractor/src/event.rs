//! Event extraction from verb triggers

use once_cell::sync::Lazy;
use tat_core::{get_context_with_window, sanitize, Event, EventType, PipelineStage, Result, DEFAULT_CONTEXT_WINDOW};

use crate::rules::RuleSet;
use crate::syntax::Document;
use crate::{with_surface, Extractor};

/// Trigger keywords, matched anywhere in the verb text; first match wins
pub const TRIGGER_PATTERNS: &[(&str, EventType)] = &[
    (r"said|announced|reported|stated", EventType::Statement),
    (r"created|built|developed", EventType::Creation),
    (r"increased|decreased|changed", EventType::Change),
];

static TRIGGERS: Lazy<RuleSet<EventType>> = Lazy::new(|| RuleSet::from_table(TRIGGER_PATTERNS));

/// Event type for a verb phrase, `Action` when no keyword matches
pub fn classify_trigger(verb: &str) -> EventType {
    TRIGGERS.first_match(verb).unwrap_or(EventType::Action)
}

/// One event per verb occurrence, sentence by sentence
#[derive(Debug, Clone)]
pub struct EventExtractor {
    context_window: usize,
}

impl EventExtractor {
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

impl Default for EventExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for EventExtractor {
    type Output = Event;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Events
    }

    fn extract(&self, doc: &Document, original_text: &str) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        for sentence in doc.sentences() {
            for verb in with_surface(sentence.verbs(), self.stage()) {
                events.push(Event::new(
                    sanitize(verb.text()),
                    classify_trigger(verb.text()),
                    get_context_with_window(original_text, verb.text(), self.context_window),
                ));
            }
        }

        tracing::debug!("Extracted {} events", events.len());
        Ok(events)
    }
}

/// Extract events with the default context window
pub fn extract_events(doc: &Document, original_text: &str) -> Result<Vec<Event>> {
    EventExtractor::new().extract(doc, original_text)
}
