//! Named entity extraction
//!
//! Reads the syntactic source's categorized spans and emits one record per
//! span, grouped by category in the order people, organizations, places,
//! dates, values.

use tat_core::{get_context_with_window, sanitize, Entity, EntityType, PipelineStage, Result, DEFAULT_CONTEXT_WINDOW};

use crate::syntax::{Document, SpanCategory};
use crate::{with_surface, Extractor};

/// Span category backing an entity type
pub fn span_category(entity_type: EntityType) -> SpanCategory {
    match entity_type {
        EntityType::Person => SpanCategory::Person,
        EntityType::Organization => SpanCategory::Organization,
        EntityType::Place => SpanCategory::Place,
        EntityType::Date => SpanCategory::Date,
        EntityType::Value => SpanCategory::Value,
    }
}

/// Entity extractor over a parsed document
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    context_window: usize,
}

impl EntityExtractor {
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

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for EntityExtractor {
    type Output = Entity;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Entities
    }

    fn extract(&self, doc: &Document, original_text: &str) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();

        for entity_type in EntityType::ORDER {
            let spans = doc.spans(span_category(entity_type));
            for span in with_surface(spans, self.stage()) {
                entities.push(Entity {
                    text: sanitize(span.text()),
                    entity_type,
                    context: get_context_with_window(original_text, span.text(), self.context_window),
                });
            }
        }

        tracing::debug!("Extracted {} entities", entities.len());
        Ok(entities)
    }
}

/// Extract entities with the default context window
pub fn extract_entities(doc: &Document, original_text: &str) -> Result<Vec<Entity>> {
    EntityExtractor::new().extract(doc, original_text)
}
