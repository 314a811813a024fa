//! TAT Extractor - Heuristic annotation pipeline
//!
//! Turns raw text plus a syntactic parse into entities, relations, events,
//! temporal expressions and POS tags, and builds knowledge-graph data from
//! the results.

use tat_core::{PipelineStage, Result, TatError};

use syntax::{Document, Span, SyntacticSource};

pub mod entity;
pub mod event;
pub mod graph;
pub mod pipeline;
pub mod pos;
pub mod relation;
pub mod rules;
pub mod syntax;
pub mod temporal;

pub use entity::{extract_entities, EntityExtractor};
pub use event::{classify_trigger, extract_events, EventExtractor};
pub use graph::{GraphData, GraphLink, GraphNode, KnowledgeGraph};
pub use pipeline::{
    Analysis, AnalysisSession, NoProgress, Operation, Pipeline, ProgressRecorder, ProgressSink, ProgressUpdate,
    SessionGuard,
};
pub use pos::{extract_pos_tags, tag_token, PosTagger};
pub use relation::{extract_relations, RelationExtractor};
pub use syntax::HeuristicParser;
pub use temporal::{extract_temporal_expressions, TemporalExtractor};

/// Trait for annotation passes over a parsed document
pub trait Extractor: Send + Sync {
    type Output;

    /// Stage reported in errors and progress
    fn stage(&self) -> PipelineStage;

    /// Extract records; contexts are taken from `original_text`
    fn extract(&self, doc: &Document, original_text: &str) -> Result<Vec<Self::Output>>;

    /// Parse `text` with `source`, then extract.
    ///
    /// A parse fault is reported against this extractor's stage.
    fn extract_text(&self, source: &dyn SyntacticSource, text: &str) -> Result<Vec<Self::Output>> {
        let doc = source
            .parse(text)
            .map_err(|e| upstream_fault(e, self.stage()))?;
        self.extract(&doc, text)
    }
}

/// Re-attribute a syntactic source fault to the stage that consumed it
pub(crate) fn upstream_fault(err: TatError, stage: PipelineStage) -> TatError {
    match err {
        TatError::UpstreamParse { message, .. } => TatError::upstream(stage, message),
        other => TatError::upstream(stage, other.to_string()),
    }
}

/// Spans with a surface string; empty ones are logged and dropped
pub(crate) fn with_surface<'d>(
    spans: impl IntoIterator<Item = &'d Span>,
    stage: PipelineStage,
) -> impl Iterator<Item = &'d Span> {
    spans.into_iter().filter(move |span| {
        if span.is_empty() {
            tracing::warn!(
                "Skipping span without surface text at {}..{} ({})",
                span.start(),
                span.end(),
                stage
            );
            false
        } else {
            true
        }
    })
}
