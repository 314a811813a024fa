//! Analysis pipeline
//!
//! Runs one parse and every extractor over it in a fixed order:
//! entities, relations, graph, events, temporal expressions, POS tags.
//! Progress is pushed to a [`ProgressSink`] as each stage begins.
//!
//! [`AnalysisSession`] is the re-entrancy guard shared by everything that
//! should not overlap with an analysis (sample fetches, file reads, report
//! export).

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tat_core::{sanitize, AnalysisConfig, AnalysisResult, PipelineStage, Result, TatError};

use crate::entity::EntityExtractor;
use crate::event::EventExtractor;
use crate::graph::GraphData;
use crate::pos::PosTagger;
use crate::relation::RelationExtractor;
use crate::syntax::{HeuristicParser, SyntacticSource};
use crate::temporal::TemporalExtractor;
use crate::{upstream_fault, Extractor};

// ============================================================================
// Progress
// ============================================================================

/// A progress notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub percent: u8,
    pub message: String,
}

/// Receives progress notifications from a running analysis
pub trait ProgressSink: Send + Sync {
    fn update(&self, update: ProgressUpdate);
}

/// Discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn update(&self, _update: ProgressUpdate) {}
}

impl<F> ProgressSink for F
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn update(&self, update: ProgressUpdate) {
        self(update)
    }
}

/// Keeps every update it receives
#[derive(Debug, Default)]
pub struct ProgressRecorder {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl ProgressRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates
            .lock()
            .map(|updates| updates.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl ProgressSink for ProgressRecorder {
    fn update(&self, update: ProgressUpdate) {
        match self.updates.lock() {
            Ok(mut updates) => updates.push(update),
            Err(poisoned) => poisoned.into_inner().push(update),
        }
    }
}

/// Percent and message reported before each step
pub const PROGRESS_STEPS: [(u8, &str); 9] = [
    (10, "Loading NLP models..."),
    (30, "Analyzing text..."),
    (50, "Extracting named entities..."),
    (70, "Extracting relations..."),
    (75, "Updating knowledge graph..."),
    (80, "Extracting events..."),
    (90, "Extracting temporal expressions..."),
    (95, "Performing POS tagging..."),
    (100, "Analysis complete!"),
];

fn report(progress: &dyn ProgressSink, step: usize) {
    let (percent, message) = PROGRESS_STEPS[step];
    progress.update(ProgressUpdate {
        percent,
        message: sanitize(message),
    });
}

// ============================================================================
// Pipeline
// ============================================================================

/// Output of one run: the annotations plus the graph built from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub result: AnalysisResult,
    pub graph: GraphData,
}

/// Sequential annotation pipeline over a syntactic source
#[derive(Clone)]
pub struct Pipeline {
    source: Arc<dyn SyntacticSource>,
    entities: EntityExtractor,
    relations: RelationExtractor,
    events: EventExtractor,
    temporal: TemporalExtractor,
    pos: PosTagger,
    max_input_chars: usize,
}

impl Pipeline {
    pub fn new(source: Arc<dyn SyntacticSource>) -> Self {
        Self::from_config(source, &AnalysisConfig::default())
    }

    /// Pipeline over the built-in heuristic parser
    pub fn heuristic() -> Self {
        Self::new(Arc::new(HeuristicParser::new()))
    }

    pub fn from_config(source: Arc<dyn SyntacticSource>, config: &AnalysisConfig) -> Self {
        let window = config.context_window;
        Self {
            source,
            entities: EntityExtractor::new().with_context_window(window),
            relations: RelationExtractor::new().with_context_window(window),
            events: EventExtractor::new().with_context_window(window),
            temporal: TemporalExtractor::new().with_context_window(window),
            pos: PosTagger::new().with_context_window(window),
            max_input_chars: config.max_input_chars,
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    /// Run every stage over `text`.
    ///
    /// Blank or oversized input is rejected before any stage runs. The first
    /// failing stage aborts the run and is named in the returned error.
    pub fn run(&self, text: &str, progress: &dyn ProgressSink) -> Result<Analysis> {
        if text.trim().is_empty() {
            return Err(TatError::InvalidInput("Please enter some text to analyze.".to_string()));
        }
        let chars = text.chars().count();
        if chars > self.max_input_chars {
            return Err(TatError::InvalidInput(format!(
                "Text has {chars} characters; the limit is {}",
                self.max_input_chars
            )));
        }

        let started = Instant::now();
        tracing::info!("Starting analysis of {} chars with {}", chars, self.source.name());

        report(progress, 0);
        report(progress, 1);
        // The parse is consumed first by the entity stage
        let doc = self
            .source
            .parse(text)
            .map_err(|e| stage_failed(PipelineStage::Entities, upstream_fault(e, PipelineStage::Entities)))?;

        report(progress, 2);
        let entities = run_stage(&self.entities, &doc, text)?;

        report(progress, 3);
        let relations = run_stage(&self.relations, &doc, text)?;

        report(progress, 4);
        let graph = GraphData::new(&entities, &relations);

        report(progress, 5);
        let events = run_stage(&self.events, &doc, text)?;

        report(progress, 6);
        let temporal_expressions = if self.source.supports_dates() {
            run_stage(&self.temporal, &doc, text)?
        } else {
            tracing::warn!("{} does not parse dates; using patterns only", self.source.name());
            self.temporal.match_patterns(text)
        };

        report(progress, 7);
        let pos_tags = run_stage(&self.pos, &doc, text)?;

        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        report(progress, 8);

        let result = AnalysisResult {
            entities,
            relations,
            events,
            temporal_expressions,
            pos_tags,
            processing_time_ms,
        };

        tracing::info!(
            "Analysis complete in {}ms: {} entities, {} relations, {} events, {} temporal, {} tags",
            processing_time_ms,
            result.entities.len(),
            result.relations.len(),
            result.events.len(),
            result.temporal_expressions.len(),
            result.pos_tags.len()
        );

        Ok(Analysis { result, graph })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("source", &self.source.name())
            .field("max_input_chars", &self.max_input_chars)
            .finish_non_exhaustive()
    }
}

fn run_stage<E: Extractor>(
    extractor: &E,
    doc: &crate::syntax::Document,
    text: &str,
) -> Result<Vec<E::Output>> {
    extractor
        .extract(doc, text)
        .map_err(|e| stage_failed(extractor.stage(), e))
}

fn stage_failed(stage: PipelineStage, err: TatError) -> TatError {
    tracing::error!("Stage {} failed: {}", stage, err);
    TatError::Stage {
        stage,
        source: Box::new(err),
    }
}

// ============================================================================
// Session
// ============================================================================

/// Operations that hold the session while they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Operation {
    Analysis = 1,
    SampleText = 2,
    FileRead = 3,
    ReportExport = 4,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analysis => "analysis",
            Self::SampleText => "sample text",
            Self::FileRead => "file read",
            Self::ReportExport => "report export",
        }
    }

    fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Analysis),
            2 => Some(Self::SampleText),
            3 => Some(Self::FileRead),
            4 => Some(Self::ReportExport),
            _ => None,
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const IDLE: u8 = 0;

/// Single-flight guard: at most one operation at a time
#[derive(Debug, Default)]
pub struct AnalysisSession {
    active: AtomicU8,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the session for `operation`, or fail with `Busy` naming the
    /// operation already in flight
    pub fn begin(&self, operation: Operation) -> Result<SessionGuard<'_>> {
        match self
            .active
            .compare_exchange(IDLE, operation as u8, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                tracing::debug!("Session taken for {}", operation);
                Ok(SessionGuard {
                    session: self,
                    operation,
                })
            }
            Err(current) => {
                let running = Operation::from_u8(current).map_or("operation", |op| op.as_str());
                tracing::warn!("Rejected {} while {} is in progress", operation, running);
                Err(TatError::Busy(running.to_string()))
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.active.load(Ordering::Acquire) != IDLE
    }

    pub fn current(&self) -> Option<Operation> {
        Operation::from_u8(self.active.load(Ordering::Acquire))
    }

    /// Run `pipeline` while holding the session
    pub fn analyze(&self, pipeline: &Pipeline, text: &str, progress: &dyn ProgressSink) -> Result<Analysis> {
        let _guard = self.begin(Operation::Analysis)?;
        pipeline.run(text, progress)
    }
}

/// Releases the session on drop
#[derive(Debug)]
pub struct SessionGuard<'a> {
    session: &'a AnalysisSession,
    operation: Operation,
}

impl SessionGuard<'_> {
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.session.active.store(IDLE, Ordering::Release);
        tracing::debug!("Session released after {}", self.operation);
    }
}
