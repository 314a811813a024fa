//! TAT Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout the TAT system:
//! - Annotation records (entities, relations, events, temporal expressions, POS tags)
//! - Common error types
//! - Markup sanitization and context-window extraction
//! - Configuration management
//! - Shared traits for remote text generation

pub mod config;
pub mod context;
pub mod sanitize;

pub use config::{AnalysisConfig, AppConfig, ConfigError, LlmConfig, LoggingConfig, UploadConfig};
pub use context::{get_context, get_context_with_window, DEFAULT_CONTEXT_WINDOW};
pub use sanitize::sanitize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for TAT operations
#[derive(Error, Debug)]
pub enum TatError {
    /// Empty or missing input text; no extraction is attempted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The syntactic source faulted or produced malformed spans
    #[error("Failed to extract {stage}: {message}")]
    UpstreamParse {
        stage: PipelineStage,
        message: String,
    },

    /// A pipeline stage failed; wraps the underlying error with stage context
    #[error("Analysis failed during {stage}: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: Box<TatError>,
    },

    /// Another operation holds the session
    #[error("Please wait for current operation to complete ({0} in progress)")]
    Busy(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TatError {
    /// Build an upstream parse error for a stage
    pub fn upstream(stage: PipelineStage, message: impl Into<String>) -> Self {
        Self::UpstreamParse {
            stage,
            message: message.into(),
        }
    }

    /// The pipeline stage this error is attributed to, if any
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::UpstreamParse { stage, .. } | Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TatError>;

// ============================================================================
// Pipeline Stages
// ============================================================================

/// Stages of one analysis run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Parse,
    Entities,
    Relations,
    Events,
    Temporal,
    PosTags,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "text",
            Self::Entities => "entities",
            Self::Relations => "relations",
            Self::Events => "events",
            Self::Temporal => "temporal expressions",
            Self::PosTags => "POS tags",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Coarse entity categories produced by the syntactic source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Person,
    Organization,
    Place,
    Date,
    Value,
}

impl EntityType {
    /// Extraction order used by the entity extractor
    pub const ORDER: [EntityType; 5] = [
        Self::Person,
        Self::Organization,
        Self::Place,
        Self::Date,
        Self::Value,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Organization => "organization",
            Self::Place => "place",
            Self::Date => "date",
            Self::Value => "value",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EntityType {
    type Err = TatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "person" => Ok(Self::Person),
            "organization" => Ok(Self::Organization),
            "place" => Ok(Self::Place),
            "date" => Ok(Self::Date),
            "value" => Ok(Self::Value),
            other => Err(TatError::InvalidInput(format!("unknown entity type: {other}"))),
        }
    }
}

/// A named entity found in the input text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Sanitized surface string
    pub text: String,

    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Excerpt of the original text around the first occurrence
    pub context: String,
}

// ============================================================================
// Relations
// ============================================================================

/// Relation categories derived from sentence co-occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// Person -> Organization
    Employment,
    /// Organization -> Place
    Location,
    /// Person -> Person
    Association,
}

impl RelationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employment => "employment",
            Self::Location => "location",
            Self::Association => "association",
        }
    }

    /// Fixed human-readable label for the relation
    pub fn label(&self) -> &'static str {
        match self {
            Self::Employment => "works for",
            Self::Location => "located in",
            Self::Association => "associated with",
        }
    }
}

impl std::fmt::Display for RelationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed relation between two entities of the same sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub entity1: String,
    pub entity2: String,

    #[serde(rename = "type")]
    pub relation_type: RelationType,

    /// Human-readable label, always `relation_type.label()`
    pub relation: String,

    pub context: String,
}

impl Relation {
    pub fn new(
        entity1: impl Into<String>,
        entity2: impl Into<String>,
        relation_type: RelationType,
        context: impl Into<String>,
    ) -> Self {
        Self {
            entity1: entity1.into(),
            entity2: entity2.into(),
            relation_type,
            relation: relation_type.label().to_string(),
            context: context.into(),
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Event categories assigned from the trigger word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Statement,
    Creation,
    Change,
    /// Fallback when no trigger keyword matches
    Action,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statement => "statement",
            Self::Creation => "creation",
            Self::Change => "change",
            Self::Action => "action",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An event anchored on a verb trigger
///
/// `subjects` and `objects` are never populated; argument roles are not extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub trigger: String,

    #[serde(rename = "type")]
    pub event_type: EventType,

    pub subjects: Vec<String>,
    pub objects: Vec<String>,
    pub context: String,
}

impl Event {
    pub fn new(trigger: impl Into<String>, event_type: EventType, context: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            event_type,
            subjects: Vec::new(),
            objects: Vec::new(),
            context: context.into(),
        }
    }
}

// ============================================================================
// Temporal Expressions
// ============================================================================

/// Source/category of a temporal expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemporalType {
    /// Structured parse from the syntactic source
    ParsedDate,
    Date,
    Month,
    RelativeDate,
    DayOfWeek,
    Time,
    Year,
    Decade,
    TimeOfDay,
}

impl TemporalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParsedDate => "parsed_date",
            Self::Date => "date",
            Self::Month => "month",
            Self::RelativeDate => "relative_date",
            Self::DayOfWeek => "day_of_week",
            Self::Time => "time",
            Self::Year => "year",
            Self::Decade => "decade",
            Self::TimeOfDay => "time_of_day",
        }
    }
}

impl std::fmt::Display for TemporalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A temporal expression; overlapping records across rules are expected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalExpression {
    pub text: String,

    #[serde(rename = "type")]
    pub temporal_type: TemporalType,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub start: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end: Option<String>,

    pub context: String,
}

// ============================================================================
// Part-of-Speech Tags
// ============================================================================

/// Penn Treebank style tags assigned by the rule tagger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PennTag {
    #[serde(rename = "PUNCT")]
    Punct,
    #[serde(rename = "CD")]
    Cd,
    #[serde(rename = "DT")]
    Dt,
    #[serde(rename = "PRP")]
    Prp,
    #[serde(rename = "PRP$")]
    PrpPossessive,
    #[serde(rename = "UH")]
    Uh,
    #[serde(rename = "MD")]
    Md,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "CC")]
    Cc,
    #[serde(rename = "WP")]
    Wp,
    #[serde(rename = "POS")]
    Pos,
    #[serde(rename = "RB")]
    Rb,
    #[serde(rename = "VBG")]
    Vbg,
    #[serde(rename = "VBD")]
    Vbd,
    #[serde(rename = "VBN")]
    Vbn,
    #[serde(rename = "VBZ")]
    Vbz,
    #[serde(rename = "JJ")]
    Jj,
    #[serde(rename = "JJR")]
    Jjr,
    #[serde(rename = "JJS")]
    Jjs,
    #[serde(rename = "NNP")]
    Nnp,
    #[serde(rename = "NN")]
    Nn,
    #[serde(rename = "unknown")]
    Unknown,
}

impl PennTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Punct => "PUNCT",
            Self::Cd => "CD",
            Self::Dt => "DT",
            Self::Prp => "PRP",
            Self::PrpPossessive => "PRP$",
            Self::Uh => "UH",
            Self::Md => "MD",
            Self::In => "IN",
            Self::Cc => "CC",
            Self::Wp => "WP",
            Self::Pos => "POS",
            Self::Rb => "RB",
            Self::Vbg => "VBG",
            Self::Vbd => "VBD",
            Self::Vbn => "VBN",
            Self::Vbz => "VBZ",
            Self::Jj => "JJ",
            Self::Jjr => "JJR",
            Self::Jjs => "JJS",
            Self::Nnp => "NNP",
            Self::Nn => "NN",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PennTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tagged term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTag {
    pub text: String,
    pub tag: PennTag,
    pub context: String,
}

// ============================================================================
// Analysis Result
// ============================================================================

/// Everything one analysis run produces, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub entities: Vec<Entity>,
    pub relations: Vec<Relation>,
    pub events: Vec<Event>,
    pub temporal_expressions: Vec<TemporalExpression>,
    pub pos_tags: Vec<PosTag>,

    /// Wall-clock time of the run in milliseconds
    pub processing_time_ms: u64,
}

impl AnalysisResult {
    /// Entities of one type, preserving order
    pub fn entities_of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.entity_type == entity_type)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Processing time rendered the way reports display it
    pub fn processing_time_label(&self) -> String {
        format!("{}ms", self.processing_time_ms)
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for LLM clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_serializes_type_field() {
        let entity = Entity {
            text: "Tim Cook".to_string(),
            entity_type: EntityType::Person,
            context: "that Tim Cook, the CEO".to_string(),
        };

        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "person");
        assert_eq!(json["text"], "Tim Cook");
        assert!(json.get("entity_type").is_none());
    }

    #[test]
    fn test_relation_label_follows_type() {
        let relation = Relation::new("Tim Cook", "Apple Inc.", RelationType::Employment, "");
        assert_eq!(relation.relation, "works for");
        assert_eq!(RelationType::Location.label(), "located in");
        assert_eq!(RelationType::Association.label(), "associated with");
    }

    #[test]
    fn test_event_roles_are_empty() {
        let event = Event::new("announced", EventType::Statement, "Apple Inc. announced");
        assert!(event.subjects.is_empty());
        assert!(event.objects.is_empty());

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "statement");
        assert_eq!(json["subjects"], serde_json::json!([]));
    }

    #[test]
    fn test_temporal_bounds_only_when_present() {
        let pattern = TemporalExpression {
            text: "Monday".to_string(),
            temporal_type: TemporalType::DayOfWeek,
            start: None,
            end: None,
            context: "on Monday".to_string(),
        };
        let json = serde_json::to_value(&pattern).unwrap();
        assert_eq!(json["type"], "day_of_week");
        assert!(json.get("start").is_none());

        let parsed = TemporalExpression {
            start: Some("unknown".to_string()),
            end: Some("unknown".to_string()),
            temporal_type: TemporalType::ParsedDate,
            ..pattern
        };
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["type"], "parsed_date");
        assert_eq!(json["start"], "unknown");
    }

    #[test]
    fn test_penn_tag_serialization() {
        assert_eq!(
            serde_json::to_value(PennTag::PrpPossessive).unwrap(),
            serde_json::json!("PRP$")
        );
        assert_eq!(
            serde_json::to_value(PennTag::Unknown).unwrap(),
            serde_json::json!("unknown")
        );
        assert_eq!(PennTag::Vbg.to_string(), "VBG");
    }

    #[test]
    fn test_entities_of_type_filters_in_order() {
        let make = |text: &str, entity_type| Entity {
            text: text.to_string(),
            entity_type,
            context: String::new(),
        };
        let result = AnalysisResult {
            entities: vec![
                make("Tim Cook", EntityType::Person),
                make("Apple Inc.", EntityType::Organization),
                make("Satya Nadella", EntityType::Person),
            ],
            processing_time_ms: 12,
            ..Default::default()
        };

        let people: Vec<&str> = result
            .entities_of_type(EntityType::Person)
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(people, vec!["Tim Cook", "Satya Nadella"]);
        assert_eq!(result.processing_time_label(), "12ms");
    }

    #[test]
    fn test_error_stage_context() {
        let err = TatError::upstream(PipelineStage::Entities, "bad span");
        assert_eq!(err.to_string(), "Failed to extract entities: bad span");
        assert_eq!(err.stage(), Some(PipelineStage::Entities));

        let wrapped = TatError::Stage {
            stage: PipelineStage::Relations,
            source: Box::new(TatError::InvalidInput("x".to_string())),
        };
        assert_eq!(wrapped.stage(), Some(PipelineStage::Relations));
        assert!(TatError::Busy("analysis".to_string()).stage().is_none());
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!("Person".parse::<EntityType>().unwrap(), EntityType::Person);
        assert!("thing".parse::<EntityType>().is_err());
    }
}
