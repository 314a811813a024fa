//! End-to-end tests for the annotation pipeline

use std::sync::Arc;

use chrono::NaiveDate;
use tat_core::{sanitize, EntityType, EventType, PennTag, RelationType, TatError, TemporalType};
use tat_extractor::{
    AnalysisSession, HeuristicParser, KnowledgeGraph, NoProgress, Operation, Pipeline, ProgressRecorder,
};

const SAMPLE: &str = "Apple Inc. announced on Monday that Tim Cook, the CEO, will visit their new headquarters in Cupertino next month. The company reported $90 billion in revenue for the last quarter, exceeding analysts' expectations. Meanwhile, Microsoft's Satya Nadella commented on the recent partnership between the two tech giants during an interview in New York.";

fn analyze(text: &str) -> tat_extractor::Analysis {
    Pipeline::heuristic().run(text, &NoProgress).unwrap()
}

#[test]
fn test_sample_paragraph() {
    let analysis = analyze(SAMPLE);
    let result = &analysis.result;

    assert!(result
        .entities
        .iter()
        .any(|e| e.text == "Apple Inc." && e.entity_type == EntityType::Organization));
    assert!(result
        .entities
        .iter()
        .any(|e| e.text == "Tim Cook" && e.entity_type == EntityType::Person));
    assert!(result
        .entities
        .iter()
        .any(|e| e.text == "Cupertino" && e.entity_type == EntityType::Place));

    assert!(result.relations.iter().any(|r| r.entity1 == "Tim Cook"
        && r.entity2 == "Apple Inc."
        && r.relation_type == RelationType::Employment));

    assert!(result
        .events
        .iter()
        .any(|e| e.trigger == "announced" && e.event_type == EventType::Statement));

    assert!(result
        .temporal_expressions
        .iter()
        .any(|t| t.text == "Monday" && t.temporal_type == TemporalType::DayOfWeek));
    assert!(result
        .temporal_expressions
        .iter()
        .any(|t| t.text == "next month" && t.temporal_type == TemporalType::RelativeDate));
}

#[test]
fn test_entities_grouped_by_type() {
    let result = analyze(SAMPLE).result;
    let types: Vec<EntityType> = result.entities.iter().map(|e| e.entity_type).collect();

    let mut sorted = types.clone();
    sorted.sort_by_key(|t| EntityType::ORDER.iter().position(|o| o == t));
    assert_eq!(types, sorted);

    let people: Vec<&str> = result
        .entities_of_type(EntityType::Person)
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(people, vec!["Tim Cook", "Satya Nadella"]);
}

#[test]
fn test_relations_stay_within_sentences() {
    let result = analyze(SAMPLE).result;
    assert!(!result
        .relations
        .iter()
        .any(|r| r.relation_type == RelationType::Association));
    assert!(result.relations.iter().any(|r| r.entity1 == "Microsoft"
        && r.entity2 == "New York"
        && r.relation_type == RelationType::Location));
}

#[test]
fn test_parsed_dates_precede_patterns() {
    let result = analyze(SAMPLE).result;
    let first_pattern = result
        .temporal_expressions
        .iter()
        .position(|t| t.temporal_type != TemporalType::ParsedDate)
        .unwrap();

    assert!(first_pattern > 0);
    assert!(result.temporal_expressions[first_pattern..]
        .iter()
        .all(|t| t.temporal_type != TemporalType::ParsedDate && t.start.is_none()));
    assert!(result.temporal_expressions[..first_pattern]
        .iter()
        .all(|t| t.start.is_some() && t.end.is_some()));
}

#[test]
fn test_reference_date_resolves_relative_dates() {
    let parser = HeuristicParser::new().with_reference_date(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
    let analysis = Pipeline::new(Arc::new(parser)).run(SAMPLE, &NoProgress).unwrap();

    let next_month = analysis
        .result
        .temporal_expressions
        .iter()
        .find(|t| t.temporal_type == TemporalType::ParsedDate && t.text == "next month")
        .unwrap();
    assert_eq!(next_month.start.as_deref(), Some("2024-06-01"));
    assert_eq!(next_month.end.as_deref(), Some("2024-06-30"));
}

#[test]
fn test_pos_tags_cover_terms() {
    let result = analyze("Tim Cook visited Cupertino.").result;
    let tags: Vec<PennTag> = result.pos_tags.iter().map(|t| t.tag).collect();
    assert_eq!(
        tags,
        vec![PennTag::Nnp, PennTag::Nnp, PennTag::Vbd, PennTag::Nnp, PennTag::Punct]
    );
}

#[test]
fn test_contexts_are_sanitized_and_bounded() {
    let text = "<b>Apple Inc.</b> announced that <i>Tim Cook</i> will visit Cupertino on Monday.";
    let analysis = Pipeline::heuristic().run(text, &NoProgress).unwrap();
    let result = &analysis.result;

    let contexts = result
        .entities
        .iter()
        .map(|e| &e.context)
        .chain(result.relations.iter().map(|r| &r.context))
        .chain(result.events.iter().map(|e| &e.context))
        .chain(result.temporal_expressions.iter().map(|t| &t.context))
        .chain(result.pos_tags.iter().map(|t| &t.context));

    for context in contexts {
        assert_eq!(&sanitize(context), context);
        assert!(!context.contains("<i>") && !context.contains("</b>"));
        // window on both sides, the match and two ellipses
        assert!(context.chars().count() <= 2 * 30 + 40 + 6);
    }
}

#[test]
fn test_graph_data_mirrors_annotations() {
    let analysis = analyze(SAMPLE);
    assert_eq!(analysis.graph.nodes.len(), analysis.result.entities.len());
    assert_eq!(analysis.graph.links.len(), analysis.result.relations.len());
    assert_eq!(analysis.graph.nodes[0].id, analysis.result.entities[0].text);

    let kg = KnowledgeGraph::from_data(&analysis.graph);
    assert_eq!(kg.degree("Apple Inc."), 2);
    assert_eq!(kg.neighbors("Microsoft"), vec!["New York", "Satya Nadella"]);
}

#[test]
fn test_json_field_names() {
    let analysis = analyze(SAMPLE);
    let json = serde_json::to_value(&analysis.result).unwrap();

    assert!(json["entities"][0]["type"].is_string());
    assert!(json["relations"][0]["relation"].is_string());
    assert!(json["events"][0]["subjects"].as_array().unwrap().is_empty());
    assert!(json["pos_tags"].is_array());
    assert!(json["processing_time_ms"].is_u64());
    assert_eq!(json["temporal_expressions"][0]["type"], "parsed_date");
    assert_eq!(json["temporal_expressions"][0]["start"], "unknown");
}

#[test]
fn test_blank_input_is_invalid() {
    for text in ["", "   ", "\n\t"] {
        let err = Pipeline::heuristic().run(text, &NoProgress).unwrap_err();
        assert!(matches!(err, TatError::InvalidInput(_)));
    }
}

#[test]
fn test_progress_and_session_together() {
    let session = AnalysisSession::new();
    let recorder = ProgressRecorder::new();
    let pipeline = Pipeline::heuristic();

    let analysis = session.analyze(&pipeline, SAMPLE, &recorder).unwrap();
    assert!(!analysis.result.entities.is_empty());
    assert_eq!(recorder.updates().last().map(|u| u.percent), Some(100));

    let _guard = session.begin(Operation::ReportExport).unwrap();
    let err = session.analyze(&pipeline, SAMPLE, &recorder).unwrap_err();
    assert!(matches!(err, TatError::Busy(ref op) if op == "report export"));
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_any_prose_analyzes(text in "[A-Za-z0-9 ,.'$-]{1,200}") {
            prop_assume!(!text.trim().is_empty());

            let analysis = Pipeline::heuristic().run(&text, &NoProgress).unwrap();
            prop_assert_eq!(analysis.graph.nodes.len(), analysis.result.entities.len());
            prop_assert_eq!(analysis.graph.links.len(), analysis.result.relations.len());
            for tag in &analysis.result.pos_tags {
                prop_assert!(text.contains(tag.text.as_str()));
            }
        }
    }
}
