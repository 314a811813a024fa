//! Terminal rendering of analysis results

use std::fmt::Write;

use tat_core::{AnalysisResult, EntityType, PosTag, TemporalExpression};

pub fn entities(result: &AnalysisResult, filter: Option<EntityType>) -> String {
    let mut out = String::new();
    let types = EntityType::ORDER
        .iter()
        .copied()
        .filter(|t| filter.map_or(true, |f| f == *t));

    for entity_type in types {
        let group: Vec<_> = result.entities_of_type(entity_type).collect();
        if group.is_empty() {
            continue;
        }
        let _ = writeln!(out, "[{}] ({})", entity_type, group.len());
        for entity in group {
            let _ = writeln!(out, "  {}", entity.text);
            let _ = writeln!(out, "    {}", entity.context);
        }
    }

    if out.is_empty() {
        out.push_str("No entities found\n");
    }
    out
}

pub fn relations(result: &AnalysisResult) -> String {
    if result.relations.is_empty() {
        return "No relations found\n".to_string();
    }

    result.relations.iter().fold(String::new(), |mut out, r| {
        let _ = writeln!(out, "  {} --{}--> {} ({})", r.entity1, r.relation, r.entity2, r.relation_type);
        out
    })
}

pub fn events(result: &AnalysisResult) -> String {
    if result.events.is_empty() {
        return "No events found\n".to_string();
    }

    result.events.iter().fold(String::new(), |mut out, e| {
        let _ = writeln!(out, "  {} ({})", e.trigger, e.event_type);
        let _ = writeln!(out, "    {}", e.context);
        out
    })
}

pub fn temporal(expressions: &[TemporalExpression]) -> String {
    if expressions.is_empty() {
        return "No temporal expressions found\n".to_string();
    }

    expressions.iter().fold(String::new(), |mut out, t| {
        match (&t.start, &t.end) {
            (Some(start), Some(end)) => {
                let _ = writeln!(out, "  {} ({}) {} .. {}", t.text, t.temporal_type, start, end);
            }
            _ => {
                let _ = writeln!(out, "  {} ({})", t.text, t.temporal_type);
            }
        }
        out
    })
}

/// `word/TAG` pairs on one line
pub fn tags(tags: &[PosTag]) -> String {
    let line = tags
        .iter()
        .map(|t| format!("{}/{}", t.text, t.tag))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{line}\n")
}

/// Every section, headed, in pipeline order
pub fn analysis(result: &AnalysisResult, filter: Option<EntityType>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Entities ===\n{}", entities(result, filter));
    let _ = writeln!(out, "=== Relations ===\n{}", relations(result));
    let _ = writeln!(out, "=== Events ===\n{}", events(result));
    let _ = writeln!(out, "=== Temporal Expressions ===\n{}", temporal(&result.temporal_expressions));
    let _ = writeln!(out, "=== POS Tags ===\n{}", tags(&result.pos_tags));
    let _ = writeln!(
        out,
        "{} entities, {} relations in {}",
        result.entity_count(),
        result.relation_count(),
        result.processing_time_label()
    );
    out
}
