//! CSV and plain-text report layouts

use crate::Report;

/// Quote a CSV field when it would otherwise break the row
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        csv_quoted(value)
    } else {
        value.to_string()
    }
}

fn csv_quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

pub(crate) fn csv(report: &Report) -> String {
    let mut lines = vec![
        "Analysis Report".to_string(),
        format!("Generated: {}", report.timestamp),
        format!("Processing Time: {}", report.processing_time),
        format!("Entity Count: {}", report.statistics.entity_count),
        format!("Relation Count: {}", report.statistics.relation_count),
        String::new(),
        "Entities".to_string(),
        "Text,Type,Context".to_string(),
    ];

    for node in &report.entities {
        lines.push(format!(
            "{},{},{}",
            csv_field(&node.id),
            node.node_type,
            // context is always quoted
            csv_quoted(&node.context)
        ));
    }
    lines.push(String::new());

    lines.push("Relations".to_string());
    lines.push("Source,Target,Type,Relation".to_string());
    for link in &report.relations {
        lines.push(format!(
            "{},{},{},{}",
            csv_field(&link.source),
            csv_field(&link.target),
            link.link_type,
            link.relation
        ));
    }

    lines.join("\n")
}

pub(crate) fn text(report: &Report) -> String {
    let mut lines = vec![
        "=== Text Analysis Report ===".to_string(),
        format!("Generated: {}", report.timestamp),
        format!("Processing Time: {}", report.processing_time),
        String::new(),
        "=== Statistics ===".to_string(),
        format!("Total Entities: {}", report.statistics.entity_count),
        format!("Total Relations: {}", report.statistics.relation_count),
        String::new(),
        "=== Entities ===".to_string(),
    ];

    for node in &report.entities {
        lines.push(format!("- {} ({})", node.id, node.node_type));
        lines.push(format!("  Context: {}", node.context));
        lines.push(String::new());
    }

    lines.push("=== Relations ===".to_string());
    for link in &report.relations {
        lines.push(format!("- {} {} {}", link.source, link.relation, link.target));
        lines.push(format!("  Type: {}", link.link_type));
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_report;
    use proptest::prelude::*;

    #[test]
    fn test_csv_layout() {
        let csv = csv(&sample_report());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "Analysis Report",
                "Generated: 2024-05-15T09:30:00.000Z",
                "Processing Time: 42ms",
                "Entity Count: 2",
                "Relation Count: 1",
                "",
                "Entities",
                "Text,Type,Context",
                "Tim Cook,person,\"...that Tim Cook, the \"\"CEO\"\"...\"",
                "Apple Inc.,organization,\"Apple Inc. announced...\"",
                "",
                "Relations",
                "Source,Target,Type,Relation",
                "Tim Cook,Apple Inc.,employment,works for",
            ]
        );
    }

    #[test]
    fn test_text_layout() {
        let text = text(&sample_report());
        assert!(text.contains("=== Statistics ===\nTotal Entities: 2\nTotal Relations: 1\n"));
        assert!(text.contains("- Tim Cook (person)\n  Context: ...that Tim Cook, the \"CEO\"...\n"));
        assert!(text.contains("=== Relations ===\n- Tim Cook works for Apple Inc.\n  Type: employment\n"));
    }

    #[test]
    fn test_empty_report_sections() {
        let mut report = sample_report();
        report.entities.clear();
        report.relations.clear();

        let text = text(&report);
        assert!(text.ends_with("=== Entities ===\n=== Relations ==="));
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("Apple"), "Apple");
        assert_eq!(csv_field("Apple, Inc."), "\"Apple, Inc.\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    proptest! {
        #[test]
        fn prop_quoted_field_round_trips(value in ".*") {
            let quoted = csv_quoted(&value);
            let inner = &quoted[1..quoted.len() - 1];
            prop_assert_eq!(inner.replace("\"\"", "\""), value);
        }
    }
}
