//! Relation extraction
//!
//! Pairs entities that co-occur in a sentence:
//! - employment: person × organization
//! - location: organization × place
//! - association: each unordered pair of people
//!
//! The context of a relation is looked up for the literal "entity1 entity2"
//! string, which usually does not occur in the text and falls back to the
//! pair itself.

use tat_core::{
    get_context_with_window, sanitize, PipelineStage, Relation, RelationType, Result, DEFAULT_CONTEXT_WINDOW,
};

use crate::syntax::{Document, Span};
use crate::{with_surface, Extractor};

/// Co-occurrence relation extractor
#[derive(Debug, Clone)]
pub struct RelationExtractor {
    context_window: usize,
}

impl RelationExtractor {
    pub fn new() -> Self {
        Self {
            context_window: DEFAULT_CONTEXT_WINDOW,
        }
    }

    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }

    fn relation(&self, original_text: &str, a: &Span, b: &Span, relation_type: RelationType) -> Relation {
        let pair = format!("{} {}", a.text(), b.text());
        Relation::new(
            sanitize(a.text()),
            sanitize(b.text()),
            relation_type,
            get_context_with_window(original_text, &pair, self.context_window),
        )
    }
}

impl Default for RelationExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for RelationExtractor {
    type Output = Relation;

    fn stage(&self) -> PipelineStage {
        PipelineStage::Relations
    }

    fn extract(&self, doc: &Document, original_text: &str) -> Result<Vec<Relation>> {
        let mut relations = Vec::new();
        let stage = self.stage();

        for sentence in doc.sentences() {
            let people: Vec<&Span> = with_surface(sentence.people(), stage).collect();
            let orgs: Vec<&Span> = with_surface(sentence.organizations(), stage).collect();
            let places: Vec<&Span> = with_surface(sentence.places(), stage).collect();

            for person in &people {
                for org in &orgs {
                    relations.push(self.relation(original_text, person, org, RelationType::Employment));
                }
            }

            for org in &orgs {
                for place in &places {
                    relations.push(self.relation(original_text, org, place, RelationType::Location));
                }
            }

            for (i, first) in people.iter().enumerate() {
                for second in &people[i + 1..] {
                    relations.push(self.relation(original_text, first, second, RelationType::Association));
                }
            }
        }

        tracing::debug!("Extracted {} relations", relations.len());
        Ok(relations)
    }
}

/// Extract relations with the default context window
pub fn extract_relations(doc: &Document, original_text: &str) -> Result<Vec<Relation>> {
    RelationExtractor::new().extract(doc, original_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{HeuristicParser, SyntacticSource};
    use crate::syntax::SpanCategory;
    use crate::test_support::{FailingSource, FixedSource};
    use proptest::prelude::*;
    use std::collections::HashSet;
    use tat_core::TatError;

    fn relations(text: &str) -> Vec<Relation> {
        let doc = HeuristicParser::new().parse(text).unwrap();
        extract_relations(&doc, text).unwrap()
    }

    #[test]
    fn test_relation_order_within_sentence() {
        let found = relations("Tim Cook and Jane Smith joined Apple in Cupertino.");
        let summary: Vec<(&str, &str, RelationType)> = found
            .iter()
            .map(|r| (r.entity1.as_str(), r.entity2.as_str(), r.relation_type))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Tim Cook", "Apple", RelationType::Employment),
                ("Jane Smith", "Apple", RelationType::Employment),
                ("Apple", "Cupertino", RelationType::Location),
                ("Tim Cook", "Jane Smith", RelationType::Association),
            ]
        );
        assert_eq!(found[0].relation, "works for");
        assert_eq!(found[2].relation, "located in");
        assert_eq!(found[3].relation, "associated with");
    }

    #[test]
    fn test_no_cross_sentence_pairs() {
        let found = relations("Tim Cook spoke. Microsoft listened.");
        assert!(found.is_empty());
    }

    #[test]
    fn test_context_falls_back_to_pair() {
        let found = relations("Tim Cook leads Apple.");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].context, "Tim Cook Apple");
    }

    #[test]
    fn test_sentences_are_independent() {
        let found = relations("Tim Cook joined Apple. Satya Nadella leads Microsoft in Redmond.");
        let summary: Vec<(&str, &str, RelationType)> = found
            .iter()
            .map(|r| (r.entity1.as_str(), r.entity2.as_str(), r.relation_type))
            .collect();

        assert_eq!(
            summary,
            vec![
                ("Tim Cook", "Apple", RelationType::Employment),
                ("Satya Nadella", "Microsoft", RelationType::Employment),
                ("Microsoft", "Redmond", RelationType::Location),
            ]
        );
    }

    #[test]
    fn test_parse_fault_aborts_with_stage() {
        let err = RelationExtractor::new()
            .extract_text(&FailingSource, "x")
            .unwrap_err();
        assert_eq!(err.stage(), Some(PipelineStage::Relations));
        assert_eq!(err.to_string(), "Failed to extract relations: parser crashed");
        assert!(matches!(err, TatError::UpstreamParse { .. }));
    }

    fn people_in_one_sentence(count: usize) -> (String, FixedSource) {
        let names: Vec<String> = (0..count).map(|i| format!("Person{i}")).collect();
        let text = names.join(" and ");
        let mut spans = Vec::with_capacity(count);
        let mut offset = 0;
        for name in &names {
            spans.push((SpanCategory::Person, offset, offset + name.len()));
            offset += name.len() + " and ".len();
        }
        (text, FixedSource { spans })
    }

    proptest! {
        #[test]
        fn prop_associations_cover_each_pair_once(count in 3usize..9) {
            let (text, source) = people_in_one_sentence(count);
            let found = RelationExtractor::new().extract_text(&source, &text).unwrap();

            let index = |name: &str| name.trim_start_matches("Person").parse::<usize>().unwrap();
            let pairs: Vec<(usize, usize)> = found
                .iter()
                .filter(|r| r.relation_type == RelationType::Association)
                .map(|r| (index(&r.entity1), index(&r.entity2)))
                .collect();

            prop_assert_eq!(found.len(), pairs.len());
            prop_assert_eq!(pairs.len(), count * (count - 1) / 2);
            prop_assert!(pairs.iter().all(|(i, j)| i < j));
            let unique: HashSet<_> = pairs.iter().collect();
            prop_assert_eq!(unique.len(), pairs.len());
        }
    }
}
