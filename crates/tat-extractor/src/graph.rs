//! Knowledge graph data
//!
//! [`GraphData`] is the serializable node/link form used by visualizations and
//! report export: one node per entity and one link per relation, duplicates
//! included. [`KnowledgeGraph`] is a petgraph view with nodes deduplicated by
//! id, for structural queries.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use tat_core::{AnalysisResult, Entity, EntityType, Relation, RelationType};

/// A graph node built from an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,

    #[serde(rename = "type")]
    pub node_type: EntityType,

    pub context: String,
}

/// A graph link built from a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,

    #[serde(rename = "type")]
    pub link_type: RelationType,

    pub relation: String,
}

/// Nodes and links in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphData {
    pub fn new(entities: &[Entity], relations: &[Relation]) -> Self {
        let nodes = entities
            .iter()
            .map(|entity| GraphNode {
                id: entity.text.clone(),
                node_type: entity.entity_type,
                context: entity.context.clone(),
            })
            .collect();

        let links = relations
            .iter()
            .map(|relation| GraphLink {
                source: relation.entity1.clone(),
                target: relation.entity2.clone(),
                link_type: relation.relation_type,
                relation: relation.relation.clone(),
            })
            .collect();

        Self { nodes, links }
    }

    pub fn from_analysis(result: &AnalysisResult) -> Self {
        Self::new(&result.entities, &result.relations)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// Deduplicated directed graph over entity ids
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    graph: DiGraph<GraphNode, GraphLink>,
    index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    /// Build from graph data; the first node with a given id wins and links
    /// to unknown ids are dropped
    pub fn from_data(data: &GraphData) -> Self {
        let mut kg = Self::default();

        for node in &data.nodes {
            if !kg.index.contains_key(&node.id) {
                let idx = kg.graph.add_node(node.clone());
                kg.index.insert(node.id.clone(), idx);
            }
        }

        for link in &data.links {
            match (kg.index.get(&link.source), kg.index.get(&link.target)) {
                (Some(&src), Some(&dst)) => {
                    kg.graph.add_edge(src, dst, link.clone());
                }
                _ => tracing::debug!("Dropping link {} -> {} with unknown endpoint", link.source, link.target),
            }
        }

        kg
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Incoming plus outgoing links of a node
    pub fn degree(&self, id: &str) -> usize {
        self.index.get(id).map_or(0, |&idx| {
            self.graph.edges_directed(idx, Direction::Outgoing).count()
                + self.graph.edges_directed(idx, Direction::Incoming).count()
        })
    }

    /// Distinct ids linked to `id` in either direction
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors_undirected(idx)
            .map(|n| self.graph[n].id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Node ids ordered by degree (highest first, ties by id)
    pub fn most_connected(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .graph
            .node_indices()
            .map(|idx| {
                let id = self.graph[idx].id.as_str();
                (id, self.degree(id))
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn graph(&self) -> &DiGraph<GraphNode, GraphLink> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(text: &str, entity_type: EntityType) -> Entity {
        Entity {
            text: text.to_string(),
            entity_type,
            context: format!("...{text}..."),
        }
    }

    fn sample() -> GraphData {
        let entities = vec![
            entity("Tim Cook", EntityType::Person),
            entity("Jane Smith", EntityType::Person),
            entity("Apple", EntityType::Organization),
            entity("Cupertino", EntityType::Place),
            entity("Apple", EntityType::Organization),
        ];
        let relations = vec![
            Relation::new("Tim Cook", "Apple", RelationType::Employment, "Tim Cook Apple"),
            Relation::new("Jane Smith", "Apple", RelationType::Employment, "Jane Smith Apple"),
            Relation::new("Apple", "Cupertino", RelationType::Location, "Apple Cupertino"),
            Relation::new("Tim Cook", "Jane Smith", RelationType::Association, "Tim Cook Jane Smith"),
        ];
        GraphData::new(&entities, &relations)
    }

    #[test]
    fn test_graph_data_keeps_duplicates() {
        let data = sample();
        assert_eq!(data.nodes.len(), 5);
        assert_eq!(data.links.len(), 4);
        assert_eq!(data.links[0].relation, "works for");
    }

    #[test]
    fn test_graph_data_serialization() {
        let data = sample();
        let json = serde_json::to_value(&data).unwrap();

        assert_eq!(json["nodes"][0]["id"], "Tim Cook");
        assert_eq!(json["nodes"][0]["type"], "person");
        assert_eq!(json["links"][2]["source"], "Apple");
        assert_eq!(json["links"][2]["type"], "location");
        assert_eq!(json["links"][2]["relation"], "located in");
    }

    #[test]
    fn test_knowledge_graph_dedups_nodes() {
        let kg = KnowledgeGraph::from_data(&sample());
        assert_eq!(kg.node_count(), 4);
        assert_eq!(kg.edge_count(), 4);
        assert_eq!(kg.node("Apple").map(|n| n.node_type), Some(EntityType::Organization));
    }

    #[test]
    fn test_degree_and_neighbors() {
        let kg = KnowledgeGraph::from_data(&sample());
        assert_eq!(kg.degree("Apple"), 3);
        assert_eq!(kg.degree("Cupertino"), 1);
        assert_eq!(kg.degree("Nobody"), 0);
        assert_eq!(kg.neighbors("Tim Cook"), vec!["Apple", "Jane Smith"]);
        assert_eq!(kg.most_connected(1), vec![("Apple", 3)]);
    }

    #[test]
    fn test_link_to_unknown_node_dropped() {
        let data = GraphData {
            nodes: vec![GraphNode {
                id: "Apple".to_string(),
                node_type: EntityType::Organization,
                context: String::new(),
            }],
            links: vec![GraphLink {
                source: "Apple".to_string(),
                target: "Mars".to_string(),
                link_type: RelationType::Location,
                relation: "located in".to_string(),
            }],
        };
        let kg = KnowledgeGraph::from_data(&data);
        assert_eq!(kg.edge_count(), 0);
    }
}
