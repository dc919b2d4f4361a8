//! JSON debug export of a [`ThoughtTree`].

use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::PrettyFormatter;

use super::{Node, ThoughtTree};
use crate::error::TreeResult;

/// Exported view of a node. Representations are reduced to their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    pub text: String,
    pub parent_id: Option<String>,
    pub children_ids: Vec<String>,
    pub representation_shape: Option<Vec<usize>>,
    pub score: Option<f64>,
    pub consistency: Option<f64>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().to_string(),
            text: node.text().to_string(),
            parent_id: node.parent_id().map(str::to_string),
            children_ids: node.children_ids().to_vec(),
            representation_shape: node.representation().map(|r| r.shape().to_vec()),
            score: node.score(),
            consistency: node.consistency(),
        }
    }
}

impl ThoughtTree {
    /// Snapshot of every node in first-insertion order.
    pub fn records(&self) -> Vec<NodeRecord> {
        self.nodes().map(NodeRecord::from).collect()
    }

    /// Pretty JSON (4-space indent) object of [`records`](Self::records)
    /// keyed by id, in first-insertion order.
    pub fn to_json(&self) -> TreeResult<String> {
        let mut buf = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        (&mut serializer).collect_map(self.records().into_iter().map(|r| (r.id.clone(), r)))?;
        Ok(String::from_utf8(buf)?)
    }
}
