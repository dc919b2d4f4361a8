use uuid::Uuid;

use crate::error::{TreeError, TreeResult};

/// Opaque numeric payload attached to a node, such as a model's hidden
/// state for the step. Only its shape is ever exported.
#[derive(Debug, Clone, PartialEq)]
pub struct Representation {
    shape: Vec<usize>,
    values: Vec<f32>,
}

impl Representation {
    /// One-dimensional representation; shape is `[values.len()]`.
    pub fn vector(values: Vec<f32>) -> Self {
        Self {
            shape: vec![values.len()],
            values,
        }
    }

    /// Representation with an explicit shape. The product of `shape`
    /// must equal `values.len()`.
    pub fn new(shape: Vec<usize>, values: Vec<f32>) -> TreeResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(TreeError::ShapeMismatch {
                shape,
                len: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }
}

/// A single reasoning step in a [`ThoughtTree`](super::ThoughtTree).
///
/// `id`, `text` and `parent_id` are fixed at construction. `children_ids`
/// is maintained by the tree. `score` and `consistency` start absent and
/// are filled in by whatever evaluates the step.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    text: String,
    parent_id: Option<String>,
    children_ids: Vec<String>,
    representation: Option<Representation>,
    score: Option<f64>,
    consistency: Option<f64>,
}

impl Node {
    /// Create a node with a fresh random id
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), text)
    }

    /// Create a node with a caller-chosen id
    pub fn with_id(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            parent_id: None,
            children_ids: Vec::new(),
            representation: None,
            score: None,
            consistency: None,
        }
    }

    /// Set the parent id. Not checked against any tree.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = Some(representation);
        self
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_consistency(mut self, consistency: f64) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    /// Direct successors in insertion order
    pub fn children_ids(&self) -> &[String] {
        &self.children_ids
    }

    pub fn representation(&self) -> Option<&Representation> {
        self.representation.as_ref()
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn consistency(&self) -> Option<f64> {
        self.consistency
    }

    pub fn set_score(&mut self, score: f64) {
        self.score = Some(score);
    }

    pub fn set_consistency(&mut self, consistency: f64) {
        self.consistency = Some(consistency);
    }

    /// True when the node has no parent id
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Append a child link unless it is already present.
    pub(super) fn link_child(&mut self, child_id: &str) {
        if !self.children_ids.iter().any(|c| c == child_id) {
            self.children_ids.push(child_id.to_string());
        }
    }
}
