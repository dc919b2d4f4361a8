//! In-memory thought tree.
//!
//! A [`ThoughtTree`] indexes [`Node`]s by id and keeps parent/child links as
//! id lists. Links are deliberately lax:
//!
//! - adding a node whose id already exists replaces the stored node;
//! - a child is linked into its parent only if the parent is already in the
//!   tree when the child is added, and the link is never created later;
//! - `parent_id` is never validated, so dangling parents are possible;
//! - `root_id` is whichever node was added first.
//!
//! Callers that need complete ancestry must insert top-down.

mod export;
mod node;

pub use export::NodeRecord;
pub use node::{Node, Representation};

use std::collections::{HashMap, HashSet, VecDeque};

/// Append-only forest of reasoning nodes keyed by id.
///
/// Iteration and export follow first-insertion order; replacing a node
/// keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct ThoughtTree {
    nodes: HashMap<String, Node>,
    order: Vec<String>,
    root_id: Option<String>,
}

/// One entry of a breadth-first walk. `node` is `None` when a child id
/// points at a node that is not in the tree.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub depth: usize,
    pub id: &'a str,
    pub node: Option<&'a Node>,
}

impl ThoughtTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `node` under its id, replacing any node with the same id.
    ///
    /// If the node's parent is already present, the node's id is appended to
    /// the parent's children (once). The first node ever added becomes the
    /// root regardless of its own parent.
    pub fn add_node(&mut self, node: Node) {
        let id = node.id().to_string();
        let parent_id = node.parent_id().map(str::to_string);

        if self.nodes.insert(id.clone(), node).is_none() {
            self.order.push(id.clone());
        }

        if let Some(parent) = parent_id.and_then(|p| self.nodes.get_mut(&p)) {
            parent.link_child(&id);
        }

        if self.root_id.is_none() {
            self.root_id = Some(id);
        }
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable lookup, for attaching scores after generation.
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn root_id(&self) -> Option<&str> {
        self.root_id.as_deref()
    }

    pub fn root(&self) -> Option<&Node> {
        self.root_id.as_deref().and_then(|id| self.nodes.get(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in first-insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Present children of `id` in link order. Dangling child ids are skipped.
    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .get(id)
            .map(|n| n.children_ids())
            .unwrap_or_default()
            .iter()
            .filter_map(move |child| self.nodes.get(child))
    }

    /// Breadth-first walk from the root over `children_ids`, including
    /// dangling child ids. Each id is visited at most once.
    pub fn walk(&self) -> Vec<Visit<'_>> {
        let mut visits = Vec::new();
        let Some(root) = self.root_id.as_deref() else {
            return visits;
        };

        let mut queue = VecDeque::from([(root, 0usize)]);
        let mut seen = HashSet::new();

        while let Some((id, depth)) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let node = self.nodes.get(id);
            if let Some(node) = node {
                for child in node.children_ids() {
                    queue.push_back((child.as_str(), depth + 1));
                }
            }
            visits.push(Visit { depth, id, node });
        }

        visits
    }

    /// Breadth-first walk yielding only present nodes with their depth.
    pub fn bfs(&self) -> impl Iterator<Item = (usize, &Node)> {
        self.walk()
            .into_iter()
            .filter_map(|visit| visit.node.map(|node| (visit.depth, node)))
    }

    /// Ids from `id` up through every parent that is present in the tree.
    /// Empty when `id` itself is absent.
    pub fn path_to_root(&self, id: &str) -> Vec<String> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.nodes.get(id);

        while let Some(node) = current {
            if !seen.insert(node.id()) {
                break;
            }
            path.push(node.id().to_string());
            current = node.parent_id().and_then(|p| self.nodes.get(p));
        }

        path
    }

    /// Indented outline of the tree, one line per visited id.
    pub fn render_outline(&self) -> String {
        if self.nodes.is_empty() {
            return "Tree is empty.".to_string();
        }

        let mut out = String::new();
        for visit in self.walk() {
            let indent = "  ".repeat(visit.depth);
            let short: String = visit.id.chars().take(8).collect();
            match visit.node {
                Some(node) => {
                    let headline = node.text().split('.').next().unwrap_or_default();
                    out.push_str(&format!("{indent}- [{short}] {headline}"));
                    if let Some(score) = node.score() {
                        out.push_str(&format!(" (score: {score:.2}"));
                        if let Some(consistency) = node.consistency() {
                            out.push_str(&format!(", consistency: {consistency:.2}"));
                        }
                        out.push(')');
                    }
                }
                None => out.push_str(&format!("{indent}- [{short} not found]")),
            }
            out.push('\n');
        }
        out
    }
}
