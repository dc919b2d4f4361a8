use super::StepObserver;
use crate::tree::{Node, ThoughtTree};

/// Records a driven chain into a [`ThoughtTree`].
///
/// The problem statement is the root; each step is attached as a child of
/// the previous one. Insertion is top-down, so every link is created.
#[derive(Debug, Clone)]
pub struct TreeRecorder {
    tree: ThoughtTree,
    tip: String,
}

impl TreeRecorder {
    pub fn new(problem: &str) -> Self {
        let root = Node::new(problem);
        let tip = root.id().to_string();
        let mut tree = ThoughtTree::new();
        tree.add_node(root);
        Self { tree, tip }
    }

    pub fn tree(&self) -> &ThoughtTree {
        &self.tree
    }

    /// Id of the most recently recorded node
    pub fn tip(&self) -> &str {
        &self.tip
    }

    pub fn into_tree(self) -> ThoughtTree {
        self.tree
    }
}

impl StepObserver for TreeRecorder {
    fn on_step(&mut self, _index: usize, step: &str, _finished: bool) {
        let node = Node::new(step).with_parent(self.tip.as_str());
        self.tip = node.id().to_string();
        self.tree.add_node(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_recorder_holds_problem_root() {
        let recorder = TreeRecorder::new("problem");
        let tree = recorder.tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root_id(), Some(recorder.tip()));
        assert_eq!(tree.root().map(Node::text), Some("problem"));
    }

    #[test]
    fn test_steps_chain_from_root() {
        let mut recorder = TreeRecorder::new("problem");
        recorder.on_step(0, "a", false);
        recorder.on_step(1, "b", true);

        let tree = recorder.tree();
        let path = tree.path_to_root(recorder.tip());
        assert_eq!(path.len(), 3);
        assert_eq!(tree.get_node(&path[0]).map(Node::text), Some("b"));
        assert_eq!(path.last().map(String::as_str), tree.root_id());
    }
}
