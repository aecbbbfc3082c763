//! Navigation tree of dictionary nodes.

use serde::{Deserialize, Serialize};

pub const DICTIONARY_ROOT: &str = "Business Attribute Dictionary";
pub const BASIC_ROOT: &str = "Basic Classes";

const DICTIONARY_NODES: [&str; 8] = [
    "Standard Series",
    "A-Pipe Standard",
    "B1-Main Material",
    "B3-Grade",
    "C1-Flange Standard",
    "C2-Flange Pressure Rating",
    "D-Wall Thickness Grade",
    "Interface Table",
];

const BASIC_NODES: [&str; 2] = ["Bend Data", "Wall Thickness Series"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    pub fn folder(title: impl Into<String>, children: &[&str]) -> Self {
        Self {
            title: title.into(),
            children: children.iter().map(|child| Self::leaf(*child)).collect(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Root folders and their table nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTree {
    pub roots: Vec<TreeNode>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self {
            roots: vec![
                TreeNode::folder(DICTIONARY_ROOT, &DICTIONARY_NODES),
                TreeNode::folder(BASIC_ROOT, &BASIC_NODES),
            ],
        }
    }
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Titles of every selectable node, depth first.
    pub fn node_titles(&self) -> Vec<&str> {
        fn walk<'a>(node: &'a TreeNode, titles: &mut Vec<&'a str>) {
            if node.is_leaf() {
                titles.push(&node.title);
            }
            for child in &node.children {
                walk(child, titles);
            }
        }

        let mut titles = Vec::new();
        for root in &self.roots {
            walk(root, &mut titles);
        }
        titles
    }

    pub fn contains(&self, title: &str) -> bool {
        self.node_titles().contains(&title)
    }
}
