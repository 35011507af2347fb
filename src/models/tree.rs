use serde::Serialize;

use super::entry::Entry;

/// One node of a directory tree. Files carry no `children` key at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub item: Entry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(item: Entry) -> Self {
        Self {
            item,
            children: None,
        }
    }

    pub fn branch(item: Entry, children: Vec<TreeNode>) -> Self {
        Self {
            item,
            children: Some(children),
        }
    }

    pub fn children(&self) -> &[TreeNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}
