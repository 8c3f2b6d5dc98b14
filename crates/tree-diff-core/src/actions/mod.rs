//! 编辑脚本的动作模型
//!
//! Chawathe 算法产出的六种动作。插入动作携带的是目标树节点，
//! 其余动作携带源树节点；父引用用 [`NodeRef`] 标明落在哪棵树，
//! 因为新插入子树的父节点本身可能也是目标树里的新节点。

pub mod chawathe;
pub mod classifier;
pub mod simplified;

pub use chawathe::ChawatheScriptGenerator;
pub use classifier::{AllNodesClassifier, OnlyRootsClassifier, TreeClassifier};
pub use simplified::SimplifiedChawatheScriptGenerator;

use serde::Serialize;

use crate::tree::NodeId;

/// 指向源树或目标树的节点引用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "tree", content = "node", rename_all = "lowercase")]
pub enum NodeRef {
    Src(NodeId),
    Dst(NodeId),
}

impl NodeRef {
    pub fn node(self) -> NodeId {
        match self {
            NodeRef::Src(node) | NodeRef::Dst(node) => node,
        }
    }
}

/// 一次原子的树编辑
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Action {
    /// 在 `parent` 的第 `pos` 个孩子处插入目标树节点 `node`；
    /// `parent` 为 `None` 表示插入为新根
    Insert {
        node: NodeId,
        parent: Option<NodeRef>,
        pos: usize,
    },
    /// 插入以目标树节点 `node` 为根的整棵子树
    TreeInsert {
        node: NodeId,
        parent: Option<NodeRef>,
        pos: usize,
    },
    /// 把源树节点 `node` 的标签改为 `label`
    Update { node: NodeId, label: String },
    /// 把源树节点 `node` 连同子树移到 `parent` 的第 `pos` 个孩子处
    Move {
        node: NodeId,
        parent: Option<NodeRef>,
        pos: usize,
    },
    /// 删除源树叶子或已被掏空的节点 `node`
    Delete { node: NodeId },
    /// 删除以源树节点 `node` 为根的整棵子树
    TreeDelete { node: NodeId },
}

/// 有序的动作列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EditScript {
    actions: Vec<Action>,
}

impl EditScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn get(&self, index: usize) -> Option<&Action> {
        self.actions.get(index)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }

    pub(crate) fn replace(&mut self, index: usize, action: Action) {
        self.actions[index] = action;
    }

    pub(crate) fn retain_indices(&mut self, keep: impl Fn(usize) -> bool) {
        let mut index = 0;
        self.actions.retain(|_| {
            let kept = keep(index);
            index += 1;
            kept
        });
    }
}

impl<'a> IntoIterator for &'a EditScript {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl FromIterator<Action> for EditScript {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}
