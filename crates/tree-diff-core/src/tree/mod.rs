//! 树模型模块
//!
//! 有序有根树的 arena 表示：节点由 [`NodeId`] 索引寻址，
//! `parent` 是同一 arena 中的非拥有索引，`children` 是有序的索引列表。
//! 深拷贝即 arena 的 `Clone`（索引保持不变，节点身份随 arena 改变）。

pub mod metrics;
pub mod traversal;

use std::cell::RefCell;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Result, TreeDiffError};
pub use metrics::TreeMetrics;
use traversal::{BreadthFirst, PostOrder, PreOrder};

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn url_pattern() -> &'static Regex {
    URL_PATTERN.get_or_init(|| Regex::new(r"^\d+(\.\d+)*$").expect("valid URL pattern"))
}

/// arena 中节点的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 节点的源码位置信息，仅供调用方（渲染器）消费
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

#[derive(Debug, Clone)]
struct NodeData {
    node_type: String,
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pos: usize,
    length: usize,
    span: SourceSpan,
}

/// 有序有根树
///
/// 生成器构建完成后在匹配阶段视为不可变；编辑脚本生成器只在
/// 私有克隆上做结构修改。
#[derive(Debug, Clone, Default)]
pub struct TreeArena {
    nodes: Vec<NodeData>,
    root: Option<NodeId>,
    // 结构修改时失效，访问时由一次后序遍历整体重建
    metrics: RefCell<Option<Vec<TreeMetrics>>>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个游离节点（尚未挂到任何父节点下）
    pub fn new_node(&mut self, node_type: impl Into<String>, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            node_type: node_type.into(),
            label: label.into(),
            parent: None,
            children: Vec::new(),
            pos: 0,
            length: 0,
            span: SourceSpan::default(),
        });
        self.invalidate_metrics();
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
        self.invalidate_metrics();
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node_type(&self, id: NodeId) -> &str {
        &self.nodes[id.0].node_type
    }

    pub fn label(&self, id: NodeId) -> &str {
        &self.nodes[id.0].label
    }

    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) {
        self.nodes[id.0].label = label.into();
        self.invalidate_metrics();
    }

    pub fn pos(&self, id: NodeId) -> usize {
        self.nodes[id.0].pos
    }

    pub fn length(&self, id: NodeId) -> usize {
        self.nodes[id.0].length
    }

    pub fn end_pos(&self, id: NodeId) -> usize {
        self.nodes[id.0].pos + self.nodes[id.0].length
    }

    pub fn set_byte_range(&mut self, id: NodeId, pos: usize, length: usize) {
        self.nodes[id.0].pos = pos;
        self.nodes[id.0].length = length;
    }

    pub fn span(&self, id: NodeId) -> SourceSpan {
        self.nodes[id.0].span
    }

    pub fn set_span(&mut self, id: NodeId, span: SourceSpan) {
        self.nodes[id.0].span = span;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes[id.0].parent.is_none()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].children.is_empty()
    }

    /// 把 `child` 追加为 `parent` 的最后一个孩子
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.invalidate_metrics();
    }

    /// 把 `child` 插入为 `parent` 的第 `position` 个孩子
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, position: usize) {
        self.nodes[parent.0].children.insert(position, child);
        self.nodes[child.0].parent = Some(parent);
        self.invalidate_metrics();
    }

    /// 把节点从当前父节点摘下（成为游离节点）
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent {
            self.nodes[parent.0].children.retain(|&c| c != id);
            self.nodes[id.0].parent = None;
            self.invalidate_metrics();
        }
    }

    /// 摘下并重新挂接，等价于原树模型的 `set_parent_and_update_children`
    pub fn set_parent_and_update_children(&mut self, id: NodeId, parent: NodeId) {
        self.detach(id);
        self.add_child(parent, id);
    }

    pub fn position_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.nodes[id.0].parent?;
        self.nodes[parent.0].children.iter().position(|&c| c == id)
    }

    /// 自底向上的祖先链（不含自身，根在最后）
    pub fn parents(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.nodes[id.0].parent;
        while let Some(p) = current {
            chain.push(p);
            current = self.nodes[p.0].parent;
        }
        chain
    }

    /// 先序排列的后代节点（不含自身）
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.0].children.iter().rev().copied().collect();
        while let Some(n) = stack.pop() {
            result.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev());
        }
        result
    }

    pub fn pre_order(&self, start: NodeId) -> PreOrder<'_> {
        PreOrder::new(self, start)
    }

    pub fn post_order(&self, start: NodeId) -> PostOrder<'_> {
        PostOrder::new(self, start)
    }

    pub fn breadth_first(&self, start: NodeId) -> BreadthFirst<'_> {
        BreadthFirst::new(self, start)
    }

    pub fn has_same_type(&self, id: NodeId, other: &TreeArena, other_id: NodeId) -> bool {
        self.node_type(id) == other.node_type(other_id)
    }

    pub fn has_same_type_and_label(&self, id: NodeId, other: &TreeArena, other_id: NodeId) -> bool {
        self.has_same_type(id, other, other_id) && self.label(id) == other.label(other_id)
    }

    /// 类型、标签、形状逐节点相同
    pub fn is_isomorphic_to(&self, id: NodeId, other: &TreeArena, other_id: NodeId) -> bool {
        self.structurally_equal(id, other, other_id, true)
    }

    /// 类型和形状相同，忽略标签
    pub fn is_isostructural_to(&self, id: NodeId, other: &TreeArena, other_id: NodeId) -> bool {
        self.structurally_equal(id, other, other_id, false)
    }

    fn structurally_equal(
        &self,
        id: NodeId,
        other: &TreeArena,
        other_id: NodeId,
        check_labels: bool,
    ) -> bool {
        let mut stack = vec![(id, other_id)];
        while let Some((a, b)) = stack.pop() {
            if self.node_type(a) != other.node_type(b) {
                return false;
            }
            if check_labels && self.label(a) != other.label(b) {
                return false;
            }
            let ca = self.children(a);
            let cb = other.children(b);
            if ca.len() != cb.len() {
                return false;
            }
            stack.extend(ca.iter().copied().zip(cb.iter().copied()));
        }
        true
    }

    /// 在以 `root` 为根的子树中查找与 `pattern_root` 同构的子树，
    /// 先用 hashcode 过滤再做同构检查
    pub fn search_subtree(
        &self,
        root: NodeId,
        pattern: &TreeArena,
        pattern_root: NodeId,
    ) -> Vec<NodeId> {
        let target_hash = pattern.metrics(pattern_root).hashcode;
        self.pre_order(root)
            .filter(|&candidate| {
                self.metrics(candidate).hashcode == target_hash
                    && self.is_isomorphic_to(candidate, pattern, pattern_root)
            })
            .collect()
    }

    /// 按点分索引路径（如 `"1.0.2"`）从 `start` 向下导航
    pub fn child_from_url(&self, start: NodeId, url: &str) -> Result<NodeId> {
        if !url_pattern().is_match(url) {
            return Err(TreeDiffError::InvalidNodeUrl(url.to_string()));
        }
        let mut node = start;
        for part in url.split('.') {
            let index: usize = part
                .parse()
                .map_err(|_| TreeDiffError::InvalidNodeUrl(url.to_string()))?;
            let children = self.children(node);
            node = *children
                .get(index)
                .ok_or(TreeDiffError::ChildIndexOutOfRange {
                    index,
                    child_count: children.len(),
                })?;
        }
        Ok(node)
    }

    /// 节点的树指标，首次访问时对整棵树做一次后序遍历计算
    pub fn metrics(&self, id: NodeId) -> TreeMetrics {
        {
            let cache = self.metrics.borrow();
            if let Some(all) = cache.as_ref() {
                return all[id.0];
            }
        }
        let computed = metrics::compute_metrics(self);
        let result = computed[id.0];
        *self.metrics.borrow_mut() = Some(computed);
        result
    }

    fn invalidate_metrics(&mut self) {
        self.metrics.get_mut().take();
    }

    /// 单节点的简短描述，用于日志与动作渲染
    pub fn describe(&self, id: NodeId) -> String {
        if self.label(id).is_empty() {
            self.node_type(id).to_string()
        } else {
            format!("{}: {}", self.node_type(id), self.label(id))
        }
    }

    /// 缩进文本形式的子树转储
    pub fn to_tree_string(&self, root: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![(root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            for _ in 0..depth {
                out.push_str("    ");
            }
            out.push_str(&self.describe(node));
            out.push('\n');
            for &child in self.children(node).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }
}
