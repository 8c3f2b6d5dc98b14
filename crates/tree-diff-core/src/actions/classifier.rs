//! 按动作种类给节点分类
//!
//! 把编辑脚本摊到两棵树的节点集合上：源树侧的更新、删除、移动，
//! 目标树侧的插入、更新、移动。全节点分类器标出受影响子树里的
//! 每个节点，根分类器只标子树根，被整树动作覆盖的后代不再重复。

use std::collections::HashSet;

use super::{Action, EditScript};
use crate::matchers::MappingStore;
use crate::tree::{NodeId, TreeArena};

/// 分类结果，六个节点集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeClassifier {
    pub updated_srcs: HashSet<NodeId>,
    pub deleted_srcs: HashSet<NodeId>,
    pub moved_srcs: HashSet<NodeId>,
    pub inserted_dsts: HashSet<NodeId>,
    pub updated_dsts: HashSet<NodeId>,
    pub moved_dsts: HashSet<NodeId>,
}

/// 受影响子树里的每个节点都计入
#[derive(Debug, Clone, Copy, Default)]
pub struct AllNodesClassifier;

impl AllNodesClassifier {
    pub fn classify(
        &self,
        src_arena: &TreeArena,
        dst_arena: &TreeArena,
        mappings: &MappingStore,
        script: &EditScript,
    ) -> TreeClassifier {
        let mut result = TreeClassifier::default();
        for action in script {
            match action {
                Action::Delete { node } => {
                    result.deleted_srcs.insert(*node);
                }
                Action::TreeDelete { node } => {
                    result.deleted_srcs.insert(*node);
                    result.deleted_srcs.extend(src_arena.descendants(*node));
                }
                Action::Insert { node, .. } => {
                    result.inserted_dsts.insert(*node);
                }
                Action::TreeInsert { node, .. } => {
                    result.inserted_dsts.insert(*node);
                    result.inserted_dsts.extend(dst_arena.descendants(*node));
                }
                Action::Update { node, .. } => {
                    result.updated_srcs.insert(*node);
                    if let Some(dst) = mappings.get_dst_for_src(*node) {
                        result.updated_dsts.insert(dst);
                    }
                }
                Action::Move { node, .. } => {
                    result.moved_srcs.insert(*node);
                    result.moved_srcs.extend(src_arena.descendants(*node));
                    if let Some(dst) = mappings.get_dst_for_src(*node) {
                        result.moved_dsts.insert(dst);
                        result.moved_dsts.extend(dst_arena.descendants(dst));
                    }
                }
            }
        }
        result
    }
}

/// 只计子树根；整棵被插入或删除的子树里，根的动作代表全部
#[derive(Debug, Clone, Copy, Default)]
pub struct OnlyRootsClassifier;

impl OnlyRootsClassifier {
    pub fn classify(
        &self,
        src_arena: &TreeArena,
        dst_arena: &TreeArena,
        mappings: &MappingStore,
        script: &EditScript,
    ) -> TreeClassifier {
        let mut inserted: HashSet<NodeId> = HashSet::new();
        let mut deleted: HashSet<NodeId> = HashSet::new();
        for action in script {
            match action {
                Action::Insert { node, .. } => {
                    inserted.insert(*node);
                }
                Action::Delete { node } => {
                    deleted.insert(*node);
                }
                _ => {}
            }
        }

        let mut result = TreeClassifier::default();
        for action in script {
            match action {
                Action::TreeDelete { node } => {
                    result.deleted_srcs.insert(*node);
                }
                Action::Delete { node } => {
                    let absorbed = src_arena
                        .descendants(*node)
                        .iter()
                        .all(|d| deleted.contains(d))
                        && src_arena.parent(*node).is_some_and(|p| deleted.contains(&p));
                    if !absorbed {
                        result.deleted_srcs.insert(*node);
                    }
                }
                Action::TreeInsert { node, .. } => {
                    result.inserted_dsts.insert(*node);
                }
                Action::Insert { node, .. } => {
                    let absorbed = dst_arena
                        .descendants(*node)
                        .iter()
                        .all(|d| inserted.contains(d))
                        && dst_arena.parent(*node).is_some_and(|p| inserted.contains(&p));
                    if !absorbed {
                        result.inserted_dsts.insert(*node);
                    }
                }
                Action::Update { node, .. } => {
                    result.updated_srcs.insert(*node);
                    if let Some(dst) = mappings.get_dst_for_src(*node) {
                        result.updated_dsts.insert(dst);
                    }
                }
                Action::Move { node, .. } => {
                    result.moved_srcs.insert(*node);
                    if let Some(dst) = mappings.get_dst_for_src(*node) {
                        result.moved_dsts.insert(dst);
                    }
                }
            }
        }
        result
    }
}
