//! 两棵树节点间的双射部分映射
//!
//! 只存节点 id，不持有树本身；src 侧 id 属于源树 arena，
//! dst 侧 id 属于目标树 arena。两张表始终互为镜像。

use std::collections::HashMap;

use crate::tree::{NodeId, TreeArena};

#[derive(Debug, Clone, Default)]
pub struct MappingStore {
    src_to_dst: HashMap<NodeId, NodeId>,
    dst_to_src: HashMap<NodeId, NodeId>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn size(&self) -> usize {
        self.src_to_dst.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src_to_dst.is_empty()
    }

    /// 记录一对映射。不会覆盖已有映射：调用方必须先用
    /// [`are_both_unmapped`](Self::are_both_unmapped) 检查。
    /// 重复添加同一对是无害的空操作。
    pub fn add_mapping(&mut self, src: NodeId, dst: NodeId) {
        if self.has(src, dst) {
            return;
        }
        debug_assert!(
            self.are_both_unmapped(src, dst),
            "mapping endpoints must both be unmapped"
        );
        self.src_to_dst.insert(src, dst);
        self.dst_to_src.insert(dst, src);
    }

    /// 并行先序地映射两棵同构子树的每一对节点。
    /// 子树形状不一致属于调用方契约违背。
    pub fn add_mapping_recursively(
        &mut self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
    ) {
        let mut work = vec![(src, dst)];
        while let Some((s, d)) = work.pop() {
            debug_assert!(
                src_arena.has_same_type(s, dst_arena, d),
                "recursively mapped nodes must share a type"
            );
            self.add_mapping(s, d);
            let src_children = src_arena.children(s);
            let dst_children = dst_arena.children(d);
            debug_assert_eq!(src_children.len(), dst_children.len());
            work.extend(
                src_children
                    .iter()
                    .copied()
                    .zip(dst_children.iter().copied()),
            );
        }
    }

    pub fn remove_mapping(&mut self, src: NodeId, dst: NodeId) {
        self.src_to_dst.remove(&src);
        self.dst_to_src.remove(&dst);
    }

    pub fn get_dst_for_src(&self, src: NodeId) -> Option<NodeId> {
        self.src_to_dst.get(&src).copied()
    }

    pub fn get_src_for_dst(&self, dst: NodeId) -> Option<NodeId> {
        self.dst_to_src.get(&dst).copied()
    }

    pub fn is_src_mapped(&self, src: NodeId) -> bool {
        self.src_to_dst.contains_key(&src)
    }

    pub fn is_dst_mapped(&self, dst: NodeId) -> bool {
        self.dst_to_src.contains_key(&dst)
    }

    pub fn are_both_unmapped(&self, src: NodeId, dst: NodeId) -> bool {
        !(self.is_src_mapped(src) || self.is_dst_mapped(dst))
    }

    pub fn are_srcs_unmapped(&self, srcs: &[NodeId]) -> bool {
        srcs.iter().all(|&s| !self.is_src_mapped(s))
    }

    pub fn are_dsts_unmapped(&self, dsts: &[NodeId]) -> bool {
        dsts.iter().all(|&d| !self.is_dst_mapped(d))
    }

    pub fn has(&self, src: NodeId, dst: NodeId) -> bool {
        self.src_to_dst.get(&src) == Some(&dst)
    }

    /// 类型相同且两端都未映射
    pub fn is_mapping_allowed(
        &self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
    ) -> bool {
        src_arena.has_same_type(src, dst_arena, dst) && self.are_both_unmapped(src, dst)
    }

    /// 无序遍历；确定性路径应当遍历树再查表，而不是遍历这里
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.src_to_dst.iter().map(|(&s, &d)| (s, d))
    }
}
