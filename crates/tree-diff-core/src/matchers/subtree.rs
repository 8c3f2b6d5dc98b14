//! 贪心自顶向下子树匹配
//!
//! 两侧各维护一个优先树队列，按优先级层级同步下降；同层节点按
//! 子树哈希分桶，唯一同构对整棵递归映射，歧义桶推迟到最后按
//! 组合比较器贪心消解，落单的节点展开孩子继续下一层。

use std::collections::HashMap;

use tracing::debug;

use super::comparators::{FullMappingComparator, Mapping};
use super::mapping_store::MappingStore;
use super::priority_queue::{PriorityCalculator, PriorityTreeQueue};
use super::Matcher;
use crate::error::Result;
use crate::tree::{NodeId, TreeArena};

pub const DEFAULT_MIN_PRIORITY: usize = 2;

pub struct GreedySubtreeMatcher {
    min_priority: usize,
    calculator: PriorityCalculator,
}

impl Default for GreedySubtreeMatcher {
    fn default() -> Self {
        Self {
            min_priority: DEFAULT_MIN_PRIORITY,
            calculator: PriorityCalculator::default(),
        }
    }
}

impl GreedySubtreeMatcher {
    pub fn new(min_priority: usize, calculator: PriorityCalculator) -> Self {
        Self {
            min_priority,
            calculator,
        }
    }

    /// 歧义桶全部收集完后统一消解：桶按其中最大子树先处理，
    /// 桶内候选对排序后贪心接受仍然两端空闲的
    fn resolve_ambiguities(
        src_arena: &TreeArena,
        dst_arena: &TreeArena,
        mappings: &mut MappingStore,
        mut ambiguous: Vec<(Vec<NodeId>, Vec<NodeId>)>,
    ) {
        ambiguous.sort_by(|b1, b2| {
            let s1 = Self::max_subtree_size(src_arena, &b1.0, dst_arena, &b1.1);
            let s2 = Self::max_subtree_size(src_arena, &b2.0, dst_arena, &b2.1);
            s2.cmp(&s1)
        });

        for (srcs, dsts) in ambiguous {
            let mut candidates: Vec<Mapping> = Vec::with_capacity(srcs.len() * dsts.len());
            for &src in &srcs {
                for &dst in &dsts {
                    candidates.push((src, dst));
                }
            }
            let snapshot = mappings.clone();
            let mut comparator = FullMappingComparator::new(src_arena, dst_arena, &snapshot);
            candidates.sort_by(|&m1, &m2| comparator.compare(m1, m2));

            for (src, dst) in candidates {
                if mappings.are_both_unmapped(src, dst) {
                    mappings.add_mapping_recursively(src_arena, src, dst_arena, dst);
                }
            }
        }
    }

    fn max_subtree_size(
        src_arena: &TreeArena,
        srcs: &[NodeId],
        dst_arena: &TreeArena,
        dsts: &[NodeId],
    ) -> usize {
        let src_max = srcs.iter().map(|&n| src_arena.metrics(n).size).max();
        let dst_max = dsts.iter().map(|&n| dst_arena.metrics(n).size).max();
        src_max.max(dst_max).unwrap_or(0)
    }
}

impl Matcher for GreedySubtreeMatcher {
    fn match_trees(
        &self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
        mut mappings: MappingStore,
    ) -> Result<MappingStore> {
        let mut src_queue =
            PriorityTreeQueue::new(src_arena, src, self.min_priority, self.calculator);
        let mut dst_queue =
            PriorityTreeQueue::new(dst_arena, dst, self.min_priority, self.calculator);
        let mut ambiguous: Vec<(Vec<NodeId>, Vec<NodeId>)> = Vec::new();

        while PriorityTreeQueue::synchronize(&mut src_queue, &mut dst_queue) {
            let mut buckets = HashBuckets::default();
            for node in src_queue.pop() {
                buckets.add_src(src_arena.metrics(node).hashcode, node);
            }
            for node in dst_queue.pop() {
                buckets.add_dst(dst_arena.metrics(node).hashcode, node);
            }

            for (srcs, dsts) in buckets.into_buckets() {
                match (srcs.len(), dsts.len()) {
                    (1, 1) => {
                        mappings.add_mapping_recursively(src_arena, srcs[0], dst_arena, dsts[0]);
                    }
                    (0, _) => {
                        for node in dsts {
                            dst_queue.open(node);
                        }
                    }
                    (_, 0) => {
                        for node in srcs {
                            src_queue.open(node);
                        }
                    }
                    _ => ambiguous.push((srcs, dsts)),
                }
            }
        }

        debug!(
            ambiguous_buckets = ambiguous.len(),
            mapped = mappings.size(),
            "top-down phase finished"
        );
        Self::resolve_ambiguities(src_arena, dst_arena, &mut mappings, ambiguous);
        Ok(mappings)
    }
}

/// 按子树哈希分桶，保持首次出现的顺序
#[derive(Default)]
struct HashBuckets {
    index: HashMap<u64, usize>,
    buckets: Vec<(Vec<NodeId>, Vec<NodeId>)>,
}

impl HashBuckets {
    fn bucket_mut(&mut self, hash: u64) -> &mut (Vec<NodeId>, Vec<NodeId>) {
        let slot = *self.index.entry(hash).or_insert_with(|| {
            self.buckets.push((Vec::new(), Vec::new()));
            self.buckets.len() - 1
        });
        &mut self.buckets[slot]
    }

    fn add_src(&mut self, hash: u64, node: NodeId) {
        self.bucket_mut(hash).0.push(node);
    }

    fn add_dst(&mut self, hash: u64, node: NodeId) {
        self.bucket_mut(hash).1.push(node);
    }

    fn into_buckets(self) -> impl Iterator<Item = (Vec<NodeId>, Vec<NodeId>)> {
        self.buckets.into_iter()
    }
}
