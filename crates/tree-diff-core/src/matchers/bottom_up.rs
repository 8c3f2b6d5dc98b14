//! 贪心自底向上容器匹配
//!
//! 后序扫描源树中尚未映射的内部节点，借助其后代的既有映射收集
//! 目标侧候选容器，按后代 Dice 相似度择优映射；命中后在小于
//! 大小阈值的子树对上运行一次 ZS 精确匹配补收剩余节点。根节点
//! 最后强制互相映射。

use std::collections::HashSet;

use tracing::debug;

use super::mapping_store::MappingStore;
use super::similarity;
use super::zs::ZsMatcher;
use super::Matcher;
use crate::error::Result;
use crate::tree::{NodeId, TreeArena};

pub const DEFAULT_SIZE_THRESHOLD: usize = 1000;
pub const DEFAULT_SIM_THRESHOLD: f64 = 0.5;

pub struct GreedyBottomUpMatcher {
    size_threshold: usize,
    sim_threshold: f64,
}

impl Default for GreedyBottomUpMatcher {
    fn default() -> Self {
        Self {
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            sim_threshold: DEFAULT_SIM_THRESHOLD,
        }
    }
}

impl GreedyBottomUpMatcher {
    pub fn new(size_threshold: usize, sim_threshold: f64) -> Self {
        Self {
            size_threshold,
            sim_threshold,
        }
    }

    /// 后代映射的目标节点一路向上给出的同类型候选容器
    fn dst_candidates(
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst_root: NodeId,
        mappings: &MappingStore,
    ) -> Vec<NodeId> {
        let seeds: Vec<NodeId> = src_arena
            .descendants(src)
            .into_iter()
            .filter_map(|d| mappings.get_dst_for_src(d))
            .collect();

        let mut candidates = Vec::new();
        let mut visited = HashSet::new();
        for seed in seeds {
            let mut current = seed;
            while let Some(parent) = dst_arena.parent(current) {
                if !visited.insert(parent) {
                    break;
                }
                if src_arena.has_same_type(src, dst_arena, parent)
                    && !mappings.is_dst_mapped(parent)
                    && parent != dst_root
                {
                    candidates.push(parent);
                }
                current = parent;
            }
        }
        candidates
    }

    /// 两子树都不大时跑一次 ZS，收下其中仍被允许的映射对
    fn last_chance_match(
        &self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
        mappings: &mut MappingStore,
    ) -> Result<()> {
        if src_arena.metrics(src).size >= self.size_threshold
            && dst_arena.metrics(dst).size >= self.size_threshold
        {
            return Ok(());
        }
        let zs_mappings =
            ZsMatcher::new().match_trees(src_arena, src, dst_arena, dst, MappingStore::new())?;
        // 按源子树后序收编，避免哈希表遍历顺序影响结果
        for candidate in src_arena.post_order(src) {
            let Some(dst_candidate) = zs_mappings.get_dst_for_src(candidate) else {
                continue;
            };
            if mappings.is_mapping_allowed(src_arena, candidate, dst_arena, dst_candidate) {
                mappings.add_mapping(candidate, dst_candidate);
            }
        }
        Ok(())
    }
}

impl Matcher for GreedyBottomUpMatcher {
    fn match_trees(
        &self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
        mut mappings: MappingStore,
    ) -> Result<MappingStore> {
        for t in src_arena.post_order(src) {
            if t == src {
                self.last_chance_match(src_arena, t, dst_arena, dst, &mut mappings)?;
                if mappings.are_both_unmapped(t, dst) {
                    mappings.add_mapping(t, dst);
                }
                break;
            }
            if mappings.is_src_mapped(t) || src_arena.is_leaf(t) {
                continue;
            }

            let candidates = Self::dst_candidates(src_arena, t, dst_arena, dst, &mappings);
            let mut best = None;
            let mut max_similarity = -1.0f64;
            for candidate in candidates {
                let similarity =
                    similarity::dice_similarity(src_arena, t, dst_arena, candidate, &mappings);
                if similarity > max_similarity && similarity >= self.sim_threshold {
                    max_similarity = similarity;
                    best = Some(candidate);
                }
            }

            if let Some(best) = best {
                debug!(
                    src = %src_arena.describe(t),
                    dst = %dst_arena.describe(best),
                    similarity = max_similarity,
                    "bottom-up container match"
                );
                self.last_chance_match(src_arena, t, dst_arena, best, &mut mappings)?;
                mappings.add_mapping(t, best);
            }
        }
        Ok(mappings)
    }
}
