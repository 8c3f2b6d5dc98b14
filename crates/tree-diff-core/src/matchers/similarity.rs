//! 相似度与序列算法
//!
//! Dice 系数、已映射后代计数、按类型的最长公共子序列，
//! 以及 ZS 匹配器更新代价用的 q-gram 标签相似度。

use std::collections::{HashMap, HashSet};

use super::mapping_store::MappingStore;
use crate::tree::{NodeId, TreeArena};

/// `2*common / (|A| + |B|)`，分母为零时返回 0
pub fn dice_coefficient(common_elements: usize, left_elements: usize, right_elements: usize) -> f64 {
    let denominator = left_elements + right_elements;
    if denominator == 0 {
        return 0.0;
    }
    2.0 * common_elements as f64 / denominator as f64
}

/// src 后代中映射目标落在 dst 后代内的数量
pub fn number_of_mapped_descendants(
    src_arena: &TreeArena,
    src: NodeId,
    dst_arena: &TreeArena,
    dst: NodeId,
    mappings: &MappingStore,
) -> usize {
    let dst_descendants: HashSet<NodeId> = dst_arena.descendants(dst).into_iter().collect();
    src_arena
        .descendants(src)
        .into_iter()
        .filter_map(|d| mappings.get_dst_for_src(d))
        .filter(|mapped| dst_descendants.contains(mapped))
        .count()
}

/// 后代集合上的 Dice 相似度
pub fn dice_similarity(
    src_arena: &TreeArena,
    src: NodeId,
    dst_arena: &TreeArena,
    dst: NodeId,
    mappings: &MappingStore,
) -> f64 {
    dice_coefficient(
        number_of_mapped_descendants(src_arena, src, dst_arena, dst, mappings),
        src_arena.descendants(src).len(),
        dst_arena.descendants(dst).len(),
    )
}

/// 以节点类型相等为匹配条件的最长公共子序列，
/// 返回两序列中配对元素的下标
pub fn longest_common_subsequence_with_type(
    src_arena: &TreeArena,
    s0: &[NodeId],
    dst_arena: &TreeArena,
    s1: &[NodeId],
) -> Vec<(usize, usize)> {
    let mut lengths = vec![vec![0usize; s1.len() + 1]; s0.len() + 1];
    for i in 0..s0.len() {
        for j in 0..s1.len() {
            if src_arena.has_same_type(s0[i], dst_arena, s1[j]) {
                lengths[i + 1][j + 1] = lengths[i][j] + 1;
            } else {
                lengths[i + 1][j + 1] = lengths[i + 1][j].max(lengths[i][j + 1]);
            }
        }
    }

    let mut indexes = Vec::new();
    let mut x = s0.len();
    let mut y = s1.len();
    while x != 0 && y != 0 {
        if lengths[x][y] == lengths[x - 1][y] {
            x -= 1;
        } else if lengths[x][y] == lengths[x][y - 1] {
            y -= 1;
        } else {
            indexes.push((x - 1, y - 1));
            x -= 1;
            y -= 1;
        }
    }
    indexes.reverse();
    indexes
}

const QGRAM_SIZE: usize = 3;
const QGRAM_PADDING: char = '#';

fn qgram_profile(s: &str) -> HashMap<Vec<char>, usize> {
    let chars: Vec<char> = s.chars().collect();
    let mut profile = HashMap::new();
    for window in chars.windows(QGRAM_SIZE) {
        *profile.entry(window.to_vec()).or_insert(0) += 1;
    }
    profile
}

/// 带 `#` 前后填充的归一化 q-gram 相似度（k = 3），
/// 结果在 `[0, 1]`，两串相同为 1
pub fn qgram_similarity(s0: &str, s1: &str) -> f64 {
    let padding: String = std::iter::repeat(QGRAM_PADDING)
        .take(QGRAM_SIZE - 1)
        .collect();
    let p0 = format!("{padding}{s0}{padding}");
    let p1 = format!("{padding}{s1}{padding}");

    let profile0 = qgram_profile(&p0);
    let profile1 = qgram_profile(&p1);
    let mut distance = 0usize;
    for (gram, &count0) in &profile0 {
        let count1 = profile1.get(gram).copied().unwrap_or(0);
        distance += count0.abs_diff(count1);
    }
    for (gram, &count1) in &profile1 {
        if !profile0.contains_key(gram) {
            distance += count1;
        }
    }

    let total = p0.chars().count() + p1.chars().count();
    1.0 - distance as f64 / total as f64
}
