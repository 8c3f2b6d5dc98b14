//! Zhang-Shasha 精确树编辑距离匹配
//!
//! 经典动态规划：后序编号、最左叶子、关键根，先算森林距离表，
//! 再沿最优路径回溯出映射。删除、插入代价为 1，更新代价用标签
//! 的 q-gram 相似度。代价为二次方，只适合小子树，自底向上匹配
//! 器把它当作最后机会匹配使用。

use std::collections::{HashMap, VecDeque};

use super::mapping_store::MappingStore;
use super::similarity::qgram_similarity;
use super::Matcher;
use crate::error::{Result, TreeDiffError};
use crate::tree::{NodeId, TreeArena};

const DELETION_COST: f64 = 1.0;
const INSERTION_COST: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ZsMatcher;

impl ZsMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for ZsMatcher {
    fn match_trees(
        &self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
        mut mappings: MappingStore,
    ) -> Result<MappingStore> {
        let mut context = ZsContext::new(src_arena, src, dst_arena, dst);
        context.compute_tree_dist();
        context.collect_mappings(&mut mappings)?;
        Ok(mappings)
    }
}

/// 1-based 后序下标上的动态规划状态
struct ZsContext<'a> {
    src_arena: &'a TreeArena,
    dst_arena: &'a TreeArena,
    zs_src: ZsTree,
    zs_dst: ZsTree,
    tree_dist: Vec<Vec<f64>>,
    forest_dist: Vec<Vec<f64>>,
}

impl<'a> ZsContext<'a> {
    fn new(src_arena: &'a TreeArena, src: NodeId, dst_arena: &'a TreeArena, dst: NodeId) -> Self {
        let zs_src = ZsTree::new(src_arena, src);
        let zs_dst = ZsTree::new(dst_arena, dst);
        let rows = zs_src.node_count + 1;
        let cols = zs_dst.node_count + 1;
        Self {
            src_arena,
            dst_arena,
            zs_src,
            zs_dst,
            tree_dist: vec![vec![0.0; cols]; rows],
            forest_dist: vec![vec![0.0; cols]; rows],
        }
    }

    fn update_cost(&self, src: NodeId, dst: NodeId) -> f64 {
        if !self.src_arena.has_same_type(src, self.dst_arena, dst) {
            return f64::MAX;
        }
        let src_label = self.src_arena.label(src);
        let dst_label = self.dst_arena.label(dst);
        if src_label.is_empty() || dst_label.is_empty() {
            1.0
        } else {
            1.0 - qgram_similarity(src_label, dst_label)
        }
    }

    fn compute_tree_dist(&mut self) {
        for i in 1..self.zs_src.kr.len() {
            for j in 1..self.zs_dst.kr.len() {
                self.compute_forest_dist(self.zs_src.kr[i], self.zs_dst.kr[j]);
            }
        }
    }

    fn compute_forest_dist(&mut self, i: usize, j: usize) {
        let lld_i = self.zs_src.lld(i);
        let lld_j = self.zs_dst.lld(j);
        self.forest_dist[lld_i - 1][lld_j - 1] = 0.0;
        for di in lld_i..=i {
            self.forest_dist[di][lld_j - 1] = self.forest_dist[di - 1][lld_j - 1] + DELETION_COST;
            for dj in lld_j..=j {
                self.forest_dist[lld_i - 1][dj] =
                    self.forest_dist[lld_i - 1][dj - 1] + INSERTION_COST;
                let deletion = self.forest_dist[di - 1][dj] + DELETION_COST;
                let insertion = self.forest_dist[di][dj - 1] + INSERTION_COST;
                if self.zs_src.lld(di) == lld_i && self.zs_dst.lld(dj) == lld_j {
                    let update_cost = self.update_cost(self.zs_src.tree(di), self.zs_dst.tree(dj));
                    let update = self.forest_dist[di - 1][dj - 1] + update_cost;
                    self.forest_dist[di][dj] = deletion.min(insertion).min(update);
                    self.tree_dist[di][dj] = self.forest_dist[di][dj];
                } else {
                    let subtree = self.forest_dist[self.zs_src.lld(di) - 1]
                        [self.zs_dst.lld(dj) - 1]
                        + self.tree_dist[di][dj];
                    self.forest_dist[di][dj] = deletion.min(insertion).min(subtree);
                }
            }
        }
    }

    /// 距离表算好后沿最优路径回溯；只在子树根对齐处落下映射
    fn collect_mappings(&mut self, mappings: &mut MappingStore) -> Result<()> {
        let mut root_node_pair = true;
        let mut tree_pairs: VecDeque<(usize, usize)> = VecDeque::new();
        tree_pairs.push_front((self.zs_src.node_count, self.zs_dst.node_count));

        while let Some((last_row, last_col)) = tree_pairs.pop_front() {
            if !root_node_pair {
                self.compute_forest_dist(last_row, last_col);
            }
            root_node_pair = false;

            let first_row = self.zs_src.lld(last_row) - 1;
            let first_col = self.zs_dst.lld(last_col) - 1;
            let mut row = last_row;
            let mut col = last_col;
            while row > first_row || col > first_col {
                if row > first_row
                    && self.forest_dist[row - 1][col] + DELETION_COST == self.forest_dist[row][col]
                {
                    row -= 1;
                } else if col > first_col
                    && self.forest_dist[row][col - 1] + INSERTION_COST
                        == self.forest_dist[row][col]
                {
                    col -= 1;
                } else if self.zs_src.lld(row) == self.zs_src.lld(last_row)
                    && self.zs_dst.lld(col) == self.zs_dst.lld(last_col)
                {
                    let src = self.zs_src.tree(row);
                    let dst = self.zs_dst.tree(col);
                    if !self.src_arena.has_same_type(src, self.dst_arena, dst) {
                        return Err(TreeDiffError::IncompatibleNodes(format!(
                            "cannot map node of type `{}` to node of type `{}`",
                            self.src_arena.node_type(src),
                            self.dst_arena.node_type(dst)
                        )));
                    }
                    mappings.add_mapping(src, dst);
                    row -= 1;
                    col -= 1;
                } else {
                    tree_pairs.push_front((row, col));
                    row = self.zs_src.lld(row) - 1;
                    col = self.zs_dst.lld(col) - 1;
                }
            }
        }
        Ok(())
    }
}

/// 后序编号、最左叶子和关键根
struct ZsTree {
    node_count: usize,
    // 0-based 存储，1-based 访问
    labels: Vec<NodeId>,
    llds: Vec<usize>,
    kr: Vec<usize>,
}

impl ZsTree {
    fn new(arena: &TreeArena, root: NodeId) -> Self {
        let nodes: Vec<NodeId> = arena.post_order(root).collect();
        let node_count = nodes.len();
        let mut postorder_index: HashMap<NodeId, usize> = HashMap::with_capacity(node_count);
        for (i, &node) in nodes.iter().enumerate() {
            postorder_index.insert(node, i + 1);
        }

        let mut llds = vec![0usize; node_count];
        let mut leaf_count = 0usize;
        for (i, &node) in nodes.iter().enumerate() {
            if arena.is_leaf(node) {
                leaf_count += 1;
            }
            let mut leftmost = node;
            while let Some(&first) = arena.children(leftmost).first() {
                leftmost = first;
            }
            llds[i] = postorder_index[&leftmost] - 1;
        }

        let mut tree = Self {
            node_count,
            labels: nodes,
            llds,
            kr: vec![0; leaf_count + 1],
        };
        tree.compute_key_roots(leaf_count);
        tree
    }

    fn compute_key_roots(&mut self, leaf_count: usize) {
        let mut visited = vec![false; self.node_count + 1];
        let mut k = leaf_count;
        for i in (1..=self.node_count).rev() {
            let lld = self.lld(i);
            if !visited[lld] {
                self.kr[k] = i;
                visited[lld] = true;
                k -= 1;
            }
        }
    }

    fn lld(&self, i: usize) -> usize {
        self.llds[i - 1] + 1
    }

    fn tree(&self, i: usize) -> NodeId {
        self.labels[i - 1]
    }
}
