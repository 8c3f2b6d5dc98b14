//! 歧义映射的排序比较器
//!
//! 子树匹配器把歧义桶展开成候选 (src, dst) 对后，用组合比较器
//! 排序：兄弟相似度、父链相似度、父内位置向量距离、后序位置差，
//! 依次取第一个非平局的结果。

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::mapping_store::MappingStore;
use super::similarity;
use crate::tree::{NodeId, TreeArena};

pub type Mapping = (NodeId, NodeId);

/// 四个比较器的链式组合
pub struct FullMappingComparator<'a> {
    siblings: SiblingsSimilarityComparator<'a>,
    parents: ParentsSimilarityComparator<'a>,
    parents_position: PositionInParentsComparator<'a>,
    position: AbsolutePositionDistanceComparator<'a>,
}

impl<'a> FullMappingComparator<'a> {
    pub fn new(src: &'a TreeArena, dst: &'a TreeArena, mappings: &'a MappingStore) -> Self {
        Self {
            siblings: SiblingsSimilarityComparator::new(src, dst, mappings),
            parents: ParentsSimilarityComparator::new(src, dst),
            parents_position: PositionInParentsComparator::new(src, dst),
            position: AbsolutePositionDistanceComparator::new(src, dst),
        }
    }

    pub fn compare(&mut self, m1: Mapping, m2: Mapping) -> Ordering {
        let result = self.siblings.compare(m1, m2);
        if result != Ordering::Equal {
            return result;
        }
        let result = self.parents.compare(m1, m2);
        if result != Ordering::Equal {
            return result;
        }
        let result = self.parents_position.compare(m1, m2);
        if result != Ordering::Equal {
            return result;
        }
        self.position.compare(m1, m2)
    }
}

/// 父节点后代集中已映射对的 Dice 相似度，高者在前
pub struct SiblingsSimilarityComparator<'a> {
    src: &'a TreeArena,
    dst: &'a TreeArena,
    mappings: &'a MappingStore,
    src_descendants: HashMap<NodeId, HashSet<NodeId>>,
    dst_descendants: HashMap<NodeId, HashSet<NodeId>>,
    cached_similarities: HashMap<Mapping, f64>,
}

impl<'a> SiblingsSimilarityComparator<'a> {
    pub fn new(src: &'a TreeArena, dst: &'a TreeArena, mappings: &'a MappingStore) -> Self {
        Self {
            src,
            dst,
            mappings,
            src_descendants: HashMap::new(),
            dst_descendants: HashMap::new(),
            cached_similarities: HashMap::new(),
        }
    }

    pub fn compare(&mut self, m1: Mapping, m2: Mapping) -> Ordering {
        if self.src.parent(m1.0) == self.src.parent(m2.0)
            && self.dst.parent(m1.1) == self.dst.parent(m2.1)
        {
            return Ordering::Equal;
        }
        let s1 = self.similarity(m1);
        let s2 = self.similarity(m2);
        // 反向：相似度高的排前面
        s2.total_cmp(&s1)
    }

    fn similarity(&mut self, m: Mapping) -> f64 {
        if let Some(&cached) = self.cached_similarities.get(&m) {
            return cached;
        }
        let similarity = match (self.src.parent(m.0), self.dst.parent(m.1)) {
            (Some(src_parent), Some(dst_parent)) => {
                let common = self.common_descendants(src_parent, dst_parent);
                similarity::dice_coefficient(
                    common,
                    self.src_descendants[&src_parent].len(),
                    self.dst_descendants[&dst_parent].len(),
                )
            }
            _ => 0.0,
        };
        self.cached_similarities.insert(m, similarity);
        similarity
    }

    fn common_descendants(&mut self, src_parent: NodeId, dst_parent: NodeId) -> usize {
        let src = self.src;
        let dst = self.dst;
        self.src_descendants
            .entry(src_parent)
            .or_insert_with(|| src.descendants(src_parent).into_iter().collect());
        let dst_set = self
            .dst_descendants
            .entry(dst_parent)
            .or_insert_with(|| dst.descendants(dst_parent).into_iter().collect());

        self.src_descendants[&src_parent]
            .iter()
            .filter_map(|&t| self.mappings.get_dst_for_src(t))
            .filter(|mapped| dst_set.contains(mapped))
            .count()
    }
}

/// 祖先链按类型的 LCS，经 Dice 归一化，高者在前
pub struct ParentsSimilarityComparator<'a> {
    src: &'a TreeArena,
    dst: &'a TreeArena,
    src_ancestors: HashMap<NodeId, Vec<NodeId>>,
    dst_ancestors: HashMap<NodeId, Vec<NodeId>>,
    cached_similarities: HashMap<Mapping, f64>,
}

impl<'a> ParentsSimilarityComparator<'a> {
    pub fn new(src: &'a TreeArena, dst: &'a TreeArena) -> Self {
        Self {
            src,
            dst,
            src_ancestors: HashMap::new(),
            dst_ancestors: HashMap::new(),
            cached_similarities: HashMap::new(),
        }
    }

    pub fn compare(&mut self, m1: Mapping, m2: Mapping) -> Ordering {
        if self.src.parent(m1.0) == self.src.parent(m2.0)
            && self.dst.parent(m1.1) == self.dst.parent(m2.1)
        {
            return Ordering::Equal;
        }
        let s1 = self.similarity(m1);
        let s2 = self.similarity(m2);
        s2.total_cmp(&s1)
    }

    fn similarity(&mut self, m: Mapping) -> f64 {
        if let Some(&cached) = self.cached_similarities.get(&m) {
            return cached;
        }
        let src = self.src;
        let dst = self.dst;
        let src_chain = self
            .src_ancestors
            .entry(m.0)
            .or_insert_with(|| src.parents(m.0))
            .clone();
        let dst_chain = self
            .dst_ancestors
            .entry(m.1)
            .or_insert_with(|| dst.parents(m.1))
            .clone();
        let common =
            similarity::longest_common_subsequence_with_type(src, &src_chain, dst, &dst_chain)
                .len();
        let similarity =
            similarity::dice_coefficient(common, src_chain.len(), dst_chain.len());
        self.cached_similarities.insert(m, similarity);
        similarity
    }
}

/// 「在父、祖父……中的孩子下标」向量的欧氏距离，低者在前
pub struct PositionInParentsComparator<'a> {
    src: &'a TreeArena,
    dst: &'a TreeArena,
}

impl<'a> PositionInParentsComparator<'a> {
    pub fn new(src: &'a TreeArena, dst: &'a TreeArena) -> Self {
        Self { src, dst }
    }

    pub fn compare(&self, m1: Mapping, m2: Mapping) -> Ordering {
        let d1 = self.distance(m1);
        let d2 = self.distance(m2);
        d1.total_cmp(&d2)
    }

    fn distance(&self, m: Mapping) -> f64 {
        let v1 = Self::pos_vector(self.src, m.0);
        let v2 = Self::pos_vector(self.dst, m.1);
        let sum: f64 = v1
            .iter()
            .zip(v2.iter())
            .map(|(&a, &b)| {
                let d = a as f64 - b as f64;
                d * d
            })
            .sum();
        sum.sqrt()
    }

    fn pos_vector(arena: &TreeArena, node: NodeId) -> Vec<usize> {
        let mut vector = Vec::new();
        let mut current = node;
        while let Some(pos) = arena.position_in_parent(current) {
            vector.push(pos);
            current = arena.parent(current).expect("node with position has parent");
        }
        vector
    }
}

/// 后序位置差的绝对值，低者在前
pub struct AbsolutePositionDistanceComparator<'a> {
    src: &'a TreeArena,
    dst: &'a TreeArena,
}

impl<'a> AbsolutePositionDistanceComparator<'a> {
    pub fn new(src: &'a TreeArena, dst: &'a TreeArena) -> Self {
        Self { src, dst }
    }

    pub fn compare(&self, m1: Mapping, m2: Mapping) -> Ordering {
        self.difference(m1).cmp(&self.difference(m2))
    }

    fn difference(&self, m: Mapping) -> usize {
        self.src
            .metrics(m.0)
            .position
            .abs_diff(self.dst.metrics(m.1).position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeArena;

    #[test]
    fn test_twin_mappings_are_ties() {
        let mut src = TreeArena::new();
        let root = src.new_node("foo", "");
        src.set_root(root);
        let c0 = src.new_node("foo", "");
        src.add_child(root, c0);
        let c1 = src.new_node("foo", "");
        src.add_child(root, c1);
        let dst = src.clone();
        let droot = dst.root().unwrap();

        let mut ms = MappingStore::new();
        ms.add_mapping(c0, dst.children(droot)[1]);
        ms.add_mapping(c1, dst.children(droot)[0]);
        let m1 = (c0, dst.children(droot)[1]);
        let m2 = (c1, dst.children(droot)[0]);

        let mut sc = SiblingsSimilarityComparator::new(&src, &dst, &ms);
        assert_eq!(Ordering::Equal, sc.compare(m1, m2));
        let mut pc = ParentsSimilarityComparator::new(&src, &dst);
        assert_eq!(Ordering::Equal, pc.compare(m1, m2));
        let ppc = PositionInParentsComparator::new(&src, &dst);
        assert_eq!(Ordering::Equal, ppc.compare(m1, m2));
        let ac = AbsolutePositionDistanceComparator::new(&src, &dst);
        assert_eq!(Ordering::Equal, ac.compare(m1, m2));
    }
}
