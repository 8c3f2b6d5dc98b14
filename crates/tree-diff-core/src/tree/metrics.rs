//! 树指标计算
//!
//! 对整棵树做一次显式栈的后序遍历，为每个节点计算
//! size/height/hashcode/structure_hash/depth/position。
//! 哈希组合规则与上游保持一致：进入/离开哈希按 33 的
//! `2*前缀大小+1` 次幂累加，同构子树必然得到相同哈希。

use serde::Serialize;

use super::{NodeId, TreeArena};

const ENTER: &str = "enter";
const LEAVE: &str = "leave";
const BASE: u64 = 33;

/// 每个节点一份的指标记录
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TreeMetrics {
    /// 子树节点数
    pub size: usize,
    /// 子树高度，叶子为 0
    pub height: usize,
    /// 对类型、标签、形状敏感的哈希
    pub hashcode: u64,
    /// 忽略标签的形状哈希，用于歧义消解前的候选过滤
    pub structure_hash: u64,
    /// 距根的深度，根为 0
    pub depth: usize,
    /// 后序遍历序号
    pub position: usize,
}

// FNV-1a：跨运行、跨平台稳定的确定性哈希
fn fnv1a(parts: &[&str]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for part in parts {
        for byte in part.bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        // 字段分隔，避免 (ab, c) 与 (a, bc) 同哈希
        hash ^= 0xff;
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

fn hash_factor(exponent: usize) -> u64 {
    BASE.wrapping_pow(exponent as u32)
}

fn node_hash(node_type: &str, label: &str, exponent: usize, middle_hash: u64) -> u64 {
    fnv1a(&[node_type, label, ENTER])
        .wrapping_add(middle_hash)
        .wrapping_add(fnv1a(&[node_type, label, LEAVE]).wrapping_mul(hash_factor(exponent)))
}

fn node_structure_hash(node_type: &str, exponent: usize, middle_hash: u64) -> u64 {
    fnv1a(&[node_type, ENTER])
        .wrapping_add(middle_hash)
        .wrapping_add(fnv1a(&[node_type, LEAVE]).wrapping_mul(hash_factor(exponent)))
}

/// 从根开始的单次后序遍历，填满整个 arena 的指标表
pub(super) fn compute_metrics(arena: &TreeArena) -> Vec<TreeMetrics> {
    let mut table = vec![TreeMetrics::default(); arena.node_count()];
    let Some(root) = arena.root() else {
        return table;
    };

    let mut position = 0usize;
    let mut stack: Vec<(NodeId, usize)> = vec![(root, 0)];
    while let Some(&(node, next_child)) = stack.last() {
        let children = arena.children(node);
        if next_child < children.len() {
            stack.last_mut().expect("non-empty stack").1 += 1;
            stack.push((children[next_child], 0));
            continue;
        }
        stack.pop();
        let depth = stack.len();

        let mut sum_size = 0usize;
        let mut max_height = 0usize;
        let mut current_hash = 0u64;
        let mut current_structure_hash = 0u64;
        for &child in children {
            let m = table[child.index()];
            let exponent = 2 * sum_size + 1;
            current_hash = current_hash.wrapping_add(m.hashcode.wrapping_mul(hash_factor(exponent)));
            current_structure_hash = current_structure_hash
                .wrapping_add(m.structure_hash.wrapping_mul(hash_factor(exponent)));
            sum_size += m.size;
            max_height = max_height.max(m.height);
        }

        let exponent = 2 * sum_size + 1;
        table[node.index()] = TreeMetrics {
            size: sum_size + 1,
            height: if children.is_empty() { 0 } else { max_height + 1 },
            hashcode: node_hash(
                arena.node_type(node),
                arena.label(node),
                exponent,
                current_hash,
            ),
            structure_hash: node_structure_hash(arena.node_type(node), exponent, current_structure_hash),
            depth,
            position,
        };
        position += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use crate::tree::TreeArena;
    use pretty_assertions::assert_eq;

    fn sample() -> TreeArena {
        let mut t = TreeArena::new();
        let a = t.new_node("0", "a");
        t.set_root(a);
        let b = t.new_node("1", "b");
        t.add_child(a, b);
        let c = t.new_node("3", "c");
        t.add_child(b, c);
        let d = t.new_node("3", "d");
        t.add_child(b, d);
        let e = t.new_node("2", "e");
        t.add_child(a, e);
        t
    }

    #[test]
    fn test_size_and_height_recurrences() {
        let t = sample();
        let root = t.root().unwrap();
        for node in t.pre_order(root) {
            let m = t.metrics(node);
            let child_sizes: usize = t.children(node).iter().map(|&c| t.metrics(c).size).sum();
            assert_eq!(m.size, 1 + child_sizes);
            let max_child_height = t
                .children(node)
                .iter()
                .map(|&c| t.metrics(c).height)
                .max();
            match max_child_height {
                Some(h) => assert_eq!(m.height, 1 + h),
                None => assert_eq!(m.height, 0),
            }
        }
        assert_eq!(5, t.metrics(root).size);
        assert_eq!(2, t.metrics(root).height);
    }

    #[test]
    fn test_depth_and_postorder_position() {
        let t = sample();
        let root = t.root().unwrap();
        let b = t.children(root)[0];
        let c = t.children(b)[0];
        assert_eq!(0, t.metrics(root).depth);
        assert_eq!(1, t.metrics(b).depth);
        assert_eq!(2, t.metrics(c).depth);
        // 后序：c d b e a
        let positions: Vec<usize> = t.post_order(root).map(|n| t.metrics(n).position).collect();
        assert_eq!(vec![0, 1, 2, 3, 4], positions);
    }

    #[test]
    fn test_isomorphic_subtrees_hash_equal() {
        let t = sample();
        let copy = t.clone();
        let root = t.root().unwrap();
        for node in t.pre_order(root) {
            assert_eq!(t.metrics(node).hashcode, copy.metrics(node).hashcode);
            assert_eq!(
                t.metrics(node).structure_hash,
                copy.metrics(node).structure_hash
            );
        }
    }

    #[test]
    fn test_relabel_changes_hash_but_not_structure_hash() {
        let t = sample();
        let mut relabeled = t.clone();
        let root = t.root().unwrap();
        let target = relabeled.child_from_url(root, "0.0").unwrap();
        relabeled.set_label(target, "renamed");
        assert_ne!(
            t.metrics(root).hashcode,
            relabeled.metrics(root).hashcode
        );
        assert_eq!(
            t.metrics(root).structure_hash,
            relabeled.metrics(root).structure_hash
        );
        // 未受影响的兄弟子树哈希不变
        let e = t.children(root)[1];
        assert_eq!(t.metrics(e).hashcode, relabeled.metrics(e).hashcode);
    }

    #[test]
    fn test_mutation_invalidates_metrics() {
        let mut t = sample();
        let root = t.root().unwrap();
        assert_eq!(5, t.metrics(root).size);
        let extra = t.new_node("9", "x");
        t.add_child(root, extra);
        assert_eq!(6, t.metrics(root).size);
    }
}
