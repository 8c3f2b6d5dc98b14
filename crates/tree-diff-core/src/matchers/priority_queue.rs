//! 高度或大小分桶的优先树队列
//!
//! 子树匹配器用它按优先级层级同步遍历两棵树。桶内保持加入
//! 顺序，桶间用 BTreeMap 保证确定性的层级顺序。

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tree::{NodeId, TreeArena};

/// 节点优先级的计算方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityCalculator {
    /// 子树高度（默认）
    #[default]
    Height,
    /// 子树大小
    Size,
}

impl PriorityCalculator {
    pub fn priority(self, arena: &TreeArena, node: NodeId) -> usize {
        match self {
            PriorityCalculator::Height => arena.metrics(node).height,
            PriorityCalculator::Size => arena.metrics(node).size,
        }
    }
}

/// 队列实现变体选择器；目前只有默认实现
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityQueueKind {
    #[default]
    Default,
}

pub struct PriorityTreeQueue<'a> {
    arena: &'a TreeArena,
    buckets: BTreeMap<usize, Vec<NodeId>>,
    minimum_priority: usize,
    calculator: PriorityCalculator,
}

impl<'a> PriorityTreeQueue<'a> {
    pub fn new(
        arena: &'a TreeArena,
        root: NodeId,
        minimum_priority: usize,
        calculator: PriorityCalculator,
    ) -> Self {
        let mut queue = Self {
            arena,
            buckets: BTreeMap::new(),
            minimum_priority,
            calculator,
        };
        queue.add(root);
        queue
    }

    /// 低于最小优先级的节点直接丢弃
    pub fn add(&mut self, node: NodeId) {
        let priority = self.calculator.priority(self.arena, node);
        if priority < self.minimum_priority {
            return;
        }
        self.buckets.entry(priority).or_default().push(node);
    }

    /// 把节点的孩子压入队列
    pub fn open(&mut self, node: NodeId) {
        for &child in self.arena.children(node) {
            self.add(child);
        }
    }

    /// 弹出当前最高优先级的整个桶
    pub fn pop(&mut self) -> Vec<NodeId> {
        match self.buckets.pop_last() {
            Some((_, bucket)) => bucket,
            None => Vec::new(),
        }
    }

    pub fn pop_open(&mut self) -> Vec<NodeId> {
        let popped = self.pop();
        for &node in &popped {
            self.open(node);
        }
        popped
    }

    pub fn current_priority(&self) -> Option<usize> {
        self.buckets.last_key_value().map(|(&p, _)| p)
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// 让两个队列暴露同一优先级层级：较高的一侧 pop-open 直到
    /// 两侧相等；任何一侧耗尽则双双清空并返回 false。
    pub fn synchronize(q1: &mut PriorityTreeQueue<'_>, q2: &mut PriorityTreeQueue<'_>) -> bool {
        loop {
            match (q1.current_priority(), q2.current_priority()) {
                (Some(p1), Some(p2)) if p1 != p2 => {
                    if p1 > p2 {
                        q1.pop_open();
                    } else {
                        q2.pop_open();
                    }
                }
                (Some(_), Some(_)) => return true,
                _ => {
                    q1.clear();
                    q2.clear();
                    return false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeArena;
    use pretty_assertions::assert_eq;

    fn dummy_tree() -> TreeArena {
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
    fn test_pop_open_with_height() {
        let t = dummy_tree();
        let root = t.root().unwrap();
        let mut queue = PriorityTreeQueue::new(&t, root, 0, PriorityCalculator::Height);
        assert_eq!(Some(2), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(1, p.len());
        assert_eq!(Some(1), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(1, p.len());
        assert_eq!(Some(0), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(3, p.len());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_open_with_size() {
        let t = dummy_tree();
        let root = t.root().unwrap();
        let mut queue = PriorityTreeQueue::new(&t, root, 0, PriorityCalculator::Size);
        assert_eq!(Some(5), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(1, p.len());
        assert_eq!(Some(3), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(1, p.len());
        assert_eq!(Some(1), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(3, p.len());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_pop_open_with_size_and_min_priority() {
        let t = dummy_tree();
        let root = t.root().unwrap();
        let mut queue = PriorityTreeQueue::new(&t, root, 2, PriorityCalculator::Size);
        assert_eq!(Some(5), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(1, p.len());
        assert_eq!(Some(3), queue.current_priority());
        let p = queue.pop_open();
        assert_eq!(1, p.len());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_synchronize() {
        let t = dummy_tree();
        let root = t.root().unwrap();
        let mut q1 = PriorityTreeQueue::new(&t, root, 0, PriorityCalculator::Height);
        let mut q2 = PriorityTreeQueue::new(&t, root, 0, PriorityCalculator::Height);
        q2.pop_open();
        assert_eq!(Some(2), q1.current_priority());
        assert_eq!(Some(1), q2.current_priority());
        assert!(PriorityTreeQueue::synchronize(&mut q1, &mut q2));
        assert_eq!(Some(1), q1.current_priority());
        assert_eq!(Some(1), q2.current_priority());

        let mut q3 = PriorityTreeQueue::new(&t, root, 0, PriorityCalculator::Height);
        q3.clear();
        assert!(!PriorityTreeQueue::synchronize(&mut q2, &mut q3));
        assert!(q2.is_empty());
        assert!(q3.is_empty());
    }
}
