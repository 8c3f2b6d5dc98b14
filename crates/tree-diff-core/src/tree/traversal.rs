//! 显式栈实现的树遍历迭代器
//!
//! 深层 AST 上不能依赖递归，先序/后序/层序都用自己的栈或队列。

use std::collections::VecDeque;

use super::{NodeId, TreeArena};

/// 先序遍历（含起点）
pub struct PreOrder<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> PreOrder<'a> {
    pub(super) fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.arena.children(node).iter().rev().copied());
        Some(node)
    }
}

/// 后序遍历（起点最后产出）
pub struct PostOrder<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> PostOrder<'a> {
    pub(super) fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![(start, 0)],
        }
    }
}

impl Iterator for PostOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        loop {
            let &(node, next_child) = self.stack.last()?;
            let children = self.arena.children(node);
            if next_child < children.len() {
                self.stack.last_mut().expect("non-empty stack").1 += 1;
                self.stack.push((children[next_child], 0));
            } else {
                self.stack.pop();
                return Some(node);
            }
        }
    }
}

/// 层序遍历
pub struct BreadthFirst<'a> {
    arena: &'a TreeArena,
    queue: VecDeque<NodeId>,
}

impl<'a> BreadthFirst<'a> {
    pub(super) fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        Self { arena, queue }
    }
}

impl Iterator for BreadthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.queue.pop_front()?;
        self.queue.extend(self.arena.children(node).iter().copied());
        Some(node)
    }
}
