//! Chawathe 编辑脚本生成
//!
//! 在源树的工作副本上模拟执行：层序走目标树，缺的就插占位节点，
//! 标签不同就更新，父节点对不上就移动，孩子次序用 LCS 对齐，
//! 最后后序扫一遍删掉没映射上的节点。动作引用原树节点，插入
//! 携带目标树节点，其余携带源树节点。

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{Action, EditScript, NodeRef};
use crate::error::Result;
use crate::matchers::MappingStore;
use crate::tree::{NodeId, TreeArena};

#[derive(Debug, Clone, Copy, Default)]
pub struct ChawatheScriptGenerator;

impl ChawatheScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_actions(
        &self,
        src_arena: &TreeArena,
        dst_arena: &TreeArena,
        mappings: &MappingStore,
    ) -> Result<EditScript> {
        let (Some(src_root), Some(dst_root)) = (src_arena.root(), dst_arena.root()) else {
            return Ok(EditScript::new());
        };
        let mut state = State::new(src_arena, src_root, dst_arena, dst_root, mappings);
        state.run();
        debug!(actions = state.actions.len(), "edit script generated");
        Ok(state.actions)
    }
}

/// 工作副本与簿记
struct State {
    cpy: TreeArena,
    dst: TreeArena,
    fake_src: NodeId,
    dst_root: NodeId,
    /// 副本节点到原树节点的回指；占位节点指向目标树
    copy_to_orig: HashMap<NodeId, NodeRef>,
    cpy_mappings: MappingStore,
    src_in_order: HashSet<NodeId>,
    dst_in_order: HashSet<NodeId>,
    actions: EditScript,
}

impl State {
    fn new(
        src_arena: &TreeArena,
        src_root: NodeId,
        dst_arena: &TreeArena,
        dst_root: NodeId,
        mappings: &MappingStore,
    ) -> Self {
        // 深拷贝保持节点 id，副本里的原有 id 与原树一一对应
        let mut cpy = src_arena.clone();
        let mut dst = dst_arena.clone();

        let mut copy_to_orig = HashMap::with_capacity(src_arena.node_count());
        for node in src_arena.pre_order(src_root) {
            copy_to_orig.insert(node, NodeRef::Src(node));
        }

        let fake_src = cpy.new_node("", "");
        cpy.add_child(fake_src, src_root);
        cpy.set_root(fake_src);
        let fake_dst = dst.new_node("", "");
        dst.add_child(fake_dst, dst_root);
        dst.set_root(fake_dst);

        let mut cpy_mappings = mappings.clone();
        cpy_mappings.add_mapping(fake_src, fake_dst);

        Self {
            cpy,
            dst,
            fake_src,
            dst_root,
            copy_to_orig,
            cpy_mappings,
            src_in_order: HashSet::new(),
            dst_in_order: HashSet::new(),
            actions: EditScript::new(),
        }
    }

    fn run(&mut self) {
        // 从真实根开始层序；被映射的根不产生更新动作，但它对应的
        // 源节点不在根位置时仍要移动上来
        let bfs: Vec<NodeId> = self.dst.breadth_first(self.dst_root).collect();
        for x in bfs {
            let w = match self.cpy_mappings.get_src_for_dst(x) {
                None => self.insert_phase(x),
                Some(w) => {
                    self.update_and_move_phase(w, x, x != self.dst_root);
                    w
                }
            };
            self.src_in_order.insert(w);
            self.dst_in_order.insert(x);
            self.align_children(w, x);
        }
        self.delete_phase();
    }

    /// 未映射的目标节点：登记插入动作并在副本里造一个占位节点
    fn insert_phase(&mut self, x: NodeId) -> NodeId {
        let y = self
            .dst
            .parent(x)
            .expect("unmapped node is below the fake root");
        let z = self
            .cpy_mappings
            .get_src_for_dst(y)
            .expect("breadth-first order maps parents before children");
        let k = self.find_pos(x);
        self.actions.add(Action::Insert {
            node: x,
            parent: self.parent_ref(z),
            pos: k,
        });

        let w = self
            .cpy
            .new_node(self.dst.node_type(x).to_owned(), self.dst.label(x).to_owned());
        self.copy_to_orig.insert(w, NodeRef::Dst(x));
        self.cpy_mappings.add_mapping(w, x);
        self.cpy.insert_child(z, w, k);
        w
    }

    /// 已映射的目标节点：标签变了补更新，父节点换了补移动
    fn update_and_move_phase(&mut self, w: NodeId, x: NodeId, with_update: bool) {
        let v = self
            .cpy
            .parent(w)
            .expect("mapped copy node is below the fake root");
        let z = self
            .cpy_mappings
            .get_src_for_dst(self.dst.parent(x).expect("node is below the fake root"))
            .expect("breadth-first order maps parents before children");

        if with_update && self.cpy.label(w) != self.dst.label(x) {
            let label = self.dst.label(x).to_owned();
            self.actions.add(Action::Update {
                node: self.orig(w),
                label: label.clone(),
            });
            self.cpy.set_label(w, label);
        }
        if z != v {
            let k = self.find_pos(x);
            self.actions.add(Action::Move {
                node: self.orig(w),
                parent: self.parent_ref(z),
                pos: k,
            });
            self.cpy.detach(w);
            self.cpy.insert_child(z, w, k);
        }
    }

    fn delete_phase(&mut self) {
        let post: Vec<NodeId> = self.cpy.post_order(self.fake_src).collect();
        for w in post {
            if !self.cpy_mappings.is_src_mapped(w) {
                self.actions.add(Action::Delete { node: self.orig(w) });
            }
        }
    }

    /// 让 `w` 的孩子顺序对齐 `x` 的孩子顺序：LCS 里的对子已就位，
    /// 其余映射对补移动动作
    fn align_children(&mut self, w: NodeId, x: NodeId) {
        for c in self.cpy.children(w) {
            self.src_in_order.remove(c);
        }
        for c in self.dst.children(x) {
            self.dst_in_order.remove(c);
        }

        let s1: Vec<NodeId> = self
            .cpy
            .children(w)
            .iter()
            .copied()
            .filter(|&c| {
                self.cpy_mappings
                    .get_dst_for_src(c)
                    .is_some_and(|d| self.dst.children(x).contains(&d))
            })
            .collect();
        let s2: Vec<NodeId> = self
            .dst
            .children(x)
            .iter()
            .copied()
            .filter(|&c| {
                self.cpy_mappings
                    .get_src_for_dst(c)
                    .is_some_and(|s| self.cpy.children(w).contains(&s))
            })
            .collect();

        let lcs = self.mapped_lcs(&s1, &s2);
        for &(a, b) in &lcs {
            self.src_in_order.insert(a);
            self.dst_in_order.insert(b);
        }
        let lcs_set: HashSet<(NodeId, NodeId)> = lcs.into_iter().collect();

        for &b in &s2 {
            for &a in &s1 {
                if self.cpy_mappings.has(a, b) && !lcs_set.contains(&(a, b)) {
                    self.cpy.detach(a);
                    let k = self.find_pos(b);
                    self.actions.add(Action::Move {
                        node: self.orig(a),
                        parent: self.parent_ref(w),
                        pos: k,
                    });
                    self.cpy.insert_child(w, a, k);
                    self.src_in_order.insert(a);
                    self.dst_in_order.insert(b);
                }
            }
        }
    }

    /// 以映射关系为相等条件的最长公共子序列
    fn mapped_lcs(&self, s1: &[NodeId], s2: &[NodeId]) -> Vec<(NodeId, NodeId)> {
        let m = s1.len();
        let n = s2.len();
        let mut opt = vec![vec![0usize; n + 1]; m + 1];
        for i in (0..m).rev() {
            for j in (0..n).rev() {
                opt[i][j] = if self.cpy_mappings.has(s1[i], s2[j]) {
                    opt[i + 1][j + 1] + 1
                } else {
                    opt[i + 1][j].max(opt[i][j + 1])
                };
            }
        }

        let mut pairs = Vec::new();
        let mut i = 0;
        let mut j = 0;
        while i < m && j < n {
            if self.cpy_mappings.has(s1[i], s2[j]) {
                pairs.push((s1[i], s2[j]));
                i += 1;
                j += 1;
            } else if opt[i + 1][j] >= opt[i][j + 1] {
                i += 1;
            } else {
                j += 1;
            }
        }
        pairs
    }

    /// 目标节点在已就位兄弟中的落点换算到副本里的孩子下标
    fn find_pos(&self, x: NodeId) -> usize {
        let y = self.dst.parent(x).expect("node is below the fake root");
        let siblings = self.dst.children(y);

        for &c in siblings {
            if self.dst_in_order.contains(&c) {
                if c == x {
                    return 0;
                }
                break;
            }
        }

        let xpos = self
            .dst
            .position_in_parent(x)
            .expect("node is below the fake root");
        let mut v = None;
        for &c in &siblings[..xpos] {
            if self.dst_in_order.contains(&c) {
                v = Some(c);
            }
        }
        let Some(v) = v else {
            return 0;
        };

        let u = self
            .cpy_mappings
            .get_src_for_dst(v)
            .expect("in-order destination nodes are mapped");
        self.cpy
            .position_in_parent(u)
            .expect("mapped copy node is below the fake root")
            + 1
    }

    fn orig(&self, w: NodeId) -> NodeId {
        self.copy_to_orig[&w].node()
    }

    fn parent_ref(&self, z: NodeId) -> Option<NodeRef> {
        if z == self.fake_src {
            None
        } else {
            Some(self.copy_to_orig[&z])
        }
    }
}
