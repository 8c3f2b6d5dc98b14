//! 整树插入、整树删除的化简
//!
//! 先跑 Chawathe，再把「整棵子树逐节点插入/删除」的动作串折叠：
//! 子树根换成 tree-insert / tree-delete，根已被折叠覆盖的后代
//! 动作删掉。其余动作原位保留，顺序不变。

use std::collections::{HashMap, HashSet};

use super::{Action, ChawatheScriptGenerator, EditScript};
use crate::error::Result;
use crate::matchers::MappingStore;
use crate::tree::{NodeId, TreeArena};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimplifiedChawatheScriptGenerator;

impl SimplifiedChawatheScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_actions(
        &self,
        src_arena: &TreeArena,
        dst_arena: &TreeArena,
        mappings: &MappingStore,
    ) -> Result<EditScript> {
        let mut script =
            ChawatheScriptGenerator::new().compute_actions(src_arena, dst_arena, mappings)?;
        simplify(&mut script, src_arena, dst_arena);
        Ok(script)
    }
}

fn simplify(script: &mut EditScript, src_arena: &TreeArena, dst_arena: &TreeArena) {
    let mut inserted: Vec<(NodeId, usize)> = Vec::new();
    let mut deleted: Vec<(NodeId, usize)> = Vec::new();
    for (index, action) in script.iter().enumerate() {
        match action {
            Action::Insert { node, .. } => inserted.push((*node, index)),
            Action::Delete { node } => deleted.push((*node, index)),
            _ => {}
        }
    }

    let mut removed: HashSet<usize> = HashSet::new();
    collapse(dst_arena, &inserted, script, &mut removed, |node, parent, pos| {
        Action::TreeInsert { node, parent, pos }
    });
    collapse(src_arena, &deleted, script, &mut removed, |node, _, _| {
        Action::TreeDelete { node }
    });

    script.retain_indices(|index| !removed.contains(&index));
}

/// `per_node` 是同一方向上逐节点动作的「节点 → 脚本下标」对，
/// 按脚本顺序排列。父节点连同其整棵子树都被覆盖的节点直接丢弃，
/// 自己整棵子树被覆盖的内部节点原位换成整树动作。
fn collapse(
    arena: &TreeArena,
    per_node: &[(NodeId, usize)],
    script: &mut EditScript,
    removed: &mut HashSet<usize>,
    make_tree_action: impl Fn(NodeId, Option<super::NodeRef>, usize) -> Action,
) {
    let covered: HashMap<NodeId, usize> = per_node.iter().copied().collect();
    let fully_covered =
        |root: NodeId| arena.descendants(root).iter().all(|d| covered.contains_key(d));

    let mut replacements: Vec<(usize, Action)> = Vec::new();
    for &(node, index) in per_node {
        let parent_covered = arena
            .parent(node)
            .is_some_and(|p| covered.contains_key(&p) && fully_covered(p));
        if parent_covered {
            removed.insert(index);
        } else if !arena.children(node).is_empty() && fully_covered(node) {
            if let Some(Action::Insert { parent, pos, .. }) = script.get(index) {
                replacements.push((index, make_tree_action(node, *parent, *pos)));
            } else {
                replacements.push((index, make_tree_action(node, None, 0)));
            }
        }
    }
    for (index, action) in replacements {
        script.replace(index, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::TreeArena;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_whole_subtree_delete_is_folded() {
        let mut src = TreeArena::new();
        let root = src.new_node("root", "");
        src.set_root(root);
        let keep = src.new_node("leaf", "keep");
        src.add_child(root, keep);
        let g = src.new_node("group", "");
        src.add_child(root, g);
        let h = src.new_node("leaf", "h");
        src.add_child(g, h);

        let mut dst = TreeArena::new();
        let droot = dst.new_node("root", "");
        dst.set_root(droot);
        let dkeep = dst.new_node("leaf", "keep");
        dst.add_child(droot, dkeep);

        let mut ms = MappingStore::new();
        ms.add_mapping(root, droot);
        ms.add_mapping(keep, dkeep);

        let script = SimplifiedChawatheScriptGenerator::new()
            .compute_actions(&src, &dst, &ms)
            .unwrap();
        assert_eq!(1, script.len());
        assert_eq!(Some(&Action::TreeDelete { node: g }), script.get(0));
    }

    #[test]
    fn test_whole_subtree_insert_is_folded() {
        let mut src = TreeArena::new();
        let root = src.new_node("root", "");
        src.set_root(root);
        let keep = src.new_node("leaf", "keep");
        src.add_child(root, keep);

        let mut dst = TreeArena::new();
        let droot = dst.new_node("root", "");
        dst.set_root(droot);
        let dkeep = dst.new_node("leaf", "keep");
        dst.add_child(droot, dkeep);
        let x = dst.new_node("group", "");
        dst.add_child(droot, x);
        let w = dst.new_node("leaf", "w");
        dst.add_child(x, w);

        let mut ms = MappingStore::new();
        ms.add_mapping(root, droot);
        ms.add_mapping(keep, dkeep);

        let script = SimplifiedChawatheScriptGenerator::new()
            .compute_actions(&src, &dst, &ms)
            .unwrap();
        assert_eq!(1, script.len());
        assert!(matches!(
            script.get(0),
            Some(Action::TreeInsert { node, .. }) if *node == x
        ));
    }
}
