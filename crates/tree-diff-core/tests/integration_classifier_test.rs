//! 分类器在化简脚本上的端到端测试

mod common;

use std::collections::HashSet;

use common::{action_mappings, action_v0, action_v1, url};
use pretty_assertions::assert_eq;
use tree_diff_core::{
    AllNodesClassifier, NodeId, OnlyRootsClassifier, SimplifiedChawatheScriptGenerator, TreeArena,
};

fn urls(arena: &TreeArena, paths: &[&str]) -> HashSet<NodeId> {
    paths.iter().map(|p| url(arena, p)).collect()
}

#[test]
fn test_all_nodes_classifier() {
    let src = action_v0();
    let dst = action_v1();
    let ms = action_mappings(&src, &dst);
    let script = SimplifiedChawatheScriptGenerator::new()
        .compute_actions(&src, &dst, &ms)
        .unwrap();

    let c = AllNodesClassifier.classify(&src, &dst, &ms, &script);
    assert_eq!(urls(&src, &["0.0"]), c.updated_srcs);
    assert_eq!(urls(&src, &["2", "2.0", "3"]), c.deleted_srcs);
    assert_eq!(urls(&src, &["0", "0.0", "4.0"]), c.moved_srcs);
    assert_eq!(urls(&dst, &["1", "2", "2.0", "3.0", "3.0.0"]), c.inserted_dsts);
    assert_eq!(urls(&dst, &["1.0.0"]), c.updated_dsts);
    assert_eq!(urls(&dst, &["1.0", "1.0.0", "3.0.0.0"]), c.moved_dsts);
}

#[test]
fn test_only_roots_classifier() {
    let src = action_v0();
    let dst = action_v1();
    let ms = action_mappings(&src, &dst);
    let script = SimplifiedChawatheScriptGenerator::new()
        .compute_actions(&src, &dst, &ms)
        .unwrap();

    let c = OnlyRootsClassifier.classify(&src, &dst, &ms, &script);
    assert_eq!(urls(&src, &["0.0"]), c.updated_srcs);
    assert_eq!(urls(&src, &["2", "3"]), c.deleted_srcs);
    assert_eq!(urls(&src, &["0", "4.0"]), c.moved_srcs);
    assert_eq!(urls(&dst, &["1", "2", "3.0", "3.0.0"]), c.inserted_dsts);
    assert_eq!(urls(&dst, &["1.0.0"]), c.updated_dsts);
    assert_eq!(urls(&dst, &["1.0", "3.0.0.0"]), c.moved_dsts);
}
