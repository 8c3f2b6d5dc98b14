//! 匹配与脚本生成基准测试
//!
//! 使用 criterion 在合成树和真实 Python 源码上测量各阶段耗时。

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tree_diff_core::{
    ChawatheScriptGenerator, Diff, GeneratorKind, MappingStore, Matcher, MatcherKind,
    MatcherOptions, NodeId, TreeArena, ZsMatcher,
};

/// 生成一棵分叉度固定的满树
fn full_tree(depth: usize, fanout: usize, relabel_leaves: bool) -> TreeArena {
    let mut arena = TreeArena::new();
    let root = arena.new_node("block", "");
    arena.set_root(root);
    let mut frontier = vec![root];
    for level in 0..depth {
        let mut next = Vec::new();
        for &parent in &frontier {
            for i in 0..fanout {
                let leaf = level + 1 == depth;
                let label = if leaf {
                    if relabel_leaves {
                        format!("v{level}_{i}x")
                    } else {
                        format!("v{level}_{i}")
                    }
                } else {
                    String::new()
                };
                let node_type = if leaf { "name" } else { "block" };
                let id = arena.new_node(node_type, label);
                arena.add_child(parent, id);
                next.push(id);
            }
        }
        frontier = next;
    }
    arena
}

fn roots(src: &TreeArena, dst: &TreeArena) -> (NodeId, NodeId) {
    (src.root().unwrap(), dst.root().unwrap())
}

fn bench_classic_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("classic_matching");
    for depth in [4usize, 6] {
        let src = full_tree(depth, 3, false);
        let dst = full_tree(depth, 3, true);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| {
                let matcher = MatcherKind::Classic.create(&MatcherOptions::default());
                let (src_root, dst_root) = roots(&src, &dst);
                let ms = matcher
                    .match_trees(&src, src_root, &dst, dst_root, MappingStore::new())
                    .unwrap();
                black_box(ms.size())
            })
        });
    }
    group.finish();
}

fn bench_zs_matching(c: &mut Criterion) {
    let src = full_tree(4, 3, false);
    let dst = full_tree(4, 3, true);
    c.bench_function("zs_matching", |b| {
        b.iter(|| {
            let (src_root, dst_root) = roots(&src, &dst);
            let ms = ZsMatcher::new()
                .match_trees(&src, src_root, &dst, dst_root, MappingStore::new())
                .unwrap();
            black_box(ms.size())
        })
    });
}

fn bench_edit_script(c: &mut Criterion) {
    let src = full_tree(5, 3, false);
    let dst = full_tree(5, 3, true);
    let matcher = MatcherKind::Classic.create(&MatcherOptions::default());
    let (src_root, dst_root) = roots(&src, &dst);
    let ms = matcher
        .match_trees(&src, src_root, &dst, dst_root, MappingStore::new())
        .unwrap();
    c.bench_function("chawathe_script", |b| {
        b.iter(|| {
            let script = ChawatheScriptGenerator::new()
                .compute_actions(&src, &dst, &ms)
                .unwrap();
            black_box(script.len())
        })
    });
}

fn bench_python_diff(c: &mut Criterion) {
    let src_code: String = (0..50)
        .map(|i| format!("def f{i}(x):\n    return x + {i}\n"))
        .collect();
    let dst_code: String = (0..50)
        .map(|i| format!("def f{i}(x):\n    return x * {i}\n"))
        .collect();
    c.bench_function("python_diff", |b| {
        b.iter(|| {
            let diff = Diff::compute_from_strs(
                &src_code,
                &dst_code,
                GeneratorKind::Python,
                MatcherKind::Classic,
                &MatcherOptions::default(),
            )
            .unwrap();
            black_box(diff.edit_script.len())
        })
    });
}

criterion_group!(
    benches,
    bench_classic_matching,
    bench_zs_matching,
    bench_edit_script,
    bench_python_diff
);
criterion_main!(benches);
