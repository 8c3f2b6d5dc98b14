//! 集成测试共享的树夹具

#![allow(dead_code)]

use tree_diff_core::{MappingStore, NodeId, TreeArena};

pub fn child(arena: &mut TreeArena, parent: NodeId, node_type: &str, label: &str) -> NodeId {
    let id = arena.new_node(node_type, label);
    arena.add_child(parent, id);
    id
}

pub fn url(arena: &TreeArena, url: &str) -> NodeId {
    let root = arena.root().expect("fixture tree has a root");
    arena
        .child_from_url(root, url)
        .expect("fixture URL resolves")
}

/// a[e[f], b[c,d], g[h], i, j[k]]，全部类型 "0"
pub fn action_v0() -> TreeArena {
    let mut t = TreeArena::new();
    let a = t.new_node("0", "a");
    t.set_root(a);
    let e = child(&mut t, a, "0", "e");
    child(&mut t, e, "0", "f");
    let b = child(&mut t, a, "0", "b");
    child(&mut t, b, "0", "c");
    child(&mut t, b, "0", "d");
    let g = child(&mut t, a, "0", "g");
    child(&mut t, g, "0", "h");
    child(&mut t, a, "0", "i");
    let j = child(&mut t, a, "0", "j");
    child(&mut t, j, "0", "k");
    t
}

/// z[b[c,d], h[e[y]], x[w], j[u[v[k]]]]，全部类型 "0"
pub fn action_v1() -> TreeArena {
    let mut t = TreeArena::new();
    let a = t.new_node("0", "z");
    t.set_root(a);
    let b = child(&mut t, a, "0", "b");
    child(&mut t, b, "0", "c");
    child(&mut t, b, "0", "d");
    let h = child(&mut t, a, "0", "h");
    let e = child(&mut t, h, "0", "e");
    child(&mut t, e, "0", "y");
    let x = child(&mut t, a, "0", "x");
    child(&mut t, x, "0", "w");
    let j = child(&mut t, a, "0", "j");
    let u = child(&mut t, j, "0", "u");
    let v = child(&mut t, u, "0", "v");
    child(&mut t, v, "0", "k");
    t
}

/// 动作夹具的手工种子映射
pub fn action_mappings(src: &TreeArena, dst: &TreeArena) -> MappingStore {
    let mut ms = MappingStore::new();
    ms.add_mapping(src.root().unwrap(), dst.root().unwrap());
    ms.add_mapping(url(src, "1"), url(dst, "0"));
    ms.add_mapping(url(src, "1.0"), url(dst, "0.0"));
    ms.add_mapping(url(src, "1.1"), url(dst, "0.1"));
    ms.add_mapping(url(src, "0"), url(dst, "1.0"));
    ms.add_mapping(url(src, "0.0"), url(dst, "1.0.0"));
    ms.add_mapping(url(src, "4"), url(dst, "3"));
    ms.add_mapping(url(src, "4.0"), url(dst, "3.0.0.0"));
    ms
}

/// a[b, c[d,e,f,r1]]
pub fn zs_v0() -> TreeArena {
    let mut t = TreeArena::new();
    let a = t.new_node("0", "a");
    t.set_root(a);
    child(&mut t, a, "0", "b");
    let c = child(&mut t, a, "0", "c");
    child(&mut t, c, "0", "d");
    child(&mut t, c, "0", "e");
    child(&mut t, c, "0", "f");
    child(&mut t, c, "0", "r1");
    t
}

/// z[a[b, c[d, y, f, r2]]]，y 的类型是 "1"
pub fn zs_v1() -> TreeArena {
    let mut t = TreeArena::new();
    let z = t.new_node("0", "z");
    t.set_root(z);
    let a = child(&mut t, z, "0", "a");
    child(&mut t, a, "0", "b");
    let c = child(&mut t, a, "0", "c");
    child(&mut t, c, "0", "d");
    child(&mut t, c, "1", "y");
    child(&mut t, c, "0", "f");
    child(&mut t, c, "0", "r2");
    t
}

fn call(t: &mut TreeArena, parent: NodeId, name: &str, with_text: bool) -> NodeId {
    let c = child(t, parent, "Call", "");
    child(t, c, "Empty", "");
    child(t, c, "Identifier", name);
    child(t, c, "Identifier", "value");
    if with_text {
        child(t, c, "TextElement", "");
    }
    c
}

/// 稳定性测试用的函数树（源版本）
pub fn stability_src() -> TreeArena {
    let mut t = TreeArena::new();
    let function = t.new_node("Function", "");
    t.set_root(function);
    let if_node = child(&mut t, function, "If", "");
    let gt = child(&mut t, if_node, "GreaterThan", "");
    call(&mut t, gt, "delete", false);
    child(&mut t, gt, "Integer", "1");
    call(&mut t, if_node, "move", true);
    let ret1 = child(&mut t, if_node, "Return", "");
    child(&mut t, ret1, "Boolean", "");
    let ret2 = child(&mut t, if_node, "Return", "");
    child(&mut t, ret2, "Boolean", "");
    child(&mut t, function, "Identifier", "update");
    let annotation = child(&mut t, function, "Annotation", "");
    child(&mut t, annotation, "Identifier", "value");
    child(&mut t, annotation, "Identifier", "str");
    t
}

/// 稳定性测试用的函数树（目标版本）
pub fn stability_dst() -> TreeArena {
    let mut t = TreeArena::new();
    let function = t.new_node("Function", "");
    t.set_root(function);
    let if_node = child(&mut t, function, "If", "");
    let gt = child(&mut t, if_node, "GreaterThan", "");
    call(&mut t, gt, "add", false);
    child(&mut t, gt, "Integer", "10");
    call(&mut t, if_node, "move", true);
    let ret1 = child(&mut t, if_node, "Return", "");
    child(&mut t, ret1, "Boolean", "");
    let ret2 = child(&mut t, if_node, "Return", "");
    call(&mut t, ret2, "map", false);
    child(&mut t, function, "Identifier", "update");
    let annotation = child(&mut t, function, "Annotation", "");
    child(&mut t, annotation, "Identifier", "value");
    child(&mut t, annotation, "Identifier", "str");
    t
}
