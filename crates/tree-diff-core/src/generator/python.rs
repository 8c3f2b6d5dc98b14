//! 基于 Tree-sitter 的 Python 树生成器
//!
//! 只收命名节点；叶子和被压平的节点（字符串一类）用源码文本做
//! 标签，内部节点标签为空。字节区间与 1 起始的行号一并记录，
//! 供格式化输出定位源码。

use tree_sitter::{Node, Parser};

use super::TreeGenerator;
use crate::error::{Result, TreeDiffError};
use crate::tree::{NodeId, SourceSpan, TreeArena};

/// 子树整体当作一个带文本标签的叶子处理的节点类型
const FLATTENED_TYPES: &[&str] = &["string", "concatenated_string"];

pub struct PythonTreeGenerator {
    parser: Parser,
}

impl PythonTreeGenerator {
    pub fn new() -> Result<Self> {
        let language = tree_sitter_python::LANGUAGE.into();
        let mut parser = Parser::new();
        parser.set_language(&language).map_err(|e| {
            TreeDiffError::TreeSitterError(format!("Failed to set Python language: {e}"))
        })?;
        Ok(Self { parser })
    }

    /// 显式栈做前序转换，深层嵌套的源码不吃调用栈
    fn convert(source: &str, root: Node<'_>, arena: &mut TreeArena) -> NodeId {
        let root_id = Self::make_node(source, root, arena);
        let mut stack = vec![(root, root_id)];
        while let Some((node, id)) = stack.pop() {
            if FLATTENED_TYPES.contains(&node.kind()) {
                continue;
            }
            let mut cursor = node.walk();
            let mut entries = Vec::new();
            for child in node.named_children(&mut cursor) {
                let child_id = Self::make_node(source, child, arena);
                arena.add_child(id, child_id);
                entries.push((child, child_id));
            }
            while let Some(entry) = entries.pop() {
                stack.push(entry);
            }
        }
        root_id
    }

    fn make_node(source: &str, node: Node<'_>, arena: &mut TreeArena) -> NodeId {
        let flattened = FLATTENED_TYPES.contains(&node.kind());
        let label = if flattened || node.named_child_count() == 0 {
            source[node.start_byte()..node.end_byte()].to_string()
        } else {
            String::new()
        };

        let id = arena.new_node(node.kind(), label);
        arena.set_byte_range(id, node.start_byte(), node.end_byte() - node.start_byte());
        arena.set_span(
            id,
            SourceSpan {
                start_line: node.start_position().row + 1,
                start_col: node.start_position().column,
                end_line: node.end_position().row + 1,
                end_col: node.end_position().column,
            },
        );
        id
    }
}

impl TreeGenerator for PythonTreeGenerator {
    fn generate_from_str(&mut self, source: &str) -> Result<TreeArena> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| TreeDiffError::ParseError("Failed to parse Python source".to_string()))?;

        let mut arena = TreeArena::new();
        let root = Self::convert(source, tree.root_node(), &mut arena);
        arena.set_root(root);
        Ok(arena)
    }
}
