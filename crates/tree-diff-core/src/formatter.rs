//! 编辑脚本的输出格式化
//!
//! 文本格式逐动作打印，JSON 格式给出结构化的动作数组。节点
//! 一律渲染成「类型: 标签 [起,止]」，方便对照源码字节区间。

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::actions::{Action, EditScript, NodeRef};
use crate::error::{Result, TreeDiffError};
use crate::tree::{NodeId, TreeArena};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(TreeDiffError::ConfigError(format!(
                "unknown output format `{other}`, expected `text` or `json`"
            ))),
        }
    }
}

/// 把动作渲染成文本或 JSON
pub struct ActionFormatter<'a> {
    src: &'a TreeArena,
    dst: &'a TreeArena,
}

impl<'a> ActionFormatter<'a> {
    pub fn new(src: &'a TreeArena, dst: &'a TreeArena) -> Self {
        Self { src, dst }
    }

    pub fn format(&self, script: &EditScript, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.format_text(script)),
            OutputFormat::Json => self.format_json(script),
        }
    }

    fn format_text(&self, script: &EditScript) -> String {
        let mut out = String::new();
        for action in script {
            out.push_str("===\n");
            out.push_str(action_name(action));
            out.push_str("\n---\n");
            match action {
                Action::Insert { node, parent, pos }
                | Action::TreeInsert { node, parent, pos } => {
                    out.push_str(&self.render_node(self.dst, *node));
                    out.push_str("\nto\n");
                    out.push_str(&self.render_parent(*parent));
                    out.push_str(&format!("\nat {pos}\n"));
                }
                Action::Update { node, label } => {
                    out.push_str(&self.render_node(self.src, *node));
                    out.push_str(&format!(
                        "\nreplace {} by {label}\n",
                        self.src.label(*node)
                    ));
                }
                Action::Move { node, parent, pos } => {
                    out.push_str(&self.render_node(self.src, *node));
                    out.push_str("\nto\n");
                    out.push_str(&self.render_parent(*parent));
                    out.push_str(&format!("\nat {pos}\n"));
                }
                Action::Delete { node } | Action::TreeDelete { node } => {
                    out.push_str(&self.render_node(self.src, *node));
                    out.push('\n');
                }
            }
        }
        out
    }

    fn format_json(&self, script: &EditScript) -> Result<String> {
        let actions: Vec<serde_json::Value> = script
            .iter()
            .map(|action| match action {
                Action::Insert { node, parent, pos }
                | Action::TreeInsert { node, parent, pos } => json!({
                    "action": action_name(action),
                    "tree": self.render_node(self.dst, *node),
                    "parent": parent.map(|p| self.render_ref(p)),
                    "at": pos,
                }),
                Action::Update { node, label } => json!({
                    "action": action_name(action),
                    "tree": self.render_node(self.src, *node),
                    "label": label,
                }),
                Action::Move { node, parent, pos } => json!({
                    "action": action_name(action),
                    "tree": self.render_node(self.src, *node),
                    "parent": parent.map(|p| self.render_ref(p)),
                    "at": pos,
                }),
                Action::Delete { node } | Action::TreeDelete { node } => json!({
                    "action": action_name(action),
                    "tree": self.render_node(self.src, *node),
                }),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&json!({ "actions": actions }))?)
    }

    fn render_node(&self, arena: &TreeArena, node: NodeId) -> String {
        format!(
            "{} [{},{}]",
            arena.describe(node),
            arena.pos(node),
            arena.end_pos(node)
        )
    }

    fn render_ref(&self, node_ref: NodeRef) -> String {
        match node_ref {
            NodeRef::Src(node) => self.render_node(self.src, node),
            NodeRef::Dst(node) => self.render_node(self.dst, node),
        }
    }

    fn render_parent(&self, parent: Option<NodeRef>) -> String {
        match parent {
            Some(node_ref) => self.render_ref(node_ref),
            None => "root".to_string(),
        }
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Insert { .. } => "insert-node",
        Action::TreeInsert { .. } => "insert-tree",
        Action::Update { .. } => "update-node",
        Action::Move { .. } => "move-tree",
        Action::Delete { .. } => "delete-node",
        Action::TreeDelete { .. } => "delete-tree",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn one_update() -> (TreeArena, TreeArena, EditScript) {
        let mut src = TreeArena::new();
        let root = src.new_node("module", "");
        src.set_root(root);
        let leaf = src.new_node("identifier", "foo");
        src.add_child(root, leaf);
        let mut dst = TreeArena::new();
        let droot = dst.new_node("module", "");
        dst.set_root(droot);
        let dleaf = dst.new_node("identifier", "bar");
        dst.add_child(droot, dleaf);

        let mut script = EditScript::new();
        script.add(Action::Update {
            node: leaf,
            label: "bar".to_string(),
        });
        (src, dst, script)
    }

    #[test]
    fn test_text_output() {
        let (src, dst, script) = one_update();
        let text = ActionFormatter::new(&src, &dst)
            .format(&script, OutputFormat::Text)
            .unwrap();
        assert_eq!(
            "===\nupdate-node\n---\nidentifier: foo [0,0]\nreplace foo by bar\n",
            text
        );
    }

    #[test]
    fn test_json_output_is_valid() {
        let (src, dst, script) = one_update();
        let rendered = ActionFormatter::new(&src, &dst)
            .format(&script, OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!("update-node", value["actions"][0]["action"]);
    }

    #[test]
    fn test_unknown_format_name() {
        assert!(OutputFormat::from_name("yaml").is_err());
    }
}
