//! 源码到树的生成器
//!
//! 生成器把一段源码解析成 [`TreeArena`]，节点类型、标签、字节
//! 区间与行列范围都来自具体语言的语法树。按名字注册，目前只有
//! Python。

pub mod python;

pub use python::PythonTreeGenerator;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeDiffError};
use crate::tree::TreeArena;

pub trait TreeGenerator {
    fn generate_from_str(&mut self, source: &str) -> Result<TreeArena>;

    fn generate_from_file(&mut self, path: &Path) -> Result<TreeArena> {
        let source = std::fs::read_to_string(path)?;
        self.generate_from_str(&source)
    }
}

/// 已注册的生成器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Python,
}

impl GeneratorKind {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "python" => Ok(GeneratorKind::Python),
            other => Err(TreeDiffError::ConfigError(format!(
                "unknown generator `{other}`, expected `python`"
            ))),
        }
    }

    pub fn create(self) -> Result<Box<dyn TreeGenerator>> {
        match self {
            GeneratorKind::Python => Ok(Box::new(PythonTreeGenerator::new()?)),
        }
    }
}
