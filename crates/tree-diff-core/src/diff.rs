//! 端到端的差异计算门面
//!
//! 把生成器、匹配器流水线和编辑脚本生成串起来：源码进，
//! 两棵树、映射与动作列表出。分类器视图在结果上按需计算。

use std::path::Path;

use tracing::info;

use crate::actions::{
    AllNodesClassifier, ChawatheScriptGenerator, EditScript, OnlyRootsClassifier, TreeClassifier,
};
use crate::error::Result;
use crate::generator::GeneratorKind;
use crate::matchers::{Matcher, MappingStore, MatcherKind, MatcherOptions};
use crate::tree::TreeArena;

/// 一次完整比较的结果
pub struct Diff {
    pub src: TreeArena,
    pub dst: TreeArena,
    pub mappings: MappingStore,
    pub edit_script: EditScript,
}

impl Diff {
    /// 解析两段源码并计算差异
    pub fn compute_from_strs(
        src_code: &str,
        dst_code: &str,
        generator: GeneratorKind,
        matcher: MatcherKind,
        options: &MatcherOptions,
    ) -> Result<Self> {
        let mut tree_generator = generator.create()?;
        let src = tree_generator.generate_from_str(src_code)?;
        let dst = tree_generator.generate_from_str(dst_code)?;
        Self::compute_from_trees(src, dst, matcher, options)
    }

    /// 读取两个文件并计算差异
    pub fn compute_from_files(
        src_path: &Path,
        dst_path: &Path,
        generator: GeneratorKind,
        matcher: MatcherKind,
        options: &MatcherOptions,
    ) -> Result<Self> {
        let mut tree_generator = generator.create()?;
        let src = tree_generator.generate_from_file(src_path)?;
        let dst = tree_generator.generate_from_file(dst_path)?;
        Self::compute_from_trees(src, dst, matcher, options)
    }

    /// 在已生成的树上计算差异
    pub fn compute_from_trees(
        src: TreeArena,
        dst: TreeArena,
        matcher: MatcherKind,
        options: &MatcherOptions,
    ) -> Result<Self> {
        let pipeline = matcher.create(options);
        let mappings = match (src.root(), dst.root()) {
            (Some(src_root), Some(dst_root)) => pipeline.match_trees(
                &src,
                src_root,
                &dst,
                dst_root,
                MappingStore::new(),
            )?,
            _ => MappingStore::new(),
        };
        let edit_script = ChawatheScriptGenerator::new().compute_actions(&src, &dst, &mappings)?;
        info!(
            src_nodes = src.node_count(),
            dst_nodes = dst.node_count(),
            mappings = mappings.size(),
            actions = edit_script.len(),
            "diff computed"
        );
        Ok(Self {
            src,
            dst,
            mappings,
            edit_script,
        })
    }

    /// 每个受影响节点都标出的分类视图
    pub fn all_nodes_classifier(&self) -> TreeClassifier {
        AllNodesClassifier.classify(&self.src, &self.dst, &self.mappings, &self.edit_script)
    }

    /// 只标子树根的分类视图
    pub fn root_nodes_classifier(&self) -> TreeClassifier {
        OnlyRootsClassifier.classify(&self.src, &self.dst, &self.mappings, &self.edit_script)
    }
}
