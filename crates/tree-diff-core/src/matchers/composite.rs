//! 匹配器的组合与工厂
//!
//! 经典 GumTree 流水线 = 贪心子树匹配 + 贪心自底向上匹配，
//! 依次把同一个映射存储传下去。按名字构造，参数集中在
//! [`MatcherOptions`] 里。

use serde::{Deserialize, Serialize};

use super::bottom_up::{GreedyBottomUpMatcher, DEFAULT_SIM_THRESHOLD, DEFAULT_SIZE_THRESHOLD};
use super::mapping_store::MappingStore;
use super::priority_queue::{PriorityCalculator, PriorityQueueKind};
use super::subtree::{GreedySubtreeMatcher, DEFAULT_MIN_PRIORITY};
use super::Matcher;
use crate::error::{Result, TreeDiffError};
use crate::tree::{NodeId, TreeArena};

/// 流水线各阶段的可调参数
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatcherOptions {
    pub min_priority: usize,
    pub priority_calculator: PriorityCalculator,
    pub priority_queue: PriorityQueueKind,
    pub size_threshold: usize,
    pub sim_threshold: f64,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            min_priority: DEFAULT_MIN_PRIORITY,
            priority_calculator: PriorityCalculator::default(),
            priority_queue: PriorityQueueKind::default(),
            size_threshold: DEFAULT_SIZE_THRESHOLD,
            sim_threshold: DEFAULT_SIM_THRESHOLD,
        }
    }
}

/// 已注册的匹配器流水线
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatcherKind {
    /// GreedySubtreeMatcher 接 GreedyBottomUpMatcher
    #[default]
    Classic,
}

impl MatcherKind {
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "classic" | "classic-gumtree" | "gumtree" => Ok(MatcherKind::Classic),
            other => Err(TreeDiffError::ConfigError(format!(
                "unknown matcher `{other}`, expected `classic`"
            ))),
        }
    }

    pub fn create(self, options: &MatcherOptions) -> CompositeMatcher {
        match self {
            MatcherKind::Classic => CompositeMatcher::classic(options),
        }
    }
}

pub struct CompositeMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl CompositeMatcher {
    pub fn classic(options: &MatcherOptions) -> Self {
        Self {
            matchers: vec![
                Box::new(GreedySubtreeMatcher::new(
                    options.min_priority,
                    options.priority_calculator,
                )),
                Box::new(GreedyBottomUpMatcher::new(
                    options.size_threshold,
                    options.sim_threshold,
                )),
            ],
        }
    }
}

impl Matcher for CompositeMatcher {
    fn match_trees(
        &self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
        mut mappings: MappingStore,
    ) -> Result<MappingStore> {
        for matcher in &self.matchers {
            mappings = matcher.match_trees(src_arena, src, dst_arena, dst, mappings)?;
        }
        Ok(mappings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_matcher_kind_from_name() {
        assert_eq!(
            MatcherKind::Classic,
            MatcherKind::from_name("classic").unwrap()
        );
        assert!(MatcherKind::from_name("does-not-exist").is_err());
    }

    #[test]
    fn test_classic_pipeline_on_identical_trees() {
        let mut src = TreeArena::new();
        let root = src.new_node("module", "");
        src.set_root(root);
        let f = src.new_node("function", "foo");
        src.add_child(root, f);
        let body = src.new_node("block", "");
        src.add_child(f, body);
        let s = src.new_node("stmt", "pass");
        src.add_child(body, s);
        let dst = src.clone();

        let matcher = MatcherKind::Classic.create(&MatcherOptions::default());
        let ms = matcher
            .match_trees(
                &src,
                src.root().unwrap(),
                &dst,
                dst.root().unwrap(),
                MappingStore::new(),
            )
            .unwrap();
        assert_eq!(src.node_count(), ms.size());
    }
}
