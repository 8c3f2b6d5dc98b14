//! tree-diff-core - 树差异分析核心库
//!
//! 这是一个 GumTree 风格的树匹配与编辑脚本引擎：把两棵语法树
//! 先做贪心子树匹配、再做自底向上容器匹配，然后用 Chawathe
//! 算法推导出插入、删除、更新、移动的最小动作序列。

pub mod actions;
pub mod diff;
pub mod error;
pub mod formatter;
pub mod generator;
pub mod matchers;
pub mod tree;

// 重新导出主要的公共 API
pub use actions::{
    Action, AllNodesClassifier, ChawatheScriptGenerator, EditScript, NodeRef, OnlyRootsClassifier,
    SimplifiedChawatheScriptGenerator, TreeClassifier,
};
pub use diff::Diff;
pub use error::{Result, TreeDiffError};
pub use formatter::{ActionFormatter, OutputFormat};
pub use generator::{GeneratorKind, PythonTreeGenerator, TreeGenerator};
pub use matchers::{
    CompositeMatcher, GreedyBottomUpMatcher, GreedySubtreeMatcher, Matcher, MappingStore,
    MatcherKind, MatcherOptions, PriorityCalculator, PriorityQueueKind, ZsMatcher,
};
pub use tree::{NodeId, SourceSpan, TreeArena, TreeMetrics};
