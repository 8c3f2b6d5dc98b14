//! 树匹配算法
//!
//! 所有匹配器实现同一个 [`Matcher`] 接口：接收两棵树与既有映射
//! 存储，返回补充后的存储。经典流水线先做贪心子树匹配，再做
//! 贪心自底向上匹配。

pub mod bottom_up;
pub mod comparators;
pub mod composite;
pub mod mapping_store;
pub mod priority_queue;
pub mod similarity;
pub mod subtree;
pub mod zs;

pub use bottom_up::GreedyBottomUpMatcher;
pub use composite::{CompositeMatcher, MatcherKind, MatcherOptions};
pub use mapping_store::MappingStore;
pub use priority_queue::{PriorityCalculator, PriorityQueueKind, PriorityTreeQueue};
pub use subtree::GreedySubtreeMatcher;
pub use zs::ZsMatcher;

use crate::error::Result;
use crate::tree::{NodeId, TreeArena};

/// 匹配器的统一入口。`src` 与 `dst` 是各自树中的子树根，
/// 传入的映射存储按值接收、补充后返还。
pub trait Matcher {
    fn match_trees(
        &self,
        src_arena: &TreeArena,
        src: NodeId,
        dst_arena: &TreeArena,
        dst: NodeId,
        mappings: MappingStore,
    ) -> Result<MappingStore>;
}
