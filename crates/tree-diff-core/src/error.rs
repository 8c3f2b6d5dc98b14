use thiserror::Error;

/// tree-diff 引擎的错误类型定义
#[derive(Error, Debug)]
pub enum TreeDiffError {
    #[error("Wrong node URL format: {0}")]
    InvalidNodeUrl(String),

    #[error("Child index {index} out of range for node with {child_count} children")]
    ChildIndexOutOfRange { index: usize, child_count: usize },

    #[error("Should not map incompatible nodes: {0}")]
    IncompatibleNodes(String),

    #[error("Source parsing error: {0}")]
    ParseError(String),

    #[error("Tree-sitter language error: {0}")]
    TreeSitterError(String),

    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// 项目通用的 Result 类型别名
pub type Result<T> = std::result::Result<T, TreeDiffError>;
