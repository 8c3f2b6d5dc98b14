//! 命令行接口模块
//!
//! 提供命令行参数解析和用户交互功能

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tree_diff_core::{
    GeneratorKind, MatcherKind, MatcherOptions, OutputFormat, PriorityCalculator, Result,
    TreeDiffError,
};

/// tree-diff - 树差异分析工具
///
/// 基于 GumTree 的树匹配与编辑脚本工具，比较两个源码文件的
/// 语法树并输出插入、删除、更新、移动的动作序列。
#[derive(Parser, Debug)]
#[command(name = "tree-diff")]
#[command(author = "tree-diff contributors")]
#[command(version = "0.1.0")]
#[command(about = "A tree diff tool that computes fine-grained edit scripts")]
#[command(
    long_about = "tree-diff parses two source files into syntax trees, matches their nodes with the GumTree pipeline, and derives a Chawathe edit script describing how to turn one tree into the other."
)]
pub struct Cli {
    /// 源文件
    #[arg(help = "Source file", value_name = "SRC_FILE")]
    pub src_file: PathBuf,

    /// 目标文件
    #[arg(help = "Destination file", value_name = "DST_FILE")]
    pub dst_file: PathBuf,

    /// 匹配器流水线
    #[arg(
        short = 'm',
        long = "matcher",
        default_value = "classic",
        help = "Matcher pipeline to use",
        value_name = "NAME"
    )]
    pub matcher: String,

    /// 语法树生成器
    #[arg(
        short = 'g',
        long = "generator",
        default_value = "python",
        help = "Tree generator used to parse both files",
        value_name = "NAME"
    )]
    pub generator: String,

    /// 输出格式
    #[arg(
        short = 'f',
        long = "format",
        value_enum,
        default_value_t = OutputFormatArg::Text,
        help = "Output format for the edit script"
    )]
    pub format: OutputFormatArg,

    /// 化简编辑脚本
    #[arg(
        long = "simplify",
        help = "Fold whole-subtree insertions and deletions into tree actions"
    )]
    pub simplify: bool,

    /// 子树匹配的最小优先级
    #[arg(
        long = "min-priority",
        default_value_t = 2,
        value_name = "PRIORITY",
        help = "Minimum priority for the top-down subtree matcher"
    )]
    pub min_priority: usize,

    /// 优先级的计算方式
    #[arg(
        long = "priority-calculator",
        value_enum,
        default_value_t = PriorityCalculatorArg::Height,
        help = "How node priorities are computed in the top-down phase"
    )]
    pub priority_calculator: PriorityCalculatorArg,

    /// 触发精确匹配的子树大小上限
    #[arg(
        long = "size-threshold",
        default_value_t = 1000,
        value_name = "SIZE",
        help = "Maximum subtree size for the exact last-chance matcher"
    )]
    pub size_threshold: usize,

    /// 自底向上匹配的相似度阈值
    #[arg(
        long = "sim-threshold",
        default_value_t = 0.5,
        value_name = "RATIO",
        help = "Minimum dice similarity for bottom-up container matching"
    )]
    pub sim_threshold: f64,

    /// 详细输出
    #[arg(short = 'v', long = "verbose", help = "Enable verbose logging output")]
    pub verbose: bool,
}

/// 输出格式命令行参数
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    /// 纯文本格式输出
    #[value(name = "text")]
    Text,
    /// JSON 格式输出
    #[value(name = "json")]
    Json,
}

/// 优先级计算方式命令行参数
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PriorityCalculatorArg {
    /// 子树高度
    #[value(name = "height")]
    Height,
    /// 子树大小
    #[value(name = "size")]
    Size,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => OutputFormat::Text,
            OutputFormatArg::Json => OutputFormat::Json,
        }
    }
}

impl From<PriorityCalculatorArg> for PriorityCalculator {
    fn from(arg: PriorityCalculatorArg) -> Self {
        match arg {
            PriorityCalculatorArg::Height => PriorityCalculator::Height,
            PriorityCalculatorArg::Size => PriorityCalculator::Size,
        }
    }
}

/// 应用程序配置信息
#[derive(Debug, Clone)]
pub struct Config {
    pub src_file: PathBuf,
    pub dst_file: PathBuf,
    pub matcher: MatcherKind,
    pub generator: GeneratorKind,
    pub matcher_options: MatcherOptions,
    pub output_format: OutputFormat,
    pub simplify: bool,
    pub verbose: bool,
}

impl Cli {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 验证参数的有效性
    pub fn validate(&self) -> Result<()> {
        for path in [&self.src_file, &self.dst_file] {
            if !path.exists() {
                return Err(TreeDiffError::ConfigError(format!(
                    "input file does not exist: {}",
                    path.display()
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.sim_threshold) {
            return Err(TreeDiffError::ConfigError(format!(
                "similarity threshold must be within [0, 1], got {}",
                self.sim_threshold
            )));
        }
        Ok(())
    }

    /// 转换成应用配置；匹配器名字在这里解析
    pub fn into_config(self) -> Result<Config> {
        let matcher = MatcherKind::from_name(&self.matcher)?;
        let generator = GeneratorKind::from_name(&self.generator)?;
        let matcher_options = MatcherOptions {
            min_priority: self.min_priority,
            priority_calculator: self.priority_calculator.into(),
            size_threshold: self.size_threshold,
            sim_threshold: self.sim_threshold,
            ..MatcherOptions::default()
        };
        Ok(Config {
            src_file: self.src_file,
            dst_file: self.dst_file,
            matcher,
            generator,
            matcher_options,
            output_format: self.format.into(),
            simplify: self.simplify,
            verbose: self.verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_threshold_bounds() {
        let cli = Cli::parse_from([
            "tree-diff",
            "a.py",
            "b.py",
            "--sim-threshold",
            "1.5",
        ]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_defaults_map_to_matcher_options() {
        let cli = Cli::parse_from(["tree-diff", "a.py", "b.py"]);
        let config = cli.into_config().unwrap();
        assert_eq!(MatcherKind::Classic, config.matcher);
        assert_eq!(2, config.matcher_options.min_priority);
        assert_eq!(1000, config.matcher_options.size_threshold);
    }
}
