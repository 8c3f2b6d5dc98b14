//! tree-diff - 树差异分析工具
//!
//! 基于 Tree-sitter 的源码树差异工具：解析两个文件、匹配节点、
//! 生成并打印编辑脚本。

mod cli;

use cli::{Cli, Config};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use tree_diff_core::{ActionFormatter, Diff, Result, SimplifiedChawatheScriptGenerator};

fn main() {
    // 解析命令行参数
    let cli = Cli::parse_args();

    // 初始化日志记录，-v 把默认级别提到 debug
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 验证参数
    if let Err(e) = cli.validate() {
        error!("Invalid arguments: {}", e);
        std::process::exit(1);
    }

    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid arguments: {}", e);
            std::process::exit(1);
        }
    };

    if config.verbose {
        debug!(
            "Configuration: src={}, dst={}, matcher={:?}, format={:?}",
            config.src_file.display(),
            config.dst_file.display(),
            config.matcher,
            config.output_format
        );
    }

    // 运行主要逻辑
    if let Err(e) = run(config) {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

/// 主要应用逻辑
fn run(config: Config) -> Result<()> {
    info!(
        "Comparing {} and {}",
        config.src_file.display(),
        config.dst_file.display()
    );

    let diff = Diff::compute_from_files(
        &config.src_file,
        &config.dst_file,
        config.generator,
        config.matcher,
        &config.matcher_options,
    )?;

    let script = if config.simplify {
        SimplifiedChawatheScriptGenerator::new().compute_actions(
            &diff.src,
            &diff.dst,
            &diff.mappings,
        )?
    } else {
        diff.edit_script
    };

    let formatter = ActionFormatter::new(&diff.src, &diff.dst);
    let rendered = formatter.format(&script, config.output_format)?;
    print!("{rendered}");

    Ok(())
}
