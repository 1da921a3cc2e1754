/// 日志工具模块
///
/// 提供日志初始化和里程碑输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::workflow::{Resolution, UploadState};

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，详细模式下为 `debug`。
/// 重复调用不会报错（测试中可能多次初始化）。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 程序启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📚 课程: {}", config.course_id);
    info!("📝 作业: {}", config.assignment_title);
    if config.force_replace {
        info!("♻️ 同名作业将被删除重建");
    }
    info!("{}", "=".repeat(60));
}

/// 记录坐标解析和提纲构建信息
///
/// # 参数
/// - `records`: 坐标记录数
/// - `questions`: 提纲顶层题目数
pub fn log_outline_built(records: usize, questions: usize) {
    info!("✓ 解析了 {} 条坐标记录", records);
    info!("✓ 提纲已生成，共 {} 道题", questions);
}

/// 打印最终结果
///
/// # 参数
/// - `state`: 上传流程的终止状态
/// - `title`: 作业标题
pub fn print_final_summary(state: &UploadState, title: &str) {
    info!("\n{}", "=".repeat(60));
    info!(
        "📊 运行结束 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    match state {
        UploadState::Submitted { id, replaced } => {
            info!("✅ 作业 \"{}\" 已上传 (ID: {})", title, id);
            if let Some(previous) = replaced {
                info!("♻️ 替换了旧作业 {}", previous);
            }
        }
        UploadState::Resolved(Resolution::Skip { existing }) => {
            info!("⏭️ 作业 \"{}\" 已存在 (ID: {})，未做改动", title, existing);
        }
        other => info!("流程停在 {:?}", other),
    }
    info!("{}", "=".repeat(60));
}
