//! 外部文档编译器
//!
//! 编译本身是黑盒：只看退出码，失败时原样带上输出。

use crate::error::{AppError, AppResult};
use std::path::Path;
use tokio::process::Command;
use tracing::{debug, info};

/// 用 `bash <script> <source>` 编译试卷源文件
pub async fn compile_document(script: &Path, source: &Path) -> AppResult<()> {
    info!("📄 正在编译试卷: {}", source.display());
    debug!("编译脚本: {}", script.display());

    let output = Command::new("bash")
        .arg(script)
        .arg(source)
        .output()
        .await
        .map_err(|e| AppError::io(script.display().to_string(), e))?;

    if !output.status.success() {
        return Err(AppError::Compile {
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    info!("✓ 编译完成");
    Ok(())
}
