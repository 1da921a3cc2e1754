use crate::error::{AppError, AppResult};
use crate::models::credentials::Credentials;
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 凭据文件的原始结构，两个键都是必需的
#[derive(Debug, Deserialize)]
struct SecretsFile {
    email: Option<String>,
    pass: Option<String>,
}

/// 从 JSON 凭据文件加载登录信息
///
/// 文件不存在、无法解析、或缺少 `email` / `pass` 键都视为配置错误。
pub async fn load_credentials(secrets_path: &Path) -> AppResult<Credentials> {
    if !secrets_path.is_file() {
        return Err(AppError::Configuration(format!(
            "凭据文件 '{}' 不存在或不是文件",
            secrets_path.display()
        )));
    }

    let content = fs::read_to_string(secrets_path)
        .await
        .map_err(|e| AppError::io(secrets_path.display().to_string(), e))?;

    parse_credentials(&content)
}

/// 解析凭据 JSON 文本
pub fn parse_credentials(content: &str) -> AppResult<Credentials> {
    let secrets: SecretsFile = serde_json::from_str(content)
        .map_err(|e| AppError::Configuration(format!("凭据文件不是有效的 JSON: {}", e)))?;

    let email = required_key(secrets.email, "email")?;
    let password = required_key(secrets.pass, "pass")?;

    Ok(Credentials { email, password })
}

fn required_key(value: Option<String>, key: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Configuration(format!("凭据文件缺少键 '{}'", key))),
    }
}
