use thiserror::Error;

use crate::models::position::SpecialKind;

/// 应用程序错误类型
///
/// 所有错误都是致命的：向上传播并终止本次运行，没有重试也没有回滚。
#[derive(Debug, Error)]
pub enum AppError {
    /// 坐标文件格式错误（字段数、origin、类型、数值）
    #[error("坐标文件格式错误 (第 {line} 行): {message}")]
    Format { line: usize, message: String },

    /// 题目索引超出题目目录范围
    #[error("坐标文件第 {line} 行的题目索引 {index} 超出范围 [0, {len})")]
    Range { line: usize, index: i64, len: usize },

    /// 同一题目的同一小题出现在不同页面
    #[error("题目 {question} (小题 '{part}') 的框跨越了多个页面: 第 {first_page} 页与第 {page} 页")]
    CrossPage {
        question: usize,
        part: String,
        first_page: u32,
        page: u32,
    },

    /// 特殊区域（姓名、学号等）重复出现
    #[error("发现多个 {kind} 区域框")]
    DuplicateRegion { kind: SpecialKind },

    /// 配置或凭据错误
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 外部编译器返回非零状态
    #[error("文档编译失败 (状态: {status}). Stdout: '{stdout}', Stderr: '{stderr}'")]
    Compile {
        status: String,
        stdout: String,
        stderr: String,
    },

    /// 页面中没有找到恰好一个目标元素
    #[error("未能在页面中找到恰好一个 {target}，实际找到 {found} 个")]
    TokenScrape { target: String, found: usize },

    /// 远程平台返回非成功状态码
    #[error("HTTP 请求失败: {method} {url} -> {status}")]
    Http {
        method: String,
        url: String,
        status: u16,
    },

    /// 网络层错误
    #[error("网络请求失败 ({url}): {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// URL 拼接失败
    #[error("无效的 URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    /// 登录被拒绝
    #[error("登录失败: {0}")]
    Authentication(String),

    /// 作业创建后无法取得新作业 ID
    #[error("创建作业 '{title}' 失败: {reason}")]
    Creation { title: String, reason: String },

    /// 上传状态机收到了不可能的事件
    #[error("上传流程状态错误: {0}")]
    Workflow(String),

    /// JSON 解析失败
    #[error("JSON 解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建坐标文件格式错误
    pub fn format(line: usize, message: impl Into<String>) -> Self {
        AppError::Format {
            line,
            message: message.into(),
        }
    }

    /// 创建网络层错误
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Transport {
            url: url.into(),
            source,
        }
    }

    /// 创建文件操作错误
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
