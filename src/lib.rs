//! # Exam Outline Upload
//!
//! 把试卷编译得到的坐标文件转换为评分平台的提纲，并上传到平台
//!
//! ## 架构设计
//!
//! ### ① 数据与几何（Models / Geometry / Outline）
//! - `models/` - 坐标记录、框、题目目录、提纲文档，以及 TOML / JSON 加载器
//! - `geometry/` - 坐标文件解析 → 页面相对框 → 按小题合并
//! - `outline/` - 合并后的框 + 题目目录 → 提纲文档
//!
//! ### ② 基础设施层（Infrastructure）
//! - `HttpSession` - 唯一的 Cookie 会话，自己跟随重定向并记录历史
//! - `TokenSource` - 从页面中提取令牌的能力
//! - `compile_document` - 调用外部编译脚本
//!
//! ### ③ 业务能力层（Services）
//! - `SessionAuthenticator` - 取令牌、登录
//! - `AssignmentRegistry` - 查找 / 删除 / 创建作业
//! - `OutlineSubmitter` - 提交提纲
//! - `PlatformClient` - 组合以上能力，实现 `GradingPlatform`
//!
//! ### ④ 流程层（Workflow）
//! - `upload_state` - 纯函数状态机
//! - `UploadOrchestrator` - 按状态机驱动平台调用
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod geometry;
pub mod infrastructure;
pub mod models;
pub mod outline;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{outline_from_positions, App};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{BoundingBox, OutlineDocument, QuestionCatalog};
pub use services::PlatformClient;
pub use workflow::{GradingPlatform, ReplacePolicy, UploadOrchestrator, UploadState};
