use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::geometry::{accumulate, load_positions};
use crate::infrastructure::compile_document;
use crate::models::catalog::QuestionCatalog;
use crate::models::credentials::Credentials;
use crate::models::outline::OutlineDocument;
use crate::models::{load_credentials, load_question_catalog};
use crate::outline::build_outline;
use crate::services::PlatformClient;
use crate::utils::logging;
use crate::workflow::{UploadOrchestrator, UploadState};

/// 应用主结构
pub struct App {
    config: Config,
    credentials: Credentials,
    catalog: QuestionCatalog,
}

impl App {
    /// 初始化应用
    ///
    /// 凭据最先检查，缺失时不会触发编译。
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置不完整")?;
        logging::log_startup(&config);

        let credentials = load_credentials(&config.secrets_path)
            .await
            .context("读取凭据失败")?;
        let catalog = load_question_catalog(&config.exam_config_path)
            .await
            .context("读取题目目录失败")?;

        Ok(Self {
            config,
            credentials,
            catalog,
        })
    }

    /// 运行应用主逻辑：编译 → 生成提纲 → 上传
    pub async fn run(&self) -> Result<UploadState> {
        compile_document(&self.config.compile_script, &self.config.source_path)
            .await
            .context("编译试卷失败")?;

        let outline = outline_from_positions(&self.config.position_path, &self.catalog)
            .await
            .with_context(|| {
                format!(
                    "无法从坐标文件 {} 生成提纲",
                    self.config.position_path.display()
                )
            })?;
        self.dump_outline(&outline).await?;

        let platform = PlatformClient::new(&self.config).context("创建平台客户端失败")?;
        let mut orchestrator = UploadOrchestrator::new(platform, self.config.replace_policy());
        let state = orchestrator
            .run(
                &self.credentials,
                &self.config.assignment_title,
                &self.config.template_path,
                &outline,
            )
            .await
            .with_context(|| format!("上传作业 \"{}\" 失败", self.config.assignment_title))?;

        logging::print_final_summary(&state, &self.config.assignment_title);
        Ok(state)
    }

    /// 记录提纲 JSON，按配置写入文件
    async fn dump_outline(&self, outline: &OutlineDocument) -> Result<()> {
        let pretty = serde_json::to_string_pretty(outline)?;
        debug!("提纲内容:\n{}", pretty);

        if let Some(path) = &self.config.outline_output_file {
            tokio::fs::write(path, &pretty)
                .await
                .with_context(|| format!("写入提纲文件 {} 失败", path.display()))?;
            info!("💾 提纲已保存至: {}", path.display());
        }

        Ok(())
    }
}

/// 读取坐标文件并生成提纲
///
/// # 参数
/// - `position_path`: 编译器输出的坐标文件
/// - `catalog`: 题目目录
pub async fn outline_from_positions(
    position_path: &Path,
    catalog: &QuestionCatalog,
) -> Result<OutlineDocument> {
    let records = load_positions(position_path, catalog.len()).await?;
    let boxes = accumulate(&records)?;
    let outline = build_outline(&boxes, catalog)?;

    logging::log_outline_built(records.len(), outline.question_count());
    Ok(outline)
}
