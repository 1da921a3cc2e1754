//! 评分平台客户端
//!
//! 把会话、登录、作业、提纲几个能力组合在一起，供上传流程使用

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{HtmlTokenSource, HttpSession, TokenSource};
use crate::models::assignment::{AssignmentId, CreationOutcome};
use crate::models::credentials::Credentials;
use crate::models::outline::OutlineDocument;
use crate::workflow::GradingPlatform;
use std::path::Path;
use std::time::Duration;

use super::assignment_registry::AssignmentRegistry;
use super::authenticator::SessionAuthenticator;
use super::outline_submitter::OutlineSubmitter;

/// 评分平台客户端
///
/// 唯一持有会话的对象，会话在一次运行内依次传给各个服务。
pub struct PlatformClient<T: TokenSource = HtmlTokenSource> {
    session: HttpSession,
    authenticator: SessionAuthenticator<T>,
    registry: AssignmentRegistry,
    submitter: OutlineSubmitter,
}

impl PlatformClient<HtmlTokenSource> {
    /// 按配置创建客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let session = HttpSession::new(
            &config.base_url,
            Duration::from_millis(config.pacing_ms),
        )?;
        Ok(Self::with_parts(
            session,
            HtmlTokenSource::new(),
            &config.course_id,
        ))
    }
}

impl<T: TokenSource> PlatformClient<T> {
    /// 使用自定义的令牌提取策略
    pub fn with_parts(session: HttpSession, tokens: T, course_id: &str) -> Self {
        Self {
            session,
            authenticator: SessionAuthenticator::new(tokens),
            registry: AssignmentRegistry::new(course_id),
            submitter: OutlineSubmitter::new(course_id),
        }
    }

    /// 底层会话
    pub fn session(&self) -> &HttpSession {
        &self.session
    }
}

impl<T: TokenSource> GradingPlatform for PlatformClient<T> {
    async fn login(&mut self, credentials: &Credentials) -> AppResult<()> {
        self.authenticator.login(&self.session, credentials).await
    }

    async fn find_assignment(&mut self, title: &str) -> AppResult<Option<AssignmentId>> {
        let found = self
            .registry
            .find_by_title(&self.session, &self.authenticator, title)
            .await?;
        Ok(found.map(|assignment| assignment.id))
    }

    async fn delete_assignment(&mut self, id: &AssignmentId) -> AppResult<()> {
        self.registry
            .delete(&self.session, &self.authenticator, id)
            .await
    }

    async fn create_assignment(&mut self, title: &str, template: &Path) -> AppResult<CreationOutcome> {
        self.registry
            .create(&self.session, &self.authenticator, title, template)
            .await
    }

    async fn submit_outline(&mut self, id: &AssignmentId, outline: &OutlineDocument) -> AppResult<()> {
        self.submitter
            .submit(&self.session, &self.authenticator, id, outline)
            .await
    }
}
