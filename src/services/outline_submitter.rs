//! 提纲提交服务 - 业务能力层

use crate::error::AppResult;
use crate::infrastructure::{HttpSession, Pacing, TokenSource};
use crate::models::assignment::AssignmentId;
use crate::models::outline::OutlineDocument;
use reqwest::Method;
use tracing::debug;

use super::authenticator::SessionAuthenticator;
use super::routes;

/// CSRF 令牌请求头
pub const CSRF_HEADER: &str = "x-csrf-token";

/// 提纲提交服务
pub struct OutlineSubmitter {
    course_id: String,
}

impl OutlineSubmitter {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
        }
    }

    /// 提交提纲
    ///
    /// 从提纲编辑页取 CSRF 令牌，放在请求头里 PATCH 紧凑 JSON。这是一次运行的最后一个请求。
    pub async fn submit<T: TokenSource>(
        &self,
        session: &HttpSession,
        auth: &SessionAuthenticator<T>,
        id: &AssignmentId,
        outline: &OutlineDocument,
    ) -> AppResult<()> {
        let token = auth
            .fetch_csrf_token(session, &routes::outline_edit(&self.course_id, id))
            .await?;

        debug!("提交提纲: {} 道题", outline.question_count());
        let request = session
            .request(Method::PATCH, &routes::outline(&self.course_id, id))?
            .header(CSRF_HEADER, token)
            .json(outline);
        session.send(request, Pacing::Final).await?;

        Ok(())
    }
}
