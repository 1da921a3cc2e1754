//! 登录服务 - 业务能力层
//!
//! 负责"取令牌"和"登录"两种能力

use crate::error::{AppError, AppResult};
use crate::infrastructure::{HttpSession, Pacing, TokenSelector, TokenSource};
use crate::models::credentials::Credentials;
use reqwest::Method;
use tracing::{debug, warn};

use super::routes;

/// 登录服务
///
/// 职责：
/// - 打开页面并从中提取防伪令牌 / CSRF 令牌
/// - 完成登录握手
/// - 不持有会话，会话由调用方传入
pub struct SessionAuthenticator<T: TokenSource> {
    tokens: T,
}

impl<T: TokenSource> SessionAuthenticator<T> {
    pub fn new(tokens: T) -> Self {
        Self { tokens }
    }

    /// 令牌提取策略
    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    /// 从已取得的页面内容中提取恰好一个令牌
    pub fn scrape_token(&self, html: &str, selector: &TokenSelector) -> AppResult<String> {
        self.tokens.extract_one(html, selector)
    }

    /// 打开页面，取指定表单里的 `authenticity_token`
    pub async fn fetch_form_token(
        &self,
        session: &HttpSession,
        path: &str,
        action: &str,
    ) -> AppResult<String> {
        let page = session.get_page(path).await?;
        self.scrape_token(&page.body, &TokenSelector::form_token(action))
    }

    /// 打开页面，取 `<meta name="csrf-token">`
    pub async fn fetch_csrf_token(&self, session: &HttpSession, path: &str) -> AppResult<String> {
        let page = session.get_page(path).await?;
        self.scrape_token(&page.body, &TokenSelector::csrf_meta())
    }

    /// 登录
    ///
    /// 先从首页的登录表单取令牌，再连同凭据一起提交。
    /// 登录成功时平台会重定向；原地返回登录页说明凭据被拒绝。
    pub async fn login(&self, session: &HttpSession, credentials: &Credentials) -> AppResult<()> {
        let token = self
            .fetch_form_token(session, routes::HOME, routes::LOGIN)
            .await?;
        debug!("已取得登录令牌");

        let form = login_form(credentials, &token);
        let request = session.request(Method::POST, routes::LOGIN)?.form(&form[..]);
        let exchange = session.send(request, Pacing::Throttle).await?;

        if exchange.history.is_empty() {
            warn!("登录请求没有发生重定向: {}", exchange.response.url);
            return Err(AppError::Authentication(format!(
                "平台没有接受账号 {} 的登录",
                credentials.email
            )));
        }

        Ok(())
    }
}

/// 登录表单字段
fn login_form<'a>(credentials: &'a Credentials, token: &'a str) -> [(&'static str, &'a str); 7] {
    [
        ("utf8", "✓"),
        ("session[email]", credentials.email.as_str()),
        ("session[password]", credentials.password.as_str()),
        ("session[remember_me]", "0"),
        ("commit", "Log In"),
        ("session[remember_me_sso]", "0"),
        ("authenticity_token", token),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::HtmlTokenSource;

    #[test]
    fn test_login_form_carries_token_and_credentials() {
        let credentials = Credentials {
            email: "prof@example.edu".to_string(),
            password: "hunter2".to_string(),
        };
        let form = login_form(&credentials, "tok");

        assert!(form.contains(&("session[email]", "prof@example.edu")));
        assert!(form.contains(&("session[password]", "hunter2")));
        assert!(form.contains(&("authenticity_token", "tok")));
    }

    #[test]
    fn test_scrape_token_uses_login_form() {
        let auth = SessionAuthenticator::new(HtmlTokenSource::new());
        let html = r#"<form action="/login"><input name="authenticity_token" value="abc"></form>"#;

        assert_eq!(
            auth.scrape_token(html, &TokenSelector::form_token(routes::LOGIN))
                .unwrap(),
            "abc"
        );
    }
}
