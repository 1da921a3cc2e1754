//! HTTP 会话 - 基础设施层
//!
//! 持有唯一的 Cookie 会话，只暴露"发请求"的能力

use crate::error::{AppError, AppResult};
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// 最多跟随的重定向次数
const MAX_REDIRECTS: usize = 10;

/// 一次响应（状态码、URL、重定向目标、正文）
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// 一次完整的请求交换
///
/// `history` 是按顺序经过的重定向响应，`response` 是最终响应。
#[derive(Debug, Clone)]
pub struct Exchange {
    pub history: Vec<FetchedPage>,
    pub response: FetchedPage,
}

/// 请求结束后是否等待
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// 请求后固定等待，照顾平台的访问频率限制
    Throttle,
    /// 本次运行的最后一个请求，不需要等待
    Final,
}

/// HTTP 会话
///
/// 职责：
/// - 持有 Cookie 会话（登录状态）
/// - 自己跟随重定向并记录历史
/// - 每次请求后固定等待
/// - 不认识作业 / 提纲
pub struct HttpSession {
    client: Client,
    base_url: Url,
    pacing: Duration,
    pauses: AtomicUsize,
}

impl HttpSession {
    /// 创建新的会话
    ///
    /// # 参数
    /// - `base_url`: 平台根地址
    /// - `pacing`: 每次请求后的等待时间
    pub fn new(base_url: &str, pacing: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| AppError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .map_err(|e| AppError::transport(base_url.as_str(), e))?;

        Ok(Self {
            client,
            base_url,
            pacing,
            pauses: AtomicUsize::new(0),
        })
    }

    /// 拼接平台上的路径
    pub fn url(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|e| AppError::InvalidUrl {
            url: path.to_string(),
            message: e.to_string(),
        })
    }

    /// 构建请求
    pub fn request(&self, method: Method, path: &str) -> AppResult<RequestBuilder> {
        let url = self.url(path)?;
        Ok(self.client.request(method, url))
    }

    /// GET 一个页面并返回最终响应
    pub async fn get_page(&self, path: &str) -> AppResult<FetchedPage> {
        let exchange = self.send(self.request(Method::GET, path)?, Pacing::Throttle).await?;
        Ok(exchange.response)
    }

    /// 发送请求，跟随重定向，最终状态码非成功时报错
    ///
    /// 无论成功与否，都会在返回前等待（`Pacing::Final` 除外）。
    pub async fn send(&self, request: RequestBuilder, pacing: Pacing) -> AppResult<Exchange> {
        let result = self.follow(request).await;

        if pacing == Pacing::Throttle {
            self.pause().await;
        }

        result
    }

    /// 固定等待
    pub async fn pause(&self) {
        let count = self.pauses.fetch_add(1, Ordering::Relaxed) + 1;
        debug!("第 {} 次等待 {} ms", count, self.pacing.as_millis());
        sleep(self.pacing).await;
    }

    /// 本会话已经等待的次数
    pub fn pause_count(&self) -> usize {
        self.pauses.load(Ordering::Relaxed)
    }

    /// 301/302/303 改为 GET 重新请求；307/308 保留方法和请求体，
    /// 请求体无法复制时（如 multipart 流）报错
    async fn follow(&self, request: RequestBuilder) -> AppResult<Exchange> {
        let (client, request) = request.build_split();
        let request = request.map_err(|e| AppError::transport(self.base_url.as_str(), e))?;
        let replay = request.try_clone();
        let method = request.method().clone();
        let url = request.url().clone();

        debug!("{} {}", method, url);
        let response = client
            .execute(request)
            .await
            .map_err(|e| AppError::transport(url.as_str(), e))?;
        let mut current = read_page(response).await?;
        check_status(&method, &current)?;

        let mut history = Vec::new();
        while current.status.is_redirection() {
            if history.len() >= MAX_REDIRECTS {
                return Err(AppError::Http {
                    method: method.to_string(),
                    url: current.url.to_string(),
                    status: current.status.as_u16(),
                });
            }

            let next_url = match redirect_target(&current)? {
                Some(url) => url,
                None => break,
            };

            let next = if keeps_method(current.status) {
                let mut next = replay
                    .as_ref()
                    .and_then(|original| original.try_clone())
                    .ok_or_else(|| AppError::Http {
                        method: method.to_string(),
                        url: current.url.to_string(),
                        status: current.status.as_u16(),
                    })?;
                *next.url_mut() = next_url.clone();
                next
            } else {
                self.client
                    .get(next_url.clone())
                    .build()
                    .map_err(|e| AppError::transport(next_url.as_str(), e))?
            };
            let next_method = next.method().clone();

            debug!("重定向 {} -> {} {}", current.url, next_method, next_url);
            let response = self
                .client
                .execute(next)
                .await
                .map_err(|e| AppError::transport(next_url.as_str(), e))?;

            history.push(current);
            current = read_page(response).await?;
            check_status(&next_method, &current)?;
        }

        // 没有 Location 的 3xx 也算失败
        if !current.status.is_success() {
            return Err(AppError::Http {
                method: method.to_string(),
                url: current.url.to_string(),
                status: current.status.as_u16(),
            });
        }

        Ok(Exchange {
            history,
            response: current,
        })
    }
}

async fn read_page(response: reqwest::Response) -> AppResult<FetchedPage> {
    let url = response.url().clone();
    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response
        .text()
        .await
        .map_err(|e| AppError::transport(url.as_str(), e))?;

    Ok(FetchedPage {
        url,
        status,
        location,
        body,
    })
}

/// 4xx / 5xx 直接报错，带上请求方法
fn check_status(method: &Method, page: &FetchedPage) -> AppResult<()> {
    if page.status.is_client_error() || page.status.is_server_error() {
        return Err(AppError::Http {
            method: method.to_string(),
            url: page.url.to_string(),
            status: page.status.as_u16(),
        });
    }
    Ok(())
}

/// 307/308 要求以原方法和原请求体重新请求
fn keeps_method(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT
    )
}

/// 解析 `Location` 头，相对地址按当前 URL 拼接
fn redirect_target(page: &FetchedPage) -> AppResult<Option<Url>> {
    let Some(location) = page.location.as_deref() else {
        return Ok(None);
    };

    page.url
        .join(location)
        .map(Some)
        .map_err(|e| AppError::InvalidUrl {
            url: location.to_string(),
            message: e.to_string(),
        })
}
