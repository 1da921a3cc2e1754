//! 作业服务 - 业务能力层
//!
//! 只提供对远程作业的查找 / 删除 / 创建，是否跳过或替换由流程层决定

use crate::error::{AppError, AppResult};
use crate::infrastructure::{Exchange, HttpSession, Pacing, TokenSelector, TokenSource};
use crate::models::assignment::{AssignmentId, CreationOutcome, RemoteAssignment};
use regex::Regex;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use super::authenticator::SessionAuthenticator;
use super::routes;

/// 作业列表的 React 组件名
pub const ASSIGNMENTS_TABLE: &str = "AssignmentsTable";

/// 作业列表中"作业行"的 className
pub const ASSIGNMENT_ROW_CLASS: &str = "js-assignmentTableAssignmentRow";

/// 行的结构因类型而异（标题行、分组行、作业行），先按 className 过滤再取字段
#[derive(Debug, Deserialize)]
struct AssignmentsTableProps {
    #[serde(default)]
    table_data: Vec<Value>,
}

/// 作业服务
pub struct AssignmentRegistry {
    course_id: String,
}

impl AssignmentRegistry {
    pub fn new(course_id: impl Into<String>) -> Self {
        Self {
            course_id: course_id.into(),
        }
    }

    /// 按标题查找作业（两边都去掉首尾空白后精确匹配）
    pub async fn find_by_title<T: TokenSource>(
        &self,
        session: &HttpSession,
        auth: &SessionAuthenticator<T>,
        title: &str,
    ) -> AppResult<Option<RemoteAssignment>> {
        let page = session
            .get_page(&routes::assignments(&self.course_id))
            .await?;

        let listing = parse_assignment_listing(auth.tokens(), &page.body)?;
        debug!("作业列表中共有 {} 个作业", listing.len());

        Ok(find_in_listing(listing, title))
    }

    /// 删除作业
    pub async fn delete<T: TokenSource>(
        &self,
        session: &HttpSession,
        auth: &SessionAuthenticator<T>,
        id: &AssignmentId,
    ) -> AppResult<()> {
        let token = auth
            .fetch_csrf_token(session, &routes::assignment_edit(&self.course_id, id))
            .await?;

        let form = [("_method", "delete"), ("authenticity_token", token.as_str())];
        let request = session
            .request(Method::POST, &routes::assignment(&self.course_id, id))?
            .form(&form[..]);
        session.send(request, Pacing::Throttle).await?;

        Ok(())
    }

    /// 创建作业并上传模板文件
    ///
    /// 平台不会直接返回新作业 ID，只能从第一个重定向响应的正文里找提纲编辑页的路径。
    pub async fn create<T: TokenSource>(
        &self,
        session: &HttpSession,
        auth: &SessionAuthenticator<T>,
        title: &str,
        template: &Path,
    ) -> AppResult<CreationOutcome> {
        let token = auth
            .fetch_csrf_token(session, &routes::new_assignment(&self.course_id))
            .await?;

        let bytes = tokio::fs::read(template)
            .await
            .map_err(|e| AppError::io(template.display().to_string(), e))?;
        let file_name = template
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "template.pdf".to_string());
        let url = session.url(&routes::assignments(&self.course_id))?;

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")
            .map_err(|e| AppError::transport(url.as_str(), e))?;

        let form = Form::new()
            .text("authenticity_token", token)
            .text("assignment[title]", title.to_string())
            .text("assignment[submissions_anonymized]", "0")
            .text("assignment[student_submission]", "false")
            .text("assignment[when_to_create_rubric]", "while_grading")
            .part("template_pdf", part);

        let request = session
            .request(Method::POST, &routes::assignments(&self.course_id))?
            .multipart(form);
        let exchange = session.send(request, Pacing::Throttle).await?;

        Ok(recover_assignment_id(&exchange))
    }
}

/// 从作业列表页面中解析所有作业行
///
/// 页面中必须恰好有一个作业列表数据块，否则直接报错，不看其中内容。
pub fn parse_assignment_listing<T: TokenSource>(
    tokens: &T,
    html: &str,
) -> AppResult<Vec<RemoteAssignment>> {
    let props = tokens.extract_one(html, &TokenSelector::react_props(ASSIGNMENTS_TABLE))?;
    let table: AssignmentsTableProps = serde_json::from_str(&props)?;

    Ok(table
        .table_data
        .into_iter()
        .filter(|row| row.get("className").and_then(Value::as_str) == Some(ASSIGNMENT_ROW_CLASS))
        .filter_map(|row| {
            let id = row.get("id").and_then(Value::as_str)?.trim();
            let id = id.strip_prefix("assignment_").unwrap_or(id);
            let title = row.get("title").and_then(Value::as_str).unwrap_or_default();
            Some(RemoteAssignment {
                id: AssignmentId::new(id),
                title: title.trim().to_string(),
            })
        })
        .collect())
}

/// 精确匹配标题（去掉首尾空白）
pub fn find_in_listing(listing: Vec<RemoteAssignment>, title: &str) -> Option<RemoteAssignment> {
    let title = title.trim();
    listing.into_iter().find(|assignment| assignment.title == title)
}

fn outline_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/assignments/(\d+)/outline/edit").unwrap())
}

/// 从创建请求的重定向历史中找回新作业 ID
pub fn recover_assignment_id(exchange: &Exchange) -> CreationOutcome {
    let Some(first) = exchange.history.first() else {
        return CreationOutcome::AmbiguousTitle;
    };

    match outline_path_regex().captures(&first.body) {
        Some(cap) => CreationOutcome::Created(AssignmentId::new(&cap[1])),
        None => CreationOutcome::Unrecognized {
            body: first.body.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{FetchedPage, HtmlTokenSource};
    use pretty_assertions::assert_eq;
    use reqwest::{StatusCode, Url};

    fn listing_html(rows: &str) -> String {
        let props = format!(r#"{{"table_data":[{}]}}"#, rows).replace('"', "&quot;");
        format!(
            r#"<div class="table"><div data-react-class="AssignmentsTable" data-react-props="{}"></div></div>"#,
            props
        )
    }

    fn page(status: u16, body: &str) -> FetchedPage {
        FetchedPage {
            url: Url::parse("https://www.gradescope.com/courses/1/assignments").unwrap(),
            status: StatusCode::from_u16(status).unwrap(),
            location: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_listing_keeps_only_assignment_rows() {
        let html = listing_html(
            r#"{"className":"js-assignmentTableAssignmentRow","id":"assignment_101","title":" Quiz 1 "},
               {"className":"js-assignmentTableHeaderRow","title":"Quiz 2"},
               {"className":"js-assignmentTableAssignmentRow","id":"assignment_202","title":"Quiz 2"}"#,
        );

        let listing = parse_assignment_listing(&HtmlTokenSource::new(), &html).unwrap();

        assert_eq!(
            listing,
            vec![
                RemoteAssignment {
                    id: AssignmentId::new("101"),
                    title: "Quiz 1".to_string(),
                },
                RemoteAssignment {
                    id: AssignmentId::new("202"),
                    title: "Quiz 2".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_non_assignment_rows_may_have_any_shape() {
        let html = listing_html(
            r#"{"className":"js-assignmentTableGroupRow","id":7,"title":{"text":"Week 1"}},
               {"className":"js-assignmentTableHeaderRow","id":null,"title":["Name","Due"]},
               {"className":"js-assignmentTableAssignmentRow","id":"assignment_303","title":"Quiz 3"}"#,
        );

        let listing = parse_assignment_listing(&HtmlTokenSource::new(), &html).unwrap();

        assert_eq!(
            listing,
            vec![RemoteAssignment {
                id: AssignmentId::new("303"),
                title: "Quiz 3".to_string(),
            }]
        );
    }

    #[test]
    fn test_find_uses_trimmed_exact_title() {
        let listing = vec![
            RemoteAssignment {
                id: AssignmentId::new("1"),
                title: "Test - Upload (old)".to_string(),
            },
            RemoteAssignment {
                id: AssignmentId::new("2"),
                title: "Test - Upload".to_string(),
            },
        ];

        let found = find_in_listing(listing.clone(), "  Test - Upload ").unwrap();
        assert_eq!(found.id, AssignmentId::new("2"));
        assert!(find_in_listing(listing, "test - upload").is_none());
    }

    #[test]
    fn test_two_payload_blocks_fail_before_rows_are_read() {
        // 第二个数据块不是合法 JSON，如果先解析内容会得到 Json 错误
        let html = format!(
            "{}{}",
            listing_html(r#"{"className":"js-assignmentTableAssignmentRow","id":"assignment_1","title":"Quiz"}"#),
            r#"<div data-react-class="AssignmentsTable" data-react-props="not json"></div>"#
        );

        match parse_assignment_listing(&HtmlTokenSource::new(), &html) {
            Err(AppError::TokenScrape { found, .. }) => assert_eq!(found, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_recover_id_from_first_redirect_body() {
        let exchange = Exchange {
            history: vec![
                page(
                    302,
                    r#"<html><body>You are being <a href="https://www.gradescope.com/courses/1/assignments/98765/outline/edit">redirected</a>.</body></html>"#,
                ),
                page(302, "/assignments/11111/outline/edit"),
            ],
            response: page(200, "<html></html>"),
        };

        assert_eq!(
            recover_assignment_id(&exchange),
            CreationOutcome::Created(AssignmentId::new("98765"))
        );
    }

    #[test]
    fn test_no_redirect_means_ambiguous_title() {
        let exchange = Exchange {
            history: Vec::new(),
            response: page(200, "<form>Title has already been taken</form>"),
        };
        assert_eq!(recover_assignment_id(&exchange), CreationOutcome::AmbiguousTitle);
    }

    #[test]
    fn test_unexpected_redirect_body_is_unrecognized() {
        let exchange = Exchange {
            history: vec![page(302, "<a href=\"/courses/1\">redirected</a>")],
            response: page(200, ""),
        };
        assert!(matches!(
            recover_assignment_id(&exchange),
            CreationOutcome::Unrecognized { .. }
        ));
    }
}
