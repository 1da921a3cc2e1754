//! 页面令牌提取 - 基础设施层
//!
//! 平台没有 API，防伪令牌、CSRF 令牌和作业列表数据都只能从渲染出的 HTML 里取。
//! 提取策略藏在 `TokenSource` 后面，流程代码不关心具体怎么取。

use crate::error::{AppError, AppResult};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// 要提取的目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSelector {
    /// `form[action=...] input[name=...]` 的 `value`，`action` 为空时匹配所有表单
    FormInput {
        action: Option<String>,
        input_name: String,
    },
    /// `meta[name=...]` 的 `content`
    MetaContent { name: String },
    /// `tag[match_attr=match_value]` 的另一个属性
    ElementAttribute {
        tag: String,
        match_attr: String,
        match_value: String,
        attribute: String,
    },
}

impl TokenSelector {
    /// 指定 action 的表单中的 `authenticity_token`
    pub fn form_token(action: &str) -> Self {
        TokenSelector::FormInput {
            action: Some(action.to_string()),
            input_name: "authenticity_token".to_string(),
        }
    }

    /// 页面头部的 `<meta name="csrf-token">`
    pub fn csrf_meta() -> Self {
        TokenSelector::MetaContent {
            name: "csrf-token".to_string(),
        }
    }

    /// React 组件挂载点上的 `data-react-props`
    pub fn react_props(component: &str) -> Self {
        TokenSelector::ElementAttribute {
            tag: "div".to_string(),
            match_attr: "data-react-class".to_string(),
            match_value: component.to_string(),
            attribute: "data-react-props".to_string(),
        }
    }
}

impl fmt::Display for TokenSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSelector::FormInput {
                action: Some(action),
                input_name,
            } => write!(f, "form[action=\"{}\"] input[name=\"{}\"]", action, input_name),
            TokenSelector::FormInput {
                action: None,
                input_name,
            } => write!(f, "form input[name=\"{}\"]", input_name),
            TokenSelector::MetaContent { name } => write!(f, "meta[name=\"{}\"]", name),
            TokenSelector::ElementAttribute {
                tag,
                match_attr,
                match_value,
                ..
            } => write!(f, "{}[{}=\"{}\"]", tag, match_attr, match_value),
        }
    }
}

/// 令牌提取能力
pub trait TokenSource {
    /// 从页面中提取恰好一个目标值，找不到或找到多个都报错
    fn extract_one(&self, content: &str, selector: &TokenSelector) -> AppResult<String>;
}

/// 基于正则的 HTML 提取
///
/// 只认识开始标签和属性，足够应付平台的表单、meta 和 React 挂载点。
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlTokenSource;

impl HtmlTokenSource {
    pub fn new() -> Self {
        Self
    }

    /// 收集所有匹配的值（已做 HTML 实体解码）
    pub fn extract_all(&self, content: &str, selector: &TokenSelector) -> Vec<Option<String>> {
        match selector {
            TokenSelector::FormInput { action, input_name } => {
                let mut values = Vec::new();
                for form in find_tags(content, "form") {
                    if let Some(action) = action {
                        if form.attr("action") != Some(action.as_str()) {
                            continue;
                        }
                    }

                    let body = &content[form.end..form_end(content, form.end)];
                    values.extend(
                        find_tags(body, "input")
                            .into_iter()
                            .filter(|input| input.attr("name") == Some(input_name.as_str()))
                            .map(|input| input.attr("value").map(str::to_string)),
                    );
                }
                values
            }
            TokenSelector::MetaContent { name } => find_tags(content, "meta")
                .into_iter()
                .filter(|meta| meta.attr("name") == Some(name.as_str()))
                .map(|meta| meta.attr("content").map(str::to_string))
                .collect(),
            TokenSelector::ElementAttribute {
                tag,
                match_attr,
                match_value,
                attribute,
            } => find_tags(content, tag)
                .into_iter()
                .filter(|element| element.attr(match_attr) == Some(match_value.as_str()))
                .map(|element| element.attr(attribute).map(str::to_string))
                .collect(),
        }
    }
}

impl TokenSource for HtmlTokenSource {
    fn extract_one(&self, content: &str, selector: &TokenSelector) -> AppResult<String> {
        let mut values = self.extract_all(content, selector);
        if values.len() != 1 {
            return Err(AppError::TokenScrape {
                target: selector.to_string(),
                found: values.len(),
            });
        }

        values.pop().flatten().ok_or_else(|| AppError::TokenScrape {
            target: format!("{} 的取值属性", selector),
            found: 0,
        })
    }
}

/// 一个开始标签
#[derive(Debug)]
struct Tag {
    /// 标签结束位置（`>` 之后）
    end: usize,
    attributes: Vec<(String, String)>,
}

impl Tag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?is)<([a-z][a-z0-9-]*)((?:\s+[^\s=>/"']+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>"']+))?)*)\s*/?>"#,
        )
        .unwrap()
    })
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?s)([^\s=>/"']+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>"']+)))?"#).unwrap()
    })
}

fn form_close_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</form\s*>").unwrap())
}

fn entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap())
}

fn find_tags(html: &str, name: &str) -> Vec<Tag> {
    tag_regex()
        .captures_iter(html)
        .filter(|cap| cap[1].eq_ignore_ascii_case(name))
        .map(|cap| {
            let whole = cap.get(0).map(|m| m.end()).unwrap_or_default();
            let attributes = cap
                .get(2)
                .map(|m| parse_attributes(m.as_str()))
                .unwrap_or_default();
            Tag {
                end: whole,
                attributes,
            }
        })
        .collect()
}

fn parse_attributes(raw: &str) -> Vec<(String, String)> {
    attr_regex()
        .captures_iter(raw)
        .map(|cap| {
            let value = cap
                .get(2)
                .or_else(|| cap.get(3))
                .or_else(|| cap.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            (cap[1].to_ascii_lowercase(), value)
        })
        .collect()
}

/// 表单结束位置，没有 `</form>` 时到文档末尾
fn form_end(html: &str, from: usize) -> usize {
    form_close_regex()
        .find(&html[from..])
        .map(|m| from + m.start())
        .unwrap_or(html.len())
}

/// HTML 实体解码
pub fn decode_entities(value: &str) -> String {
    entity_regex()
        .replace_all(value, |cap: &Captures| {
            let entity = &cap[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };

            decoded
                .map(String::from)
                .unwrap_or_else(|| cap[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = r#"
        <html><head>
          <meta name="csrf-token" content="meta-token==" />
        </head><body>
          <form class="search" action="/search" method="get">
            <input type="hidden" name="authenticity_token" value="search-token">
          </form>
          <form action="/login" accept-charset="UTF-8" method="post">
            <input name="utf8" type="hidden" value="&#x2713;" />
            <input type="hidden" name="authenticity_token" value="login+token/==" />
            <input type="email" name="session[email]">
          </form>
        </body></html>
    "#;

    #[test]
    fn test_form_token_scoped_by_action() {
        let source = HtmlTokenSource::new();
        let token = source
            .extract_one(HOME, &TokenSelector::form_token("/login"))
            .unwrap();
        assert_eq!(token, "login+token/==");
    }

    #[test]
    fn test_unscoped_form_token_is_ambiguous() {
        let source = HtmlTokenSource::new();
        let selector = TokenSelector::FormInput {
            action: None,
            input_name: "authenticity_token".to_string(),
        };

        match source.extract_one(HOME, &selector) {
            Err(AppError::TokenScrape { found, .. }) => assert_eq!(found, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_form_is_an_error() {
        let source = HtmlTokenSource::new();
        match source.extract_one(HOME, &TokenSelector::form_token("/logout")) {
            Err(AppError::TokenScrape { found, .. }) => assert_eq!(found, 0),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_csrf_meta() {
        let source = HtmlTokenSource::new();
        assert_eq!(
            source.extract_one(HOME, &TokenSelector::csrf_meta()).unwrap(),
            "meta-token=="
        );
    }

    #[test]
    fn test_duplicate_csrf_meta_is_an_error() {
        let source = HtmlTokenSource::new();
        let html = r#"<meta name="csrf-token" content="a"><meta content="b" name="csrf-token">"#;
        assert!(matches!(
            source.extract_one(html, &TokenSelector::csrf_meta()),
            Err(AppError::TokenScrape { found: 2, .. })
        ));
    }

    #[test]
    fn test_react_props_are_entity_decoded() {
        let source = HtmlTokenSource::new();
        let html = r#"<div data-react-class="AssignmentsTable" data-react-props="{&quot;table_data&quot;:[{&quot;title&quot;:&quot;Quiz &amp; Test&quot;}]}"></div>"#;

        let props = source
            .extract_one(html, &TokenSelector::react_props("AssignmentsTable"))
            .unwrap();
        assert_eq!(props, r#"{"table_data":[{"title":"Quiz & Test"}]}"#);
    }

    #[test]
    fn test_single_quoted_and_unquoted_attributes() {
        let source = HtmlTokenSource::new();
        let html = "<META NAME='csrf-token' CONTENT=abc123>";
        assert_eq!(
            source.extract_one(html, &TokenSelector::csrf_meta()).unwrap(),
            "abc123"
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("&#x2713; &#39;a&#39; &lt;b&gt; &unknown;"), "✓ 'a' <b> &unknown;");
    }
}
