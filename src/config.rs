use std::path::PathBuf;

use crate::error::{AppError, AppResult};
use crate::workflow::ReplacePolicy;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 评分平台根地址
    pub base_url: String,
    /// 课程 ID
    pub course_id: String,
    /// 作业标题
    pub assignment_title: String,
    /// 同名作业存在时是否删除重建
    pub force_replace: bool,
    /// 凭据文件（JSON，`email` / `pass`）
    pub secrets_path: PathBuf,
    /// 试卷配置（TOML，题目目录）
    pub exam_config_path: PathBuf,
    // --- 编译 ---
    pub source_path: PathBuf,
    pub template_path: PathBuf,
    pub position_path: PathBuf,
    pub compile_script: PathBuf,
    /// 每次请求后的等待时间（毫秒）
    pub pacing_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 提纲 JSON 输出文件
    pub outline_output_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://www.gradescope.com".to_string(),
            course_id: String::new(),
            assignment_title: String::new(),
            force_replace: false,
            secrets_path: PathBuf::from("secrets.json"),
            exam_config_path: PathBuf::from("exam.toml"),
            source_path: PathBuf::from("quiz.tex"),
            template_path: PathBuf::from("quiz.pdf"),
            position_path: PathBuf::from("quiz.pos"),
            compile_script: PathBuf::from("compile-latex.sh"),
            pacing_ms: 750,
            verbose_logging: false,
            outline_output_file: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 按给定的取值函数读取配置，未设置的项使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string());
        let path = |key: &str| text(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        let flag = |key: &str| lookup(key).and_then(|v| parse_flag(&v));

        Self {
            base_url: text("GRADESCOPE_BASE_URL").unwrap_or(default.base_url),
            course_id: text("COURSE_ID").unwrap_or(default.course_id),
            assignment_title: text("ASSIGNMENT_TITLE").unwrap_or(default.assignment_title),
            force_replace: flag("FORCE_REPLACE").unwrap_or(default.force_replace),
            secrets_path: path("SECRETS_PATH").unwrap_or(default.secrets_path),
            exam_config_path: path("EXAM_CONFIG_PATH").unwrap_or(default.exam_config_path),
            source_path: path("SOURCE_PATH").unwrap_or(default.source_path),
            template_path: path("TEMPLATE_PATH").unwrap_or(default.template_path),
            position_path: path("POSITION_PATH").unwrap_or(default.position_path),
            compile_script: path("COMPILE_SCRIPT").unwrap_or(default.compile_script),
            pacing_ms: text("PACING_MS").and_then(|v| v.parse().ok()).unwrap_or(default.pacing_ms),
            verbose_logging: flag("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
            outline_output_file: path("OUTLINE_OUTPUT_FILE").or(default.outline_output_file),
        }
    }

    /// 检查必填项
    pub fn validate(&self) -> AppResult<()> {
        if self.course_id.is_empty() {
            return Err(AppError::Configuration("缺少 COURSE_ID".to_string()));
        }
        if !self.course_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::Configuration(format!(
                "COURSE_ID 应为数字: '{}'",
                self.course_id
            )));
        }
        if self.assignment_title.trim().is_empty() {
            return Err(AppError::Configuration("缺少 ASSIGNMENT_TITLE".to_string()));
        }
        Ok(())
    }

    /// 同名作业的处理策略
    pub fn replace_policy(&self) -> ReplacePolicy {
        if self.force_replace {
            ReplacePolicy::Replace
        } else {
            ReplacePolicy::Skip
        }
    }
}

/// 接受 `true/false/1/0/yes/no`
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn configured() -> Config {
        Config {
            course_id: "123456".to_string(),
            assignment_title: "Test - Upload".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://www.gradescope.com");
        assert_eq!(config.pacing_ms, 750);
        assert_eq!(config.replace_policy(), ReplacePolicy::Skip);
        assert!(config.outline_output_file.is_none());
    }

    #[test]
    fn test_validate_requires_course_and_title() {
        assert!(configured().validate().is_ok());

        let missing_course = Config {
            course_id: String::new(),
            ..configured()
        };
        assert!(matches!(
            missing_course.validate(),
            Err(AppError::Configuration(_))
        ));

        let blank_title = Config {
            assignment_title: "   ".to_string(),
            ..configured()
        };
        assert!(matches!(blank_title.validate(), Err(AppError::Configuration(_))));

        let bad_course = Config {
            course_id: "abc".to_string(),
            ..configured()
        };
        assert!(bad_course.validate().is_err());
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_lookup_values_are_trimmed() {
        let config = Config::from_lookup(lookup(&[
            ("COURSE_ID", " 123456\n"),
            ("ASSIGNMENT_TITLE", "  Quiz 3 "),
            ("FORCE_REPLACE", "yes"),
            ("PACING_MS", " 10 "),
            ("OUTLINE_OUTPUT_FILE", "   "),
        ]));

        assert_eq!(config.course_id, "123456");
        assert_eq!(config.assignment_title, "Quiz 3");
        assert!(config.force_replace);
        assert_eq!(config.pacing_ms, 10);
        assert!(config.outline_output_file.is_none());
        assert_eq!(config.template_path, PathBuf::from("quiz.pdf"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_untrimmed_course_id_is_rejected() {
        let config = Config {
            course_id: " 123".to_string(),
            ..configured()
        };
        assert!(matches!(config.validate(), Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_force_replace_policy() {
        let config = Config {
            force_replace: true,
            ..configured()
        };
        assert_eq!(config.replace_policy(), ReplacePolicy::Replace);
    }
}
