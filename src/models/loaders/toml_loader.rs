use crate::error::{AppError, AppResult};
use crate::models::catalog::QuestionCatalog;
use std::path::Path;
use tokio::fs;

/// 从试卷配置 TOML 文件加载题目目录
///
/// 文件格式：
/// ```toml
/// [[questions]]
/// name = "Regular Expression Vocabulary"
/// points = 20
/// ```
pub async fn load_question_catalog(toml_file_path: &Path) -> AppResult<QuestionCatalog> {
    if !toml_file_path.is_file() {
        return Err(AppError::Configuration(format!(
            "试卷配置文件不存在: {}",
            toml_file_path.display()
        )));
    }

    let content = fs::read_to_string(toml_file_path)
        .await
        .map_err(|e| AppError::io(toml_file_path.display().to_string(), e))?;

    let catalog = parse_question_catalog(&content).map_err(|e| {
        AppError::Configuration(format!(
            "无法解析试卷配置文件 {}: {}",
            toml_file_path.display(),
            e
        ))
    })?;

    tracing::info!(
        "成功加载题目目录: {} 道题 ({})",
        catalog.len(),
        toml_file_path.display()
    );

    Ok(catalog)
}

/// 解析题目目录文本
pub fn parse_question_catalog(content: &str) -> Result<QuestionCatalog, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::QuestionCatalogEntry;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_parse_catalog_with_integer_and_float_points() {
        let catalog = parse_question_catalog(
            r#"
            [[questions]]
            name = "Passage"
            points = 0

            [[questions]]
            name = "Regex Golf"
            points = 12.5
            "#,
        )
        .unwrap();

        assert_eq!(
            catalog.questions,
            vec![
                QuestionCatalogEntry {
                    name: "Passage".to_string(),
                    points: 0.0,
                },
                QuestionCatalogEntry {
                    name: "Regex Golf".to_string(),
                    points: 12.5,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_load_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[[questions]]\nname = \"Quantifiers\"\npoints = 5").unwrap();

        let catalog = load_question_catalog(file.path()).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().name, "Quantifiers");
    }

    #[tokio::test]
    async fn test_missing_catalog_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_question_catalog(&dir.path().join("exam.toml")).await;
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }
}
