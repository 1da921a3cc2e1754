use serde::{Deserialize, Serialize};

/// 题目目录中的一道题
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionCatalogEntry {
    pub name: String,
    pub points: f64,
}

/// 题目目录
///
/// 按坐标文件中的 `question_index` 索引，从试卷配置文件注入，运行期间只读。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuestionCatalog {
    #[serde(default)]
    pub questions: Vec<QuestionCatalogEntry>,
}

impl QuestionCatalog {
    pub fn new(questions: Vec<QuestionCatalogEntry>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QuestionCatalogEntry> {
        self.questions.get(index)
    }
}
