//! 提交给评分平台的提纲文档
//!
//! 字段名与平台的 JSON 格式一致，按黑盒契约对待。

use serde::{Deserialize, Serialize};

use super::bbox::BoundingBox;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineDocument {
    pub assignment: OutlineAssignment,
    pub question_data: Vec<OutlineQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineAssignment {
    pub identification_regions: IdentificationRegions,
}

/// 身份识别区域，缺失时序列化为 null
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IdentificationRegions {
    pub name: Option<BoundingBox>,
    pub sid: Option<BoundingBox>,
}

/// 提纲中的一道题（或小题）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutlineQuestion {
    pub title: String,
    pub weight: f64,
    pub crop_rect_list: Vec<BoundingBox>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<OutlineQuestion>>,
}

impl OutlineDocument {
    /// 顶层题目数量
    pub fn question_count(&self) -> usize {
        self.question_data.len()
    }
}
