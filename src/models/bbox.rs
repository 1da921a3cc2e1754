use serde::{Deserialize, Serialize};

/// 页面相对坐标框
///
/// 坐标为页面宽高的百分比（保留一位小数），原点在左上角，y 轴向下。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub page_number: u32,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    pub fn new(page_number: u32, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            page_number,
            x1,
            y1,
            x2,
            y2,
        }
    }

    /// 合并两个框（取并集），调用方负责保证页码一致
    pub fn union(&self, other: &Self) -> Self {
        Self {
            page_number: self.page_number,
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
            x2: self.x2.max(other.x2),
            y2: self.y2.max(other.y2),
        }
    }
}
