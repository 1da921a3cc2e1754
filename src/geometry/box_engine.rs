//! 坐标换算：排版坐标（sp，左下原点，y 向上）→ 页面百分比（左上原点，y 向下）

use crate::error::{AppError, AppResult};
use crate::models::bbox::BoundingBox;
use crate::models::position::PositionRecord;

/// 每个 pt 对应的 sp 数
pub const SP_PER_PT: f64 = 65536.0;

/// 需要向右延伸的框，右边界至少到这个百分比
pub const RIGHT_EDGE_MIN_PERCENT: f64 = 95.0;

/// 将一条坐标记录换算为页面相对坐标框
pub fn compute_box(record: &PositionRecord) -> AppResult<BoundingBox> {
    let line = record.line;

    let ll_x = parse_length(line, &record.ll_x, "sp")?;
    let ll_y = parse_length(line, &record.ll_y, "sp")?;
    let ur_x = parse_length(line, &record.ur_x, "sp")?;
    let ur_y = parse_length(line, &record.ur_y, "sp")?;

    let page_width = parse_length(line, &record.page_width, "pt")? * SP_PER_PT;
    let page_height = parse_length(line, &record.page_height, "pt")? * SP_PER_PT;
    if page_width <= 0.0 || page_height <= 0.0 {
        return Err(AppError::format(line, "页面尺寸必须为正数"));
    }

    let x1 = to_percent(ll_x / page_width);
    let y1 = to_percent(1.0 - ur_y / page_height);
    let mut x2 = to_percent(ur_x / page_width);
    let y2 = to_percent(1.0 - ll_y / page_height);

    if x1 > x2 || y1 > y2 {
        return Err(AppError::format(
            line,
            format!("左下角与右上角坐标颠倒: ({}, {}) - ({}, {})", x1, y1, x2, y2),
        ));
    }

    if record.kind.extends_right() {
        x2 = x2.max(RIGHT_EDGE_MIN_PERCENT);
    }

    Ok(BoundingBox::new(record.page_number, x1, y1, x2, y2))
}

/// 去掉单位后缀并解析为数值，没有后缀时按纯数字处理
fn parse_length(line: usize, raw: &str, unit: &str) -> AppResult<f64> {
    let value = raw.strip_suffix(unit).unwrap_or(raw).trim();
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::format(line, format!("无效的长度值: '{}'", raw)))
}

/// 比例 → 百分比，保留一位小数并限制在 [0, 100]
fn to_percent(ratio: f64) -> f64 {
    round_to(100.0 * ratio, 1).clamp(0.0, 100.0)
}

/// 按指定小数位取整，恰好为 .5 时取偶数（四舍六入五成双）
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
