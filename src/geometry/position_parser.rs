//! 坐标文件解析
//!
//! 每行一条记录，逗号分隔，固定 11 个字段：
//! `question_index, part_id, kind, page_number, ll_x, ll_y, ur_x, ur_y, page_width, page_height, origin`

use crate::error::{AppError, AppResult};
use crate::models::position::{BoxKind, BoxTarget, PositionRecord};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// 每行的字段数
pub const FIELD_COUNT: usize = 11;

/// 唯一支持的坐标原点
pub const BOTTOM_LEFT_ORIGIN: &str = "bottom-left";

/// 读取并解析坐标文件
///
/// # 参数
/// - `path`: 坐标文件路径
/// - `catalog_len`: 题目目录长度，用于校验题目索引
pub async fn load_positions(path: &Path, catalog_len: usize) -> AppResult<Vec<PositionRecord>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::io(path.display().to_string(), e))?;

    parse_positions(&content, catalog_len)
}

/// 解析坐标文件内容，跳过空行
pub fn parse_positions(content: &str, catalog_len: usize) -> AppResult<Vec<PositionRecord>> {
    let mut records = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        records.push(parse_line(index + 1, line, catalog_len)?);
    }

    debug!("坐标文件解析完成: {} 条记录", records.len());
    Ok(records)
}

/// 解析单行记录
pub fn parse_line(line_number: usize, line: &str, catalog_len: usize) -> AppResult<PositionRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let &[question_index, part_id, kind, page_number, ll_x, ll_y, ur_x, ur_y, page_width, page_height, origin] =
        fields.as_slice()
    else {
        return Err(AppError::format(
            line_number,
            format!(
                "字段数错误，应为 {} 个，实际 {} 个",
                FIELD_COUNT,
                fields.len()
            ),
        ));
    };

    if origin != BOTTOM_LEFT_ORIGIN {
        return Err(AppError::format(
            line_number,
            format!("未知的坐标原点: '{}'", origin),
        ));
    }

    let kind = BoxKind::from_str(kind)
        .ok_or_else(|| AppError::format(line_number, format!("未知的框类型: '{}'", kind)))?;

    let page_number: u32 = page_number
        .parse()
        .ok()
        .filter(|page| *page >= 1)
        .ok_or_else(|| AppError::format(line_number, format!("无效的页码: '{}'", page_number)))?;

    // 特殊区域不属于任何题目，索引字段只是占位
    let target = match kind {
        BoxKind::Special(special) => BoxTarget::Special(special),
        BoxKind::Answer(_) => BoxTarget::Question(parse_question_index(
            line_number,
            question_index,
            catalog_len,
        )?),
    };

    Ok(PositionRecord {
        line: line_number,
        target,
        part_id: part_id.to_string(),
        kind,
        page_number,
        ll_x: ll_x.to_string(),
        ll_y: ll_y.to_string(),
        ur_x: ur_x.to_string(),
        ur_y: ur_y.to_string(),
        page_width: page_width.to_string(),
        page_height: page_height.to_string(),
    })
}

fn parse_question_index(line_number: usize, raw: &str, catalog_len: usize) -> AppResult<usize> {
    let index: i64 = raw
        .parse()
        .map_err(|_| AppError::format(line_number, format!("无效的题目索引: '{}'", raw)))?;

    if index < 0 || index as usize >= catalog_len {
        return Err(AppError::Range {
            line: line_number,
            index,
            len: catalog_len,
        });
    }

    Ok(index as usize)
}
