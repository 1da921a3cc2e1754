//! 提纲构建
//!
//! 合并后的框 + 题目目录 → 提交给平台的提纲文档。纯函数，不做 I/O。

use crate::error::{AppError, AppResult};
use crate::geometry::{round_to, AccumulatedBoxSet, PartBox};
use crate::models::catalog::{QuestionCatalog, QuestionCatalogEntry};
use crate::models::outline::{
    IdentificationRegions, OutlineAssignment, OutlineDocument, OutlineQuestion,
};
use crate::models::position::SpecialKind;

/// 构建提纲文档
///
/// - 单小题：一个条目，满分，一个框
/// - 多小题：父条目（满分，取第一个小题的框作为代表）+ 每个小题一个子条目，
///   子条目分值为 `round(满分 / 小题数, 2)`
/// - 姓名/学号区域填入身份识别区域，其余特殊区域作为 0 分题目追加在末尾
pub fn build_outline(boxes: &AccumulatedBoxSet, catalog: &QuestionCatalog) -> AppResult<OutlineDocument> {
    let mut question_data = Vec::with_capacity(boxes.questions.len() + boxes.specials.len());

    for (index, parts) in boxes.questions.iter() {
        let index = *index;
        let entry = catalog.get(index).ok_or(AppError::Range {
            line: 0,
            index: index as i64,
            len: catalog.len(),
        })?;

        if let Some(question) = build_question(entry, parts) {
            question_data.push(question);
        }
    }

    let mut regions = IdentificationRegions::default();
    for (kind, bbox) in boxes.specials.iter() {
        match *kind {
            SpecialKind::Name => regions.name = Some(*bbox),
            SpecialKind::Id => regions.sid = Some(*bbox),
            _ => question_data.push(OutlineQuestion {
                title: kind.name().to_string(),
                weight: 0.0,
                crop_rect_list: vec![*bbox],
                children: None,
            }),
        }
    }

    Ok(OutlineDocument {
        assignment: OutlineAssignment {
            identification_regions: regions,
        },
        question_data,
    })
}

fn build_question(entry: &QuestionCatalogEntry, parts: &[PartBox]) -> Option<OutlineQuestion> {
    let first = parts.first()?;

    if parts.len() == 1 {
        return Some(OutlineQuestion {
            title: entry.name.clone(),
            weight: entry.points,
            crop_rect_list: vec![first.bbox],
            children: None,
        });
    }

    let weight = child_weight(entry.points, parts.len());
    let children = parts
        .iter()
        .map(|part| OutlineQuestion {
            title: format!("{} - {}", entry.name, part.part_id),
            weight,
            crop_rect_list: vec![part.bbox],
            children: None,
        })
        .collect();

    Some(OutlineQuestion {
        title: entry.name.clone(),
        weight: entry.points,
        crop_rect_list: vec![first.bbox],
        children: Some(children),
    })
}

/// 小题分值：满分平均分配，保留两位小数
///
/// 子条目之和与满分之间允许有舍入误差。
pub fn child_weight(points: f64, part_count: usize) -> f64 {
    round_to(points / part_count as f64, 2)
}
