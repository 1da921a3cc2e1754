//! 框合并
//!
//! 同一道题的同一小题可以由多条记录组成，按并集合并成一个框。

use crate::error::{AppError, AppResult};
use crate::models::bbox::BoundingBox;
use crate::models::position::{BoxTarget, PositionRecord, SpecialKind};

use super::box_engine::compute_box;

/// 一道题的一个小题
#[derive(Debug, Clone, PartialEq)]
pub struct PartBox {
    pub part_id: String,
    pub bbox: BoundingBox,
}

/// 合并后的所有框
///
/// 题目、小题、特殊区域都保持在坐标文件中第一次出现的顺序。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccumulatedBoxSet {
    pub questions: Vec<(usize, Vec<PartBox>)>,
    pub specials: Vec<(SpecialKind, BoundingBox)>,
}

impl AccumulatedBoxSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加入一个框
    ///
    /// 同一 `(题目, 小题)` 的框必须在同一页，否则报 CrossPage；
    /// 同一种特殊区域只能出现一次，否则报 DuplicateRegion。
    pub fn insert(&mut self, target: BoxTarget, part_id: &str, bbox: BoundingBox) -> AppResult<()> {
        match target {
            BoxTarget::Special(kind) => {
                if self.specials.iter().any(|(existing, _)| *existing == kind) {
                    return Err(AppError::DuplicateRegion { kind });
                }
                self.specials.push((kind, bbox));
            }
            BoxTarget::Question(question) => {
                let parts = self.question_entry(question);
                match parts.iter_mut().find(|p| p.part_id == part_id) {
                    Some(existing) => {
                        if existing.bbox.page_number != bbox.page_number {
                            return Err(AppError::CrossPage {
                                question,
                                part: part_id.to_string(),
                                first_page: existing.bbox.page_number,
                                page: bbox.page_number,
                            });
                        }
                        existing.bbox = existing.bbox.union(&bbox);
                    }
                    None => parts.push(PartBox {
                        part_id: part_id.to_string(),
                        bbox,
                    }),
                }
            }
        }

        Ok(())
    }

    pub fn parts(&self, question: usize) -> Option<&[PartBox]> {
        self.questions
            .iter()
            .find(|(index, _)| *index == question)
            .map(|(_, parts)| parts.as_slice())
    }

    fn question_entry(&mut self, question: usize) -> &mut Vec<PartBox> {
        let position = match self.questions.iter().position(|(index, _)| *index == question) {
            Some(position) => position,
            None => {
                self.questions.push((question, Vec::new()));
                self.questions.len() - 1
            }
        };
        &mut self.questions[position].1
    }
}

/// 换算并合并所有记录
pub fn accumulate(records: &[PositionRecord]) -> AppResult<AccumulatedBoxSet> {
    let mut boxes = AccumulatedBoxSet::new();

    for record in records {
        let bbox = compute_box(record)?;
        boxes.insert(record.target, &record.part_id, bbox)?;
    }

    Ok(boxes)
}
