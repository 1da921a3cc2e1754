//! 坐标文件中的一条记录及其框类型

use std::fmt;

/// 需要向右延伸的答题框类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnswerKind {
    /// 单选题
    Mcq,
    /// 多选题
    Ma,
    /// 下拉选择题
    Mdd,
}

/// 特殊区域类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialKind {
    /// 姓名
    Name,
    /// 学号
    Id,
    /// 签名
    Signature,
    /// 人工评分
    ManualGrading,
}

impl SpecialKind {
    /// 坐标文件与提纲中使用的名称
    pub fn name(self) -> &'static str {
        match self {
            SpecialKind::Name => "name",
            SpecialKind::Id => "id",
            SpecialKind::Signature => "signature",
            SpecialKind::ManualGrading => "manual_grading",
        }
    }
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 坐标文件中允许出现的框类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxKind {
    Answer(AnswerKind),
    Special(SpecialKind),
}

impl BoxKind {
    /// 精确匹配类型名称
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "mcq" => Some(BoxKind::Answer(AnswerKind::Mcq)),
            "ma" => Some(BoxKind::Answer(AnswerKind::Ma)),
            "mdd" => Some(BoxKind::Answer(AnswerKind::Mdd)),
            "name" => Some(BoxKind::Special(SpecialKind::Name)),
            "id" => Some(BoxKind::Special(SpecialKind::Id)),
            "signature" => Some(BoxKind::Special(SpecialKind::Signature)),
            "manual_grading" => Some(BoxKind::Special(SpecialKind::ManualGrading)),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BoxKind::Answer(AnswerKind::Mcq) => "mcq",
            BoxKind::Answer(AnswerKind::Ma) => "ma",
            BoxKind::Answer(AnswerKind::Mdd) => "mdd",
            BoxKind::Special(kind) => kind.name(),
        }
    }

    /// 答题框至少要延伸到页面右侧 95% 处，保证选项区域被完整框住
    pub fn extends_right(self) -> bool {
        matches!(self, BoxKind::Answer(_))
    }
}

impl fmt::Display for BoxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 框归属：题目目录中的某道题，或某个特殊区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxTarget {
    Question(usize),
    Special(SpecialKind),
}

/// 坐标文件中的一行
///
/// 坐标保留原始文本（带 `sp` / `pt` 单位），由几何引擎负责换算。
#[derive(Debug, Clone, PartialEq)]
pub struct PositionRecord {
    /// 在坐标文件中的行号（从1开始，仅用于报错）
    pub line: usize,
    pub target: BoxTarget,
    pub part_id: String,
    pub kind: BoxKind,
    /// 页码（从1开始）
    pub page_number: u32,
    pub ll_x: String,
    pub ll_y: String,
    pub ur_x: String,
    pub ur_y: String,
    pub page_width: String,
    pub page_height: String,
}
