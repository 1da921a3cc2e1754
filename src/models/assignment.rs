use std::fmt;

/// 平台分配的作业 ID（不透明字符串）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssignmentId(pub String);

impl AssignmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 平台上已存在的作业
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAssignment {
    pub id: AssignmentId,
    pub title: String,
}

/// 创建作业的结果
///
/// 新作业 ID 只能从重定向响应中猜出来，所以失败要区分两种情况：
/// 标题冲突（可处理）与平台响应格式变化（需要排查）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreationOutcome {
    /// 创建成功
    Created(AssignmentId),
    /// 没有发生重定向，通常是标题不唯一
    AmbiguousTitle,
    /// 有重定向但无法从中解析出 ID
    Unrecognized { body: String },
}
