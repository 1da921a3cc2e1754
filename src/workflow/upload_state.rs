//! 上传状态机
//!
//! `Start → Authenticated → Resolved{Skip|Replaced|New} → Created → Submitted`
//!
//! 状态转移是纯函数：给定当前状态和上一步的结果，算出下一个状态；
//! 给定状态，算出下一步要做什么。真正的网络调用在 `upload_flow` 里。

use crate::error::{AppError, AppResult};
use crate::models::assignment::AssignmentId;

/// 已存在作业时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplacePolicy {
    /// 跳过，不创建也不提交
    #[default]
    Skip,
    /// 删除后重建
    Replace,
}

/// 查找作业后的决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// 作业已存在且不替换，流程直接结束
    Skip { existing: AssignmentId },
    /// 旧作业已删除
    Replaced { previous: AssignmentId },
    /// 作业不存在
    New,
}

/// 上传流程状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Start,
    Authenticated,
    /// 找到了旧作业，等待删除（属于 Authenticated → Resolved 的过程）
    Deleting { existing: AssignmentId },
    Resolved(Resolution),
    Created {
        id: AssignmentId,
        replaced: Option<AssignmentId>,
    },
    Submitted {
        id: AssignmentId,
        replaced: Option<AssignmentId>,
    },
}

impl UploadState {
    /// 是否为终止状态（提交完成，或跳过）
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UploadState::Submitted { .. } | UploadState::Resolved(Resolution::Skip { .. })
        )
    }
}

/// 下一步要执行的动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStep {
    Login,
    LookUp,
    Delete(AssignmentId),
    Create,
    Submit(AssignmentId),
    Finish,
}

/// 动作执行的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    LoggedIn,
    LookedUp(Option<AssignmentId>),
    Deleted,
    Created(AssignmentId),
    Submitted,
}

/// 根据状态决定下一步
pub fn next_step(state: &UploadState) -> UploadStep {
    match state {
        UploadState::Start => UploadStep::Login,
        UploadState::Authenticated => UploadStep::LookUp,
        UploadState::Deleting { existing } => UploadStep::Delete(existing.clone()),
        UploadState::Resolved(Resolution::Skip { .. }) => UploadStep::Finish,
        UploadState::Resolved(_) => UploadStep::Create,
        UploadState::Created { id, .. } => UploadStep::Submit(id.clone()),
        UploadState::Submitted { .. } => UploadStep::Finish,
    }
}

/// 状态转移
///
/// 失败不会回滚：删除成功后创建失败，旧作业就没有了。
pub fn transition(
    state: UploadState,
    outcome: StepOutcome,
    policy: ReplacePolicy,
) -> AppResult<UploadState> {
    let next = match (state, outcome) {
        (UploadState::Start, StepOutcome::LoggedIn) => UploadState::Authenticated,

        (UploadState::Authenticated, StepOutcome::LookedUp(None)) => {
            UploadState::Resolved(Resolution::New)
        }
        (UploadState::Authenticated, StepOutcome::LookedUp(Some(existing))) => match policy {
            ReplacePolicy::Skip => UploadState::Resolved(Resolution::Skip { existing }),
            ReplacePolicy::Replace => UploadState::Deleting { existing },
        },

        (UploadState::Deleting { existing }, StepOutcome::Deleted) => {
            UploadState::Resolved(Resolution::Replaced { previous: existing })
        }

        (UploadState::Resolved(Resolution::New), StepOutcome::Created(id)) => UploadState::Created {
            id,
            replaced: None,
        },
        (UploadState::Resolved(Resolution::Replaced { previous }), StepOutcome::Created(id)) => {
            UploadState::Created {
                id,
                replaced: Some(previous),
            }
        }

        (UploadState::Created { id, replaced }, StepOutcome::Submitted) => {
            UploadState::Submitted { id, replaced }
        }

        (state, outcome) => {
            return Err(AppError::Workflow(format!(
                "状态 {:?} 不接受结果 {:?}",
                state, outcome
            )))
        }
    };

    Ok(next)
}
