//! 上传流程 - 流程层
//!
//! 核心职责：按状态机把提纲送上平台
//!
//! 流程顺序：
//! 1. 登录
//! 2. 按标题查找作业 → 跳过 / 删除 / 新建
//! 3. 创建作业（上传模板）
//! 4. 提交提纲

use std::path::Path;

use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::assignment::{AssignmentId, CreationOutcome};
use crate::models::credentials::Credentials;
use crate::models::outline::OutlineDocument;
use crate::workflow::upload_state::{
    next_step, transition, ReplacePolicy, StepOutcome, UploadState, UploadStep,
};

/// 评分平台能力
///
/// 每个方法对应一次（或一组）远程调用，失败时直接返回错误，不重试。
#[allow(async_fn_in_trait)]
pub trait GradingPlatform {
    async fn login(&mut self, credentials: &Credentials) -> AppResult<()>;

    /// 按标题精确查找作业
    async fn find_assignment(&mut self, title: &str) -> AppResult<Option<AssignmentId>>;

    async fn delete_assignment(&mut self, id: &AssignmentId) -> AppResult<()>;

    /// 创建作业并上传模板文件
    async fn create_assignment(&mut self, title: &str, template: &Path)
        -> AppResult<CreationOutcome>;

    async fn submit_outline(&mut self, id: &AssignmentId, outline: &OutlineDocument)
        -> AppResult<()>;
}

/// 上传流程
///
/// 职责：
/// - 按状态机决定下一步
/// - 调用平台能力并把结果交给状态机
/// - 不持有会话，不认识 HTML
pub struct UploadOrchestrator<P: GradingPlatform> {
    platform: P,
    policy: ReplacePolicy,
}

impl<P: GradingPlatform> UploadOrchestrator<P> {
    pub fn new(platform: P, policy: ReplacePolicy) -> Self {
        Self { platform, policy }
    }

    /// 取回平台（测试中用来检查远程状态）
    pub fn into_platform(self) -> P {
        self.platform
    }

    /// 运行上传流程
    ///
    /// # 参数
    /// - `credentials`: 登录凭据
    /// - `title`: 作业标题（会去掉首尾空白）
    /// - `template`: 模板 PDF
    /// - `outline`: 已生成的提纲
    ///
    /// # 返回
    /// 返回终止状态：`Submitted` 或 `Resolved(Skip)`
    pub async fn run(
        &mut self,
        credentials: &Credentials,
        title: &str,
        template: &Path,
        outline: &OutlineDocument,
    ) -> AppResult<UploadState> {
        let title = title.trim();
        let mut state = UploadState::Start;

        loop {
            let outcome = match next_step(&state) {
                UploadStep::Finish => return Ok(state),
                UploadStep::Login => {
                    self.platform.login(credentials).await?;
                    info!("✓ 登录成功: {}", credentials.email);
                    StepOutcome::LoggedIn
                }
                UploadStep::LookUp => {
                    let found = self.platform.find_assignment(title).await?;
                    self.log_lookup(title, found.as_ref());
                    StepOutcome::LookedUp(found)
                }
                UploadStep::Delete(id) => {
                    self.platform.delete_assignment(&id).await?;
                    info!("🗑️ 已删除旧作业 {}", id);
                    StepOutcome::Deleted
                }
                UploadStep::Create => {
                    let outcome = self.platform.create_assignment(title, template).await?;
                    let id = creation_result(title, outcome)?;
                    info!("✓ 已创建作业 \"{}\" (ID: {})", title, id);
                    StepOutcome::Created(id)
                }
                UploadStep::Submit(id) => {
                    info!("📤 正在提交提纲 ({} 道题)...", outline.question_count());
                    self.platform.submit_outline(&id, outline).await?;
                    info!("✓ 提纲已提交到作业 {}", id);
                    StepOutcome::Submitted
                }
            };

            state = transition(state, outcome, self.policy)?;
        }
    }

    fn log_lookup(&self, title: &str, found: Option<&AssignmentId>) {
        match (found, self.policy) {
            (None, _) => info!("作业 \"{}\" 不存在，将新建", title),
            (Some(id), ReplacePolicy::Skip) => {
                warn!("⚠️ 作业 \"{}\" 已存在 (ID: {})，跳过上传", title, id)
            }
            (Some(id), ReplacePolicy::Replace) => {
                info!("作业 \"{}\" 已存在 (ID: {})，将删除后重建", title, id)
            }
        }
    }
}

/// 创建结果转为作业 ID，失败时报 `Creation` 错误
fn creation_result(title: &str, outcome: CreationOutcome) -> AppResult<AssignmentId> {
    match outcome {
        CreationOutcome::Created(id) => Ok(id),
        CreationOutcome::AmbiguousTitle => Err(AppError::Creation {
            title: title.to_string(),
            reason: "平台没有重定向，标题可能与已有作业冲突".to_string(),
        }),
        CreationOutcome::Unrecognized { body } => {
            error!("无法识别的创建响应:\n{}", body);
            Err(AppError::Creation {
                title: title.to_string(),
                reason: "重定向响应中没有提纲编辑页地址".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::upload_state::Resolution;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    /// 内存中的平台
    #[derive(Default)]
    struct FakePlatform {
        assignments: Vec<(AssignmentId, String)>,
        next_id: u32,
        creation_override: Option<CreationOutcome>,
        submitted: Vec<AssignmentId>,
        calls: Vec<&'static str>,
        logged_in: bool,
    }

    impl FakePlatform {
        fn with_assignment(id: &str, title: &str) -> Self {
            Self {
                assignments: vec![(AssignmentId::new(id), title.to_string())],
                next_id: 100,
                ..Default::default()
            }
        }

        fn titled(&self, title: &str) -> Vec<&AssignmentId> {
            self.assignments
                .iter()
                .filter(|(_, t)| t == title)
                .map(|(id, _)| id)
                .collect()
        }
    }

    impl GradingPlatform for FakePlatform {
        async fn login(&mut self, _credentials: &Credentials) -> AppResult<()> {
            self.calls.push("login");
            self.logged_in = true;
            Ok(())
        }

        async fn find_assignment(&mut self, title: &str) -> AppResult<Option<AssignmentId>> {
            self.calls.push("find");
            assert!(self.logged_in);
            Ok(self.titled(title).first().map(|id| (*id).clone()))
        }

        async fn delete_assignment(&mut self, id: &AssignmentId) -> AppResult<()> {
            self.calls.push("delete");
            self.assignments.retain(|(existing, _)| existing != id);
            Ok(())
        }

        async fn create_assignment(
            &mut self,
            title: &str,
            _template: &Path,
        ) -> AppResult<CreationOutcome> {
            self.calls.push("create");
            if let Some(outcome) = self.creation_override.take() {
                return Ok(outcome);
            }
            self.next_id += 1;
            let id = AssignmentId::new(self.next_id.to_string());
            self.assignments.push((id.clone(), title.to_string()));
            Ok(CreationOutcome::Created(id))
        }

        async fn submit_outline(
            &mut self,
            id: &AssignmentId,
            _outline: &OutlineDocument,
        ) -> AppResult<()> {
            self.calls.push("submit");
            self.submitted.push(id.clone());
            Ok(())
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "prof@example.edu".to_string(),
            password: "secret".to_string(),
        }
    }

    fn outline() -> OutlineDocument {
        serde_json::from_str(
            r#"{"assignment":{"identification_regions":{"name":null,"sid":null}},"question_data":[]}"#,
        )
        .unwrap()
    }

    async fn upload(
        platform: FakePlatform,
        policy: ReplacePolicy,
    ) -> (AppResult<UploadState>, FakePlatform) {
        let mut orchestrator = UploadOrchestrator::new(platform, policy);
        let result = orchestrator
            .run(
                &credentials(),
                " Test - Upload ",
                &PathBuf::from("quiz.pdf"),
                &outline(),
            )
            .await;
        (result, orchestrator.into_platform())
    }

    #[tokio::test]
    async fn test_new_assignment_is_created_and_submitted() {
        let platform = FakePlatform::with_assignment("1", "Other");
        let (result, platform) = upload(platform, ReplacePolicy::Skip).await;

        let created = AssignmentId::new("101");
        assert_eq!(
            result.unwrap(),
            UploadState::Submitted {
                id: created.clone(),
                replaced: None
            }
        );
        assert_eq!(platform.calls, vec!["login", "find", "create", "submit"]);
        assert_eq!(platform.submitted, vec![created]);
    }

    #[tokio::test]
    async fn test_existing_assignment_is_left_alone() {
        let platform = FakePlatform::with_assignment("5", "Test - Upload");
        let (result, platform) = upload(platform, ReplacePolicy::Skip).await;

        assert_eq!(
            result.unwrap(),
            UploadState::Resolved(Resolution::Skip {
                existing: AssignmentId::new("5")
            })
        );
        assert_eq!(platform.calls, vec!["login", "find"]);
        assert!(platform.submitted.is_empty());
    }

    #[tokio::test]
    async fn test_existing_assignment_is_replaced() {
        let platform = FakePlatform::with_assignment("5", "Test - Upload");
        let (result, platform) = upload(platform, ReplacePolicy::Replace).await;

        assert_eq!(
            result.unwrap(),
            UploadState::Submitted {
                id: AssignmentId::new("101"),
                replaced: Some(AssignmentId::new("5"))
            }
        );
        assert_eq!(
            platform.calls,
            vec!["login", "find", "delete", "create", "submit"]
        );
        assert_eq!(platform.titled("Test - Upload"), vec![&AssignmentId::new("101")]);
    }

    #[tokio::test]
    async fn test_creation_failure_after_delete_leaves_nothing() {
        let mut platform = FakePlatform::with_assignment("5", "Test - Upload");
        platform.creation_override = Some(CreationOutcome::AmbiguousTitle);

        let (result, platform) = upload(platform, ReplacePolicy::Replace).await;

        assert!(matches!(result, Err(AppError::Creation { .. })));
        assert!(platform.titled("Test - Upload").is_empty());
        assert!(platform.submitted.is_empty());
    }

    #[tokio::test]
    async fn test_unrecognized_creation_is_an_error() {
        let mut platform = FakePlatform::with_assignment("1", "Other");
        platform.creation_override = Some(CreationOutcome::Unrecognized {
            body: "<html>?</html>".to_string(),
        });

        let (result, platform) = upload(platform, ReplacePolicy::Skip).await;

        match result {
            Err(AppError::Creation { title, .. }) => assert_eq!(title, "Test - Upload"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(platform.calls, vec!["login", "find", "create"]);
    }
}
