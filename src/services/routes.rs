//! 平台页面路径
//!
//! 平台没有文档化的 API，这些路径就是全部的契约。

use crate::models::assignment::AssignmentId;

/// 首页（含登录表单）
pub const HOME: &str = "/";

/// 登录表单提交地址，也是登录表单的 action
pub const LOGIN: &str = "/login";

/// 作业列表；POST 到这里创建作业
pub fn assignments(course_id: &str) -> String {
    format!("/courses/{}/assignments", course_id)
}

/// 新建作业表单
pub fn new_assignment(course_id: &str) -> String {
    format!("/courses/{}/assignments/new", course_id)
}

/// 单个作业；POST `_method=delete` 到这里删除
pub fn assignment(course_id: &str, id: &AssignmentId) -> String {
    format!("/courses/{}/assignments/{}", course_id, id)
}

/// 作业设置页
pub fn assignment_edit(course_id: &str, id: &AssignmentId) -> String {
    format!("/courses/{}/assignments/{}/edit", course_id, id)
}

/// 提纲编辑页
pub fn outline_edit(course_id: &str, id: &AssignmentId) -> String {
    format!("/courses/{}/assignments/{}/outline/edit", course_id, id)
}

/// 提纲更新地址（PATCH）
pub fn outline(course_id: &str, id: &AssignmentId) -> String {
    format!("/courses/{}/assignments/{}/outline", course_id, id)
}
