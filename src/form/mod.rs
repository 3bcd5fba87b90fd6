/*!
 * 表单模块
 *
 * - snapshot: 提交快照与实时表单状态
 * - gate: 认证表单的提交闸门
 * - layout: 下载表单布局
 */

pub mod gate;
pub mod layout;
pub mod snapshot;

pub use gate::{can_submit, FormGate, GateState, LOGIN_FIELD, PASSWORD_FIELD};
pub use layout::{DownloadLayout, SelectOption};
pub use snapshot::{FormSnapshot, FormState};

/// 认证页面表单元素 id
pub const AUTH_FORM_ID: &str = "auth_config";
/// 下载页面表单元素 id
pub const DOWNLOAD_FORM_ID: &str = "download_config";
