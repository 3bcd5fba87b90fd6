//! 表单闸门：根据字段值决定确认按钮是否可用

use crate::bridge::HostBridge;
use crate::form::FormState;

/// 登录字段名
pub const LOGIN_FIELD: &str = "login";
/// 密码字段名
pub const PASSWORD_FIELD: &str = "password";

/// 两个字段都非空时才允许提交
///
/// 不做 trim：只含空白的字符串也算非空，唯一不合格的值是空串。
pub fn can_submit(login: &str, password: &str) -> bool {
    !login.is_empty() && !password.is_empty()
}

/// 闸门当前状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    /// 按钮隐藏且禁用（初始状态）
    #[default]
    Closed,
    /// 按钮显示且可用
    Open,
}

impl GateState {
    pub fn from_predicate(allowed: bool) -> Self {
        if allowed {
            GateState::Open
        } else {
            GateState::Closed
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, GateState::Open)
    }
}

/// 认证表单闸门
#[derive(Debug, Default)]
pub struct FormGate {
    state: GateState,
}

impl FormGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// 是否关注该字段的变化
    pub fn watches(field: &str) -> bool {
        field == LOGIN_FIELD || field == PASSWORD_FIELD
    }

    /// 初始状态：隐藏并禁用
    pub fn reset(&mut self, bridge: &dyn HostBridge) {
        self.state = GateState::Closed;
        apply(self.state, bridge);
    }

    /// 重新求值并同步到按钮；每次字段变化都会调用，状态不变也重新下发
    pub fn evaluate(&mut self, form: &FormState, bridge: &dyn HostBridge) -> GateState {
        self.state = GateState::from_predicate(can_submit(
            form.value(LOGIN_FIELD),
            form.value(PASSWORD_FIELD),
        ));
        apply(self.state, bridge);
        self.state
    }
}

fn apply(state: GateState, bridge: &dyn HostBridge) {
    match state {
        GateState::Open => {
            bridge.enable_button();
            bridge.show_button();
        }
        GateState::Closed => {
            bridge.disable_button();
            bridge.hide_button();
        }
    }
}
