//! Session Context - 会话状态机

use serde::{Deserialize, Serialize};

/// 会话阶段（由 SessionState 推导）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Inactive,
    Active,
    Interrupted,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::Inactive => "inactive",
            SessionPhase::Active => "active",
            SessionPhase::Interrupted => "interrupted",
        }
    }
}

/// 音频会话状态
///
/// 不变量:
/// - `is_active` 与 `was_interrupted` 不会同时为 true
/// - 只能通过下面的转换方法修改
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    is_active: bool,
    was_interrupted: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 激活成功
    pub(crate) fn mark_active(&mut self) {
        self.is_active = true;
        self.was_interrupted = false;
    }

    /// 主动停用
    pub(crate) fn mark_inactive(&mut self) {
        self.is_active = false;
    }

    /// 中断开始：资源已被其他进程或系统事件夺走
    pub(crate) fn begin_interruption(&mut self) {
        self.is_active = false;
        self.was_interrupted = true;
    }

    /// 中断结束，是否恢复由调用方决定
    pub(crate) fn end_interruption(&mut self) {
        self.was_interrupted = false;
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn was_interrupted(&self) -> bool {
        self.was_interrupted
    }

    pub fn phase(&self) -> SessionPhase {
        match (self.is_active, self.was_interrupted) {
            (true, _) => SessionPhase::Active,
            (false, true) => SessionPhase::Interrupted,
            (false, false) => SessionPhase::Inactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariant(state: &SessionState) {
        assert!(!(state.is_active() && state.was_interrupted()));
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::new();
        assert_eq!(state.phase(), SessionPhase::Inactive);
        assert!(!state.is_active());
        assert!(!state.was_interrupted());
    }

    #[test]
    fn test_transitions_keep_invariant() {
        let mut state = SessionState::new();

        state.mark_active();
        assert_eq!(state.phase(), SessionPhase::Active);
        assert_invariant(&state);

        state.begin_interruption();
        assert_eq!(state.phase(), SessionPhase::Interrupted);
        assert_invariant(&state);

        // 中断期间被显式激活
        state.mark_active();
        assert_eq!(state.phase(), SessionPhase::Active);
        assert!(!state.was_interrupted());

        state.begin_interruption();
        state.end_interruption();
        assert_eq!(state.phase(), SessionPhase::Inactive);
        assert_invariant(&state);
    }

    #[test]
    fn test_deactivate_while_interrupted_keeps_flag() {
        let mut state = SessionState::new();
        state.mark_active();
        state.begin_interruption();
        state.mark_inactive();
        assert_eq!(state.phase(), SessionPhase::Interrupted);
    }
}
