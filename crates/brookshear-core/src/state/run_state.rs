/// Two-state machine controlling whether `step` makes progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Not executing. Initial state, and the state after `HLT` or reset.
    #[default]
    Halted,
    /// Executing; the next `step` fetches at `pc`.
    Running,
}

impl RunState {
    /// Returns `true` for [`RunState::Running`].
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;

    #[test]
    fn run_state_default_is_halted() {
        assert_eq!(RunState::default(), RunState::Halted);
        assert!(!RunState::Halted.is_running());
        assert!(RunState::Running.is_running());
    }
}
