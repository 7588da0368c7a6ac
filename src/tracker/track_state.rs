use serde::Serialize;

/// Lifecycle of a tracked entity relative to the monitored region.
///
/// `Tracked -> Entered -> Exited`. A track may also be evicted from
/// `Tracked` or `Entered` without ever reaching `Exited`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    /// Followed across frames, has not crossed the entry line
    #[default]
    Tracked,
    /// Crossed the entry line, counted as inside
    Entered,
    /// Crossed the exit line after entering; terminal
    Exited,
}

impl LifecycleState {
    /// Whether the entity is logically inside the monitored region.
    pub fn is_inside(self) -> bool {
        self == LifecycleState::Entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_entered_is_inside() {
        assert!(!LifecycleState::Tracked.is_inside());
        assert!(LifecycleState::Entered.is_inside());
        assert!(!LifecycleState::Exited.is_inside());
    }
}
