use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// User-initiated actions that may have one request in flight each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SaveProfile,
    LoadProfile,
    DeleteProfile,
    ListHouses,
    AddHouse,
    LookupHouse,
    DeleteHouses,
    Score,
}

impl Action {
    const COUNT: usize = 8;

    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::SaveProfile => "save_profile",
            Action::LoadProfile => "load_profile",
            Action::DeleteProfile => "delete_profile",
            Action::ListHouses => "list_houses",
            Action::AddHouse => "add_house",
            Action::LookupHouse => "lookup_house",
            Action::DeleteHouses => "delete_houses",
            Action::Score => "score",
        }
    }
}

/// Rejects a second submission of an action while the first is running
///
/// Different actions never block each other. There is no queueing and no
/// timeout: the slot frees when the guard drops.
#[derive(Debug, Clone, Default)]
pub struct ActionGuard {
    busy: Arc<[AtomicBool; Action::COUNT]>,
}

/// Holds an action's slot until dropped
#[derive(Debug)]
pub struct InFlight {
    busy: Arc<[AtomicBool; Action::COUNT]>,
    action: Action,
}

impl ActionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot for `action`, or `None` when it is already taken
    pub fn try_begin(&self, action: Action) -> Option<InFlight> {
        let slot = &self.busy[action.index()];
        slot.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        tracing::trace!("Action {} started", action.as_str());
        Some(InFlight {
            busy: Arc::clone(&self.busy),
            action,
        })
    }

    pub fn is_busy(&self, action: Action) -> bool {
        self.busy[action.index()].load(Ordering::Acquire)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.busy[self.action.index()].store(false, Ordering::Release);
        tracing::trace!("Action {} finished", self.action.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_submission_rejected() {
        let guard = ActionGuard::new();

        let first = guard.try_begin(Action::Score);
        assert!(first.is_some());
        assert!(guard.try_begin(Action::Score).is_none());
        assert!(guard.is_busy(Action::Score));

        drop(first);
        assert!(!guard.is_busy(Action::Score));
        assert!(guard.try_begin(Action::Score).is_some());
    }

    #[test]
    fn test_actions_are_independent() {
        let guard = ActionGuard::new();

        let _score = guard.try_begin(Action::Score).unwrap();
        assert!(guard.try_begin(Action::AddHouse).is_some());
        assert!(guard.try_begin(Action::SaveProfile).is_some());
    }

    #[test]
    fn test_clones_share_slots() {
        let guard = ActionGuard::new();
        let other = guard.clone();

        let _held = guard.try_begin(Action::LookupHouse).unwrap();
        assert!(other.try_begin(Action::LookupHouse).is_none());
    }
}
