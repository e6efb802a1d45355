//! Per-control pending state: `Idle → Pending → Idle`.
//!
//! A control (a button, a key binding) may have at most one request in
//! flight. A second trigger while pending is refused, not queued. The
//! [`PendingGuard`] returns the control to idle when dropped, on success and
//! failure alike.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
  Idle,
  Pending,
}

/// The pending flag of one control instance.
#[derive(Debug, Clone, Default)]
pub struct ActionControl {
  pending: Arc<AtomicBool>,
}

/// Held while a request is in flight.
#[derive(Debug)]
#[must_use = "the control returns to idle as soon as the guard is dropped"]
pub struct PendingGuard {
  pending: Arc<AtomicBool>,
}

impl ActionControl {
  pub fn new() -> Self { Self::default() }

  pub fn state(&self) -> ActionState {
    if self.pending.load(Ordering::Acquire) {
      ActionState::Pending
    } else {
      ActionState::Idle
    }
  }

  pub fn is_pending(&self) -> bool { self.state() == ActionState::Pending }

  /// Move to `Pending`. Returns `None` if already pending.
  pub fn try_begin(&self) -> Option<PendingGuard> {
    self
      .pending
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| PendingGuard { pending: Arc::clone(&self.pending) })
  }
}

impl Drop for PendingGuard {
  fn drop(&mut self) { self.pending.store(false, Ordering::Release); }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn starts_idle() {
    assert_eq!(ActionControl::new().state(), ActionState::Idle);
  }

  #[test]
  fn second_begin_is_refused_while_pending() {
    let control = ActionControl::new();
    let guard = control.try_begin();
    assert!(guard.is_some());
    assert!(control.is_pending());
    assert!(control.try_begin().is_none());
    drop(guard);
    assert_eq!(control.state(), ActionState::Idle);
    assert!(control.try_begin().is_some());
  }

  #[test]
  fn clones_share_state() {
    let control = ActionControl::new();
    let view = control.clone();
    let _guard = control.try_begin().unwrap();
    assert!(view.is_pending());
  }

  #[tokio::test]
  async fn guard_held_by_a_failed_task_still_resets() {
    let control = ActionControl::new();
    let guard = control.try_begin().unwrap();
    let out = tokio::spawn(async move {
      let _guard = guard;
      Err::<(), _>("permission denied")
    })
    .await
    .unwrap();
    assert_eq!(out, Err("permission denied"));
    assert_eq!(control.state(), ActionState::Idle);
    assert!(control.try_begin().is_some());
  }
}
