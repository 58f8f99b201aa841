//! Redistribution policy — which weeks may absorb a direct edit.
//!
//! Edits flow into later unlocked weeks automatically. Earlier weeks may
//! already be printed or reported, so spreading into them waits for the
//! planner to confirm a preview. When every other week is locked nothing
//! moves until one is unlocked.

use serde::{Deserialize, Serialize};

use crate::allocator;
use crate::types::WeekSlot;

/// What a direct edit of one week is allowed to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redistribution {
    /// Later unlocked weeks absorb the change; apply right away.
    Forward(Vec<usize>),
    /// Only earlier unlocked weeks are free; needs confirmation.
    Backward(Vec<usize>),
    /// Every other week is locked.
    Blocked { locked: Vec<usize> },
    /// The split has a single week; the edit applies with nothing to rebalance.
    Solo,
}

/// An edit held open while the planner decides on a backward redistribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEdit {
    pub week: usize,
    pub value: u64,
}

/// Edit-session phase. Evaluating and applying happen inside a single call,
/// so only the waiting states are ever observable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditPhase {
    #[default]
    Idle,
    /// A backward preview is open.
    AwaitingConfirmation(PendingEdit),
    /// Every other week was locked; held until the planner unlocks one and retries.
    Blocked(PendingEdit),
}

/// What the split would look like if a backward redistribution were confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackwardPreview {
    pub week: usize,
    pub value: u64,
    pub targets: Vec<usize>,
    pub quantities: Vec<u64>,
}

/// Unlocked weeks after `edited`, ascending.
pub fn forward_unlocked(slots: &[WeekSlot], edited: usize) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .skip(edited + 1)
        .filter(|(_, s)| !s.locked)
        .map(|(i, _)| i)
        .collect()
}

/// Unlocked weeks before `edited`, ascending.
pub fn backward_unlocked(slots: &[WeekSlot], edited: usize) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .take(edited)
        .filter(|(_, s)| !s.locked)
        .map(|(i, _)| i)
        .collect()
}

/// Every unlocked week, ascending. Used when the job total changes.
pub fn all_unlocked(slots: &[WeekSlot]) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.locked)
        .map(|(i, _)| i)
        .collect()
}

/// Locked weeks other than `edited`, ascending.
pub fn locked_others(slots: &[WeekSlot], edited: usize) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(i, s)| *i != edited && s.locked)
        .map(|(i, _)| i)
        .collect()
}

/// Decide how an edit to `edited` may be absorbed.
pub fn evaluate(slots: &[WeekSlot], edited: usize) -> Redistribution {
    if slots.len() <= 1 {
        return Redistribution::Solo;
    }
    let forward = forward_unlocked(slots, edited);
    if !forward.is_empty() {
        return Redistribution::Forward(forward);
    }
    let backward = backward_unlocked(slots, edited);
    if !backward.is_empty() {
        return Redistribution::Backward(backward);
    }
    Redistribution::Blocked {
        locked: locked_others(slots, edited),
    }
}

/// Compute the split a confirmed backward redistribution would produce,
/// without touching `slots`.
pub fn preview_backward(
    slots: &[WeekSlot],
    total: u64,
    edited: usize,
    value: u64,
) -> BackwardPreview {
    let targets = backward_unlocked(slots, edited);
    let quantities = allocator::apply_direct_edit(slots, total, edited, value, &targets)
        .iter()
        .map(|s| s.quantity)
        .collect();
    BackwardPreview {
        week: edited,
        value,
        targets,
        quantities,
    }
}
