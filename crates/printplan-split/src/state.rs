//! Split state store — owns one job's `(quantity, weeks)` for the length of
//! an edit session and applies every form event to it.

use printplan_core::error::{PrintPlanError, Result};
use serde::{Deserialize, Serialize};

use crate::allocator;
use crate::parse::parse_quantity;
use crate::policy::{self, BackwardPreview, EditPhase, PendingEdit, Redistribution};
use crate::types::{slots_from_parts, SplitRecord, SplitSeed, SplitSummary, WeekSlot};
use crate::weeks;

/// Result of a week edit or a confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    /// Committed; `targets` absorbed the difference.
    Applied { targets: Vec<usize> },
    /// Nothing changed yet; the planner must confirm or cancel.
    AwaitingConfirmation(BackwardPreview),
    /// Nothing changed; every other week is locked.
    Blocked { locked: Vec<usize> },
}

/// Canonical split state for one open job.
#[derive(Debug, Clone)]
pub struct SplitStateStore {
    total_quantity: u64,
    start_date: Option<i64>,
    due_date: Option<i64>,
    weeks: Vec<WeekSlot>,
    phase: EditPhase,
    separators: String,
    max_weeks: usize,
}

impl Default for SplitStateStore {
    fn default() -> Self {
        Self::new(",")
    }
}

impl SplitStateStore {
    /// Empty store; `separators` are stripped from raw quantity text.
    pub fn new(separators: &str) -> Self {
        Self {
            total_quantity: 0,
            start_date: None,
            due_date: None,
            weeks: Vec::new(),
            phase: EditPhase::Idle,
            separators: separators.to_string(),
            max_weeks: weeks::DEFAULT_MAX_WEEKS,
        }
    }

    /// Cap on the number of weeks a date range may seed.
    pub fn with_max_weeks(mut self, max_weeks: usize) -> Self {
        self.max_weeks = max_weeks;
        self
    }

    /// Store seeded from a job as it is opened.
    pub fn from_seed(seed: &SplitSeed, separators: &str) -> Self {
        let mut store = Self::new(separators);
        store.seed(seed);
        store
    }

    /// Replace all state from `seed`. A persisted split is adopted as-is;
    /// otherwise an even split is built once quantity and both dates are known.
    pub fn seed(&mut self, seed: &SplitSeed) {
        self.total_quantity = seed
            .quantity
            .as_ref()
            .map(|q| q.resolve(&self.separators))
            .unwrap_or(0);
        self.start_date = seed.start_date;
        self.due_date = seed.due_date;
        self.phase = EditPhase::Idle;
        self.weeks = match seed.weekly_split.as_deref() {
            Some(split) if !split.is_empty() => {
                slots_from_parts(split, seed.locked_weeks.as_deref())
            }
            _ => Vec::new(),
        };

        if self.weeks.is_empty() {
            self.seed_from_dates();
        } else {
            tracing::debug!("📋 Adopted existing split of {} weeks", self.weeks.len());
            self.warn_on_mismatch();
        }
    }

    /// Direct edit of one week. The week is locked at `raw`'s value and the
    /// difference flows forward; see [`policy::evaluate`] for the other cases.
    pub fn edit_week(&mut self, index: usize, raw: &str) -> Result<EditOutcome> {
        self.check_index(index)?;
        let value = parse_quantity(raw, &self.separators);
        self.phase = EditPhase::Idle;

        match policy::evaluate(&self.weeks, index) {
            Redistribution::Forward(targets) => Ok(self.commit(index, value, targets)),
            Redistribution::Solo => Ok(self.commit(index, value, Vec::new())),
            Redistribution::Backward(_) => {
                let preview =
                    policy::preview_backward(&self.weeks, self.total_quantity, index, value);
                tracing::info!(
                    "⏸️ Week {} → {} needs confirmation to redistribute into weeks {:?}",
                    index,
                    value,
                    preview.targets
                );
                self.phase = EditPhase::AwaitingConfirmation(PendingEdit { week: index, value });
                Ok(EditOutcome::AwaitingConfirmation(preview))
            }
            Redistribution::Blocked { locked } => {
                tracing::info!(
                    "🔒 Week {} → {} blocked: weeks {:?} are locked",
                    index,
                    value,
                    locked
                );
                self.phase = EditPhase::Blocked(PendingEdit { week: index, value });
                Ok(EditOutcome::Blocked { locked })
            }
        }
    }

    /// Clear a week's lock. Never redistributes by itself.
    pub fn unlock_week(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        self.weeks[index].locked = false;
        tracing::debug!("🔓 Week {} unlocked", index);
        Ok(())
    }

    /// Confirm the pending edit, optionally with a revised value.
    ///
    /// An open backward preview commits into the earlier unlocked weeks, re-read
    /// so an unlock made while it was open counts. A blocked edit is evaluated
    /// again from scratch: a later week unlocked since then absorbs it forward,
    /// an earlier one backward (the confirm is the acknowledgment).
    pub fn confirm_backward(&mut self, revised: Option<&str>) -> Result<EditOutcome> {
        let (pending, was_blocked) = match self.phase {
            EditPhase::AwaitingConfirmation(pending) => (pending, false),
            EditPhase::Blocked(pending) => (pending, true),
            EditPhase::Idle => return Err(PrintPlanError::NoPendingEdit),
        };
        let value = revised
            .map(|raw| parse_quantity(raw, &self.separators))
            .unwrap_or(pending.value);
        let week = pending.week;

        let targets = if was_blocked {
            match policy::evaluate(&self.weeks, week) {
                Redistribution::Forward(targets) | Redistribution::Backward(targets) => targets,
                Redistribution::Solo => Vec::new(),
                Redistribution::Blocked { locked } => {
                    self.phase = EditPhase::Blocked(PendingEdit { week, value });
                    return Ok(EditOutcome::Blocked { locked });
                }
            }
        } else {
            let targets = policy::backward_unlocked(&self.weeks, week);
            if targets.is_empty() {
                self.phase = EditPhase::Blocked(PendingEdit { week, value });
                return Ok(EditOutcome::Blocked {
                    locked: policy::locked_others(&self.weeks, week),
                });
            }
            targets
        };

        self.phase = EditPhase::Idle;
        Ok(self.commit(week, value, targets))
    }

    /// Drop the pending edit; nothing was changed so nothing is reverted.
    pub fn cancel_backward(&mut self) {
        if let EditPhase::AwaitingConfirmation(pending) | EditPhase::Blocked(pending) = self.phase {
            tracing::debug!("↩️ Discarded pending edit of week {}", pending.week);
        }
        self.phase = EditPhase::Idle;
    }

    /// New job total. An existing split spreads the change over every
    /// unlocked week, earlier ones included; otherwise the split is seeded
    /// if the dates are known.
    pub fn change_total(&mut self, raw: &str) {
        self.total_quantity = parse_quantity(raw, &self.separators);

        if self.weeks.is_empty() {
            self.seed_from_dates();
            return;
        }

        let targets = policy::all_unlocked(&self.weeks);
        let quantities = allocator::rebalance(&self.weeks, self.total_quantity, &targets);
        for (slot, quantity) in self.weeks.iter_mut().zip(quantities) {
            slot.quantity = quantity;
        }
        tracing::info!(
            "📦 Quantity → {} spread over weeks {:?}",
            self.total_quantity,
            targets
        );
        self.warn_on_mismatch();
    }

    /// New date range. Only seeds a split that does not exist yet; an
    /// existing split keeps its week count.
    pub fn change_dates(&mut self, start_date: Option<i64>, due_date: Option<i64>) {
        self.start_date = start_date;
        self.due_date = due_date;
        if self.weeks.is_empty() {
            self.seed_from_dates();
        } else {
            tracing::debug!(
                "📅 Dates changed; keeping existing split of {} weeks",
                self.weeks.len()
            );
        }
    }

    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    pub fn start_date(&self) -> Option<i64> {
        self.start_date
    }

    pub fn due_date(&self) -> Option<i64> {
        self.due_date
    }

    pub fn weeks(&self) -> &[WeekSlot] {
        &self.weeks
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn has_split(&self) -> bool {
        !self.weeks.is_empty()
    }

    pub fn summary(&self) -> SplitSummary {
        SplitSummary::new(allocator::split_total(&self.weeks), self.total_quantity)
    }

    /// Parallel arrays for the save request.
    pub fn record(&self) -> SplitRecord {
        SplitRecord::from_slots(&self.weeks)
    }

    fn seed_from_dates(&mut self) {
        let (Some(start), Some(due)) = (self.start_date, self.due_date) else {
            return;
        };
        if self.total_quantity == 0 {
            return;
        }
        let Some(count) = weeks::week_count(start, due, self.max_weeks) else {
            tracing::warn!(
                "📅 Dates give no usable week range (due before start or over {} weeks); no split",
                self.max_weeks
            );
            return;
        };
        self.weeks = allocator::initial_split(self.total_quantity, count)
            .into_iter()
            .map(WeekSlot::new)
            .collect();
        tracing::info!(
            "🗓️ Seeded {} over {} weeks",
            self.total_quantity,
            count
        );
    }

    fn commit(&mut self, index: usize, value: u64, targets: Vec<usize>) -> EditOutcome {
        self.weeks =
            allocator::apply_direct_edit(&self.weeks, self.total_quantity, index, value, &targets);
        tracing::info!(
            "✏️ Week {} → {} (locked), rebalanced weeks {:?}",
            index,
            value,
            targets
        );
        self.warn_on_mismatch();
        EditOutcome::Applied { targets }
    }

    fn warn_on_mismatch(&self) {
        let summary = self.summary();
        if !summary.is_balanced() {
            tracing::warn!("⚠️ {summary}");
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.weeks.len() {
            return Err(PrintPlanError::WeekOutOfRange {
                index,
                weeks: self.weeks.len(),
            });
        }
        Ok(())
    }
}
