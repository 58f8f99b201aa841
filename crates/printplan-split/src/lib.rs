//! # PrintPlan Split
//!
//! Spreads a job's total quantity across the calendar weeks between its
//! start and due dates, and keeps that split consistent while the planner
//! edits individual weeks.
//!
//! ## Architecture
//! ```text
//! SplitStateStore (one per open job form)
//!   ├── seed / change_total / change_dates
//!   ├── edit_week(i, "1,500")
//!   │     → policy::evaluate
//!   │         ├── Forward(targets)   → allocator::apply_direct_edit → commit
//!   │         ├── Backward(targets)  → AwaitingConfirmation(preview)
//!   │         │                          ├── confirm_backward → commit
//!   │         │                          └── cancel_backward  → no change
//!   │         └── Blocked { locked } → unlock_week, then retry
//!   └── record() → { weekly_split, locked_weeks } → JobStore
//! ```

pub mod allocator;
pub mod parse;
pub mod policy;
pub mod state;
pub mod store;
pub mod types;
pub mod weeks;

pub use allocator::{apply_direct_edit, initial_split, rebalance};
pub use policy::{BackwardPreview, EditPhase, PendingEdit, Redistribution};
pub use state::{EditOutcome, SplitStateStore};
pub use store::{JobStore, StoredJob};
pub use types::{QuantityInput, SplitRecord, SplitSeed, SplitSummary, WeekSlot};
