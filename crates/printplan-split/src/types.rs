//! Split data model — week slots and the seed/record shapes exchanged with
//! the job loader and the save path.

use serde::{Deserialize, Serialize};

use crate::parse::parse_quantity;

/// One week's entry in a split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekSlot {
    /// Pieces assigned to this week.
    pub quantity: u64,
    /// Set by a direct edit; redistribution never touches a locked week.
    pub locked: bool,
}

impl WeekSlot {
    pub fn new(quantity: u64) -> Self {
        Self {
            quantity,
            locked: false,
        }
    }

    pub fn locked(quantity: u64) -> Self {
        Self {
            quantity,
            locked: true,
        }
    }
}

/// Build slots from the two parallel arrays a job is persisted with.
/// Missing lock flags default to unlocked; surplus flags are dropped.
pub fn slots_from_parts(split: &[u64], locks: Option<&[bool]>) -> Vec<WeekSlot> {
    split
        .iter()
        .enumerate()
        .map(|(i, &quantity)| WeekSlot {
            quantity,
            locked: locks.and_then(|l| l.get(i).copied()).unwrap_or(false),
        })
        .collect()
}

/// Job quantity as it arrives from the API mapper: a number or the raw text
/// of the quantity field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuantityInput {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

impl QuantityInput {
    /// Resolve to a non-negative integer; anything unusable is 0.
    pub fn resolve(&self, separators: &str) -> u64 {
        match self {
            QuantityInput::Number(n) => u64::try_from(*n).unwrap_or(0),
            QuantityInput::Text(s) => parse_quantity(s, separators),
            QuantityInput::Other(_) => 0,
        }
    }
}

impl From<u64> for QuantityInput {
    fn from(value: u64) -> Self {
        QuantityInput::Number(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// Everything needed to (re)build a split when a job form opens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SplitSeed {
    #[serde(default)]
    pub quantity: Option<QuantityInput>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub start_date: Option<i64>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub due_date: Option<i64>,
    #[serde(default)]
    pub weekly_split: Option<Vec<u64>>,
    #[serde(default)]
    pub locked_weeks: Option<Vec<bool>>,
}

/// The persisted form of a split: two parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub weekly_split: Vec<u64>,
    pub locked_weeks: Vec<bool>,
}

impl SplitRecord {
    pub fn from_slots(slots: &[WeekSlot]) -> Self {
        Self {
            weekly_split: slots.iter().map(|s| s.quantity).collect(),
            locked_weeks: slots.iter().map(|s| s.locked).collect(),
        }
    }
}

/// Split total against job quantity, shown next to the week grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub split_total: u64,
    pub quantity: u64,
    /// `quantity - split_total`; positive means pieces are still unassigned.
    pub difference: i128,
}

impl SplitSummary {
    pub fn new(split_total: u64, quantity: u64) -> Self {
        Self {
            split_total,
            quantity,
            difference: i128::from(quantity) - i128::from(split_total),
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.difference == 0
    }
}

impl std::fmt::Display for SplitSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_balanced() {
            write!(f, "split total {} matches quantity", self.split_total)
        } else {
            write!(
                f,
                "split total {} vs quantity {} (difference {:+})",
                self.split_total, self.quantity, self.difference
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_from_parts_pads_missing_locks() {
        let slots = slots_from_parts(&[10, 20, 30], Some(&[true]));
        assert_eq!(
            slots,
            vec![WeekSlot::locked(10), WeekSlot::new(20), WeekSlot::new(30)]
        );
        let slots = slots_from_parts(&[5], Some(&[false, true, true]));
        assert_eq!(slots, vec![WeekSlot::new(5)]);
        assert!(slots_from_parts(&[1, 2], None).iter().all(|s| !s.locked));
    }

    #[test]
    fn test_seed_accepts_number_or_text_quantity() {
        let seed: SplitSeed = serde_json::from_str(
            r#"{"quantity": "12,500", "start_date": 1767571200000, "due_date": 1768694400000}"#,
        )
        .unwrap();
        assert_eq!(seed.quantity.as_ref().unwrap().resolve(","), 12_500);
        assert!(seed.weekly_split.is_none());

        let seed: SplitSeed =
            serde_json::from_str(r#"{"quantity": 400, "weekly_split": [100, 300]}"#).unwrap();
        assert_eq!(seed.quantity.unwrap().resolve(","), 400);
        assert_eq!(seed.weekly_split, Some(vec![100, 300]));
    }

    #[test]
    fn test_unusable_quantity_resolves_to_zero() {
        assert_eq!(QuantityInput::Number(-5).resolve(","), 0);
        assert_eq!(QuantityInput::Text("abc".into()).resolve(","), 0);
        let seed: SplitSeed = serde_json::from_str(r#"{"quantity": 12.5}"#).unwrap();
        assert_eq!(seed.quantity.unwrap().resolve(","), 0);
    }

    #[test]
    fn test_record_serializes_parallel_arrays() {
        let record = SplitRecord::from_slots(&[WeekSlot::new(4), WeekSlot::locked(6)]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"weekly_split": [4, 6], "locked_weeks": [false, true]})
        );
    }

    #[test]
    fn test_summary_difference_sign() {
        let short = SplitSummary::new(380, 400);
        assert_eq!(short.difference, 20);
        assert!(!short.is_balanced());
        assert!(short.to_string().contains("+20"));

        let over = SplitSummary::new(410, 400);
        assert_eq!(over.difference, -10);
        assert!(SplitSummary::new(400, 400).is_balanced());
    }
}
