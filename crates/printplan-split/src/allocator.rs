//! Weekly split allocator — pure arithmetic over week slots.
//!
//! Division is truncating: for a signed difference `d` spread over `n`
//! targets, `d / n` rounds toward zero and `d % n` carries the sign of `d`.
//! So -7 over 3 targets is `[-3, -2, -2]`, never `[-2, -2, -3]` or
//! `[-3, -3, -1]`.

use crate::types::WeekSlot;

/// Even split of `total` over `week_count` weeks; the first
/// `total % week_count` weeks carry one extra piece.
pub fn initial_split(total: u64, week_count: usize) -> Vec<u64> {
    if week_count == 0 {
        return Vec::new();
    }
    let n = week_count as u64;
    let base = total / n;
    let remainder = (total % n) as usize;
    (0..week_count)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Sum of all slot quantities.
pub fn split_total(slots: &[WeekSlot]) -> u64 {
    clamp(slots.iter().map(|s| i128::from(s.quantity)).sum())
}

/// Spread `total - split_total(slots)` over `targets`, in the order given.
///
/// Slots not named in `targets` keep their quantity. Results are clamped at
/// zero, which can leave the split short of (or over) `total`; the caller
/// reports that as a mismatch rather than fixing it here.
pub fn rebalance(slots: &[WeekSlot], total: u64, targets: &[usize]) -> Vec<u64> {
    let mut quantities: Vec<u64> = slots.iter().map(|s| s.quantity).collect();
    if targets.is_empty() {
        return quantities;
    }

    let current: i128 = quantities.iter().map(|&q| i128::from(q)).sum();
    let difference = i128::from(total) - current;
    let count = targets.len() as i128;
    let base = difference / count;
    let remainder = difference % count;
    let extra_slots = remainder.unsigned_abs() as usize;

    for (position, &index) in targets.iter().enumerate() {
        let Some(quantity) = quantities.get_mut(index) else {
            continue;
        };
        let mut adjustment = base;
        if position < extra_slots {
            adjustment += remainder.signum();
        }
        *quantity = clamp(i128::from(*quantity) + adjustment);
    }
    quantities
}

/// Set `edited` to `value`, lock it, then rebalance over `targets`.
///
/// `targets` comes from the redistribution policy and must not contain the
/// edited week or any locked week.
pub fn apply_direct_edit(
    slots: &[WeekSlot],
    total: u64,
    edited: usize,
    value: u64,
    targets: &[usize],
) -> Vec<WeekSlot> {
    let mut updated = slots.to_vec();
    if let Some(slot) = updated.get_mut(edited) {
        slot.quantity = value;
        slot.locked = true;
    }
    let quantities = rebalance(&updated, total, targets);
    for (slot, quantity) in updated.iter_mut().zip(quantities) {
        slot.quantity = quantity;
    }
    updated
}

fn clamp(value: i128) -> u64 {
    u64::try_from(value.max(0)).unwrap_or(u64::MAX)
}
