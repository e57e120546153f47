//! Carry capacity and encumbrance.

use crate::state::Item;

/// Encumbrance summary of an inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarryLoad {
    pub used: u32,
    pub base: u32,
    pub bonus: u32,
    pub max: u32,
    pub free: u32,
    pub overload: u32,
    /// `used / max` in percent, capped at 100 for display.
    pub percent: u32,
    pub overloaded: bool,
}

impl CarryLoad {
    /// Sums encumbrance over physical items and capacity over every item.
    pub fn compute<'a>(items: impl IntoIterator<Item = &'a Item>, base: u32) -> Self {
        let (used, bonus) = items
            .into_iter()
            .fold((0u32, 0u32), |(used, bonus), item| {
                let weight = if item.kind.is_conceptual() {
                    0
                } else {
                    item.encumbrance
                };
                (
                    used.saturating_add(weight),
                    bonus.saturating_add(item.capacity_pe),
                )
            });
        let max = base.saturating_add(bonus);
        let percent = if max == 0 {
            if used > 0 { 100 } else { 0 }
        } else {
            let (used, max) = (u64::from(used), u64::from(max));
            ((used * 100 + max / 2) / max).min(100) as u32
        };

        Self {
            used,
            base,
            bonus,
            max,
            free: max.saturating_sub(used),
            overload: used.saturating_sub(max),
            percent,
            overloaded: used > max,
        }
    }
}
