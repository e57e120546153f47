//! Addiction timers.

use chrono::{DateTime, TimeDelta, Utc};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Substance {
    Tabac,
    Alcool,
    Drogue,
}

impl Substance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Tabac => "Tabac",
            Self::Alcool => "Alcool",
            Self::Drogue => "Drogue",
        }
    }

    /// Host key (`"tabac"`).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Tabac => "tabac",
            Self::Alcool => "alcool",
            Self::Drogue => "drogue",
        }
    }

    /// Parses a host key. Anything else means no substance.
    pub fn from_key(raw: &str) -> Option<Self> {
        match crate::text::fold(raw.trim()).as_str() {
            "tabac" => Some(Self::Tabac),
            "alcool" => Some(Self::Alcool),
            "drogue" => Some(Self::Drogue),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct AddictionState {
    pub substance: Option<Substance>,
    pub last_dose: Option<DateTime<Utc>>,
    /// Last value published by the sweep.
    pub withdrawal: bool,
}

impl AddictionState {
    pub fn hours_since_last_dose(&self, now: DateTime<Utc>) -> Option<f64> {
        self.last_dose
            .map(|dose| (now - dose).num_seconds() as f64 / 3600.0)
    }

    /// True once `threshold` has elapsed since the last dose, or right away
    /// when no dose was ever recorded.
    pub fn withdrawal_due(&self, now: DateTime<Utc>, threshold: TimeDelta) -> bool {
        match self.last_dose {
            Some(dose) => now - dose >= threshold,
            None => true,
        }
    }

    /// Choosing a substance starts its clock.
    pub fn set_substance(&mut self, substance: Option<Substance>, now: DateTime<Utc>) {
        self.substance = substance;
        self.last_dose = substance.map(|_| now);
        self.withdrawal = false;
    }

    pub fn record_dose(&mut self, now: DateTime<Utc>) {
        self.last_dose = Some(now);
    }

    /// Recomputes the stored flag. Returns the new value when it flipped.
    pub fn refresh(&mut self, now: DateTime<Utc>, threshold: TimeDelta) -> Option<bool> {
        let due = self.withdrawal_due(now, threshold);
        if due == self.withdrawal {
            return None;
        }
        self.withdrawal = due;
        Some(due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dosed(hours_ago: i64, now: DateTime<Utc>) -> AddictionState {
        AddictionState {
            substance: Some(Substance::Tabac),
            last_dose: Some(now - TimeDelta::hours(hours_ago)),
            withdrawal: false,
        }
    }

    #[test]
    fn substance_keys_are_lenient() {
        assert_eq!(Substance::from_key(" Alcool "), Some(Substance::Alcool));
        assert_eq!(Substance::from_key("café"), None);
        assert_eq!(Substance::Drogue.key(), "drogue");
    }

    #[test]
    fn withdrawal_after_threshold() {
        let now = Utc::now();
        let threshold = TimeDelta::hours(24);
        assert!(dosed(25, now).withdrawal_due(now, threshold));
        assert!(!dosed(10, now).withdrawal_due(now, threshold));
        assert!(AddictionState::default().withdrawal_due(now, threshold));
    }

    #[test]
    fn hours_since_dose() {
        let now = Utc::now();
        let hours = dosed(10, now).hours_since_last_dose(now).unwrap();
        assert!((hours - 10.0).abs() < 1e-9);
        assert!(AddictionState::default().hours_since_last_dose(now).is_none());
    }

    #[test]
    fn refresh_reports_flips_in_both_directions() {
        let now = Utc::now();
        let threshold = TimeDelta::hours(24);
        let mut state = dosed(30, now);
        assert_eq!(state.refresh(now, threshold), Some(true));
        assert_eq!(state.refresh(now, threshold), None);
        state.record_dose(now);
        assert_eq!(state.refresh(now, threshold), Some(false));
    }

    #[test]
    fn choosing_substance_starts_the_clock() {
        let now = Utc::now();
        let mut state = AddictionState::default();
        state.set_substance(Some(Substance::Alcool), now);
        assert_eq!(state.last_dose, Some(now));
        assert!(!state.withdrawal_due(now, TimeDelta::hours(24)));
    }
}
