//! Per-character negative trait progress.

use super::catalog::NegativeTrait;
use crate::stats::Characteristic;

/// `None -> Latent -> Revealed`. Latent only exists for secret traits and
/// revelation is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TraitState {
    #[default]
    None,
    Latent,
    Revealed,
}

impl TraitState {
    pub const fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Latent => "latent",
            Self::Revealed => "revealed",
        }
    }

    pub fn from_key(raw: &str) -> Self {
        match raw.trim() {
            "latent" => Self::Latent,
            "revealed" => Self::Revealed,
            _ => Self::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TraitProgress {
    pub key: String,
    pub state: TraitState,
    pub fail_count: u32,
}

impl Default for TraitProgress {
    fn default() -> Self {
        Self {
            key: crate::config::RulesConfig::NO_NEGATIVE_TRAIT.to_string(),
            state: TraitState::None,
            fail_count: 0,
        }
    }
}

/// Emitted once when a secret trait surfaces.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Revelation {
    pub key: String,
    pub label: String,
}

impl TraitProgress {
    /// Fresh progress for a newly chosen trait.
    pub fn assign(def: &NegativeTrait) -> Self {
        let state = if def.is_none() {
            TraitState::None
        } else if def.secret {
            TraitState::Latent
        } else {
            TraitState::Revealed
        };
        Self {
            key: def.key.clone(),
            state,
            fail_count: 0,
        }
    }

    /// Repairs progress read from untrusted data so it agrees with `def`.
    pub fn normalize(&mut self, def: &NegativeTrait) {
        if self.key != def.key {
            *self = Self::assign(def);
            return;
        }
        self.state = match (self.state, def.is_none(), def.secret) {
            (_, true, _) => TraitState::None,
            (TraitState::Revealed, false, _) => TraitState::Revealed,
            (_, false, true) => TraitState::Latent,
            (_, false, false) => TraitState::Revealed,
        };
    }

    /// Whether the trait's mechanics currently apply.
    pub fn is_active(&self, def: &NegativeTrait) -> bool {
        !def.is_none() && (!def.secret || self.state == TraitState::Revealed)
    }

    /// Counts a bad roll on a triggering characteristic and reveals the
    /// trait once enough have accumulated.
    pub fn record_roll(
        &mut self,
        def: &NegativeTrait,
        carac: Characteristic,
        total: i32,
    ) -> Option<Revelation> {
        if self.state != TraitState::Latent {
            return None;
        }
        let trigger = def.secret_trigger?;
        if !trigger.caracs.has(carac) || total > trigger.max_roll {
            return None;
        }

        self.fail_count += 1;
        if self.fail_count < trigger.needed_fails {
            return None;
        }
        self.state = TraitState::Revealed;
        self.fail_count = 0;
        Some(Revelation {
            key: def.key.clone(),
            label: def.label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negative::TraitCatalog;

    #[test]
    fn assignment_state_depends_on_secrecy() {
        let catalog = TraitCatalog::builtin();
        assert_eq!(
            TraitProgress::assign(catalog.resolve("none")).state,
            TraitState::None
        );
        assert_eq!(
            TraitProgress::assign(catalog.resolve("faible")).state,
            TraitState::Revealed
        );
        assert_eq!(
            TraitProgress::assign(catalog.resolve("paranoiaque")).state,
            TraitState::Latent
        );
    }

    #[test]
    fn two_bad_rolls_reveal_secret_trait() {
        let catalog = TraitCatalog::builtin();
        let def = catalog.resolve("paranoiaque");
        let mut progress = TraitProgress::assign(def);

        assert!(progress.record_roll(def, Characteristic::Volonte, 6).is_none());
        assert_eq!(progress.state, TraitState::Latent);
        assert_eq!(progress.fail_count, 1);

        let revelation = progress.record_roll(def, Characteristic::Volonte, 3);
        assert_eq!(revelation.map(|r| r.label), Some("Paranoïaque".to_string()));
        assert_eq!(progress.state, TraitState::Revealed);
        assert!(progress.is_active(def));
    }

    #[test]
    fn other_characteristics_and_good_rolls_do_not_count() {
        let catalog = TraitCatalog::builtin();
        let def = catalog.resolve("paranoiaque");
        let mut progress = TraitProgress::assign(def);

        progress.record_roll(def, Characteristic::Agilite, 1);
        progress.record_roll(def, Characteristic::Volonte, 7);
        assert_eq!(progress.fail_count, 0);
        assert!(!progress.is_active(def));
    }

    #[test]
    fn revelation_is_terminal() {
        let catalog = TraitCatalog::builtin();
        let def = catalog.resolve("marque-abime");
        let mut progress = TraitProgress {
            key: def.key.clone(),
            state: TraitState::Revealed,
            fail_count: 0,
        };
        assert!(progress.record_roll(def, Characteristic::Pouvoir, 1).is_none());
        progress.normalize(def);
        assert_eq!(progress.state, TraitState::Revealed);
    }

    #[test]
    fn normalize_forbids_latent_public_traits() {
        let catalog = TraitCatalog::builtin();
        let def = catalog.resolve("myope");
        let mut progress = TraitProgress {
            key: def.key.clone(),
            state: TraitState::Latent,
            fail_count: 4,
        };
        progress.normalize(def);
        assert_eq!(progress.state, TraitState::Revealed);
    }
}
