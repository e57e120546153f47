//! Negative trait catalog.

use crate::config::RulesConfig;
use crate::dice::DiceRoller;
use crate::stats::{CaracSet, Characteristic};

/// Automatic consequences of a trait once active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TraitMechanics {
    pub carac_disadvantage: CaracSet,
    pub magic_disadvantage: bool,
    pub addiction: bool,
}

/// Condition revealing a secret trait.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecretTrigger {
    pub caracs: CaracSet,
    /// Totals at or under this value count as a bad roll.
    pub max_roll: i32,
    pub needed_fails: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NegativeTrait {
    pub key: String,
    pub label: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secret: bool,
    pub short_active: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub short_dormant: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mechanics: TraitMechanics,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secret_trigger: Option<SecretTrigger>,
}

impl NegativeTrait {
    pub fn is_none(&self) -> bool {
        self.key == RulesConfig::NO_NEGATIVE_TRAIT
    }

    /// Text shown while the trait is still hidden.
    pub fn dormant_text(&self) -> &str {
        self.short_dormant
            .as_deref()
            .unwrap_or("Ce défaut reste pour l'instant diffus et mal compris.")
    }
}

/// Ordered set of negative traits, always containing the `none` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "Vec<NegativeTrait>", into = "Vec<NegativeTrait>")
)]
pub struct TraitCatalog {
    traits: Vec<NegativeTrait>,
}

impl TraitCatalog {
    /// Builds a catalog, inserting the `none` entry when missing.
    pub fn new(mut traits: Vec<NegativeTrait>) -> Self {
        if !traits.iter().any(NegativeTrait::is_none) {
            traits.insert(0, none_entry());
        }
        Self { traits }
    }

    pub fn get(&self, key: &str) -> Option<&NegativeTrait> {
        self.traits.iter().find(|t| t.key == key)
    }

    /// Looks up a key, falling back to `none` for unknown keys.
    pub fn resolve(&self, key: &str) -> &NegativeTrait {
        self.get(key)
            .or_else(|| self.get(RulesConfig::NO_NEGATIVE_TRAIT))
            // Non-empty by construction.
            .unwrap_or(&self.traits[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &NegativeTrait> {
        self.traits.iter()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }

    /// Uniform pick among every trait except `none`.
    pub fn random_pick(&self, roller: &mut dyn DiceRoller) -> Option<&NegativeTrait> {
        let candidates: Vec<_> = self.traits.iter().filter(|t| !t.is_none()).collect();
        if candidates.is_empty() {
            return None;
        }
        Some(candidates[roller.pick(candidates.len())])
    }

    /// The built-in catalog shipped with the rules.
    pub fn builtin() -> Self {
        use Characteristic::*;

        let simple = |key: &str, label: &str, text: &str, mechanics: TraitMechanics| NegativeTrait {
            key: key.to_string(),
            label: label.to_string(),
            secret: false,
            short_active: text.to_string(),
            short_dormant: None,
            mechanics,
            secret_trigger: None,
        };
        let disadvantage = |caracs: &[Characteristic]| TraitMechanics {
            carac_disadvantage: caracs.iter().copied().collect(),
            ..TraitMechanics::default()
        };
        let secret = |key: &str,
                      label: &str,
                      dormant: &str,
                      active: &str,
                      carac: Characteristic,
                      magic: bool| NegativeTrait {
            key: key.to_string(),
            label: label.to_string(),
            secret: true,
            short_active: active.to_string(),
            short_dormant: Some(dormant.to_string()),
            mechanics: TraitMechanics {
                carac_disadvantage: carac.flag(),
                magic_disadvantage: magic,
                addiction: false,
            },
            secret_trigger: Some(SecretTrigger {
                caracs: carac.flag(),
                max_roll: 6,
                needed_fails: 2,
            }),
        };

        Self::new(vec![
            none_entry(),
            simple(
                "faible",
                "Faible",
                "Jets de Puissance en désavantage par défaut.",
                disadvantage(&[Puissance]),
            ),
            simple(
                "pas-lourd",
                "Pas lourd",
                "Jets d'Agilité en désavantage par défaut.",
                disadvantage(&[Agilite]),
            ),
            simple(
                "myope",
                "Myope",
                "Jets de Perception en désavantage (vision approximative, attention flottante).",
                disadvantage(&[Perception]),
            ),
            simple(
                "bete",
                "Bête",
                "Jets de Volonté en désavantage (esprit peu affûté, entêtement idiot).",
                disadvantage(&[Volonte]),
            ),
            simple(
                "magie-fissuree",
                "Magie fissurée",
                "Jets de Pouvoir et de magie en désavantage.",
                TraitMechanics {
                    magic_disadvantage: true,
                    ..disadvantage(&[Pouvoir])
                },
            ),
            simple(
                "addicte",
                "Addicte",
                "Après trop longtemps sans dose, tous les jets sont en désavantage.",
                TraitMechanics {
                    addiction: true,
                    ..TraitMechanics::default()
                },
            ),
            secret(
                "paranoiaque",
                "Paranoïaque",
                "Fatigue, insomnies, sursauts… On met ça sur le compte du stress.",
                "Jets de Volonté en désavantage (peur diffuse, suspicion permanente).",
                Volonte,
                false,
            ),
            secret(
                "marque-abime",
                "Marqué par l'Abîme",
                "Rêves marins, migraines, murmures lointains… tout va bien, probablement.",
                "Jets de Pouvoir en désavantage et magie instable.",
                Pouvoir,
                true,
            ),
            simple(
                "malchanceux",
                "Malchanceux",
                "Les tuiles lui tombent dessus. Le MJ est encouragé à lui mettre des bâtons dans les roues.",
                TraitMechanics::default(),
            ),
            simple(
                "superstitieux",
                "Superstitieux maladif",
                "Obsession des signes, présages, chiffres. Peut refuser des actions 'de principe'.",
                TraitMechanics::default(),
            ),
            simple(
                "cruel",
                "Cruel",
                "Prend plaisir à faire souffrir. Les PNJ finissent par le remarquer.",
                TraitMechanics::default(),
            ),
            simple(
                "morbide",
                "Obsédé par la mort",
                "Parle trop de cadavres, d'autopsies et d'extinctions. L'ambiance à table change un peu.",
                TraitMechanics::default(),
            ),
        ])
    }
}

impl From<Vec<NegativeTrait>> for TraitCatalog {
    fn from(traits: Vec<NegativeTrait>) -> Self {
        Self::new(traits)
    }
}

impl From<TraitCatalog> for Vec<NegativeTrait> {
    fn from(catalog: TraitCatalog) -> Self {
        catalog.traits
    }
}

impl Default for TraitCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn none_entry() -> NegativeTrait {
    NegativeTrait {
        key: RulesConfig::NO_NEGATIVE_TRAIT.to_string(),
        label: "Aucun défaut majeur".to_string(),
        secret: false,
        short_active: "Rien de particulièrement handicapant… pour l'instant.".to_string(),
        short_dormant: None,
        mechanics: TraitMechanics::default(),
        secret_trigger: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn builtin_catalog_has_all_entries() {
        let catalog = TraitCatalog::builtin();
        assert_eq!(catalog.len(), 13);
        let paranoid = catalog.get("paranoiaque").unwrap();
        assert!(paranoid.secret);
        assert_eq!(paranoid.secret_trigger.unwrap().needed_fails, 2);
        assert!(catalog.get("addicte").unwrap().mechanics.addiction);
    }

    #[test]
    fn unknown_keys_resolve_to_none() {
        let catalog = TraitCatalog::builtin();
        assert!(catalog.resolve("inexistant").is_none());
    }

    #[test]
    fn new_inserts_missing_none_entry() {
        let catalog = TraitCatalog::new(Vec::new());
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("none").is_some());
    }

    #[test]
    fn random_pick_never_returns_none() {
        let catalog = TraitCatalog::builtin();
        for face in 1..=12 {
            let mut dice = ScriptedDice::new([face]);
            let picked = catalog.random_pick(&mut dice).unwrap();
            assert!(!picked.is_none());
        }
    }
}
