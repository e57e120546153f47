//! Rejected engine requests.

use crate::error::{ErrorSeverity, RulesError};
use crate::state::ItemId;
use crate::stats::PoolKind;

use super::notice::Notice;

/// Why an engine operation refused to run. The actors are left untouched.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("no target selected")]
    NoTarget,

    #[error("an actor cannot target itself")]
    SelfTarget,

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("item '{0}' has no enabled attack")]
    MissingAttackConfig(String),

    #[error("not enough actions: {left} left, {needed} needed")]
    InsufficientActions { left: u32, needed: u32 },

    #[error("not enough {pool:?}: {available} available, {needed} needed")]
    InsufficientResource {
        pool: PoolKind,
        available: u32,
        needed: u32,
    },

    #[error("item '{0}' cannot be equipped")]
    NotEquippable(String),

    #[error("item '{0}' has nothing to use")]
    NothingToUse(String),

    #[error("effect index {index} out of range ({len} effects)")]
    EffectIndexOutOfRange { index: usize, len: usize },

    #[error("effect label is empty")]
    EmptyEffectLabel,

    #[error("unknown negative trait '{0}'")]
    UnknownTrait(String),

    #[error("no substance to consume")]
    NoSubstance,

    #[error("cancelled by the user")]
    Cancelled,
}

impl ActionError {
    /// User-facing warning for this refusal.
    pub fn notice(&self) -> Notice {
        use ActionError::*;
        let text = match self {
            NoTarget => "Aucune cible sélectionnée.".to_string(),
            SelfTarget => "Impossible de se cibler soi-même.".to_string(),
            ItemNotFound(id) => format!("Objet introuvable ({id})."),
            MissingAttackConfig(name) => {
                format!("{name} n'a pas de configuration d'attaque active.")
            }
            InsufficientActions { left, needed } => {
                format!("Pas assez d'actions : {left} restante(s), {needed} requise(s).")
            }
            InsufficientResource {
                pool,
                available,
                needed,
            } => format!(
                "Pas assez de {} : {available} disponible(s), {needed} requis.",
                pool.label()
            ),
            NotEquippable(name) => format!("{name} ne peut pas être équipé."),
            NothingToUse(name) => format!("{name} n'a aucun effet actif."),
            EffectIndexOutOfRange { .. } => "Effet introuvable.".to_string(),
            EmptyEffectLabel => "L'effet doit avoir un nom.".to_string(),
            UnknownTrait(key) => format!("Défaut inconnu : {key}."),
            NoSubstance => "Aucune substance définie.".to_string(),
            Cancelled => "Action annulée.".to_string(),
        };
        Notice::warn(text)
    }
}

impl RulesError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            InsufficientActions { .. } | InsufficientResource { .. } => ErrorSeverity::Recoverable,
            Cancelled => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            NoTarget => "ACTION_NO_TARGET",
            SelfTarget => "ACTION_SELF_TARGET",
            ItemNotFound(_) => "ACTION_ITEM_NOT_FOUND",
            MissingAttackConfig(_) => "ACTION_MISSING_ATTACK_CONFIG",
            InsufficientActions { .. } => "ACTION_INSUFFICIENT_ACTIONS",
            InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            NotEquippable(_) => "ACTION_NOT_EQUIPPABLE",
            NothingToUse(_) => "ACTION_NOTHING_TO_USE",
            EffectIndexOutOfRange { .. } => "ACTION_EFFECT_INDEX_OUT_OF_RANGE",
            EmptyEffectLabel => "ACTION_EMPTY_EFFECT_LABEL",
            UnknownTrait(_) => "ACTION_UNKNOWN_TRAIT",
            NoSubstance => "ACTION_NO_SUBSTANCE",
            Cancelled => "ACTION_CANCELLED",
        }
    }
}
