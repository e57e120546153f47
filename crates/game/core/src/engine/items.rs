//! Using items and routing a click on an item to the right operation.

use crate::combat::StanceKind;
use crate::dice::DiceRoller;
use crate::state::{ActorId, Character, Item, ItemId, ItemKind};
use crate::stats::{EffectivePool, PoolBonusKey, PoolKind, apply_effective_delta};
use crate::tags::{ActiveDirective, parse_active_tag};

use super::attack::check_pool;
use super::grants::remove_with_grants;
use super::{
    ActionContext, ActionError, AttackResolution, CheckResult, CompetenceResult, Notice, Prompt,
    RulesEngine,
};

/// What the effect tag did to the target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UseEffect {
    /// The item has no effect tag.
    Nothing,
    Heal { amount: i32, pv: EffectivePool },
    HealOverTime { pv: i32, period: String },
    StatCheck(CheckResult),
    Note(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemUse {
    pub item: String,
    pub owner: ActorId,
    pub target: ActorId,
    pub effect: UseEffect,
    /// Uses left on an item with finite uses.
    pub uses_left: Option<u32>,
    /// The item was deleted after use.
    pub destroyed: bool,
    pub narrative: String,
    pub notices: Vec<Notice>,
}

/// Which operation a click on an item leads to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UsageKind {
    DefenseStance(StanceKind),
    Attack,
    Spell,
    Skill,
    Active,
    /// Nothing to do but look at the item.
    Inspect,
}

impl UsageKind {
    pub fn of(item: &Item) -> Self {
        if let Some(kind) = StanceKind::from_skill_name(&item.name) {
            return Self::DefenseStance(kind);
        }
        if item.kind.is_spell() {
            return Self::Spell;
        }
        if item.enabled_attack().is_some() {
            return Self::Attack;
        }
        if item.kind == ItemKind::Skill {
            return Self::Skill;
        }
        if item.effect_tag.as_deref().is_some_and(|tag| !tag.trim().is_empty()) {
            return Self::Active;
        }
        Self::Inspect
    }
}

/// Result of [`RulesEngine::route_usage`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Usage {
    Stance(Notice),
    Attack(Box<AttackResolution>),
    Competence(CompetenceResult),
    Item(ItemUse),
    Inspect,
}

impl RulesEngine {
    /// Uses an item on `target`, or on its owner when no target is given.
    ///
    /// Spells pay their PS and PV costs first. Finite uses are decremented
    /// and the item is deleted when it is destroyed on use and exhausted.
    pub fn use_item(
        &self,
        owner: &mut Character,
        item: ItemId,
        mut target: Option<&mut Character>,
        ctx: ActionContext,
        prompt: &mut dyn Prompt,
        roller: &mut dyn DiceRoller,
    ) -> Result<ItemUse, ActionError> {
        let used = owner
            .item(item)
            .cloned()
            .ok_or(ActionError::ItemNotFound(item))?;
        let (cost_ps, cost_pv) = if used.kind.is_spell() {
            (used.cost_ps, used.cost_pv)
        } else {
            (0, 0)
        };
        check_pool(owner, PoolKind::Ps, cost_ps)?;
        check_pool(owner, PoolKind::Pv, cost_pv)?;
        if target.as_deref().is_some_and(|t| t.id == owner.id) {
            target = None;
        }

        let directive = used.effect_tag.as_deref().and_then(parse_active_tag);
        let check_mode = match &directive {
            Some(ActiveDirective::StatCheck { carac, .. }) => {
                let who: &Character = target.as_deref().unwrap_or(&*owner);
                let default = self.default_mode(who, Some(*carac), false, ctx.now);
                Some(
                    prompt
                        .check_mode(&used.name, default)
                        .ok_or(ActionError::Cancelled)?,
                )
            }
            _ => None,
        };

        // Committed from here on.
        owner.pools.ps.try_spend(cost_ps);
        owner.pools.pv.try_spend(cost_pv);

        let mut notices = Vec::new();
        if let Some(substance) = used.addiction {
            notices.push(self.record_dose(owner, substance, ctx.now));
        }

        let target_id = target.as_deref().map_or(owner.id, |t| t.id);
        let target_ref: &mut Character = match target {
            Some(t) => t,
            None => &mut *owner,
        };
        let (effect, narrative) =
            self.apply_directive(target_ref, directive, check_mode, &used.name, roller);
        if let UseEffect::StatCheck(check) = &effect {
            notices.extend(check.notices.iter().cloned());
        }

        let mut uses_left = None;
        if let Some(owned) = owner.item_mut(item) {
            if owned.uses_max > 0 {
                owned.uses = owned.uses.saturating_sub(1);
                uses_left = Some(owned.uses);
            }
        }
        let destroyed = owner.item(item).is_some_and(Item::consumed_on_use);
        if destroyed {
            remove_with_grants(owner, item);
        }
        tracing::debug!(actor = %owner.id, item = %used.name, destroyed, "item used");

        Ok(ItemUse {
            item: used.name,
            owner: owner.id,
            target: target_id,
            effect,
            uses_left,
            destroyed,
            narrative,
            notices,
        })
    }

    fn apply_directive(
        &self,
        target: &mut Character,
        directive: Option<ActiveDirective>,
        check_mode: Option<crate::combat::RollMode>,
        label: &str,
        roller: &mut dyn DiceRoller,
    ) -> (UseEffect, String) {
        match directive {
            None => (
                UseEffect::Nothing,
                "Aucun effet actif défini sur cet objet.".to_string(),
            ),
            Some(ActiveDirective::Heal { pv }) => {
                let bonus = target.bonuses().pool(PoolBonusKey::PvMax);
                let after = apply_effective_delta(&mut target.pools.pv, bonus, i64::from(pv));
                let verb = if pv >= 0 { "Soigne" } else { "Inflige" };
                let text = format!("{verb} {} PV → {}/{}", pv.unsigned_abs(), after.value, after.max);
                (UseEffect::Heal { amount: pv, pv: after }, text)
            }
            Some(ActiveDirective::HealOverTime { pv, period }) => {
                let text =
                    format!("Effet sur la durée : {pv} PV par {period} (à gérer narrativement).");
                (UseEffect::HealOverTime { pv, period }, text)
            }
            Some(ActiveDirective::StatCheck { carac, difficulty }) => {
                let mode = check_mode.unwrap_or_default();
                let bonus = target.bonuses().carac(carac);
                let roll = mode
                    .formula(target.attributes.get(carac), bonus)
                    .roll(roller);
                let notices = self
                    .record_trait_roll(target, carac, roll.total)
                    .into_iter()
                    .collect();
                let text = format!(
                    "Jet de {} ({label}) : {} (diff. {difficulty})",
                    carac.label(),
                    roll.total
                );
                let check = CheckResult {
                    carac,
                    mode,
                    roll,
                    difficulty: Some(difficulty),
                    notices,
                };
                (UseEffect::StatCheck(check), text)
            }
            Some(ActiveDirective::Note(note)) => {
                let text = format!("Note : {note}");
                (UseEffect::Note(note), text)
            }
        }
    }

    /// Dispatches a click on an item: defensive skills arm their stance,
    /// spells and attacks resolve against the target, skills roll, anything
    /// else with an effect tag is used.
    pub fn route_usage(
        &self,
        owner: &mut Character,
        item: ItemId,
        target: Option<&mut Character>,
        ctx: ActionContext,
        prompt: &mut dyn Prompt,
        roller: &mut dyn DiceRoller,
    ) -> Result<Usage, ActionError> {
        let clicked = owner.item(item).ok_or(ActionError::ItemNotFound(item))?;
        let has_attack = clicked.enabled_attack().is_some();
        match UsageKind::of(clicked) {
            UsageKind::DefenseStance(_) => {
                let restricted = None;
                self.arm_defense_stance(owner, item, restricted)
                    .map(Usage::Stance)
            }
            UsageKind::Attack => self
                .resolve_attack(owner, item, target, ctx, prompt, roller)
                .map(|r| Usage::Attack(Box::new(r))),
            UsageKind::Spell if has_attack => self
                .resolve_attack(owner, item, target, ctx, prompt, roller)
                .map(|r| Usage::Attack(Box::new(r))),
            UsageKind::Spell | UsageKind::Active => self
                .use_item(owner, item, target, ctx, prompt, roller)
                .map(Usage::Item),
            UsageKind::Skill => self
                .competence_roll(owner, item, ctx.now, prompt, roller)
                .map(Usage::Competence),
            UsageKind::Inspect => Ok(Usage::Inspect),
        }
    }
}
