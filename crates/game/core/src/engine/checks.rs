//! Characteristic tests, competence rolls and initiative.

use chrono::{DateTime, Utc};

use crate::combat::{DefenseStance, RollMode, StanceKind};
use crate::dice::{DiceRoller, Roll};
use crate::state::{ActorId, Character, ItemId};
use crate::stats::{Characteristic, DieCode};

use super::{ActionError, Notice, Prompt, RulesEngine};

/// A single characteristic roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CheckResult {
    pub carac: Characteristic,
    pub mode: RollMode,
    pub roll: Roll,
    pub difficulty: Option<u32>,
    pub notices: Vec<Notice>,
}

impl CheckResult {
    pub fn total(&self) -> i32 {
        self.roll.total
    }

    /// `None` for open tests without a difficulty.
    pub fn success(&self) -> Option<bool> {
        self.difficulty.map(|d| self.roll.total >= d as i32)
    }
}

/// Characteristic die and skill die rolled together, the better one kept.
///
/// Only the skill die follows `mode`; the characteristic die is always plain.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompetenceResult {
    pub skill: String,
    pub carac: Characteristic,
    pub mode: RollMode,
    pub carac_roll: Roll,
    pub skill_roll: Roll,
    pub kept: i32,
    /// Stance armed by a defensive skill.
    pub stance: Option<StanceKind>,
    pub notices: Vec<Notice>,
}

impl RulesEngine {
    fn check_roll(
        character: &Character,
        carac: Characteristic,
        mode: RollMode,
        roller: &mut dyn DiceRoller,
    ) -> Roll {
        let bonus = character.bonuses().carac(carac);
        mode.formula(character.attributes.get(carac), bonus).roll(roller)
    }

    /// Quick test: the mode comes from the negative trait, no prompt.
    pub fn quick_test(
        &self,
        character: &mut Character,
        carac: Characteristic,
        now: DateTime<Utc>,
        roller: &mut dyn DiceRoller,
    ) -> CheckResult {
        let mode = self.default_mode(character, Some(carac), false, now);
        let roll = Self::check_roll(character, carac, mode, roller);
        tracing::debug!(actor = %character.id, %carac, total = roll.total, "quick test");
        let notices = self
            .record_trait_roll(character, carac, roll.total)
            .into_iter()
            .collect();
        CheckResult {
            carac,
            mode,
            roll,
            difficulty: None,
            notices,
        }
    }

    /// Test against a difficulty, as requested by an item's effect tag.
    #[allow(clippy::too_many_arguments)]
    pub fn stat_check(
        &self,
        character: &mut Character,
        carac: Characteristic,
        difficulty: u32,
        label: &str,
        now: DateTime<Utc>,
        prompt: &mut dyn Prompt,
        roller: &mut dyn DiceRoller,
    ) -> Result<CheckResult, ActionError> {
        let default = self.default_mode(character, Some(carac), false, now);
        let mode = prompt
            .check_mode(label, default)
            .ok_or(ActionError::Cancelled)?;
        let roll = Self::check_roll(character, carac, mode, roller);
        let notices = self
            .record_trait_roll(character, carac, roll.total)
            .into_iter()
            .collect();
        Ok(CheckResult {
            carac,
            mode,
            roll,
            difficulty: Some(difficulty),
            notices,
        })
    }

    /// Competence roll. A defensive skill also arms its stance.
    pub fn competence_roll(
        &self,
        character: &mut Character,
        item: ItemId,
        now: DateTime<Utc>,
        prompt: &mut dyn Prompt,
        roller: &mut dyn DiceRoller,
    ) -> Result<CompetenceResult, ActionError> {
        let skill = character.item(item).ok_or(ActionError::ItemNotFound(item))?;
        let name = skill.name.clone();
        let carac = skill.carac.unwrap_or(Characteristic::Puissance);
        let die = skill.level.unwrap_or(DieCode::DEFAULT);
        let magic = skill.kind.is_spell();
        let stance_kind = StanceKind::from_skill_name(&name);

        let default = self.default_mode(character, Some(carac), magic, now);
        let mode = prompt
            .check_mode(&name, default)
            .ok_or(ActionError::Cancelled)?;

        let mut notices = Vec::new();
        if let Some(kind) = stance_kind {
            notices.push(Self::arm_stance(character, kind, None));
        }

        let carac_roll = Self::check_roll(character, carac, RollMode::Normal, roller);
        let skill_roll = mode.formula(die, 0).roll(roller);
        let kept = carac_roll.total.max(skill_roll.total);
        notices.extend(self.record_trait_roll(character, carac, kept));

        Ok(CompetenceResult {
            skill: name,
            carac,
            mode,
            carac_roll,
            skill_roll,
            kept,
            stance: stance_kind,
            notices,
        })
    }

    /// Arms the stance of a defensive skill without rolling.
    pub fn arm_defense_stance(
        &self,
        character: &mut Character,
        item: ItemId,
        restricted_to: Option<ActorId>,
    ) -> Result<Notice, ActionError> {
        let skill = character.item(item).ok_or(ActionError::ItemNotFound(item))?;
        let kind = StanceKind::from_skill_name(&skill.name)
            .ok_or_else(|| ActionError::NothingToUse(skill.name.clone()))?;
        Ok(Self::arm_stance(character, kind, restricted_to))
    }

    fn arm_stance(
        character: &mut Character,
        kind: StanceKind,
        restricted_to: Option<ActorId>,
    ) -> Notice {
        let mut stance = DefenseStance::new(kind);
        stance.restricted_to = restricted_to;
        character.stance = Some(stance);
        Notice::info(format!(
            "{} adopte une posture de résistance {} (avantage sur la prochaine défense).",
            character.name,
            kind.label()
        ))
    }

    /// Initiative: agilité die plus its bonus.
    pub fn initiative(&self, character: &Character, roller: &mut dyn DiceRoller) -> Roll {
        Self::check_roll(character, Characteristic::Agilite, RollMode::Normal, roller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::engine::fixtures::{character, engine, now};
    use crate::engine::{AutoPrompt, CancelPrompt};
    use crate::negative::{TraitProgress, TraitState};
    use crate::state::{Item, ItemKind};
    use crate::stats::{Effect, EffectKind, EffectTarget};

    #[test]
    fn quick_test_uses_trait_mode() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        hero.negative_trait = TraitProgress::assign(engine.catalog().resolve("pas-lourd"));
        let mut dice = ScriptedDice::new([5, 2]);
        let result = engine.quick_test(&mut hero, Characteristic::Agilite, now(), &mut dice);
        assert_eq!(result.mode, RollMode::Disadvantage);
        assert_eq!(result.total(), 2);
        assert_eq!(result.success(), None);
    }

    #[test]
    fn two_bad_tests_reveal_a_secret_trait() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        hero.attributes.volonte = DieCode::D8;
        hero.negative_trait = TraitProgress::assign(engine.catalog().resolve("paranoiaque"));
        let mut dice = ScriptedDice::new([3, 6]);

        let first = engine.quick_test(&mut hero, Characteristic::Volonte, now(), &mut dice);
        assert!(first.notices.is_empty());
        assert_eq!(hero.negative_trait.fail_count, 1);

        let second = engine.quick_test(&mut hero, Characteristic::Volonte, now(), &mut dice);
        assert_eq!(hero.negative_trait.state, TraitState::Revealed);
        assert_eq!(
            second.notices[0].text,
            "Aube révèle enfin son véritable défaut : « Paranoïaque »."
        );
    }

    #[test]
    fn competence_keeps_the_better_die() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        let mut climb = Item::new(ItemId(0), "Escalade", ItemKind::Skill);
        climb.carac = Some(Characteristic::Agilite);
        climb.level = Some(DieCode::D10);
        let id = hero.add_item(climb);

        let mut dice = ScriptedDice::new([2, 9]);
        let result = engine
            .competence_roll(&mut hero, id, now(), &mut AutoPrompt, &mut dice)
            .unwrap();
        assert_eq!((result.carac_roll.total, result.skill_roll.total), (2, 9));
        assert_eq!(result.kept, 9);
        assert!(result.stance.is_none());
    }

    #[test]
    fn disadvantage_only_touches_the_skill_die() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        hero.negative_trait = TraitProgress::assign(engine.catalog().resolve("faible"));
        let mut lift = Item::new(ItemId(0), "Soulever", ItemKind::Skill);
        lift.carac = Some(Characteristic::Puissance);
        let id = hero.add_item(lift);

        let mut dice = ScriptedDice::new([6, 5, 2]);
        let result = engine
            .competence_roll(&mut hero, id, now(), &mut AutoPrompt, &mut dice)
            .unwrap();
        assert_eq!(result.mode, RollMode::Disadvantage);
        assert_eq!(result.carac_roll.formula.to_string(), "1d6");
        assert_eq!(result.carac_roll.total, 6);
        assert_eq!(result.skill_roll.formula.to_string(), "2d6kl1");
        assert_eq!(result.skill_roll.total, 2);
        assert_eq!(result.kept, 6);
    }

    #[test]
    fn huge_effect_bonus_saturates_the_check() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        hero.effects.push(
            Effect::new("Force titanesque", EffectKind::Buff)
                .with_target(EffectTarget::Carac(Characteristic::Puissance), i32::MAX),
        );
        let mut dice = ScriptedDice::new([6]);
        let result = engine.quick_test(&mut hero, Characteristic::Puissance, now(), &mut dice);
        assert_eq!(result.total(), i32::MAX);
    }

    #[test]
    fn resistance_skill_arms_stance_and_rolls() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        let id = hero.add_item(Item::new(ItemId(0), "Résistance physique", ItemKind::Skill));
        let mut dice = ScriptedDice::new([4, 4]);
        let result = engine
            .competence_roll(&mut hero, id, now(), &mut AutoPrompt, &mut dice)
            .unwrap();
        assert_eq!(result.stance, Some(StanceKind::Physical));
        assert_eq!(hero.stance.map(|s| s.kind), Some(StanceKind::Physical));
    }

    #[test]
    fn cancelled_competence_changes_nothing() {
        let engine = engine();
        let mut hero = character(1, "Aube");
        let id = hero.add_item(Item::new(ItemId(0), "Résistance mentale", ItemKind::Skill));
        let before = hero.clone();
        let err = engine
            .competence_roll(&mut hero, id, now(), &mut CancelPrompt, &mut ScriptedDice::new([]))
            .unwrap_err();
        assert_eq!(err, ActionError::Cancelled);
        assert_eq!(hero, before);
    }

    #[test]
    fn initiative_rolls_agility() {
        let engine = engine();
        let hero = character(1, "Aube");
        let roll = engine.initiative(&hero, &mut ScriptedDice::new([5]));
        assert_eq!(roll.formula.to_string(), "1d6");
        assert_eq!(roll.total, 5);
    }
}
