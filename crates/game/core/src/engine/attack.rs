//! Item-driven attacks resolved as opposed checks.

use crate::combat::{
    Absorbed, CheckSide, OpposedOutcome, StanceKind, Winner, absorb, apply_karma, consume_stance,
    resolve_opposed,
};
use crate::dice::{DiceRoller, Roll};
use crate::ledger::{ActionSpend, actions_total, spend_actions};
use crate::state::{ActorId, AttackType, Character, ItemId};
use crate::stats::{Characteristic, EffectivePool, PoolBonusKey, PoolKind, apply_effective_delta};

use super::{ActionContext, ActionError, AttackRequest, Notice, Prompt, RulesEngine};

/// Everything a front end needs to report an attack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackResolution {
    pub attacker: ActorId,
    pub defender: ActorId,
    pub item: String,
    pub attack_type: AttackType,
    pub attack_carac: Characteristic,
    pub defense_carac: Characteristic,
    pub outcome: OpposedOutcome,
    /// Stance the defender spent on this check.
    pub stance: Option<StanceKind>,
    pub attacker_karma: u32,
    pub defender_karma: u32,
    /// Present when the attacker won.
    pub damage: Option<Absorbed>,
    pub defender_pv: EffectivePool,
    pub actions_remaining: u32,
    pub narrative: Vec<String>,
    pub notices: Vec<Notice>,
}

impl AttackResolution {
    pub fn attack_roll(&self) -> &Roll {
        &self.outcome.attack.roll
    }

    pub fn defense_roll(&self) -> &Roll {
        &self.outcome.defense.roll
    }

    pub fn winner(&self) -> Winner {
        self.outcome.winner
    }

    pub fn damage_dealt(&self) -> u32 {
        self.damage.map_or(0, |d| d.dealt)
    }

    pub fn absorbed(&self) -> u32 {
        self.damage.map_or(0, |d| d.absorbed)
    }
}

impl RulesEngine {
    /// Resolves an attack made with `item` against `defender`.
    ///
    /// Validation (target, attack configuration, actions, spell costs) and
    /// the prompt all happen before any state changes. Once dice are rolled
    /// the resolution runs to completion.
    pub fn resolve_attack(
        &self,
        attacker: &mut Character,
        item: ItemId,
        defender: Option<&mut Character>,
        ctx: ActionContext,
        prompt: &mut dyn Prompt,
        roller: &mut dyn DiceRoller,
    ) -> Result<AttackResolution, ActionError> {
        let defender = defender.ok_or(ActionError::NoTarget)?;
        if defender.id == attacker.id {
            return Err(ActionError::SelfTarget);
        }

        let weapon = attacker.item(item).ok_or(ActionError::ItemNotFound(item))?;
        let attack = weapon
            .enabled_attack()
            .cloned()
            .ok_or_else(|| ActionError::MissingAttackConfig(weapon.name.clone()))?;
        let item_name = weapon.name.clone();
        let spell = weapon.kind.is_spell();
        let (cost_ps, cost_pv) = if spell {
            (weapon.cost_ps, weapon.cost_pv)
        } else {
            (0, 0)
        };
        let attack_carac = attack
            .carac
            .or(weapon.carac)
            .unwrap_or(Characteristic::Puissance);

        let cost = attack
            .actions_cost
            .unwrap_or(self.config.default_action_cost);
        if ctx.on_turn {
            let left = attacker
                .actions_left
                .min(actions_total(attacker, &self.config));
            if cost > left {
                return Err(ActionError::InsufficientActions { left, needed: cost });
            }
        }
        check_pool(attacker, PoolKind::Ps, cost_ps)?;
        check_pool(attacker, PoolKind::Pv, cost_pv)?;

        let suggested_defense = attack
            .default_defense
            .or_else(|| defender.suggested_defense())
            .unwrap_or_else(|| attack.kind.default_defense());
        let magic = spell || attack.kind == AttackType::Spell;
        let request = AttackRequest {
            attacker: attacker.id,
            defender: defender.id,
            item: item_name.clone(),
            attack_carac,
            defense_carac: suggested_defense,
            attack_mode: self.default_mode(attacker, Some(attack_carac), magic, ctx.now),
            defense_mode: self.default_mode(defender, Some(suggested_defense), false, ctx.now),
            attacker_karma_available: if attack.use_pk {
                attacker.pools.pk.value()
            } else {
                0
            },
            defender_karma_available: defender.pools.pk.value(),
        };
        let choice = prompt.attack(&request).ok_or(ActionError::Cancelled)?;

        // Committed from here on.
        let mut defense_carac = choice.defense_carac.unwrap_or(suggested_defense);
        let mut defense_mode = choice.defense_mode;
        let stance = consume_stance(&mut defender.stance, attack.kind, attacker.id);
        if let Some(stance) = stance {
            defense_mode = stance.mode;
            defense_carac = stance.kind.defense_carac();
        }

        let attacker_karma = choice.attacker_karma.min(request.attacker_karma_available);
        let defender_karma = choice.defender_karma.min(request.defender_karma_available);
        attacker.pools.pk.try_spend(attacker_karma);
        defender.pools.pk.try_spend(defender_karma);
        attacker.pools.ps.try_spend(cost_ps);
        attacker.pools.pv.try_spend(cost_pv);

        let floor = self.config.min_difficulty;
        let attack_bonuses = attacker.bonuses();
        let defense_bonuses = defender.bonuses();
        let attack_side = CheckSide {
            formula: choice.attack_mode.formula(
                attacker.attributes.get(attack_carac),
                attack_bonuses.carac(attack_carac),
            ),
            difficulty: apply_karma(attack.base_difficulty, attacker_karma, floor),
        };
        let defense_side = CheckSide {
            formula: defense_mode.formula(
                defender.attributes.get(defense_carac),
                defense_bonuses.carac(defense_carac),
            ),
            difficulty: apply_karma(attack.defense_difficulty(), defender_karma, floor),
        };
        let outcome = resolve_opposed(attack_side, defense_side, roller);
        tracing::debug!(
            attacker = %attacker.id,
            defender = %defender.id,
            attack = outcome.attack.total(),
            defense = outcome.defense.total(),
            winner = ?outcome.winner,
            "attack resolved"
        );

        let mut narrative = vec![format!(
            "{} attaque {} avec {} : {} ({}) contre {} ({}).",
            attacker.name,
            defender.name,
            item_name,
            outcome.attack.total(),
            attack_carac.label(),
            outcome.defense.total(),
            defense_carac.label(),
        )];
        if let Some(stance) = stance {
            narrative.push(format!(
                "{} utilise sa posture de résistance {}.",
                defender.name,
                stance.kind.label()
            ));
        }

        let pv_bonus = defense_bonuses.pool(PoolBonusKey::PvMax);
        let mut defender_pv = EffectivePool::of(&defender.pools.pv, pv_bonus);
        let damage = match outcome.winner {
            Winner::Attacker => {
                let raw = attack.damage.raw_damage(outcome.attack.total());
                let absorbed = absorb(raw, defender.absorption());
                defender_pv = apply_effective_delta(
                    &mut defender.pools.pv,
                    pv_bonus,
                    -i64::from(absorbed.dealt),
                );
                narrative.push(if absorbed.fully_absorbed() && raw > 0 {
                    format!("{} dégâts entièrement absorbés.", raw)
                } else {
                    format!(
                        "{} subit {} dégâts ({} absorbés) → {}/{} PV.",
                        defender.name, absorbed.dealt, absorbed.absorbed, defender_pv.value, defender_pv.max
                    )
                });
                Some(absorbed)
            }
            Winner::Defender => {
                narrative.push(format!("{} pare l'attaque.", defender.name));
                None
            }
            Winner::Inconclusive => {
                narrative.push("Personne ne prend l'avantage.".to_string());
                None
            }
        };

        let actions_remaining = match spend_actions(attacker, &self.config, cost, ctx.on_turn) {
            ActionSpend::Free { available } => available,
            ActionSpend::Spent { remaining } => remaining,
            // Checked before rolling.
            ActionSpend::Insufficient { left, .. } => left,
        };

        let mut notices = Vec::new();
        notices.extend(self.record_trait_roll(attacker, attack_carac, outcome.attack.total()));
        notices.extend(self.record_trait_roll(defender, defense_carac, outcome.defense.total()));

        Ok(AttackResolution {
            attacker: attacker.id,
            defender: defender.id,
            item: item_name,
            attack_type: attack.kind,
            attack_carac,
            defense_carac,
            outcome,
            stance: stance.map(|s| s.kind),
            attacker_karma,
            defender_karma,
            damage,
            defender_pv,
            actions_remaining,
            narrative,
            notices,
        })
    }
}

pub(super) fn check_pool(
    character: &Character,
    pool: PoolKind,
    needed: u32,
) -> Result<(), ActionError> {
    let available = character.pools.get(pool).value();
    if needed > available {
        return Err(ActionError::InsufficientResource {
            pool,
            available,
            needed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{DefenseStance, RollMode};
    use crate::dice::ScriptedDice;
    use crate::engine::fixtures::{character, engine, now, sword};
    use crate::engine::{AttackChoice, AutoPrompt, CancelPrompt};
    use crate::state::{DefenseConfig, Item, ItemKind};
    use crate::stats::DieCode;

    /// Forces the attacker into advantage.
    struct Advantage;

    impl Prompt for Advantage {
        fn attack(&mut self, request: &AttackRequest) -> Option<AttackChoice> {
            Some(AttackChoice {
                attack_mode: RollMode::Advantage,
                ..AttackChoice::defaults(request)
            })
        }

        fn check_mode(&mut self, _label: &str, default: RollMode) -> Option<RollMode> {
            Some(default)
        }
    }

    fn duel() -> (Character, ItemId, Character) {
        let mut attacker = character(1, "Aube");
        attacker.attributes.puissance = DieCode::D8;
        let id = attacker.add_item(sword(Characteristic::Puissance, "max 4"));
        let defender = character(2, "Brume");
        (attacker, id, defender)
    }

    #[test]
    fn winning_attack_caps_damage_and_spends_action_on_turn() {
        let engine = engine();
        let (mut attacker, id, mut defender) = duel();
        let mut dice = ScriptedDice::new([7, 2, 3]);
        let result = engine
            .resolve_attack(
                &mut attacker,
                id,
                Some(&mut defender),
                ActionContext::on_turn(now()),
                &mut Advantage,
                &mut dice,
            )
            .unwrap();

        assert_eq!(result.winner(), Winner::Attacker);
        assert_eq!(result.attack_roll().total, 7);
        assert_eq!(result.damage_dealt(), 4);
        assert_eq!(defender.pools.pv.value(), 6);
        assert_eq!(result.actions_remaining, 1);
        assert_eq!(attacker.actions_left, 1);
    }

    #[test]
    fn off_turn_attack_spends_nothing() {
        let engine = engine();
        let (mut attacker, id, mut defender) = duel();
        attacker.actions_left = 0;
        let result = engine
            .resolve_attack(
                &mut attacker,
                id,
                Some(&mut defender),
                ActionContext::off_turn(now()),
                &mut AutoPrompt,
                &mut ScriptedDice::new([1, 1]),
            )
            .unwrap();
        assert_eq!(result.winner(), Winner::Inconclusive);
        assert_eq!(result.actions_remaining, 2);
        assert_eq!(attacker.actions_left, 0);
    }

    #[test]
    fn absorption_reduces_damage() {
        let engine = engine();
        let (mut attacker, id, mut defender) = duel();
        attacker.item_mut(id).unwrap().attack.as_mut().unwrap().damage = "5".parse().unwrap();
        let mut armor = Item::new(ItemId(0), "Cuirasse", ItemKind::Armor);
        armor.equippable = true;
        armor.equipped = true;
        armor.defense = Some(DefenseConfig {
            carac: None,
            absorption: 2,
        });
        defender.add_item(armor);

        let result = engine
            .resolve_attack(
                &mut attacker,
                id,
                Some(&mut defender),
                ActionContext::off_turn(now()),
                &mut AutoPrompt,
                &mut ScriptedDice::new([6, 1]),
            )
            .unwrap();
        assert_eq!(result.damage.map(|d| (d.raw, d.absorbed, d.dealt)), Some((5, 2, 3)));
        assert_eq!(defender.pools.pv.value(), 7);
    }

    #[test]
    fn matching_stance_is_consumed_with_advantage() {
        let engine = engine();
        let (mut attacker, id, mut defender) = duel();
        defender.attributes.puissance = DieCode::D10;
        defender.stance = Some(DefenseStance::new(StanceKind::Physical));

        let result = engine
            .resolve_attack(
                &mut attacker,
                id,
                Some(&mut defender),
                ActionContext::off_turn(now()),
                &mut AutoPrompt,
                &mut ScriptedDice::new([5, 2, 9]),
            )
            .unwrap();
        assert_eq!(result.stance, Some(StanceKind::Physical));
        assert_eq!(result.defense_carac, Characteristic::Puissance);
        assert_eq!(result.defense_roll().total, 9);
        assert_eq!(result.winner(), Winner::Defender);
        assert!(defender.stance.is_none());
    }

    #[test]
    fn validation_failures_leave_everyone_untouched() {
        let engine = engine();
        let (mut attacker, id, mut defender) = duel();
        let (before_a, before_d) = (attacker.clone(), defender.clone());
        let mut dice = ScriptedDice::new([]);
        let ctx = ActionContext::on_turn(now());

        let err = engine
            .resolve_attack(&mut attacker, id, None, ctx, &mut AutoPrompt, &mut dice)
            .unwrap_err();
        assert_eq!(err, ActionError::NoTarget);

        attacker.actions_left = 0;
        let err = engine
            .resolve_attack(&mut attacker, id, Some(&mut defender), ctx, &mut AutoPrompt, &mut dice)
            .unwrap_err();
        assert_eq!(err, ActionError::InsufficientActions { left: 0, needed: 1 });
        attacker.actions_left = 2;

        defender.stance = Some(DefenseStance::new(StanceKind::Physical));
        let guarded = defender.clone();
        let err = engine
            .resolve_attack(&mut attacker, id, Some(&mut defender), ctx, &mut CancelPrompt, &mut dice)
            .unwrap_err();
        assert_eq!(err, ActionError::Cancelled);
        assert_eq!(defender, guarded);
        defender.stance = None;

        let plain = attacker.add_item(Item::new(ItemId(0), "Bâton", ItemKind::Weapon));
        let err = engine
            .resolve_attack(&mut attacker, plain, Some(&mut defender), ctx, &mut AutoPrompt, &mut dice)
            .unwrap_err();
        assert_eq!(err, ActionError::MissingAttackConfig("Bâton".into()));

        attacker.remove_item(plain);
        assert_eq!((attacker, defender), (before_a, before_d));
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn karma_is_capped_and_lowers_own_difficulty() {
        struct Spend;
        impl Prompt for Spend {
            fn attack(&mut self, request: &AttackRequest) -> Option<AttackChoice> {
                Some(AttackChoice {
                    attacker_karma: 10,
                    defender_karma: 1,
                    ..AttackChoice::defaults(request)
                })
            }
            fn check_mode(&mut self, _label: &str, default: RollMode) -> Option<RollMode> {
                Some(default)
            }
        }

        let engine = engine();
        let (mut attacker, id, mut defender) = duel();
        attacker.item_mut(id).unwrap().attack.as_mut().unwrap().use_pk = true;
        let result = engine
            .resolve_attack(
                &mut attacker,
                id,
                Some(&mut defender),
                ActionContext::off_turn(now()),
                &mut Spend,
                &mut ScriptedDice::new([3, 3]),
            )
            .unwrap();
        assert_eq!(result.attacker_karma, 3);
        assert_eq!(result.outcome.attack.difficulty, 2);
        assert_eq!(result.outcome.defense.difficulty, 3);
        assert_eq!(attacker.pools.pk.value(), 0);
        assert_eq!(defender.pools.pk.value(), 2);
        assert_eq!(result.winner(), Winner::Attacker);
    }
}
