/// Rules configuration constants and tunable parameters.
///
/// Every field has a default so a partial `rules.toml` only needs to list the
/// values a table wants to change.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RulesConfig {
    /// Actions granted per combat turn when the actor does not override it.
    pub actions_per_turn: u32,
    /// Encumbrance points a character can carry before item bonuses.
    pub base_carry_capacity: u32,
    /// Hours without a dose before an addicted character suffers withdrawal.
    pub withdrawal_threshold_hours: u32,
    /// Interval of the GM-side withdrawal sweep.
    pub withdrawal_sweep_minutes: u32,
    /// Karma can never push a difficulty below this floor.
    pub min_difficulty: u32,
    /// Action cost of an attack whose configuration leaves it unset.
    pub default_action_cost: u32,
    /// Experience required for the next level when a sheet leaves it unset.
    pub default_xp_next: u32,
}

impl RulesConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on dice rolled by a single formula.
    pub const MAX_DICE_PER_ROLL: usize = 16;

    /// Catalog key of the "no flaw" negative trait.
    pub const NO_NEGATIVE_TRAIT: &'static str = "none";

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ACTIONS_PER_TURN: u32 = 2;
    pub const DEFAULT_BASE_CARRY_CAPACITY: u32 = 10;
    pub const DEFAULT_WITHDRAWAL_THRESHOLD_HOURS: u32 = 24;
    pub const DEFAULT_WITHDRAWAL_SWEEP_MINUTES: u32 = 5;
    pub const DEFAULT_MIN_DIFFICULTY: u32 = 2;
    pub const DEFAULT_ACTION_COST: u32 = 1;
    pub const DEFAULT_XP_NEXT: u32 = 100;

    pub fn new() -> Self {
        Self {
            actions_per_turn: Self::DEFAULT_ACTIONS_PER_TURN,
            base_carry_capacity: Self::DEFAULT_BASE_CARRY_CAPACITY,
            withdrawal_threshold_hours: Self::DEFAULT_WITHDRAWAL_THRESHOLD_HOURS,
            withdrawal_sweep_minutes: Self::DEFAULT_WITHDRAWAL_SWEEP_MINUTES,
            min_difficulty: Self::DEFAULT_MIN_DIFFICULTY,
            default_action_cost: Self::DEFAULT_ACTION_COST,
            default_xp_next: Self::DEFAULT_XP_NEXT,
        }
    }

    /// Withdrawal threshold as a wall-clock duration.
    pub fn withdrawal_threshold(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::hours(i64::from(self.withdrawal_threshold_hours))
    }

    /// Sweep period, never shorter than one minute.
    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(u64::from(self.withdrawal_sweep_minutes.max(1)) * 60)
    }

    /// Actions per turn, at least one.
    pub fn actions_per_turn(&self) -> u32 {
        self.actions_per_turn.max(1)
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
