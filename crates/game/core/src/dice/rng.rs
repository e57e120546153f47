//! Injectable dice sources.
//!
//! Every roll in the engine goes through [`DiceRoller`], so tests and replays
//! can substitute a seeded or fully scripted source.

use std::collections::VecDeque;

/// Source of individual die results.
pub trait DiceRoller {
    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, faces: u32) -> u32;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn pick(&mut self, len: usize) -> usize {
        let faces = u32::try_from(len).unwrap_or(u32::MAX).max(1);
        (self.roll_die(faces) - 1) as usize
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for &mut R {
    fn roll_die(&mut self, faces: u32) -> u32 {
        (**self).roll_die(faces)
    }
}

impl<R: DiceRoller + ?Sized> DiceRoller for Box<R> {
    fn roll_die(&mut self, faces: u32) -> u32 {
        (**self).roll_die(faces)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR variant: 32-bit output from 64-bit state. The same seed always
/// produces the same sequence of rolls.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug)]
pub struct PcgDice {
    state: u64,
}

impl PcgDice {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        let mut rng = Self {
            state: seed.wrapping_add(Self::INCREMENT),
        };
        rng.next_u32();
        rng
    }

    /// LCG step: `state' = state * multiplier + increment (mod 2^64)`.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::step(old);
        Self::output(old)
    }
}

impl DiceRoller for PcgDice {
    fn roll_die(&mut self, faces: u32) -> u32 {
        let faces = faces.max(1);
        // Rejection sampling keeps every face equally likely.
        let zone = u32::MAX - (u32::MAX % faces);
        loop {
            let value = self.next_u32();
            if value < zone {
                return value % faces + 1;
            }
        }
    }
}

/// Replays a fixed list of die results, for tests and demonstrations.
///
/// Values are clamped to the rolled die. Once exhausted every roll is a 1.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    queue: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }

    pub fn push(&mut self, value: u32) {
        self.queue.push_back(value);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceRoller for ScriptedDice {
    fn roll_die(&mut self, faces: u32) -> u32 {
        self.queue.pop_front().unwrap_or(1).clamp(1, faces.max(1))
    }
}
