use std::fmt::Debug;

use crate::types::Direction;

pub trait RandomSource: Debug {
    /// Uniform integer in `0..n`. Returns 0 when `n <= 1`.
    fn random_int(&mut self, n: u32) -> u32;

    fn random_direction(&mut self) -> Direction {
        Direction::CARDINALS[self.random_int(4) as usize]
    }

    fn random_range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        let span = (max - min).saturating_add(1).min(u64::from(u32::MAX));
        min + u64::from(self.random_int(span as u32))
    }
}

#[derive(Clone, Debug)]
pub struct Rng {
    seed: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.seed = self.seed.wrapping_add(0x6d2b79f5);
        let mut t = self.seed;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f64 / 4_294_967_296.0) as f32
    }

    pub fn bool(&mut self, probability: f32) -> bool {
        self.next_f32() < probability
    }
}

impl RandomSource for Rng {
    fn random_int(&mut self, n: u32) -> u32 {
        if n <= 1 {
            return 0;
        }
        ((u64::from(self.next_u32()) * u64::from(n)) >> 32) as u32
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn random_int(&mut self, n: u32) -> u32 {
        (**self).random_int(n)
    }
}

#[derive(Clone, Debug)]
pub struct ScriptedRandom {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn random_int(&mut self, n: u32) -> u32 {
        if n <= 1 || self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value % n
    }
}
