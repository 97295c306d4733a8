use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Supplies the amount a record advances on each tick, in percent.
pub trait ProgressSource: Send {
    fn next_increment(&mut self) -> f32;
}

/// Uniform increments in `[0, max)`.
pub struct RandomIncrements {
    rng: StdRng,
    max: f32,
}

impl RandomIncrements {
    pub fn new(max: f32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max,
        }
    }

    pub fn seeded(max: f32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max,
        }
    }
}

impl ProgressSource for RandomIncrements {
    fn next_increment(&mut self) -> f32 {
        if !(self.max.is_finite() && self.max > 0.0) {
            return 0.0;
        }
        self.rng.gen_range(0.0..self.max)
    }
}

/// Replays a fixed sequence of increments, starting over when exhausted.
pub struct FixedIncrements {
    steps: Vec<f32>,
    next: usize,
}

impl FixedIncrements {
    pub fn new(steps: Vec<f32>) -> Self {
        Self { steps, next: 0 }
    }

    pub fn constant(step: f32) -> Self {
        Self::new(vec![step])
    }
}

impl ProgressSource for FixedIncrements {
    fn next_increment(&mut self) -> f32 {
        if self.steps.is_empty() {
            return 0.0;
        }
        let step = self.steps[self.next % self.steps.len()];
        self.next += 1;
        step
    }
}

impl<F> ProgressSource for F
where
    F: FnMut() -> f32 + Send,
{
    fn next_increment(&mut self) -> f32 {
        self()
    }
}
