use rand::Rng;

/// Bounded one dimensional continuous action space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionSpace {
    pub low: f64,
    pub high: f64,
}

impl ActionSpace {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// The normalized `[-1, 1]` steering space.
    pub fn normalized() -> Self {
        Self::new(-1.0, 1.0)
    }

    pub fn contains(&self, action: f64) -> bool {
        (self.low..=self.high).contains(&action)
    }

    pub fn clip(&self, action: f64) -> f64 {
        action.clamp(self.low, self.high)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.low..=self.high)
    }
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self::normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn samples_stay_inside_bounds() {
        let space = ActionSpace::normalized();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(space.contains(space.sample(&mut rng)));
        }
    }

    #[test]
    fn clip_and_contains_agree() {
        let space = ActionSpace::normalized();
        assert!(space.contains(-1.0) && space.contains(1.0) && space.contains(0.3));
        assert!(!space.contains(1.5));
        assert!(!space.contains(f64::NAN));
        assert_eq!(space.clip(1.5), 1.0);
        assert_eq!(space.clip(-2.0), -1.0);
    }
}
