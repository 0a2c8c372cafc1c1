//! Brick collision effects
//!
//! Destroying a brick rolls one draw from `[0, 10)`: the lower half selects
//! one of the five effects below, the upper half is a plain destruction.
//! `DoubleBehavior` expands into a bounded 2- or 3-effect combo and never
//! recurses.

use rand::Rng;

/// Effects a destroyed brick can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickEffect {
    /// Release a heart that falls toward the user paddle
    FallingHeart,
    /// Release two pucks from the brick's position
    ExtraPucks,
    /// Zoom the camera onto the main ball until it settles
    CameraFollow,
    /// Spawn a second user-controlled paddle mid-screen
    SecondaryPaddle,
    /// Fire a random combination of the other four
    DoubleBehavior,
}

/// Ordered effect set for the brick draw; index 4 is the combinator.
const EFFECTS: [BrickEffect; 5] = [
    BrickEffect::FallingHeart,
    BrickEffect::ExtraPucks,
    BrickEffect::CameraFollow,
    BrickEffect::SecondaryPaddle,
    BrickEffect::DoubleBehavior,
];

/// The four effects `DoubleBehavior` can expand into.
const ATOMIC: [BrickEffect; 4] = [
    BrickEffect::FallingHeart,
    BrickEffect::ExtraPucks,
    BrickEffect::CameraFollow,
    BrickEffect::SecondaryPaddle,
];

/// Roll the effect for one destroyed brick: even odds of no effect, one in
/// ten for each named effect.
pub fn roll(rng: &mut impl Rng) -> Option<BrickEffect> {
    let draw: usize = rng.random_range(0..10);
    EFFECTS.get(draw).copied()
}

/// Expand a `DoubleBehavior` into its concrete sub-effects.
///
/// Two draws over the five-effect set; if either lands on the combinator
/// itself, both are discarded in favor of three draws over the atomic four
/// (duplicates allowed). The result never contains `DoubleBehavior`, so
/// application cannot recurse.
pub fn expand_double(rng: &mut impl Rng) -> Vec<BrickEffect> {
    let first: usize = rng.random_range(0..EFFECTS.len());
    let second: usize = rng.random_range(0..EFFECTS.len());
    let combinator = EFFECTS.len() - 1;
    if first == combinator || second == combinator {
        (0..3)
            .map(|_| ATOMIC[rng.random_range(0..ATOMIC.len())])
            .collect()
    } else {
        vec![EFFECTS[first], EFFECTS[second]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_roll_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let trials = 50_000;
        let mut plain = 0usize;
        let mut per_effect = [0usize; 5];

        for _ in 0..trials {
            match roll(&mut rng) {
                None => plain += 1,
                Some(effect) => {
                    let index = EFFECTS.iter().position(|e| *e == effect).unwrap();
                    per_effect[index] += 1;
                }
            }
        }

        let plain_ratio = plain as f64 / trials as f64;
        assert!((plain_ratio - 0.5).abs() < 0.02, "plain ratio {plain_ratio}");
        for count in per_effect {
            let ratio = count as f64 / trials as f64;
            assert!((ratio - 0.1).abs() < 0.01, "effect ratio {ratio}");
        }
    }

    #[test]
    fn test_expand_never_recurses() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..10_000 {
            let combo = expand_double(&mut rng);
            assert!(combo.len() == 2 || combo.len() == 3);
            assert!(!combo.contains(&BrickEffect::DoubleBehavior));
        }
    }

    #[test]
    fn test_expand_triple_probability() {
        // P(either of two draws from [0,5) hits the combinator) = 1 - (4/5)^2
        let mut rng = Pcg32::seed_from_u64(1234);
        let trials = 50_000;
        let triples = (0..trials)
            .filter(|_| expand_double(&mut rng).len() == 3)
            .count();

        let ratio = triples as f64 / trials as f64;
        assert!((ratio - 0.36).abs() < 0.02, "triple ratio {ratio}");
    }
}
