//! Scramble-then-reveal text animation.

use rand::Rng;

/// Characters drawn for the scrambled portion.
pub const SCRAMBLE_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Text that starts as random characters and resolves left to right.
///
/// The scramble is drawn once; each tick replaces one more leading
/// character with the target. A full reveal takes `duration` seconds
/// regardless of length.
#[derive(Debug, Clone)]
pub struct TextCycle {
    target: Vec<char>,
    shown: Vec<char>,
    revealed: usize,
    interval: f32,
    accumulator: f32,
}

impl TextCycle {
    pub fn new<R: Rng + ?Sized>(target: &str, duration: f32, rng: &mut R) -> Self {
        let charset: Vec<char> = SCRAMBLE_CHARSET.chars().collect();
        let target: Vec<char> = target.chars().collect();
        let shown = target
            .iter()
            .map(|_| charset[rng.random_range(0..charset.len())])
            .collect();
        let interval = if target.is_empty() {
            0.0
        } else {
            duration.max(0.0) / target.len() as f32
        };
        Self {
            target,
            shown,
            revealed: 0,
            interval,
            accumulator: 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns `true` if the text changed.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.is_complete() {
            return false;
        }
        self.accumulator += dt.max(0.0);

        let before = self.revealed;
        while self.revealed < self.target.len() && self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            self.shown[self.revealed] = self.target[self.revealed];
            self.revealed += 1;
        }
        self.revealed != before
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.target.len()
    }

    pub fn text(&self) -> String {
        self.shown.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    #[test]
    fn test_starts_scrambled_at_target_length() {
        let cycle = TextCycle::new("Exoplanet Data", 1.0, &mut rng());
        let text = cycle.text();
        assert_eq!(text.chars().count(), 14);
        assert!(text.chars().all(|c| SCRAMBLE_CHARSET.contains(c)));
        assert!(!cycle.is_complete());
    }

    #[test]
    fn test_reveals_one_character_per_interval() {
        let mut cycle = TextCycle::new("abcd", 1.0, &mut rng());
        assert!(cycle.advance(0.25));
        assert!(cycle.text().starts_with('a'));
        assert!(!cycle.advance(0.1));
        assert!(cycle.advance(0.15));
        assert!(cycle.text().starts_with("ab"));
    }

    #[test]
    fn test_eventually_equals_target() {
        let target = "Planet Density [g/cm³]";
        let mut cycle = TextCycle::new(target, 1.0, &mut rng());
        for _ in 0..120 {
            cycle.advance(1.0 / 60.0);
        }
        assert!(cycle.is_complete());
        assert_eq!(cycle.text(), target);
        assert!(!cycle.advance(1.0));
    }

    #[test]
    fn test_large_step_reveals_everything() {
        let mut cycle = TextCycle::new("2015", 1.0, &mut rng());
        cycle.advance(5.0);
        assert_eq!(cycle.text(), "2015");
    }

    #[test]
    fn test_empty_target_is_complete() {
        let mut cycle = TextCycle::new("", 1.0, &mut rng());
        assert!(cycle.is_complete());
        assert_eq!(cycle.text(), "");
        assert!(!cycle.advance(1.0));
    }
}
