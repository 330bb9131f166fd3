use serde::{Deserialize, Serialize};

/// Reputation bracket derived from a user's echo total.
///
/// Variants are declared in ascending order of `min_echoes`, so the derived
/// `Ord` matches the threshold order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RankTier {
    Newbie,
    Contributor,
    Reviewer,
    Expert,
    Legend,
}

impl RankTier {
    pub const ALL: [RankTier; 5] = [
        RankTier::Newbie,
        RankTier::Contributor,
        RankTier::Reviewer,
        RankTier::Expert,
        RankTier::Legend,
    ];

    /// Inclusive lower bound of the tier.
    pub const fn min_echoes(self) -> i64 {
        match self {
            Self::Newbie => 0,
            Self::Contributor => 10,
            Self::Reviewer => 50,
            Self::Expert => 200,
            Self::Legend => 500,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Newbie => "Newbie",
            Self::Contributor => "Contributor",
            Self::Reviewer => "Reviewer",
            Self::Expert => "Expert",
            Self::Legend => "Legend",
        }
    }

    pub const fn icon(self) -> &'static str {
        match self {
            Self::Newbie => "🌱",
            Self::Contributor => "✍️",
            Self::Reviewer => "🔍",
            Self::Expert => "🎓",
            Self::Legend => "👑",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Newbie => "#9893a5",
            Self::Contributor => "#56949f",
            Self::Reviewer => "#286983",
            Self::Expert => "#907aa9",
            Self::Legend => "#ea9d34",
        }
    }

    pub const fn gradient(self) -> &'static str {
        match self {
            Self::Newbie => "linear-gradient(135deg, #9893a5, #797593)",
            Self::Contributor => "linear-gradient(135deg, #56949f, #286983)",
            Self::Reviewer => "linear-gradient(135deg, #286983, #1f4f66)",
            Self::Expert => "linear-gradient(135deg, #907aa9, #b4637a)",
            Self::Legend => "linear-gradient(135deg, #ea9d34, #d7827e)",
        }
    }

    pub fn next(self) -> Option<RankTier> {
        Self::ALL.get(self as usize + 1).copied()
    }

    pub fn previous(self) -> Option<RankTier> {
        (self as usize).checked_sub(1).map(|i| Self::ALL[i])
    }

    pub fn is_highest(self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for RankTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a user stands inside their tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankProgress {
    pub tier: RankTier,
    pub next_tier: Option<RankTier>,
    pub echoes_to_next: Option<u64>,
    pub fraction_complete: f64,
}

impl RankProgress {
    /// Whole percentage for progress bars, 0..=100.
    pub fn percent(&self) -> u8 {
        (self.fraction_complete * 100.0).floor().clamp(0.0, 100.0) as u8
    }
}

pub fn rank_of(echoes: i64) -> RankTier {
    let echoes = echoes.max(0);
    RankTier::ALL
        .iter()
        .rev()
        .copied()
        .find(|tier| echoes >= tier.min_echoes())
        .unwrap_or(RankTier::Newbie)
}

pub fn progress_of(echoes: i64) -> RankProgress {
    let echoes = echoes.max(0);
    let tier = rank_of(echoes);

    match tier.next() {
        None => RankProgress {
            tier,
            next_tier: None,
            echoes_to_next: None,
            fraction_complete: 1.0,
        },
        Some(next) => {
            let span = (next.min_echoes() - tier.min_echoes()) as f64;
            let gained = (echoes - tier.min_echoes()) as f64;
            RankProgress {
                tier,
                next_tier: Some(next),
                echoes_to_next: Some((next.min_echoes() - echoes).max(0) as u64),
                fraction_complete: (gained / span).clamp(0.0, 1.0),
            }
        }
    }
}

/// Normalises an echo total that arrived as a float.
/// Non-finite, negative and fractional values count as zero.
pub fn echoes_from_f64(raw: f64) -> i64 {
    if !raw.is_finite() || raw < 0.0 || raw.fract() != 0.0 || raw > i64::MAX as f64 {
        return 0;
    }
    raw as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_ranks() {
        assert_eq!(rank_of(0), RankTier::Newbie);
        assert_eq!(rank_of(9), RankTier::Newbie);
        assert_eq!(rank_of(10), RankTier::Contributor);
        assert_eq!(rank_of(499), RankTier::Expert);
        assert_eq!(rank_of(500), RankTier::Legend);
        assert_eq!(rank_of(1_000_000), RankTier::Legend);
    }

    #[test]
    fn test_negative_clamps_to_lowest() {
        assert_eq!(rank_of(-1), RankTier::Newbie);
        assert_eq!(rank_of(i64::MIN), RankTier::Newbie);
        assert_eq!(progress_of(-40).echoes_to_next, Some(10));
    }

    #[test]
    fn test_lower_bound_inclusive() {
        for tier in RankTier::ALL {
            assert_eq!(rank_of(tier.min_echoes()), tier);
            let below = rank_of(tier.min_echoes() - 1);
            match tier.previous() {
                Some(prev) => assert_eq!(below, prev),
                None => assert_eq!(below, tier),
            }
        }
    }

    #[test]
    fn test_thresholds_strictly_increase() {
        for pair in RankTier::ALL.windows(2) {
            assert!(pair[0].min_echoes() < pair[1].min_echoes());
            assert_eq!(pair[0].next(), Some(pair[1]));
        }
        assert!(RankTier::Legend.is_highest());
    }

    #[test]
    fn test_progress_mid_tier() {
        let progress = progress_of(25);
        assert_eq!(progress.tier, RankTier::Contributor);
        assert_eq!(progress.next_tier, Some(RankTier::Reviewer));
        assert_eq!(progress.echoes_to_next, Some(25));
        assert!((progress.fraction_complete - 0.375).abs() < f64::EPSILON);
        assert_eq!(progress.percent(), 37);
    }

    #[test]
    fn test_progress_top_tier() {
        let progress = progress_of(750);
        assert_eq!(progress.tier, RankTier::Legend);
        assert_eq!(progress.next_tier, None);
        assert_eq!(progress.echoes_to_next, None);
        assert_eq!(progress.fraction_complete, 1.0);
        assert_eq!(progress.percent(), 100);
    }

    #[test]
    fn test_echoes_from_f64() {
        assert_eq!(echoes_from_f64(42.0), 42);
        assert_eq!(echoes_from_f64(-3.0), 0);
        assert_eq!(echoes_from_f64(12.5), 0);
        assert_eq!(echoes_from_f64(f64::NAN), 0);
        assert_eq!(echoes_from_f64(f64::INFINITY), 0);
    }

    proptest! {
        #[test]
        fn rank_never_decreases(a in -1_000i64..2_000, b in -1_000i64..2_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(rank_of(lo).min_echoes() <= rank_of(hi).min_echoes());
        }

        #[test]
        fn progress_stays_in_bounds(echoes in -1_000i64..5_000) {
            let progress = progress_of(echoes);
            prop_assert!((0.0..=1.0).contains(&progress.fraction_complete));

            let complete = progress.fraction_complete == 1.0;
            let expected = match progress.next_tier {
                None => true,
                Some(next) => echoes >= next.min_echoes(),
            };
            prop_assert_eq!(complete, expected);
        }
    }
}
