//! Connectivity scoring between two shapes
//!
//! The score is a weighted sum of five sub-scores, each clamped to
//! `[0, 1]`:
//!
//! | Feature | Default weight |
//! |---|---|
//! | proximity | 0.30 |
//! | size similarity | 0.10 |
//! | spatial relationship | 0.40 |
//! | temporal continuity | 0.15 |
//! | separation likelihood | 0.05 |
//!
//! Every sub-score is symmetric in its arguments, so
//! `score(a, b) == score(b, a)` exactly.

use crate::error::{RegionError, RegionResult};
use inkdigit_core::Shape;
use serde::{Deserialize, Serialize};

/// Relative weight of each sub-score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Endpoint / box-gap proximity (default: 0.30)
    pub proximity: f64,
    /// Similarity of the larger box sides (default: 0.10)
    pub size_similarity: f64,
    /// Horizontal or vertical range overlap (default: 0.40)
    pub spatial: f64,
    /// Closeness of start times (default: 0.15)
    pub temporal: f64,
    /// Penalty for far-apart centroids (default: 0.05)
    pub separation: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            proximity: 0.30,
            size_similarity: 0.10,
            spatial: 0.40,
            temporal: 0.15,
            separation: 0.05,
        }
    }
}

impl ScoringWeights {
    fn as_array(&self) -> [f64; 5] {
        [
            self.proximity,
            self.size_similarity,
            self.spatial,
            self.temporal,
            self.separation,
        ]
    }
}

/// Heuristic constants for [`ConnectivityScorer`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Distance at which proximity reaches zero, in pixels (default: 15)
    pub proximity_threshold: f64,
    /// Size ratio above which shapes count as equally sized (default: 0.6)
    pub size_ratio_threshold: f64,
    /// Discount applied to vertical overlap (default: 0.8)
    pub vertical_overlap_factor: f64,
    /// Horizontal gap, as a fraction of canvas width, above which the
    /// spatial score is penalized (default: 0.10)
    pub gap_penalty_fraction: f64,
    /// Multiplier applied to a penalized spatial score (default: 0.3)
    pub gap_penalty: f64,
    /// Start-time difference at which temporal continuity reaches zero,
    /// in milliseconds (default: 3000)
    pub temporal_window_ms: f64,
    /// Horizontal centroid distance, as a fraction of canvas width, above
    /// which shapes may be separate characters (default: 0.15)
    pub separation_distance_fraction: f64,
    /// Centroid distance over average width above which shapes are
    /// separate characters (default: 2.0)
    pub separation_width_ratio: f64,
    /// Separation score for shapes judged separate (default: 0.2)
    pub separated_score: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            proximity_threshold: 15.0,
            size_ratio_threshold: 0.6,
            vertical_overlap_factor: 0.8,
            gap_penalty_fraction: 0.10,
            gap_penalty: 0.3,
            temporal_window_ms: 3000.0,
            separation_distance_fraction: 0.15,
            separation_width_ratio: 2.0,
            separated_score: 0.2,
        }
    }
}

impl ScoringConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sub-score weights
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Set the proximity threshold in pixels
    pub fn with_proximity_threshold(mut self, threshold: f64) -> Self {
        self.proximity_threshold = threshold;
        self
    }

    /// Set the temporal window in milliseconds
    pub fn with_temporal_window_ms(mut self, window: f64) -> Self {
        self.temporal_window_ms = window;
        self
    }

    /// Check that every constant is finite and in range
    pub fn validate(&self) -> RegionResult<()> {
        let weights = self.weights.as_array();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RegionError::InvalidParameters(format!(
                "scoring weights must be finite and non-negative: {:?}",
                self.weights
            )));
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return Err(RegionError::InvalidParameters(
                "scoring weights must not all be zero".into(),
            ));
        }
        let positive = [
            ("proximity_threshold", self.proximity_threshold),
            ("size_ratio_threshold", self.size_ratio_threshold),
            ("temporal_window_ms", self.temporal_window_ms),
            ("separation_width_ratio", self.separation_width_ratio),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(RegionError::InvalidParameters(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        let unit = [
            ("vertical_overlap_factor", self.vertical_overlap_factor),
            ("gap_penalty_fraction", self.gap_penalty_fraction),
            ("gap_penalty", self.gap_penalty),
            (
                "separation_distance_fraction",
                self.separation_distance_fraction,
            ),
            ("separated_score", self.separated_score),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(RegionError::InvalidParameters(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The five clamped sub-scores of one shape pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub proximity: f64,
    pub size_similarity: f64,
    pub spatial: f64,
    pub temporal: f64,
    pub separation: f64,
}

impl ScoreBreakdown {
    /// Weighted sum, clamped to `[0, 1]`
    pub fn combine(&self, weights: &ScoringWeights) -> f64 {
        let total = weights.proximity * self.proximity
            + weights.size_similarity * self.size_similarity
            + weights.spatial * self.spatial
            + weights.temporal * self.temporal
            + weights.separation * self.separation;
        total.clamp(0.0, 1.0)
    }
}

/// Scores how likely two shapes belong to the same character
#[derive(Debug, Clone)]
pub struct ConnectivityScorer {
    config: ScoringConfig,
    canvas_width: f64,
}

impl ConnectivityScorer {
    /// Create a scorer for a canvas of the given width
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidParameters` if the config is invalid or
    /// the canvas width is not positive.
    pub fn new(config: ScoringConfig, canvas_width: f64) -> RegionResult<Self> {
        config.validate()?;
        if !(canvas_width.is_finite() && canvas_width > 0.0) {
            return Err(RegionError::InvalidParameters(format!(
                "canvas width must be positive, got {canvas_width}"
            )));
        }
        Ok(Self {
            config,
            canvas_width,
        })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    /// Connectivity score in `[0, 1]`
    pub fn score<A: Shape + ?Sized, B: Shape + ?Sized>(&self, a: &A, b: &B) -> f64 {
        self.breakdown(a, b).combine(&self.config.weights)
    }

    /// All five sub-scores
    pub fn breakdown<A: Shape + ?Sized, B: Shape + ?Sized>(&self, a: &A, b: &B) -> ScoreBreakdown {
        ScoreBreakdown {
            proximity: self.proximity(a, b),
            size_similarity: self.size_similarity(a, b),
            spatial: self.spatial(a, b),
            temporal: self.temporal(a, b),
            separation: self.separation(a, b),
        }
    }

    fn proximity<A: Shape + ?Sized, B: Shape + ?Sized>(&self, a: &A, b: &B) -> f64 {
        let mut d = a.bounds().gap_distance(&b.bounds());
        if let (Some((a_start, a_end)), Some((b_start, b_end))) = (a.endpoints(), b.endpoints()) {
            d = d
                .min(a_end.distance(&b_start))
                .min(a_start.distance(&b_end))
                .min(a_end.distance(&b_end))
                .min(a_start.distance(&b_start));
        }
        (1.0 - d / self.config.proximity_threshold).clamp(0.0, 1.0)
    }

    fn size_similarity<A: Shape + ?Sized, B: Shape + ?Sized>(&self, a: &A, b: &B) -> f64 {
        let sa = a.bounds().max_side();
        let sb = b.bounds().max_side();
        let larger = sa.max(sb);
        if larger <= 0.0 {
            return 1.0;
        }
        let ratio = sa.min(sb) / larger;
        if ratio > self.config.size_ratio_threshold {
            1.0
        } else {
            (ratio / self.config.size_ratio_threshold).clamp(0.0, 1.0)
        }
    }

    fn spatial<A: Shape + ?Sized, B: Shape + ?Sized>(&self, a: &A, b: &B) -> f64 {
        let (ba, bb) = (a.bounds(), b.bounds());
        let overlap = ba
            .horizontal_overlap(&bb)
            .max(self.config.vertical_overlap_factor * ba.vertical_overlap(&bb));
        let penalty = if ba.horizontal_gap(&bb) > self.config.gap_penalty_fraction * self.canvas_width
        {
            self.config.gap_penalty
        } else {
            1.0
        };
        (overlap * penalty).clamp(0.0, 1.0)
    }

    fn temporal<A: Shape + ?Sized, B: Shape + ?Sized>(&self, a: &A, b: &B) -> f64 {
        match (a.start_time(), b.start_time()) {
            (Some(ta), Some(tb)) => {
                let dt = ta.abs_diff(tb) as f64;
                (1.0 - dt / self.config.temporal_window_ms).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    fn separation<A: Shape + ?Sized, B: Shape + ?Sized>(&self, a: &A, b: &B) -> f64 {
        let (ba, bb) = (a.bounds(), b.bounds());
        let dx = (ba.center_x() - bb.center_x()).abs();
        let avg_width = (ba.width() + bb.width()) / 2.0;
        if dx > self.config.separation_distance_fraction * self.canvas_width
            && avg_width > 0.0
            && dx / avg_width > self.config.separation_width_ratio
        {
            self.config.separated_score
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdigit_core::{PixelComponent, Stroke};
    use rand::rngs::StdRng;
    use rand::{RngExt, SeedableRng};

    fn stroke(points: &[(f64, f64)], t0: u64) -> Stroke {
        let samples: Vec<(f64, f64, u64)> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| (x, y, t0 + 16 * i as u64))
            .collect();
        Stroke::from_xyt(&samples).unwrap()
    }

    fn scorer() -> ConnectivityScorer {
        ConnectivityScorer::new(ScoringConfig::default(), 400.0).unwrap()
    }

    #[test]
    fn test_touching_strokes_score_high() {
        // top bar and diagonal of a "7"
        let a = stroke(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0)], 0);
        let b = stroke(&[(40.0, 0.0), (27.5, 30.0), (15.0, 60.0)], 300);
        let s = scorer().breakdown(&a, &b);
        assert_eq!(s.proximity, 1.0);
        assert_eq!(s.size_similarity, 1.0);
        assert_eq!(s.spatial, 1.0);
        assert!((s.temporal - 0.9).abs() < 1e-12);
        assert_eq!(s.separation, 1.0);
        assert!((scorer().score(&a, &b) - 0.985).abs() < 1e-9);
    }

    #[test]
    fn test_far_strokes_score_low() {
        let a = stroke(&[(0.0, 0.0), (0.0, 35.0), (40.0, 35.0)], 0);
        let b = stroke(&[(100.0, 0.0), (140.0, 0.0), (100.0, 60.0)], 1000);
        let s = scorer().breakdown(&a, &b);
        assert_eq!(s.proximity, 0.0);
        // vertical overlap 1.0 * 0.8, gap 60 > 40 so penalized
        assert!((s.spatial - 0.24).abs() < 1e-12);
        assert_eq!(s.separation, 0.2);
        assert!(scorer().score(&a, &b) < 0.6);
    }

    #[test]
    fn test_components_have_no_timing() {
        let a = PixelComponent::new(vec![(0, 0), (5, 5)]).unwrap();
        let b = PixelComponent::new(vec![(6, 0), (9, 5)]).unwrap();
        let s = scorer().breakdown(&a, &b);
        assert_eq!(s.temporal, 0.0);
        // bbox gap of 1 px
        assert!((s.proximity - (1.0 - 1.0 / 15.0)).abs() < 1e-12);
    }

    #[test]
    fn test_zero_size_shapes() {
        let a = PixelComponent::new(vec![(3, 3)]).unwrap();
        let b = PixelComponent::new(vec![(3, 3)]).unwrap();
        let s = scorer().breakdown(&a, &b);
        assert_eq!(s.size_similarity, 1.0);
        assert_eq!(s.spatial, 0.0);
        assert_eq!(s.separation, 1.0);
    }

    #[test]
    fn test_invalid_config() {
        let bad = ScoringConfig::default().with_proximity_threshold(0.0);
        assert!(ConnectivityScorer::new(bad, 400.0).is_err());
        assert!(ConnectivityScorer::new(ScoringConfig::default(), 0.0).is_err());
        let mut negative = ScoringConfig::default();
        negative.weights.spatial = -0.1;
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_score_is_symmetric_random() {
        let mut rng = StdRng::seed_from_u64(42);
        let scorer = scorer();
        for _ in 0..500 {
            let make = |rng: &mut StdRng| {
                let n = rng.random_range(1..6usize);
                let t0 = rng.random_range(0..5000u64);
                let pts: Vec<(f64, f64)> = (0..n)
                    .map(|_| (rng.random_range(0.0..400.0), rng.random_range(0.0..200.0)))
                    .collect();
                stroke(&pts, t0)
            };
            let a = make(&mut rng);
            let b = make(&mut rng);
            let ab = scorer.score(&a, &b);
            assert_eq!(ab, scorer.score(&b, &a));
            assert!((0.0..=1.0).contains(&ab));
        }
    }
}
