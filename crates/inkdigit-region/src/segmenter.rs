//! Grouping of strokes or pixel components into characters
//!
//! Each shape moves through `Unvisited -> InGroup -> Closed`. A group is
//! seeded by the first unvisited shape and grown by repeated scans: an
//! unvisited shape joins when its connectivity score against any current
//! member exceeds the threshold and the group constraints still hold.
//! Scanning repeats until a pass adds nothing, then the group closes.
//! Closed groups are sorted left to right by `min_x`.

use crate::conncomp::{NoiseFilter, filter_noise_components, find_pixel_components};
use crate::error::{RegionError, RegionResult};
use crate::scorer::{ConnectivityScorer, ScoringConfig};
use crate::union_find::DisjointSet;
use inkdigit_core::{BitGrid, BoundingBox, PixelComponent, Shape, Stroke};
use serde::{Deserialize, Serialize};

/// Segmentation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Connectivity heuristic constants
    pub scoring: ScoringConfig,
    /// Score a candidate must exceed to join a group (default: 0.6)
    pub connectivity_threshold: f64,
    /// Maximum strokes per character group (default: 4)
    pub max_strokes_per_group: usize,
    /// Strokes with fewer samples are discarded (default: 3)
    pub min_stroke_points: usize,
    /// Strokes with a shorter path are discarded, in pixels (default: 10)
    pub min_stroke_length: f64,
    /// Components smaller than this never join a group (default: 5)
    pub min_component_area: usize,
    /// Allowed `(min, max)` aspect ratio of a merged group (default: [0.3, 3.0])
    pub aspect_ratio_range: (f64, f64),
    /// Speck removal for the raster path
    pub noise: NoiseFilter,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            connectivity_threshold: 0.6,
            max_strokes_per_group: 4,
            min_stroke_points: 3,
            min_stroke_length: 10.0,
            min_component_area: 5,
            aspect_ratio_range: (0.3, 3.0),
            noise: NoiseFilter::default(),
        }
    }
}

impl SegmentationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conservative preset that keeps most strokes as separate characters
    ///
    /// Proximity threshold 5 px, connectivity threshold 0.2, one stroke per
    /// group, minimum stroke length 8 px, aspect range [0.5, 2.5].
    pub fn strict() -> Self {
        Self {
            scoring: ScoringConfig::default().with_proximity_threshold(5.0),
            connectivity_threshold: 0.2,
            max_strokes_per_group: 1,
            min_stroke_length: 8.0,
            aspect_ratio_range: (0.5, 2.5),
            ..Self::default()
        }
    }

    /// Set the scoring constants
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the join threshold
    pub fn with_connectivity_threshold(mut self, threshold: f64) -> Self {
        self.connectivity_threshold = threshold;
        self
    }

    /// Set the maximum strokes per group
    pub fn with_max_strokes_per_group(mut self, max: usize) -> Self {
        self.max_strokes_per_group = max;
        self
    }

    /// Set the minimum stroke path length
    pub fn with_min_stroke_length(mut self, length: f64) -> Self {
        self.min_stroke_length = length;
        self
    }

    /// Set the allowed aspect ratio range
    pub fn with_aspect_ratio_range(mut self, min: f64, max: f64) -> Self {
        self.aspect_ratio_range = (min, max);
        self
    }

    /// Set the raster noise filter
    pub fn with_noise_filter(mut self, noise: NoiseFilter) -> Self {
        self.noise = noise;
        self
    }

    /// Check that every parameter is in range
    pub fn validate(&self) -> RegionResult<()> {
        self.scoring.validate()?;
        if !(0.0..=1.0).contains(&self.connectivity_threshold) {
            return Err(RegionError::InvalidParameters(format!(
                "connectivity threshold must be in [0, 1], got {}",
                self.connectivity_threshold
            )));
        }
        if self.max_strokes_per_group == 0 {
            return Err(RegionError::InvalidParameters(
                "max strokes per group must be at least 1".into(),
            ));
        }
        if !(self.min_stroke_length.is_finite() && self.min_stroke_length >= 0.0) {
            return Err(RegionError::InvalidParameters(format!(
                "min stroke length must be non-negative, got {}",
                self.min_stroke_length
            )));
        }
        let (lo, hi) = self.aspect_ratio_range;
        if !(lo > 0.0 && lo <= hi && hi.is_finite()) {
            return Err(RegionError::InvalidParameters(format!(
                "invalid aspect ratio range [{lo}, {hi}]"
            )));
        }
        Ok(())
    }
}

/// Shapes judged to form one glyph, with their merged bounding box
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterGroup<S> {
    members: Vec<S>,
    bounds: BoundingBox,
}

impl<S: Shape> CharacterGroup<S> {
    /// Build a group from its members
    ///
    /// Returns `None` for an empty member list.
    pub fn from_members(members: Vec<S>) -> Option<Self> {
        let bounds = members
            .iter()
            .map(Shape::bounds)
            .reduce(|a, b| a.union(&b))?;
        Some(Self { members, bounds })
    }
}

impl<S> CharacterGroup<S> {
    /// Members in input order
    #[inline]
    pub fn members(&self) -> &[S] {
        &self.members
    }

    /// Merged bounding box
    #[inline]
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn into_members(self) -> Vec<S> {
        self.members
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InGroup,
    Closed,
}

/// Groups shapes into characters
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    /// Create a segmenter
    ///
    /// # Errors
    ///
    /// Returns `RegionError::InvalidParameters` if the config is invalid.
    pub fn new(config: SegmentationConfig) -> RegionResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Whether a stroke passes the intake filter
    pub fn accepts_stroke(&self, stroke: &Stroke) -> bool {
        stroke.len() >= self.config.min_stroke_points
            && stroke.path_length() >= self.config.min_stroke_length
    }

    /// Group captured strokes on a canvas `canvas_width` pixels wide
    ///
    /// Strokes failing the intake filter are dropped first. Groups hold at
    /// most `max_strokes_per_group` strokes.
    pub fn segment_strokes(
        &self,
        strokes: Vec<Stroke>,
        canvas_width: f64,
    ) -> RegionResult<Vec<CharacterGroup<Stroke>>> {
        let before = strokes.len();
        let kept: Vec<Stroke> = strokes
            .into_iter()
            .filter(|s| self.accepts_stroke(s))
            .collect();
        if kept.len() != before {
            tracing::debug!(before, after = kept.len(), "discarded short strokes");
        }
        self.group_shapes(kept, canvas_width, Some(self.config.max_strokes_per_group))
    }

    /// Group pixel components on a canvas `canvas_width` pixels wide
    ///
    /// Component groups have no member cap; components below
    /// `min_component_area` never join an existing group.
    pub fn segment_components(
        &self,
        components: Vec<PixelComponent>,
        canvas_width: f64,
    ) -> RegionResult<Vec<CharacterGroup<PixelComponent>>> {
        self.group_shapes(components, canvas_width, None)
    }

    /// Label, de-noise and group the ink of a binary raster
    pub fn segment_grid(&self, grid: &BitGrid) -> RegionResult<Vec<CharacterGroup<PixelComponent>>> {
        let components = find_pixel_components(grid)?;
        let components = filter_noise_components(components, &self.config.noise);
        self.segment_components(components, grid.width() as f64)
    }

    /// Group arbitrary shapes
    ///
    /// The pairwise score matrix is computed once; group membership is
    /// tracked in a [`DisjointSet`].
    pub fn group_shapes<S: Shape>(
        &self,
        shapes: Vec<S>,
        canvas_width: f64,
        max_members: Option<usize>,
    ) -> RegionResult<Vec<CharacterGroup<S>>> {
        let n = shapes.len();
        if n == 0 {
            return Ok(Vec::new());
        }
        let scorer = ConnectivityScorer::new(self.config.scoring, canvas_width)?;

        let mut scores = vec![0.0f64; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let s = scorer.score(&shapes[i], &shapes[j]);
                scores[i * n + j] = s;
                scores[j * n + i] = s;
            }
        }

        let threshold = self.config.connectivity_threshold;
        let mut state = vec![VisitState::Unvisited; n];
        let mut ds = DisjointSet::new(n);
        let mut seeds = Vec::new();

        for seed in 0..n {
            if state[seed] != VisitState::Unvisited {
                continue;
            }
            state[seed] = VisitState::InGroup;
            let mut members = vec![seed];
            let mut bounds = shapes[seed].bounds();

            loop {
                let mut added = false;
                for cand in 0..n {
                    if state[cand] != VisitState::Unvisited {
                        continue;
                    }
                    if !members.iter().any(|&m| scores[m * n + cand] > threshold) {
                        continue;
                    }
                    let Some(merged) = self.admit(&shapes[cand], members.len(), &bounds, max_members)
                    else {
                        continue;
                    };
                    state[cand] = VisitState::InGroup;
                    ds.union(seed, cand)?;
                    members.push(cand);
                    bounds = merged;
                    added = true;
                }
                if !added {
                    break;
                }
            }

            for &m in &members {
                state[m] = VisitState::Closed;
            }
            tracing::debug!(seed, members = ?members, "closed character group");
            seeds.push(seed);
        }

        // Collect members per group in input order
        let mut slots: Vec<Option<S>> = shapes.into_iter().map(Some).collect();
        let mut groups = Vec::with_capacity(seeds.len());
        for &seed in &seeds {
            let root = ds.find(seed)?;
            let mut members = Vec::new();
            for (i, slot) in slots.iter_mut().enumerate() {
                if slot.is_some() && ds.find(i)? == root {
                    members.extend(slot.take());
                }
            }
            if let Some(group) = CharacterGroup::from_members(members) {
                groups.push(group);
            }
        }

        groups.sort_by(|a, b| a.bounds.min_x.total_cmp(&b.bounds.min_x));
        tracing::debug!(shapes = n, groups = groups.len(), "segmentation finished");
        Ok(groups)
    }

    /// Merged bounds if `cand` may join a group of `count` members
    fn admit<S: Shape>(
        &self,
        cand: &S,
        count: usize,
        bounds: &BoundingBox,
        max_members: Option<usize>,
    ) -> Option<BoundingBox> {
        if max_members.is_some_and(|max| count >= max) {
            return None;
        }
        if cand
            .pixel_area()
            .is_some_and(|area| area < self.config.min_component_area)
        {
            return None;
        }
        let merged = bounds.union(&cand.bounds());
        let aspect = merged.aspect_ratio();
        let (lo, hi) = self.config.aspect_ratio_range;
        (lo..=hi).contains(&aspect).then_some(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: &[(f64, f64)], t0: u64) -> Stroke {
        let samples: Vec<(f64, f64, u64)> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| (x, y, t0 + 16 * i as u64))
            .collect();
        Stroke::from_xyt(&samples).unwrap()
    }

    fn segmenter() -> Segmenter {
        Segmenter::new(SegmentationConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let groups = segmenter().segment_strokes(Vec::new(), 400.0).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_intake_filter_drops_short_strokes() {
        let seg = segmenter();
        let dot = stroke(&[(5.0, 5.0), (6.0, 5.0), (7.0, 5.0)], 0);
        let two_points = stroke(&[(0.0, 0.0), (50.0, 0.0)], 0);
        assert!(!seg.accepts_stroke(&dot));
        assert!(!seg.accepts_stroke(&two_points));
        let groups = seg.segment_strokes(vec![dot, two_points], 400.0).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_groups_sorted_left_to_right() {
        let right = stroke(&[(300.0, 0.0), (300.0, 30.0), (300.0, 60.0)], 0);
        let left = stroke(&[(10.0, 0.0), (10.0, 30.0), (10.0, 60.0)], 5000);
        let groups = segmenter().segment_strokes(vec![right, left], 400.0).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].bounds().min_x, 10.0);
        assert_eq!(groups[1].bounds().min_x, 300.0);
    }

    #[test]
    fn test_transitive_growth_reaches_fixed_point() {
        // c only connects through b; input order puts c before b so a
        // single scan from a would miss it
        let a = stroke(&[(0.0, 0.0), (20.0, 0.0), (20.0, 20.0)], 0);
        let c = stroke(&[(5.0, 40.0), (5.0, 60.0), (20.0, 60.0)], 3000);
        let b = stroke(&[(20.0, 20.0), (20.0, 40.0), (5.0, 40.0)], 1500);
        let seg = segmenter();
        let scorer = ConnectivityScorer::new(ScoringConfig::default(), 400.0).unwrap();
        assert!(scorer.score(&a, &c) <= 0.6);
        assert!(scorer.score(&a, &b) > 0.6);
        assert!(scorer.score(&b, &c) > 0.6);
        let groups = seg.segment_strokes(vec![a, c, b], 400.0).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
        let bounds = groups[0].bounds();
        assert_eq!((bounds.min_y, bounds.max_y), (0.0, 60.0));
    }

    #[test]
    fn test_max_strokes_per_group() {
        let config = SegmentationConfig::default().with_max_strokes_per_group(1);
        let seg = Segmenter::new(config).unwrap();
        let a = stroke(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0)], 0);
        let b = stroke(&[(40.0, 0.0), (27.5, 30.0), (15.0, 60.0)], 300);
        let groups = seg.segment_strokes(vec![a, b], 400.0).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_aspect_violating_singleton_is_kept() {
        // a long horizontal bar is far outside [0.3, 3.0] on its own
        let bar = stroke(&[(0.0, 0.0), (100.0, 0.0), (200.0, 2.0)], 0);
        let groups = segmenter().segment_strokes(vec![bar], 400.0).unwrap();
        assert_eq!(groups.len(), 1);
    }

    #[test]
    fn test_aspect_bound_blocks_merge() {
        let a = stroke(&[(0.0, 0.0), (20.0, 0.0), (40.0, 0.0)], 0);
        let b = stroke(&[(20.0, 0.0), (60.0, 0.0), (100.0, 3.0)], 100);
        let scorer = ConnectivityScorer::new(ScoringConfig::default(), 400.0).unwrap();
        assert!(scorer.score(&a, &b) > 0.6);
        let groups = segmenter().segment_strokes(vec![a, b], 400.0).unwrap();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_strict_preset() {
        let strict = SegmentationConfig::strict();
        assert_eq!(strict.scoring.proximity_threshold, 5.0);
        assert_eq!(strict.connectivity_threshold, 0.2);
        assert_eq!(strict.max_strokes_per_group, 1);
        assert_eq!(strict.min_stroke_length, 8.0);
        assert_eq!(strict.aspect_ratio_range, (0.5, 2.5));
        assert!(strict.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let bad = SegmentationConfig::default().with_aspect_ratio_range(3.0, 1.0);
        assert!(Segmenter::new(bad).is_err());
        let bad = SegmentationConfig::default().with_connectivity_threshold(1.5);
        assert!(Segmenter::new(bad).is_err());
    }

    #[test]
    fn test_small_component_never_joins() {
        let seg = segmenter();
        let big: Vec<(u32, u32)> = (0..20).flat_map(|y| (0..10).map(move |x| (x, y))).collect();
        let small = vec![(10, 5), (10, 6), (11, 6)];
        let groups = seg
            .segment_components(
                vec![
                    PixelComponent::new(big).unwrap(),
                    PixelComponent::new(small).unwrap(),
                ],
                100.0,
            )
            .unwrap();
        assert_eq!(groups.len(), 2);
    }
}
