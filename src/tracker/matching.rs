//! Detection filtering and nearest-centroid assignment.

use ndarray::Array2;

use crate::tracker::rect::{BoundingBox, Point};

/// Detection input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Bounding box in TLBR format (x1, y1, x2, y2)
    pub bbox: BoundingBox,
    /// Detection confidence score
    pub score: f32,
    /// Detector class id
    pub class_id: u32,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, score: f32, class_id: u32) -> Self {
        Self {
            bbox: BoundingBox::new(x1, y1, x2, y2),
            score,
            class_id,
        }
    }

    pub fn from_box(bbox: BoundingBox, score: f32, class_id: u32) -> Self {
        Self {
            bbox,
            score,
            class_id,
        }
    }
}

/// Pre-assignment gate: keeps one class, drops weak and degenerate boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionFilter {
    pub target_class: u32,
    pub confidence_threshold: f32,
    pub min_area: f32,
}

impl DetectionFilter {
    pub fn accepts(&self, det: &Detection) -> bool {
        let b = &det.bbox;
        if ![b.x1, b.y1, b.x2, b.y2, det.score].iter().all(|v| v.is_finite()) {
            return false;
        }
        let area = b.area();
        det.class_id == self.target_class
            && det.score >= self.confidence_threshold
            && area > 0.0
            && area >= self.min_area
    }

    /// Split `detections` into accepted boxes and a rejected count.
    pub fn apply(&self, detections: Vec<Detection>) -> (Vec<BoundingBox>, usize) {
        let total = detections.len();
        let kept: Vec<BoundingBox> = detections
            .into_iter()
            .filter(|d| self.accepts(d))
            .map(|d| d.bbox)
            .collect();
        let rejected = total - kept.len();
        (kept, rejected)
    }
}

/// Compute centroid distance matrix between tracks (rows) and detections (columns).
pub fn centroid_distance(track_points: &[Point], det_points: &[Point]) -> Array2<f32> {
    let mut dists = Array2::zeros((track_points.len(), det_points.len()));
    for (i, t) in track_points.iter().enumerate() {
        for (j, d) in det_points.iter().enumerate() {
            dists[[i, j]] = t.distance(d);
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    /// `(track_index, detection_index)` pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy nearest-neighbour assignment.
///
/// Detections are visited in column order; each takes the closest track not
/// already taken, provided the distance is within `gate`. Earlier detections
/// win ties, and among equidistant tracks the lower row wins. Non-finite
/// costs never match.
pub fn greedy_assignment(cost_matrix: &Array2<f32>, gate: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    let mut taken = vec![false; num_rows];
    let mut matches = Vec::new();
    let mut unmatched_detections = Vec::new();

    for col in 0..num_cols {
        let best = (0..num_rows)
            .filter(|&row| !taken[row])
            .map(|row| (row, cost_matrix[[row, col]]))
            .filter(|&(_, cost)| cost.is_finite())
            .fold(None, |best: Option<(usize, f32)>, (row, cost)| match best {
                Some((_, best_cost)) if best_cost <= cost => best,
                _ => Some((row, cost)),
            });

        match best {
            Some((row, cost)) if cost <= gate => {
                taken[row] = true;
                matches.push((row, col));
            }
            _ => unmatched_detections.push(col),
        }
    }

    let unmatched_tracks = taken
        .iter()
        .enumerate()
        .filter_map(|(i, &t)| if t { None } else { Some(i) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> DetectionFilter {
        DetectionFilter {
            target_class: 0,
            confidence_threshold: 0.5,
            min_area: 100.0,
        }
    }

    #[test]
    fn test_filter_rules() {
        let f = filter();
        assert!(f.accepts(&Detection::new(0.0, 0.0, 20.0, 20.0, 0.5, 0)));
        assert!(!f.accepts(&Detection::new(0.0, 0.0, 20.0, 20.0, 0.49, 0)));
        assert!(!f.accepts(&Detection::new(0.0, 0.0, 20.0, 20.0, 0.9, 2)));
        assert!(!f.accepts(&Detection::new(0.0, 0.0, 5.0, 5.0, 0.9, 0)));
        assert!(!f.accepts(&Detection::new(20.0, 20.0, 0.0, 0.0, 0.9, 0)));
    }

    #[test]
    fn test_filter_rejects_non_finite_values() {
        let f = filter();
        let inf = f32::INFINITY;
        assert!(!f.accepts(&Detection::new(-inf, 200.0, inf, 300.0, 0.9, 0)));
        assert!(!f.accepts(&Detection::new(0.0, 0.0, f32::NAN, 20.0, 0.9, 0)));
        assert!(!f.accepts(&Detection::new(0.0, 0.0, 20.0, 20.0, f32::NAN, 0)));
        assert!(!f.accepts(&Detection::new(0.0, 0.0, 20.0, 20.0, inf, 0)));
    }

    #[test]
    fn test_filter_apply_counts_rejections() {
        let dets = vec![
            Detection::new(0.0, 0.0, 20.0, 20.0, 0.9, 0),
            Detection::new(0.0, 0.0, 20.0, 20.0, 0.1, 0),
        ];
        let (kept, rejected) = filter().apply(dets);
        assert_eq!(kept.len(), 1);
        assert_eq!(rejected, 1);
    }

    #[test]
    fn test_greedy_picks_nearest_within_gate() {
        let tracks = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let dets = [Point::new(95.0, 0.0), Point::new(3.0, 0.0), Point::new(500.0, 0.0)];
        let cost = centroid_distance(&tracks, &dets);

        let result = greedy_assignment(&cost, 50.0);
        assert_eq!(result.matches, vec![(1, 0), (0, 1)]);
        assert!(result.unmatched_tracks.is_empty());
        assert_eq!(result.unmatched_detections, vec![2]);
    }

    #[test]
    fn test_greedy_first_detection_wins() {
        let tracks = [Point::new(0.0, 0.0)];
        let dets = [Point::new(10.0, 0.0), Point::new(1.0, 0.0)];
        let cost = centroid_distance(&tracks, &dets);

        let result = greedy_assignment(&cost, 50.0);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_detections, vec![1]);
    }

    #[test]
    fn test_greedy_skips_nan_rows() {
        let tracks = [Point::new(0.0, 0.0), Point::new(f32::NAN, 0.0)];
        let dets = [Point::new(5.0, 0.0)];
        let cost = centroid_distance(&tracks, &dets);

        let result = greedy_assignment(&cost, 50.0);
        assert_eq!(result.matches, vec![(0, 0)]);
        assert_eq!(result.unmatched_tracks, vec![1]);
    }

    #[test]
    fn test_greedy_empty_inputs() {
        let cost = centroid_distance(&[], &[Point::new(1.0, 1.0)]);
        let result = greedy_assignment(&cost, 10.0);
        assert_eq!(result.unmatched_detections, vec![0]);

        let cost = centroid_distance(&[Point::new(1.0, 1.0)], &[]);
        let result = greedy_assignment(&cost, 10.0);
        assert_eq!(result.unmatched_tracks, vec![0]);
    }
}
