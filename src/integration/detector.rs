//! Trait for object detection inference backends.

use ndarray::Array2;

use crate::tracker::Detection;

/// Trait for object detection inference backends.
///
/// Implement this trait to feed any detection model into a tracking session.
///
/// # Example
///
/// ```ignore
/// use queuetrack_rs::{Detection, DetectionSource};
///
/// struct MyDetector {
///     // Your model here
/// }
///
/// impl DetectionSource for MyDetector {
///     type Error = std::io::Error;
///
///     fn detect(&mut self, input: &[u8], width: u32, height: u32) -> Result<Vec<Detection>, Self::Error> {
///         // Run inference and return detections
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Error type for detection failures.
    type Error;

    /// Run inference on raw image data and return detections.
    ///
    /// # Arguments
    /// * `input` - Raw image bytes (format depends on implementation)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    fn detect(
        &mut self,
        input: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<Detection>, Self::Error>;
}

/// Helper trait for converting model-specific outputs to `Detection`.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

/// `None` for rows whose class is negative or not a number.
fn from_row(row: [f32; 6]) -> Option<Detection> {
    let [x1, y1, x2, y2, score, class] = row;
    if !class.is_finite() || class < 0.0 {
        return None;
    }
    Some(Detection::new(x1, y1, x2, y2, score, class as u32))
}

/// Rows of `[x1, y1, x2, y2, confidence, class]`, as YOLO-style heads emit.
/// Rows without a valid class id are skipped.
impl IntoDetections for Vec<[f32; 6]> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter().filter_map(from_row).collect()
    }
}

/// An `N x 6` matrix with the same column layout. Rows of any other width
/// are skipped.
impl IntoDetections for Array2<f32> {
    fn into_detections(self) -> Vec<Detection> {
        if self.ncols() != 6 {
            return Vec::new();
        }
        self.rows()
            .into_iter()
            .filter_map(|r| from_row([r[0], r[1], r[2], r[3], r[4], r[5]]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rows_into_detections() {
        let dets = vec![[10.0, 20.0, 50.0, 120.0, 0.8, 0.0f32]].into_detections();
        assert_eq!(dets, vec![Detection::new(10.0, 20.0, 50.0, 120.0, 0.8, 0)]);
    }

    #[test]
    fn test_matrix_into_detections() {
        let raw = array![
            [10.0, 20.0, 50.0, 120.0, 0.8, 0.0f32],
            [60.0, 20.0, 90.0, 80.0, 0.4, 2.0],
        ];
        let dets = raw.into_detections();
        assert_eq!(dets.len(), 2);
        assert_eq!(dets[1].class_id, 2);
        assert_eq!(dets[1].score, 0.4);
    }

    #[test]
    fn test_invalid_class_rows_are_skipped() {
        let dets = vec![
            [10.0, 20.0, 50.0, 120.0, 0.9, -1.0f32],
            [10.0, 20.0, 50.0, 120.0, 0.9, f32::NAN],
            [60.0, 20.0, 90.0, 80.0, 0.9, 0.0],
        ]
        .into_detections();
        assert_eq!(dets, vec![Detection::new(60.0, 20.0, 90.0, 80.0, 0.9, 0)]);

        let raw = array![[10.0, 20.0, 50.0, 120.0, 0.9, -1.0f32]];
        assert!(raw.into_detections().is_empty());
    }

    #[test]
    fn test_matrix_with_wrong_width_is_empty() {
        let raw = Array2::<f32>::zeros((3, 5));
        assert!(raw.into_detections().is_empty());
    }
}
