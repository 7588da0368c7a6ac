//! Builder for creating Detection objects from various input formats.

use crate::tracker::{BoundingBox, Detection};

/// Builder for creating `Detection` objects from various input formats.
///
/// The class id defaults to 0, the COCO "person" class.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    bbox: BoundingBox,
    score: f32,
    class_id: u32,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLBR format (x1, y1, x2, y2).
    pub fn tlbr(mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        self.bbox = BoundingBox::new(x1, y1, x2, y2);
        self
    }

    /// Set bounding box in XYWH format (center_x, center_y, width, height).
    pub fn xywh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::from_xywh(cx, cy, w, h);
        self
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, l: f32, t: f32, w: f32, h: f32) -> Self {
        self.bbox = BoundingBox::from_tlwh(l, t, w, h);
        self
    }

    /// Set the confidence score.
    pub fn score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    /// Set the detector class id.
    pub fn class_id(mut self, class_id: u32) -> Self {
        self.class_id = class_id;
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::from_box(self.bbox, self.score, self.class_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = DetectionBuilder::new()
            .tlwh(10.0, 20.0, 40.0, 60.0)
            .score(0.95)
            .class_id(3)
            .build();

        assert_eq!(det.score, 0.95);
        assert_eq!(det.class_id, 3);
        assert_eq!(det.bbox.to_tlbr(), [10.0, 20.0, 50.0, 80.0]);
    }

    #[test]
    fn test_defaults_to_person_class() {
        let det = DetectionBuilder::new().xywh(100.0, 100.0, 20.0, 40.0).build();
        assert_eq!(det.class_id, 0);
        assert_eq!(det.bbox.center().x, 100.0);
    }
}
