use serde::{Deserialize, Serialize};

use super::geometry;

/// Axis-aligned box in image pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// One token or phrase produced by the text-detection step.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecognizedElement {
    pub text: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

impl RecognizedElement {
    pub fn new(text: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence: geometry::clamp_unit(confidence),
            bounding_box,
        }
    }
}

/// One timed occurrence of a tracked object in a video.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FrameOccurrence {
    /// Offset from the start of the clip, in seconds.
    pub time_offset_secs: f64,
    pub confidence: f32,
}

/// A localized visual entity (a pill, a bottle, ...). For video input the
/// `frames` sequence carries every tracked occurrence; for still images it
/// is empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectedObject {
    pub label: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub frames: Vec<FrameOccurrence>,
}

impl DetectedObject {
    pub fn new(label: impl Into<String>, confidence: f32, bounding_box: BoundingBox) -> Self {
        Self {
            label: label.into(),
            confidence: geometry::clamp_unit(confidence),
            bounding_box,
            frames: Vec::new(),
        }
    }
}

/// A scene/segment label with no localization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelAnnotation {
    pub description: String,
    pub confidence: f32,
}

impl LabelAnnotation {
    pub fn new(description: impl Into<String>, confidence: f32) -> Self {
        Self {
            description: description.into(),
            confidence: geometry::clamp_unit(confidence),
        }
    }
}

/// Everything the backend produced for one still image.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImageAnnotations {
    #[serde(default)]
    pub elements: Vec<RecognizedElement>,
    #[serde(default)]
    pub objects: Vec<DetectedObject>,
    #[serde(default)]
    pub labels: Vec<LabelAnnotation>,
}

/// Everything the backend produced for one video clip, after the analysis
/// operation completed. Polling the operation is the backend's concern;
/// the engine only ever sees the final payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VideoAnnotations {
    #[serde(default)]
    pub object_tracks: Vec<DetectedObject>,
    #[serde(default)]
    pub text_blocks: Vec<RecognizedElement>,
    #[serde(default)]
    pub labels: Vec<LabelAnnotation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_center() {
        let b = BoundingBox::new(10.0, 20.0, 40.0, 10.0);
        assert_eq!(b.center_x(), 30.0);
        assert_eq!(b.center_y(), 25.0);
    }

    #[test]
    fn test_constructors_clamp_confidence() {
        let e = RecognizedElement::new("✓", 1.7, BoundingBox::default());
        assert_eq!(e.confidence, 1.0);
        let o = DetectedObject::new("pill", -0.2, BoundingBox::default());
        assert_eq!(o.confidence, 0.0);
    }
}
