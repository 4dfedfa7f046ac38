//! Raw annotation data model.
//!
//! These types mirror the shape (not the wire format) of what the vision
//! backend produces: recognized text blocks, localized objects and scene
//! labels, each with confidences and, for video, per-object timed frame
//! occurrences. They are immutable inputs; the engine never mutates them.

pub mod geometry;
pub mod types;

pub use types::{
    BoundingBox, DetectedObject, FrameOccurrence, ImageAnnotations, LabelAnnotation,
    RecognizedElement, VideoAnnotations,
};
