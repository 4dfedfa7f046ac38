//! Cloud Vision / Video Intelligence REST client.
//!
//! Image annotation is a single synchronous call. Video annotation is a
//! long-running operation: the initial request returns an operation name
//! which is polled with a fixed delay and a bounded attempt count;
//! exceeding the bound surfaces `AnalysisTimeout` instead of hanging.
//! Transport failures and non-success statuses are translated into the
//! crate's error taxonomy before anything reaches the engine.

use serde::Deserialize;
use serde_json::json;
use std::time::{Duration, Instant};

use crate::backend::VisionBackend;
use crate::config::RecognitionConfig;
use crate::error::{RecognitionError, Result};
use crate::vision::{
    geometry, BoundingBox, DetectedObject, FrameOccurrence, ImageAnnotations, LabelAnnotation,
    RecognizedElement, VideoAnnotations,
};

const IMAGE_ANNOTATE_URL: &str = "https://vision.googleapis.com/v1/images:annotate";
const VIDEO_ANNOTATE_URL: &str = "https://videointelligence.googleapis.com/v1/videos:annotate";
const VIDEO_OPERATION_BASE_URL: &str = "https://videointelligence.googleapis.com/v1";

/// Per-request transport timeout.
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Confidence assumed for text annotations that carry none.
const DEFAULT_TEXT_CONFIDENCE: f32 = 0.9;

pub struct CloudVisionClient {
    api_key: String,
    http: reqwest::blocking::Client,
    poll_max_attempts: u32,
    poll_interval: Duration,
}

impl CloudVisionClient {
    /// Builds a client from configuration. A missing API key is a
    /// `Configuration` error so the host can switch to demo mode.
    pub fn from_config(config: &RecognitionConfig) -> Result<Self> {
        if !config.backend_configured() {
            return Err(RecognitionError::Configuration(
                "no vision API key in config".to_string(),
            ));
        }
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_key: config.api_key.trim().to_string(),
            http,
            poll_max_attempts: config.poll_max_attempts,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(format!("{}?key={}", url, self.api_key))
            .json(body)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Backend(format!(
                "HTTP {} from {}",
                status, url
            )));
        }
        Ok(response.json()?)
    }

    fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        let response = self
            .http
            .get(format!("{}?key={}", url, self.api_key))
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RecognitionError::Backend(format!(
                "HTTP {} from {}",
                status, url
            )));
        }
        Ok(response.json()?)
    }

    /// Polls the video operation until done, bounded by attempts.
    fn poll_video_operation(&self, operation_name: &str) -> Result<VideoOperation> {
        let started = Instant::now();
        for attempt in 1..=self.poll_max_attempts {
            let url = format!("{}/{}", VIDEO_OPERATION_BASE_URL, operation_name);
            let value = self.get_json(&url)?;
            let operation: VideoOperation = serde_json::from_value(value)
                .map_err(|e| RecognitionError::Backend(format!("malformed operation: {e}")))?;
            if operation.done {
                log::debug!(
                    "video operation finished after {} poll(s), {:.1}s",
                    attempt,
                    started.elapsed().as_secs_f32()
                );
                return Ok(operation);
            }
            std::thread::sleep(self.poll_interval);
        }
        Err(RecognitionError::AnalysisTimeout {
            attempts: self.poll_max_attempts,
            elapsed_secs: started.elapsed().as_secs(),
        })
    }
}

impl VisionBackend for CloudVisionClient {
    fn name(&self) -> &'static str {
        "cloud-vision"
    }

    fn annotate_image(&self, image_uri: &str) -> Result<ImageAnnotations> {
        let body = json!({
            "requests": [{
                "image": {"source": {"imageUri": image_uri}},
                "features": [
                    {"type": "TEXT_DETECTION"},
                    {"type": "OBJECT_LOCALIZATION"},
                    {"type": "LABEL_DETECTION"}
                ]
            }]
        });
        let value = self.post_json(IMAGE_ANNOTATE_URL, &body)?;
        let batch: ImageBatchResponse = serde_json::from_value(value)
            .map_err(|e| RecognitionError::Backend(format!("malformed image response: {e}")))?;
        let response = batch.responses.into_iter().next().unwrap_or_default();
        Ok(convert_image_response(response))
    }

    fn annotate_video(&self, video_uri: &str) -> Result<VideoAnnotations> {
        let body = json!({
            "inputUri": video_uri,
            "features": ["OBJECT_TRACKING", "TEXT_DETECTION", "LABEL_DETECTION"]
        });
        let value = self.post_json(VIDEO_ANNOTATE_URL, &body)?;
        let started: OperationStarted = serde_json::from_value(value)
            .map_err(|e| RecognitionError::Backend(format!("malformed operation start: {e}")))?;
        let operation = self.poll_video_operation(&started.name)?;
        let result = operation
            .response
            .and_then(|r| r.annotation_results.into_iter().next())
            .unwrap_or_default();
        Ok(convert_video_result(result))
    }
}

// Wire types. Only the fields the engine consumes are modeled; everything
// else in the responses is ignored by serde.

#[derive(Debug, Default, Deserialize)]
struct ImageBatchResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    localized_object_annotations: Vec<LocalizedObject>,
    #[serde(default)]
    label_annotations: Vec<WireLabel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalizedObject {
    #[serde(default)]
    name: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    bounding_poly: Option<BoundingPoly>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireLabel {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BoundingPoly {
    #[serde(default)]
    vertices: Vec<Vertex>,
    #[serde(default)]
    normalized_vertices: Vec<Vertex>,
}

/// The API omits zero-valued coordinates, so both fields are optional.
#[derive(Debug, Deserialize)]
struct Vertex {
    #[serde(default)]
    x: Option<f32>,
    #[serde(default)]
    y: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct OperationStarted {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideoOperation {
    #[serde(default)]
    done: bool,
    #[serde(default)]
    response: Option<VideoResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResponse {
    #[serde(default)]
    annotation_results: Vec<VideoResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResult {
    #[serde(default)]
    object_annotations: Vec<ObjectTrack>,
    #[serde(default)]
    text_annotations: Vec<VideoText>,
    #[serde(default)]
    segment_label_annotations: Vec<SegmentLabel>,
}

#[derive(Debug, Deserialize)]
struct ObjectTrack {
    #[serde(default)]
    entity: Option<Entity>,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    frames: Vec<TrackFrame>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackFrame {
    #[serde(default)]
    time_offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoText {
    #[serde(default)]
    text: String,
    #[serde(default)]
    segments: Vec<TextSegment>,
}

#[derive(Debug, Deserialize)]
struct TextSegment {
    #[serde(default)]
    confidence: f32,
}

#[derive(Debug, Deserialize)]
struct SegmentLabel {
    #[serde(default)]
    entity: Option<Entity>,
    #[serde(default)]
    segments: Vec<TextSegment>,
}

#[derive(Debug, Deserialize)]
struct Entity {
    #[serde(default)]
    description: String,
}

fn poly_to_box(poly: &BoundingPoly) -> BoundingBox {
    let vertices = if poly.vertices.is_empty() {
        &poly.normalized_vertices
    } else {
        &poly.vertices
    };
    if vertices.is_empty() {
        return BoundingBox::default();
    }
    let xs: Vec<f32> = vertices.iter().map(|v| v.x.unwrap_or(0.0)).collect();
    let ys: Vec<f32> = vertices.iter().map(|v| v.y.unwrap_or(0.0)).collect();
    let min_x = xs.iter().copied().fold(f32::INFINITY, f32::min);
    let max_x = xs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let min_y = ys.iter().copied().fold(f32::INFINITY, f32::min);
    let max_y = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    BoundingBox::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

fn convert_image_response(response: ImageResponse) -> ImageAnnotations {
    // The first text annotation aggregates the whole image; the per-token
    // elements follow it.
    let elements = response
        .text_annotations
        .into_iter()
        .skip(1)
        .map(|t| {
            let bounding_box = t.bounding_poly.as_ref().map(poly_to_box).unwrap_or_default();
            RecognizedElement::new(
                t.description,
                t.score.unwrap_or(DEFAULT_TEXT_CONFIDENCE),
                bounding_box,
            )
        })
        .collect();
    let objects = response
        .localized_object_annotations
        .into_iter()
        .map(|o| {
            let bounding_box = o.bounding_poly.as_ref().map(poly_to_box).unwrap_or_default();
            DetectedObject::new(o.name, o.score, bounding_box)
        })
        .collect();
    let labels = response
        .label_annotations
        .into_iter()
        .map(|l| LabelAnnotation::new(l.description, l.score))
        .collect();
    ImageAnnotations {
        elements,
        objects,
        labels,
    }
}

fn convert_video_result(result: VideoResult) -> VideoAnnotations {
    let object_tracks = result
        .object_annotations
        .into_iter()
        .map(|track| {
            let label = track.entity.map(|e| e.description).unwrap_or_default();
            let mut object = DetectedObject::new(label, track.confidence, BoundingBox::default());
            object.frames = track
                .frames
                .iter()
                .filter_map(|frame| {
                    let token = frame.time_offset.as_deref()?;
                    let time_offset_secs = geometry::parse_time_offset(token)?;
                    Some(FrameOccurrence {
                        time_offset_secs,
                        confidence: track.confidence,
                    })
                })
                .collect();
            object
        })
        .collect();
    let text_blocks = result
        .text_annotations
        .into_iter()
        .map(|t| {
            let confidence = t
                .segments
                .first()
                .map(|s| s.confidence)
                .unwrap_or(DEFAULT_TEXT_CONFIDENCE);
            RecognizedElement::new(t.text, confidence, BoundingBox::default())
        })
        .collect();
    let labels = result
        .segment_label_annotations
        .into_iter()
        .map(|l| {
            let description = l.entity.map(|e| e.description).unwrap_or_default();
            let confidence = l.segments.first().map(|s| s.confidence).unwrap_or(0.0);
            LabelAnnotation::new(description, confidence)
        })
        .collect();
    VideoAnnotations {
        object_tracks,
        text_blocks,
        labels,
    }
}
