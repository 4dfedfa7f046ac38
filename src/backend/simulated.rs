//! Simulated vision backend.
//!
//! Produces bounded-random but plausible annotation payloads so the UI
//! can be demonstrated without a configured backend. This is the only
//! module in the crate allowed to use randomness, and it is only ever
//! selected when no API key is present.

use rand::Rng;

use crate::backend::VisionBackend;
use crate::catalog::KnownMedication;
use crate::chart::DayOfWeek;
use crate::error::Result;
use crate::vision::{
    BoundingBox, DetectedObject, FrameOccurrence, ImageAnnotations, LabelAnnotation,
    RecognizedElement, VideoAnnotations,
};

/// Chart layout used for generated payloads, loosely matching a printed
/// weekly medication chart photographed straight-on.
const DAY_HEADER_Y: f32 = 40.0;
const FIRST_DAY_X: f32 = 160.0;
const DAY_COLUMN_WIDTH: f32 = 110.0;
const FIRST_ROW_Y: f32 = 130.0;
const ROW_HEIGHT: f32 = 90.0;

/// Probability that any given (medication, day) cell carries a mark.
const MARK_PROBABILITY: f64 = 0.6;

pub struct SimulatedBackend {
    catalog: Vec<KnownMedication>,
}

impl SimulatedBackend {
    pub fn new(catalog: Vec<KnownMedication>) -> Self {
        Self { catalog }
    }

    fn demo_catalog(&self) -> Vec<String> {
        if self.catalog.is_empty() {
            vec!["Aspirin".to_string(), "Vitamin D".to_string()]
        } else {
            self.catalog.iter().map(|m| m.name.clone()).collect()
        }
    }
}

impl VisionBackend for SimulatedBackend {
    fn name(&self) -> &'static str {
        "simulated"
    }

    fn annotate_image(&self, _image_uri: &str) -> Result<ImageAnnotations> {
        let mut rng = rand::thread_rng();
        let names = self.demo_catalog();
        let mut elements = Vec::new();

        for (column, day) in DayOfWeek::ALL.iter().enumerate() {
            elements.push(RecognizedElement::new(
                day.name(),
                rng.gen_range(0.85..0.99),
                BoundingBox::new(
                    FIRST_DAY_X + column as f32 * DAY_COLUMN_WIDTH,
                    DAY_HEADER_Y,
                    80.0,
                    24.0,
                ),
            ));
        }

        for (row, name) in names.iter().enumerate() {
            let row_y = FIRST_ROW_Y + row as f32 * ROW_HEIGHT;
            elements.push(RecognizedElement::new(
                name.clone(),
                rng.gen_range(0.8..0.98),
                BoundingBox::new(20.0, row_y, 110.0, 24.0),
            ));
            for column in 0..DayOfWeek::ALL.len() {
                if rng.gen_bool(MARK_PROBABILITY) {
                    elements.push(RecognizedElement::new(
                        "✓",
                        rng.gen_range(0.6..0.95),
                        BoundingBox::new(
                            FIRST_DAY_X + column as f32 * DAY_COLUMN_WIDTH + 10.0,
                            row_y + rng.gen_range(-8.0..8.0),
                            18.0,
                            18.0,
                        ),
                    ));
                }
            }
        }

        // Inventory cues: a package somewhere in the frame.
        let (package_label, pill_count) = match rng.gen_range(0..3) {
            0 => ("blister pack", rng.gen_range(4..=12)),
            1 => ("pill bottle", rng.gen_range(1..=3)),
            _ => ("tablet", rng.gen_range(1..=8)),
        };
        let objects = (0..pill_count)
            .map(|i| {
                DetectedObject::new(
                    "Pill",
                    rng.gen_range(0.6..0.9),
                    BoundingBox::new(300.0 + i as f32 * 20.0, 500.0, 16.0, 16.0),
                )
            })
            .collect();
        let labels = vec![
            LabelAnnotation::new(package_label, rng.gen_range(0.75..0.95)),
            LabelAnnotation::new("medicine", rng.gen_range(0.75..0.95)),
        ];

        Ok(ImageAnnotations {
            elements,
            objects,
            labels,
        })
    }

    fn annotate_video(&self, _video_uri: &str) -> Result<VideoAnnotations> {
        let mut rng = rand::thread_rng();
        let names = self.demo_catalog();
        let visible_pills = rng.gen_range(5..=15);

        let object_tracks: Vec<DetectedObject> = (0..visible_pills)
            .map(|i| {
                let confidence = rng.gen_range(0.55..0.9);
                let mut track = DetectedObject::new(
                    "Pill",
                    confidence,
                    BoundingBox::new(100.0 + i as f32 * 25.0, 400.0, 16.0, 16.0),
                );
                track.frames = (0..3)
                    .filter_map(|second| {
                        if !rng.gen_bool(0.8) {
                            return None;
                        }
                        Some(FrameOccurrence {
                            time_offset_secs: second as f64 + rng.gen_range(0.0..0.9),
                            confidence,
                        })
                    })
                    .collect();
                track
            })
            .collect();

        let subject = &names[rng.gen_range(0..names.len())];
        let text_blocks = vec![RecognizedElement::new(
            subject.clone(),
            rng.gen_range(0.8..0.95),
            BoundingBox::new(80.0, 60.0, 140.0, 30.0),
        )];
        let labels = vec![LabelAnnotation::new(
            if rng.gen_bool(0.5) {
                "pill bottle"
            } else {
                "blister pack"
            },
            rng.gen_range(0.7..0.95),
        )];

        Ok(VideoAnnotations {
            object_tracks,
            text_blocks,
            labels,
        })
    }
}
