//! Vision backend seam.
//!
//! The engine itself never talks to the network; it consumes annotation
//! payloads produced by an implementation of [`VisionBackend`]. Two
//! implementations exist: the real Cloud Vision / Video Intelligence
//! client, and a rand-driven simulated backend for demo mode. Selection
//! happens here, by configuration, so demo behavior can never leak into
//! a configured production setup through scattered key checks.

pub mod client;
pub mod simulated;

pub use client::CloudVisionClient;
pub use simulated::SimulatedBackend;

use crate::catalog::KnownMedication;
use crate::config::RecognitionConfig;
use crate::error::{RecognitionError, Result};
use crate::vision::{ImageAnnotations, VideoAnnotations};

/// Produces raw annotation payloads for the engine. Implementations own
/// all network and polling concerns; the engine only sees final payloads.
pub trait VisionBackend {
    /// Human-readable implementation name, for logs and the host UI.
    fn name(&self) -> &'static str;

    /// Annotates one still image, addressed by URI.
    fn annotate_image(&self, image_uri: &str) -> Result<ImageAnnotations>;

    /// Annotates one video clip, addressed by URI. Blocks until the
    /// analysis operation completes or the poll bound is exceeded.
    fn annotate_video(&self, video_uri: &str) -> Result<VideoAnnotations>;
}

/// Picks the backend for the given configuration: the real client when a
/// credential is present, the simulated backend otherwise.
pub fn backend_from_config(
    config: &RecognitionConfig,
    catalog: &[KnownMedication],
) -> Box<dyn VisionBackend> {
    match CloudVisionClient::from_config(config) {
        Ok(client) => Box::new(client),
        Err(RecognitionError::Configuration(reason)) => {
            log::info!("{reason}; falling back to the simulated backend");
            Box::new(SimulatedBackend::new(catalog.to_vec()))
        }
        Err(other) => {
            // Client construction can only fail on configuration, but the
            // match must be total; treat anything else the same way.
            log::warn!("backend construction failed ({other}); using simulated backend");
            Box::new(SimulatedBackend::new(catalog.to_vec()))
        }
    }
}
