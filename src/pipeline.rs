use image::DynamicImage;
use serde::Serialize;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::RecognizerConfig;
use crate::detection::classify::classify_card;
use crate::detection::contours::find_external_contours;
use crate::detection::corners::locate_corners;
use crate::detection::preprocessing::{preprocess, Preprocessed};
use crate::detection::rectify::{rectify, RectifiedCard};
use crate::detection::segmentation::segment_card;
use crate::error::{CandidateError, RecognitionError};
use crate::models::{BoundingBox, Card, Contour};

/// Why one contour produced no card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateFailure {
    /// Contour index in discovery order
    pub index: usize,
    /// Source-image box, when the contour got far enough to have one
    pub bounding_box: Option<BoundingBox>,
    #[serde(serialize_with = "serialize_reason")]
    pub reason: CandidateError,
}

fn serialize_reason<S: serde::Serializer>(reason: &CandidateError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(reason)
}

/// Output of one `recognize` call
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Recognition {
    pub cards: Vec<Card>,
    pub failures: Vec<CandidateFailure>,
}

impl Recognition {
    /// Save every card's rectified images into `output_dir`.
    /// The directory must be empty or non-existent.
    pub fn save_debug(&self, output_dir: &Path) -> anyhow::Result<()> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(output_dir)?;
            if entries.count() > 0 {
                return Err(anyhow::anyhow!(
                    "Debug directory is not empty: {}",
                    output_dir.display()
                ));
            }
        } else {
            std::fs::create_dir_all(output_dir)?;
        }

        for (idx, card) in self.cards.iter().enumerate() {
            let color_path = output_dir.join(format!("{:02}_color.png", idx + 1));
            card.color_image
                .save(&color_path)
                .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

            let binary_path = output_dir.join(format!("{:02}_binary.png", idx + 1));
            card.binary_image
                .save(&binary_path)
                .map_err(|e| anyhow::anyhow!("Failed to save debug image: {}", e))?;

            tracing::debug!(path = %color_path.display(), "saved debug card");
        }

        Ok(())
    }
}

/// A rectified card waiting for the classification pass
struct RectifiedCandidate {
    index: usize,
    bounding_box: BoundingBox,
    images: RectifiedCard,
}

/// Card recognition over a single frame
#[derive(Debug, Clone, Default)]
pub struct CardRecognizer {
    pub config: RecognizerConfig,
}

impl CardRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: RecognizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Locate and classify every card in `image`.
    ///
    /// Per-candidate problems are collected in `failures`; only an image
    /// with no usable area is an error.
    pub fn recognize(&self, image: &DynamicImage) -> Result<Recognition, RecognitionError> {
        let config = &self.config;
        let frame = preprocess(image, config.border_trim, config.median_radius())?;

        let contours = find_external_contours(&frame.gray, config.card_threshold);
        if contours.is_empty() {
            tracing::debug!("no card candidates found");
            return Ok(Recognition::default());
        }
        tracing::debug!(candidates = contours.len(), "found card contours");

        let rectified = self.rectify_all(&frame, &contours);

        let mut recognition = Recognition::default();
        for result in rectified {
            match result {
                Ok(candidate) => match classify_card(&candidate.images, &config.classifier) {
                    Ok(class) => recognition.cards.push(Card {
                        is_black: class.is_black,
                        value: class.value,
                        suit: class.suit,
                        bounding_box: candidate.bounding_box,
                        color_image: candidate.images.color,
                        binary_image: candidate.images.binary,
                    }),
                    Err(reason) => recognition.failures.push(CandidateFailure {
                        index: candidate.index,
                        bounding_box: Some(candidate.bounding_box),
                        reason,
                    }),
                },
                Err(failure) => recognition.failures.push(failure),
            }
        }

        for failure in &recognition.failures {
            tracing::warn!(index = failure.index, reason = %failure.reason, "candidate skipped");
        }
        tracing::info!(
            cards = recognition.cards.len(),
            failures = recognition.failures.len(),
            "recognition finished"
        );

        Ok(recognition)
    }

    #[cfg(not(feature = "parallel"))]
    fn rectify_all(
        &self,
        frame: &Preprocessed,
        contours: &[Contour],
    ) -> Vec<Result<RectifiedCandidate, CandidateFailure>> {
        (0..contours.len())
            .map(|i| self.rectify_candidate(frame, contours, i))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn rectify_all(
        &self,
        frame: &Preprocessed,
        contours: &[Contour],
    ) -> Vec<Result<RectifiedCandidate, CandidateFailure>> {
        (0..contours.len())
            .into_par_iter()
            .map(|i| self.rectify_candidate(frame, contours, i))
            .collect()
    }

    /// Segment, locate corners and rectify one contour
    fn rectify_candidate(
        &self,
        frame: &Preprocessed,
        contours: &[Contour],
        index: usize,
    ) -> Result<RectifiedCandidate, CandidateFailure> {
        let config = &self.config;
        let source_box = contours[index]
            .bounding_box()
            .map(|b| b.offset(frame.offset.0, frame.offset.1));
        let fail = |reason: CandidateError| CandidateFailure {
            index,
            bounding_box: source_box,
            reason,
        };

        tracing::debug!(index, points = contours[index].len(), "segmenting candidate");

        let candidate = segment_card(
            &frame.gray,
            &frame.color,
            contours,
            index,
            config.mask_threshold,
        )
        .map_err(fail)?;

        let located = locate_corners(
            &candidate.binary,
            &candidate.color,
            &config.corners,
            config.mask_threshold,
        )
        .map_err(fail)?;

        let images =
            rectify(&located.color, &located.binary, &located.corners, config).map_err(fail)?;

        Ok(RectifiedCandidate {
            index,
            bounding_box: candidate.bounding_box.offset(frame.offset.0, frame.offset.1),
            images,
        })
    }
}

/// Recognize cards with the calibrated default configuration
pub fn recognize(image: &DynamicImage) -> Result<Recognition, RecognitionError> {
    CardRecognizer::new().recognize(image)
}
