use serde::{Deserialize, Serialize};
use std::path::Path;

/// Calibrated constants for the whole recognition pipeline.
///
/// Every field has a default, so a JSON file only needs to name the
/// values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Pixels cut from each edge of the input frame
    pub border_trim: u32,
    /// Median filter kernel size (odd)
    pub median_kernel: u32,
    /// Global threshold separating cards from the dark background
    pub card_threshold: u8,
    /// Threshold used whenever a card mask is re-binarized
    pub mask_threshold: u8,
    /// Fraction of the rectified card kept (centered) on each axis
    pub edge_keep_ratio: f32,
    /// How the rectified card face is turned into a binary image
    pub face_binarization: FaceBinarization,
    /// Face pixels at or below this luma are left out of the adaptive mean
    pub face_min_value: u8,
    /// Subtracted from the adaptive mean to get the face threshold
    pub face_offset: u8,
    pub corners: CornerConfig,
    pub classifier: ClassifierConfig,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            border_trim: 2,
            median_kernel: 7,
            card_threshold: 40,
            mask_threshold: 50,
            edge_keep_ratio: 0.95,
            face_binarization: FaceBinarization::Adaptive,
            face_min_value: 50,
            face_offset: 35,
            corners: CornerConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl RecognizerConfig {
    /// Load a (possibly partial) JSON config file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    pub(crate) fn median_radius(&self) -> u32 {
        self.median_kernel / 2
    }
}

/// Source of the rectified binary card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceBinarization {
    /// Denoise the warped color card and threshold it at the mean of its
    /// bright pixels minus `face_offset`
    Adaptive,
    /// Warp the card mask and re-threshold it with `mask_threshold`
    Mask,
}

/// Rotate-and-retry corner search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerConfig {
    pub rotation_step_degrees: f32,
    /// Upper bound on rotations before a candidate is given up
    pub max_rotations: u32,
}

impl Default for CornerConfig {
    fn default() -> Self {
        Self {
            rotation_step_degrees: 3.0,
            max_rotations: 30,
        }
    }
}

/// Pixel-counting rank/color/suit heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// First/last symbol contours longer than this count as edge-split pips
    pub connected_min_points: usize,
    /// More symbol contours than this means a ten
    pub ten_min_symbols: usize,
    /// Rank-index and small suit glyphs that are not pips
    pub non_pip_symbols: i32,
    /// Mean red below `red_ratio` x mean intensity means black
    pub red_ratio: f64,
    pub symbol_threshold: u8,
    /// Dark pixels in the top fifth of a black symbol above which it is a club
    pub club_min_dark: u32,
    /// Relative top/bottom balance within which a red symbol is a diamond
    pub diamond_tolerance: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            connected_min_points: 166,
            ten_min_symbols: 13,
            non_pip_symbols: 4,
            red_ratio: 0.68,
            symbol_threshold: 125,
            club_min_dark: 241,
            diamond_tolerance: 0.3,
        }
    }
}
