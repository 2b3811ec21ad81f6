use image::{GrayImage, RgbImage};

use crate::config::ClassifierConfig;
use crate::detection::contours::find_external_contours;
use crate::detection::preprocessing::{binarize, invert};
use crate::detection::rectify::RectifiedCard;
use crate::error::CandidateError;
use crate::models::{Contour, Suit};

/// Threshold applied to the inverted card before symbol extraction
const SYMBOL_CONTOUR_THRESHOLD: u8 = 40;

/// Rank, color and suit derived from a rectified card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub value: u8,
    pub is_black: bool,
    pub suit: Suit,
}

/// Outer contours of the printed glyphs (dark shapes on the card face)
pub fn symbol_contours(binary: &GrayImage) -> Vec<Contour> {
    find_external_contours(&invert(binary), SYMBOL_CONTOUR_THRESHOLD)
}

/// How many of {first, last} symbol contours are long enough to be
/// pips split along the card edge
pub fn count_connected(contours: &[Contour], min_points: usize) -> i32 {
    match contours {
        [] => 0,
        [only] => (only.len() > min_points) as i32,
        [first, .., last] => (first.len() > min_points) as i32 + (last.len() > min_points) as i32,
    }
}

/// Pip-count rank: contours minus the non-pip glyphs, corrected for
/// edge-split pips; dense layouts are tens.
pub fn card_value(symbol_count: usize, connected: i32, config: &ClassifierConfig) -> i32 {
    if symbol_count > config.ten_min_symbols {
        10
    } else {
        symbol_count as i32 - config.non_pip_symbols + connected
    }
}

/// Largest contour from the second half of the list, last one excluded
pub fn suit_symbol_index(contours: &[Contour]) -> Option<usize> {
    let n = contours.len();
    let start = n.div_ceil(2);
    if start >= n {
        return None;
    }

    let mut best = start;
    for k in start + 1..n.saturating_sub(1) {
        if contours[k].len() > contours[best].len() {
            best = k;
        }
    }
    Some(best)
}

/// Black when the mean red channel is well below the mean intensity
pub fn is_black(symbol: &RgbImage, red_ratio: f64) -> bool {
    let pixels = (symbol.width() as u64) * (symbol.height() as u64);
    if pixels == 0 {
        return false;
    }

    let (red, overall) = symbol.pixels().fold((0u64, 0u64), |(red, overall), p| {
        let [r, g, b] = p.0;
        (red + r as u64, overall + (r as u64 + g as u64 + b as u64) / 3)
    });
    let mean_red = red as f64 / pixels as f64;
    let mean_overall = overall as f64 / pixels as f64;

    mean_red < red_ratio * mean_overall
}

fn count_dark(img: &GrayImage, rows: std::ops::Range<u32>) -> u32 {
    rows.map(|y| {
        (0..img.width())
            .filter(|&x| img.get_pixel(x, y)[0] == 0)
            .count() as u32
    })
    .sum()
}

/// Dark-pixel distribution of the suit glyph.
///
/// Black: a heavy top fifth is a club, otherwise a spade.
/// Red: balanced top and bottom halves are a diamond, otherwise a heart.
pub fn classify_suit(symbol: &GrayImage, is_black: bool, config: &ClassifierConfig) -> Suit {
    let symbol = binarize(symbol, config.symbol_threshold);
    let h = symbol.height();

    if is_black {
        if count_dark(&symbol, 0..h / 5) > config.club_min_dark {
            Suit::Club
        } else {
            Suit::Spade
        }
    } else {
        let top = count_dark(&symbol, 0..h / 2) as f64;
        let bottom = count_dark(&symbol, h / 2..h) as f64;
        let tol = config.diamond_tolerance;
        if bottom > (1.0 - tol) * top && bottom < (1.0 + tol) * top {
            Suit::Diamond
        } else {
            Suit::Heart
        }
    }
}

/// Derive value, color and suit for one rectified card
pub fn classify_card(
    card: &RectifiedCard,
    config: &ClassifierConfig,
) -> Result<Classification, CandidateError> {
    let contours = symbol_contours(&card.binary);
    let connected = count_connected(&contours, config.connected_min_points);
    let value = card_value(contours.len(), connected, config);
    let out_of_range = CandidateError::ClassificationOutOfRange {
        value,
        symbols: contours.len(),
    };

    tracing::debug!(symbols = contours.len(), connected, value, "symbol contours");

    if !(1..=10).contains(&value) {
        return Err(out_of_range);
    }

    let bbox = suit_symbol_index(&contours)
        .and_then(|k| contours[k].bounding_box())
        .ok_or(out_of_range)?;

    let symbol_binary =
        image::imageops::crop_imm(&card.binary, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
    let symbol_color =
        image::imageops::crop_imm(&card.color, bbox.x, bbox.y, bbox.width, bbox.height).to_image();

    let is_black = is_black(&symbol_color, config.red_ratio);
    let suit = classify_suit(&symbol_binary, is_black, config);

    Ok(Classification {
        value: value as u8,
        is_black,
        suit,
    })
}
