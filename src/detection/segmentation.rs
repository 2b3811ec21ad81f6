use image::{GrayImage, Luma, RgbImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;

use crate::error::CandidateError;
use crate::models::{BoundingBox, Contour};

/// One card's pixels, isolated from the frame
#[derive(Debug, Clone)]
pub struct CardCandidate {
    /// Box in preprocessed-frame coordinates
    pub bounding_box: BoundingBox,
    /// Binary card mask cropped to `bounding_box`
    pub binary: GrayImage,
    /// Color pixels cropped to `bounding_box`
    pub color: RgbImage,
}

/// Reject contours too small to describe a card outline
pub fn check_degenerate(contour: &Contour) -> Result<BoundingBox, CandidateError> {
    let bbox = contour.bounding_box();
    let (width, height) = bbox.map(|b| (b.width, b.height)).unwrap_or((0, 0));

    match bbox {
        Some(b) if contour.len() >= 4 && b.width > 1 && b.height > 1 => Ok(b),
        _ => Err(CandidateError::DegenerateCandidate {
            points: contour.len(),
            width: width.saturating_sub(1),
            height: height.saturating_sub(1),
        }),
    }
}

/// Fill the interior of `contour` (given in box coordinates) on a canvas
fn fill_mask(contour: &Contour, width: u32, height: u32) -> GrayImage {
    let mut mask = GrayImage::new(width, height);
    let mut polygon: Vec<Point<i32>> = contour.points.clone();
    while polygon.len() > 1 && polygon.last() == polygon.first() {
        polygon.pop();
    }
    if polygon.len() > 1 {
        draw_polygon_mut(&mut mask, &polygon, Luma([255u8]));
    }
    mask
}

/// Isolate the card outlined by `contours[index]`.
///
/// Pixels outside the contour are zeroed, the rest re-binarized with
/// `mask_threshold`; both binary and color results are cropped to the
/// contour's extreme-point box.
pub fn segment_card(
    gray: &GrayImage,
    color: &RgbImage,
    contours: &[Contour],
    index: usize,
    mask_threshold: u8,
) -> Result<CardCandidate, CandidateError> {
    let contour = contours
        .get(index)
        .ok_or(CandidateError::DegenerateCandidate {
            points: 0,
            width: 0,
            height: 0,
        })?;
    let bbox = check_degenerate(contour)?;

    let local = contour.translated(bbox.x as i32, bbox.y as i32);
    let mask = fill_mask(&local, bbox.width, bbox.height);

    let mut binary = GrayImage::new(bbox.width, bbox.height);
    for (x, y, m) in mask.enumerate_pixels() {
        if m[0] == 0 {
            continue;
        }
        let v = gray.get_pixel(bbox.x + x, bbox.y + y)[0];
        if v > mask_threshold {
            binary.put_pixel(x, y, Luma([255u8]));
        }
    }

    let color_crop =
        image::imageops::crop_imm(color, bbox.x, bbox.y, bbox.width, bbox.height).to_image();

    Ok(CardCandidate {
        bounding_box: bbox,
        binary,
        color: color_crop,
    })
}
