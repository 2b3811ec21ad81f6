use image::{GrayImage, Luma, Pixel, Rgb, RgbImage};
use imageproc::definitions::Image;
use imageproc::filter::median_filter;
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crate::config::{FaceBinarization, RecognizerConfig};
use crate::detection::preprocessing::{binarize, to_grayscale};
use crate::error::CandidateError;
use crate::models::CornerSet;

/// Card warped to an upright rectangle, edge margin already trimmed
#[derive(Debug, Clone)]
pub struct RectifiedCard {
    pub color: RgbImage,
    pub binary: GrayImage,
}

fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    (b.0 - a.0).hypot(b.1 - a.1)
}

/// Warp the quadrilateral `corners` of both crops onto an axis-aligned
/// rectangle, binarize the face, then keep the centered
/// `config.edge_keep_ratio` of it.
pub fn rectify(
    color: &RgbImage,
    binary: &GrayImage,
    corners: &CornerSet,
    config: &RecognizerConfig,
) -> Result<RectifiedCard, CandidateError> {
    let card_width = distance(corners.upper_left, corners.upper_right);
    let card_height = distance(corners.upper_left, corners.lower_left);
    let (out_w, out_h) = (card_width as u32, card_height as u32);

    let degenerate = CandidateError::DegenerateCandidate {
        points: 4,
        width: out_w,
        height: out_h,
    };
    if out_w == 0 || out_h == 0 {
        return Err(degenerate);
    }

    let dest = [
        (0.0, 0.0),
        (card_width, 0.0),
        (card_width, card_height),
        (0.0, card_height),
    ];
    let projection = Projection::from_control_points(corners.as_array(), dest).ok_or(degenerate)?;

    let mut warped_color = RgbImage::new(out_w, out_h);
    warp_into(
        color,
        &projection,
        Interpolation::Bilinear,
        Rgb([0u8, 0, 0]),
        &mut warped_color,
    );

    let warped_binary = match config.face_binarization {
        FaceBinarization::Adaptive => binarize_face(
            &warped_color,
            config.median_radius(),
            config.face_min_value,
            config.face_offset,
        ),
        FaceBinarization::Mask => {
            let mut warped = GrayImage::new(out_w, out_h);
            warp_into(
                &binarize(binary, config.mask_threshold),
                &projection,
                Interpolation::Nearest,
                Luma([0u8]),
                &mut warped,
            );
            warped
        }
    };

    Ok(RectifiedCard {
        color: trim_edges(&warped_color, config.edge_keep_ratio),
        binary: trim_edges(&warped_binary, config.edge_keep_ratio),
    })
}

/// Mean luma of the pixels brighter than `min_value`, minus `offset`.
///
/// Falls back to `min_value` when no pixel is that bright.
pub fn face_threshold(gray: &GrayImage, min_value: u8, offset: u8) -> u8 {
    let (sum, count) = gray
        .pixels()
        .filter(|p| p[0] > min_value)
        .fold((0u64, 0u64), |(sum, count), p| (sum + p[0] as u64, count + 1));
    if count == 0 {
        return min_value;
    }
    ((sum / count) as u8).saturating_sub(offset)
}

/// Median-filter the card face and threshold it against its own brightness,
/// so inked glyphs of any hue separate from the face
pub fn binarize_face(color: &RgbImage, median_radius: u32, min_value: u8, offset: u8) -> GrayImage {
    let gray = to_grayscale(&median_filter(color, median_radius, median_radius));
    let thresh = face_threshold(&gray, min_value, offset);
    tracing::debug!(thresh, "face threshold");
    binarize(&gray, thresh)
}

/// Centered region of `ratio` x width by `ratio` x height
pub fn trim_edges<P>(img: &Image<P>, ratio: f32) -> Image<P>
where
    P: Pixel + 'static,
{
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return img.clone();
    }
    let keep_w = ((ratio * w as f32) as u32).clamp(1, w);
    let keep_h = ((ratio * h as f32) as u32).clamp(1, h);
    image::imageops::crop_imm(img, (w - keep_w) / 2, (h - keep_h) / 2, keep_w, keep_h).to_image()
}
