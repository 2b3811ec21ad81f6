use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};

use crate::config::CornerConfig;
use crate::detection::contours::{largest_contour, outer_contours};
use crate::detection::preprocessing::binarize;
use crate::error::CandidateError;
use crate::models::{BoundingBox, Contour, CornerSet};

/// Corners accepted by the locator, with the crops they refer to
#[derive(Debug, Clone)]
pub struct LocatedCorners {
    pub corners: CornerSet,
    pub centroid: (f32, f32),
    pub binary: GrayImage,
    pub color: RgbImage,
    /// Rotations applied before the corners were accepted
    pub rotations: u32,
}

/// A card shape re-cropped to its own outer contour
#[derive(Debug, Clone)]
struct ShapeView {
    binary: GrayImage,
    color: RgbImage,
    corners: Option<CornerSet>,
    centroid: (f32, f32),
}

enum LocatorState {
    Scan,
    Validate(ShapeView),
    Rotate,
}

/// Find the four corners of the card in `binary`, rotating the crops by a
/// fixed step until they pass validation or the rotation budget runs out.
pub fn locate_corners(
    binary: &GrayImage,
    color: &RgbImage,
    config: &CornerConfig,
    mask_threshold: u8,
) -> Result<LocatedCorners, CandidateError> {
    let mut binary = binary.clone();
    let mut color = color.clone();
    let mut rotations = 0u32;
    let mut state = LocatorState::Scan;

    loop {
        state = match state {
            LocatorState::Scan => match scan_shape(&binary, &color) {
                Some(view) => LocatorState::Validate(view),
                None => {
                    tracing::debug!(rotations, "no card shape left in crop");
                    return Err(CandidateError::CornerDetectionDivergence {
                        attempts: rotations,
                    });
                }
            },
            LocatorState::Validate(view) => match view.corners {
                Some(corners) if corners_valid(&corners, view.centroid) => {
                    tracing::debug!(rotations, ?corners, "corners accepted");
                    return Ok(LocatedCorners {
                        corners,
                        centroid: view.centroid,
                        binary: view.binary,
                        color: view.color,
                        rotations,
                    });
                }
                _ => {
                    binary = view.binary;
                    color = view.color;
                    LocatorState::Rotate
                }
            },
            LocatorState::Rotate => {
                if rotations >= config.max_rotations {
                    return Err(CandidateError::CornerDetectionDivergence {
                        attempts: rotations,
                    });
                }
                rotations += 1;
                tracing::debug!(rotations, "corners rejected, rotating card");
                let theta = config.rotation_step_degrees.to_radians();
                binary = binarize(&rotate_gray(&binary, theta), mask_threshold);
                color = rotate_color(&color, theta);
                LocatorState::Scan
            }
        };
    }
}

/// Re-extract the outer contour, re-crop to it and scan for corners.
///
/// `None` only when the crop holds no shape at all.
fn scan_shape(binary: &GrayImage, color: &RgbImage) -> Option<ShapeView> {
    let contours = outer_contours(binary);
    let contour = &contours[largest_contour(&contours)?];
    let bbox = contour.bounding_box()?;

    let binary = crop_gray(binary, &bbox);
    let color = image::imageops::crop_imm(color, bbox.x, bbox.y, bbox.width, bbox.height).to_image();
    let local: Contour = contour.translated(bbox.x as i32, bbox.y as i32);
    let centroid = local.centroid()?;
    let corners = find_corner_points(&binary);

    Some(ShapeView {
        binary,
        color,
        corners,
        centroid,
    })
}

fn crop_gray(img: &GrayImage, bbox: &BoundingBox) -> GrayImage {
    image::imageops::crop_imm(img, bbox.x, bbox.y, bbox.width, bbox.height).to_image()
}

/// Directional edge scan over a tightly cropped binary card.
///
/// Each label takes the last foreground pixel met along its edge; when the
/// labels come out in counter-clockwise sense they are rotated one step.
pub fn find_corner_points(binary: &GrayImage) -> Option<CornerSet> {
    let (w, h) = binary.dimensions();
    if w == 0 || h == 0 {
        return None;
    }
    let fg = |x: u32, y: u32| binary.get_pixel(x, y)[0] > 0;

    let mut upper_right = None;
    let mut lower_left = None;
    for i in 0..w {
        if fg(i, 0) {
            upper_right = Some((i as f32, 0.0));
        }
        let x = w - 1 - i;
        if fg(x, h - 1) {
            lower_left = Some((x as f32, (h - 1) as f32));
        }
    }

    let mut upper_left = None;
    let mut lower_right = None;
    for i in (0..h).rev() {
        if fg(0, i) {
            upper_left = Some((0.0, i as f32));
        }
        let y = h - 1 - i;
        if fg(w - 1, y) {
            lower_right = Some(((w - 1) as f32, y as f32));
        }
    }

    let mut corners = CornerSet {
        upper_left: upper_left?,
        upper_right: upper_right?,
        lower_right: lower_right?,
        lower_left: lower_left?,
    };

    if corners.upper_left.1 > corners.lower_right.1 {
        corners = CornerSet {
            upper_left: corners.upper_right,
            upper_right: corners.lower_right,
            lower_right: corners.lower_left,
            lower_left: corners.upper_left,
        };
    }

    Some(corners)
}

/// Near-axis-aligned shortcut: upper pair and lower pair each on one side of
/// the centroid horizontally, and the upper pair on one side vertically.
pub fn is_easy_case(corners: &CornerSet, centroid: (f32, f32)) -> bool {
    let (gx, gy) = centroid;
    let [c0, c1, c2, c3] = corners.as_array();
    (c0.0 - gx) * (c1.0 - gx) > 0.0
        && (c2.0 - gx) * (c3.0 - gx) > 0.0
        && (c0.1 - gy) * (c1.1 - gy) > 0.0
}

/// Every corner strictly on its own side of the centroid on both axes
pub fn corners_on_expected_sides(corners: &CornerSet, centroid: (f32, f32)) -> bool {
    let (gx, gy) = centroid;
    let CornerSet {
        upper_left: ul,
        upper_right: ur,
        lower_right: lr,
        lower_left: ll,
    } = *corners;

    ul.0 < gx
        && ul.1 < gy
        && ur.0 > gx
        && ur.1 < gy
        && lr.0 > gx
        && lr.1 > gy
        && ll.0 < gx
        && ll.1 > gy
}

/// Acceptance predicate; the centroid must also be strictly inside the quad
pub fn corners_valid(corners: &CornerSet, centroid: (f32, f32)) -> bool {
    (is_easy_case(corners, centroid) || corners_on_expected_sides(corners, centroid))
        && corners.strictly_contains(centroid)
}

/// Side of a square canvas that holds `w`x`h` under any rotation
fn padded_side(w: u32, h: u32) -> u32 {
    ((w as f64).hypot(h as f64)).ceil() as u32 + 2
}

fn rotate_gray(img: &GrayImage, theta: f32) -> GrayImage {
    let side = padded_side(img.width(), img.height());
    let mut canvas = GrayImage::new(side, side);
    let x = (side - img.width()) / 2;
    let y = (side - img.height()) / 2;
    image::imageops::replace(&mut canvas, img, x as i64, y as i64);
    rotate_about_center(&canvas, theta, Interpolation::Bilinear, Luma([0u8]))
}

fn rotate_color(img: &RgbImage, theta: f32) -> RgbImage {
    let side = padded_side(img.width(), img.height());
    let mut canvas = RgbImage::new(side, side);
    let x = (side - img.width()) / 2;
    let y = (side - img.height()) / 2;
    image::imageops::replace(&mut canvas, img, x as i64, y as i64);
    rotate_about_center(&canvas, theta, Interpolation::Bilinear, Rgb([0u8, 0, 0]))
}
