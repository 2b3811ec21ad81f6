use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

use crate::detection::preprocessing::binarize;
use crate::models::Contour;

/// Outer, top-level boundaries of the non-zero regions of `binary`,
/// in discovery (raster) order
pub fn outer_contours(binary: &GrayImage) -> Vec<Contour> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| Contour::new(c.points))
        .collect()
}

/// Binarize with a global threshold, then find the outer contours
pub fn find_external_contours(gray: &GrayImage, thresh: u8) -> Vec<Contour> {
    outer_contours(&binarize(gray, thresh))
}

/// Index of the contour with the most points; ties keep the first
pub fn largest_contour(contours: &[Contour]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, contour) in contours.iter().enumerate() {
        match best {
            Some(b) if contours[b].len() >= contour.len() => {}
            _ => best = Some(i),
        }
    }
    best
}
