#![allow(dead_code)]

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_polygon_mut};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use imageproc::point::Point;
use imageproc::rect::Rect;

pub const BACKGROUND: Rgb<u8> = Rgb([10, 10, 10]);
pub const WHITE_FACE: Rgb<u8> = Rgb([255, 255, 255]);
/// Cool-tinted face; black ink on it reads as black under the red-ratio rule
pub const CYAN_FACE: Rgb<u8> = Rgb([100, 230, 230]);
pub const RED_INK: Rgb<u8> = Rgb([150, 0, 0]);
/// Red ink brighter than the card mask threshold
pub const BRIGHT_RED_INK: Rgb<u8> = Rgb([220, 30, 30]);
pub const BLACK_INK: Rgb<u8> = Rgb([0, 0, 0]);

pub const CARD_WIDTH: u32 = 120;
pub const CARD_HEIGHT: u32 = 170;

/// Printed shapes, in card-local coordinates
#[derive(Debug, Clone, Copy)]
pub enum Glyph {
    Bar { x: i32, y: i32, w: u32, h: u32 },
    Diamond { cx: i32, cy: i32, rx: i32, ry: i32 },
    Spade { cx: i32, cy: i32, size: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipShape {
    Diamond,
    Spade,
}

pub fn dark_frame(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, BACKGROUND)
}

fn glyph_polygon(glyph: Glyph, ox: i32, oy: i32) -> Option<Vec<Point<i32>>> {
    match glyph {
        Glyph::Bar { .. } => None,
        Glyph::Diamond { cx, cy, rx, ry } => Some(vec![
            Point::new(ox + cx, oy + cy - ry),
            Point::new(ox + cx + rx, oy + cy),
            Point::new(ox + cx, oy + cy + ry),
            Point::new(ox + cx - rx, oy + cy),
        ]),
        Glyph::Spade { cx, cy, size } => {
            let half_base = size * 4 / 5;
            Some(vec![
                Point::new(ox + cx, oy + cy - size),
                Point::new(ox + cx + half_base, oy + cy + size),
                Point::new(ox + cx - half_base, oy + cy + size),
            ])
        }
    }
}

fn draw_glyph(frame: &mut RgbImage, ox: i32, oy: i32, glyph: Glyph, ink: Rgb<u8>) {
    match glyph {
        Glyph::Bar { x, y, w, h } => {
            draw_filled_rect_mut(frame, Rect::at(ox + x, oy + y).of_size(w, h), ink);
        }
        _ => {
            if let Some(poly) = glyph_polygon(glyph, ox, oy) {
                draw_polygon_mut(frame, &poly, ink);
            }
        }
    }
}

/// Paint an upright card with its glyphs at `(x, y)` of `frame`
pub fn draw_card(frame: &mut RgbImage, x: i32, y: i32, face: Rgb<u8>, ink: Rgb<u8>, glyphs: &[Glyph]) {
    draw_filled_rect_mut(frame, Rect::at(x, y).of_size(CARD_WIDTH, CARD_HEIGHT), face);
    for glyph in glyphs {
        draw_glyph(frame, x, y, *glyph, ink);
    }
}

fn pip(shape: PipShape, cx: i32, cy: i32, large: bool) -> Glyph {
    match (shape, large) {
        (PipShape::Diamond, true) => Glyph::Diamond { cx, cy, rx: 11, ry: 14 },
        (PipShape::Diamond, false) => Glyph::Diamond { cx, cy, rx: 6, ry: 8 },
        (PipShape::Spade, true) => Glyph::Spade { cx, cy, size: 13 },
        (PipShape::Spade, false) => Glyph::Spade { cx, cy, size: 8 },
    }
}

/// Rank bar and small suit glyph in two opposite corners, plus `value`
/// centre pips (supported values: 2..=5)
pub fn card_layout(value: u32, shape: PipShape) -> Vec<Glyph> {
    let centres: Vec<(i32, i32)> = match value {
        2 => vec![(60, 45), (60, 125)],
        3 => vec![(60, 45), (60, 85), (60, 125)],
        4 => vec![(38, 45), (82, 45), (38, 125), (82, 125)],
        5 => vec![(38, 45), (82, 45), (60, 85), (38, 125), (82, 125)],
        _ => panic!("no layout for value {}", value),
    };

    let mut glyphs = vec![
        Glyph::Bar { x: 10, y: 10, w: 8, h: 16 },
        pip(shape, 12, 42, false),
    ];
    glyphs.extend(centres.into_iter().map(|(cx, cy)| pip(shape, cx, cy, true)));
    glyphs.push(pip(shape, 108, 128, false));
    glyphs.push(Glyph::Bar { x: 102, y: 144, w: 8, h: 16 });
    glyphs
}

/// Two upright cards on a dark frame: a red 3 of diamonds at (30, 40)
/// and a black 5 of spades at (230, 60)
pub fn two_card_scene() -> RgbImage {
    let mut frame = dark_frame(400, 280);
    draw_card(&mut frame, 30, 40, WHITE_FACE, RED_INK, &card_layout(3, PipShape::Diamond));
    draw_card(&mut frame, 230, 60, CYAN_FACE, BLACK_INK, &card_layout(5, PipShape::Spade));
    frame
}

/// One card with `ink` glyphs, centred on a 300x300 dark frame
pub fn single_card_scene(ink: Rgb<u8>, value: u32, shape: PipShape) -> RgbImage {
    let mut frame = dark_frame(300, 300);
    let x = (300 - CARD_WIDTH as i32) / 2;
    let y = (300 - CARD_HEIGHT as i32) / 2;
    draw_card(&mut frame, x, y, WHITE_FACE, ink, &card_layout(value, shape));
    frame
}

/// `frame` turned by `degrees` about its centre, uncovered area filled
/// with the background
pub fn tilted(frame: &RgbImage, degrees: f32) -> RgbImage {
    rotate_about_center(frame, degrees.to_radians(), Interpolation::Bilinear, BACKGROUND)
}

/// Filled rectangle rotated by `degrees` about its centre on a canvas
/// with a margin, as binary mask plus matching color image
pub fn rotated_card(width: f32, height: f32, degrees: f32) -> (GrayImage, RgbImage) {
    let side = (width.hypot(height)).ceil() as u32 + 20;
    let c = side as f32 / 2.0;
    let (sin, cos) = degrees.to_radians().sin_cos();
    let corners = [
        (-width / 2.0, -height / 2.0),
        (width / 2.0, -height / 2.0),
        (width / 2.0, height / 2.0),
        (-width / 2.0, height / 2.0),
    ];
    let poly: Vec<Point<i32>> = corners
        .iter()
        .map(|&(x, y)| {
            Point::new(
                (c + x * cos - y * sin).round() as i32,
                (c + x * sin + y * cos).round() as i32,
            )
        })
        .collect();

    let mut mask = GrayImage::new(side, side);
    draw_polygon_mut(&mut mask, &poly, Luma([255u8]));
    let mut color = RgbImage::new(side, side);
    draw_polygon_mut(&mut color, &poly, WHITE_FACE);
    (mask, color)
}

/// White binary image with `count` separate 10x10 black squares
pub fn squares_card(count: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(200, 300, Luma([255u8]));
    for i in 0..count {
        let col = (i % 5) as i32;
        let row = (i / 5) as i32;
        draw_filled_rect_mut(
            &mut img,
            Rect::at(20 + col * 35, 20 + row * 40).of_size(10, 10),
            Luma([0u8]),
        );
    }
    img
}

/// `width` x `height` white image; for each `(rows, dark)` band, the
/// first `dark` pixels in row-major order are black
pub fn dark_pixels(width: u32, height: u32, bands: &[(std::ops::Range<u32>, u32)]) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([255u8]));
    for (rows, dark) in bands {
        let mut left = *dark;
        for y in rows.clone() {
            for x in 0..width {
                if left > 0 {
                    img.put_pixel(x, y, Luma([0u8]));
                    left -= 1;
                }
            }
        }
    }
    img
}
