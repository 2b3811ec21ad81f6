use image::{GrayImage, RgbImage};
use imageproc::point::Point;
use serde::Serialize;

/// Axis-aligned rectangle; `x`/`y` is the top-left pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Move the box by a non-negative offset (e.g. back into source coordinates)
    pub fn offset(&self, dx: u32, dy: u32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Extreme points of a contour, each the first point found in scan order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremePoints {
    pub left: Point<i32>,
    pub top: Point<i32>,
    pub right: Point<i32>,
    pub bottom: Point<i32>,
}

/// Closed outer boundary of one connected region, full point density
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Scan for min-x, min-y, max-x and max-y points individually.
    /// Ties keep the earliest point.
    pub fn extreme_points(&self) -> Option<ExtremePoints> {
        let first = *self.points.first()?;
        let mut extremes = ExtremePoints {
            left: first,
            top: first,
            right: first,
            bottom: first,
        };

        for p in &self.points[1..] {
            if p.x < extremes.left.x {
                extremes.left = *p;
            }
            if p.x > extremes.right.x {
                extremes.right = *p;
            }
            if p.y < extremes.top.y {
                extremes.top = *p;
            }
            if p.y > extremes.bottom.y {
                extremes.bottom = *p;
            }
        }

        Some(extremes)
    }

    /// Bounding box built from the extreme points (inclusive on both ends)
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let e = self.extreme_points()?;
        if e.left.x < 0 || e.top.y < 0 {
            return None;
        }
        Some(BoundingBox {
            x: e.left.x as u32,
            y: e.top.y as u32,
            width: (e.right.x - e.left.x + 1) as u32,
            height: (e.bottom.y - e.top.y + 1) as u32,
        })
    }

    /// Mean of all boundary points ("gravity center")
    pub fn centroid(&self) -> Option<(f32, f32)> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0i64, 0i64), |(sx, sy), p| (sx + p.x as i64, sy + p.y as i64));
        Some(((sx as f64 / n) as f32, (sy as f64 / n) as f32))
    }

    /// Same contour expressed relative to `(dx, dy)`
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            points: self
                .points
                .iter()
                .map(|p| Point::new(p.x - dx, p.y - dy))
                .collect(),
        }
    }
}

/// Four card corners in crop coordinates, clockwise from upper-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSet {
    pub upper_left: (f32, f32),
    pub upper_right: (f32, f32),
    pub lower_right: (f32, f32),
    pub lower_left: (f32, f32),
}

impl CornerSet {
    pub fn as_array(&self) -> [(f32, f32); 4] {
        [
            self.upper_left,
            self.upper_right,
            self.lower_right,
            self.lower_left,
        ]
    }

    /// True when `point` lies strictly inside the quadrilateral
    pub fn strictly_contains(&self, point: (f32, f32)) -> bool {
        let corners = self.as_array();
        let mut sign = 0.0f32;
        for i in 0..4 {
            let a = corners[i];
            let b = corners[(i + 1) % 4];
            let cross = (b.0 - a.0) * (point.1 - a.1) - (b.1 - a.1) * (point.0 - a.0);
            if cross == 0.0 {
                return false;
            }
            if sign == 0.0 {
                sign = cross.signum();
            } else if cross.signum() != sign {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    /// Single-letter code (S, H, D, C)
    pub fn letter(&self) -> char {
        match self {
            Suit::Spade => 'S',
            Suit::Heart => 'H',
            Suit::Diamond => 'D',
            Suit::Club => 'C',
        }
    }
}

/// A recognized card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub is_black: bool,
    /// Rank value in 1..=10
    pub value: u8,
    pub suit: Suit,
    /// Location in the caller's image
    pub bounding_box: BoundingBox,
    #[serde(skip)]
    pub color_image: RgbImage,
    #[serde(skip)]
    pub binary_image: GrayImage,
}
