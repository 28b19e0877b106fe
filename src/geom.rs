//! Oriented bounding boxes: minimum-area rectangles, corner order, midpoints.

use imageproc::geometry::convex_hull;
use imageproc::point::Point as PixelPoint;
use kurbo::{Point, Vec2};
use rayon::prelude::*;

use crate::contour::{contour_area, Contour};

/// Contours enclosing less than this many square pixels are noise.
pub const MIN_CONTOUR_AREA: f64 = 100.0;

/// Minimum-area rectangle around a contour, corners in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    /// Corners as [top-left, top-right, bottom-right, bottom-left].
    pub corners: [Point; 4],
}

/// Midpoints of the four box edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Midpoints {
    pub top: Point,
    pub bottom: Point,
    pub left: Point,
    pub right: Point,
}

impl OrientedBox {
    pub fn new(corners: [Point; 4]) -> Self {
        Self { corners: order_corners(corners) }
    }

    pub fn tl(&self) -> Point {
        self.corners[0]
    }

    pub fn tr(&self) -> Point {
        self.corners[1]
    }

    pub fn br(&self) -> Point {
        self.corners[2]
    }

    pub fn bl(&self) -> Point {
        self.corners[3]
    }

    pub fn midpoints(&self) -> Midpoints {
        Midpoints {
            top: self.tl().midpoint(self.tr()),
            bottom: self.bl().midpoint(self.br()),
            left: self.tl().midpoint(self.bl()),
            right: self.tr().midpoint(self.br()),
        }
    }
}

/// A contour that survived the noise filter, reduced to its box geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedObject {
    pub bbox: OrientedBox,
    pub midpoints: Midpoints,
    /// Contour area in square pixels.
    pub area: f64,
    /// Distance between top and bottom edge midpoints (vertical extent).
    pub d_a: f64,
    /// Distance between left and right edge midpoints (horizontal extent).
    pub d_b: f64,
}

impl DetectedObject {
    /// Build from an oriented box and the contour area it encloses.
    pub fn from_box(bbox: OrientedBox, area: f64) -> Self {
        let midpoints = bbox.midpoints();
        Self {
            bbox,
            midpoints,
            area,
            d_a: midpoints.top.distance(midpoints.bottom),
            d_b: midpoints.left.distance(midpoints.right),
        }
    }

    /// Pixel area of the oriented box, used to pick the reference object.
    pub fn box_area(&self) -> f64 {
        self.d_a * self.d_b
    }
}

/// Fit oriented boxes to every contour large enough to be an object.
///
/// Output order follows the input contour order.
pub fn detect(contours: &[Contour]) -> Vec<DetectedObject> {
    contours
        .par_iter()
        .filter_map(|contour| {
            let area = contour_area(&contour.points);
            if area < MIN_CONTOUR_AREA {
                return None;
            }
            let corners = min_area_rect(&contour.points);
            Some(DetectedObject::from_box(OrientedBox::new(corners), area))
        })
        .collect()
}

/// Minimum-area enclosing rectangle (rotating calipers over the convex hull).
///
/// Corners are returned in traversal order, not canonical order.
pub fn min_area_rect(points: &[PixelPoint<i32>]) -> [Point; 4] {
    let hull: Vec<Point> = convex_hull(points)
        .into_iter()
        .map(|p| Point::new(p.x as f64, p.y as f64))
        .collect();

    if hull.len() < 3 {
        tracing::warn!(
            "min_area_rect: {} hull points, using axis-aligned bounds",
            hull.len()
        );
        return axis_aligned_bounds(points);
    }

    let n = hull.len();
    let mut best: Option<(f64, [Point; 4])> = None;
    for i in 0..n {
        let edge = hull[(i + 1) % n] - hull[i];
        if edge.hypot() == 0.0 {
            continue;
        }
        let u = edge.normalize();
        let v = u.turn_90();

        let origin = hull[i];
        let (mut min_u, mut max_u) = (f64::MAX, f64::MIN);
        let (mut min_v, mut max_v) = (f64::MAX, f64::MIN);
        for p in &hull {
            let d = *p - origin;
            let pu = d.dot(u);
            let pv = d.dot(v);
            min_u = min_u.min(pu);
            max_u = max_u.max(pu);
            min_v = min_v.min(pv);
            max_v = max_v.max(pv);
        }

        let area = (max_u - min_u) * (max_v - min_v);
        if best.as_ref().map_or(true, |(a, _)| area < *a) {
            let at = |s: f64, t: f64| origin + u * s + v * t;
            let rect = [
                at(min_u, min_v),
                at(max_u, min_v),
                at(max_u, max_v),
                at(min_u, max_v),
            ];
            best = Some((area, rect));
        }
    }

    match best {
        Some((_, rect)) => rect,
        None => {
            tracing::warn!("min_area_rect: hull has no non-zero edge, using axis-aligned bounds");
            axis_aligned_bounds(points)
        }
    }
}

/// Order four rectangle corners as [top-left, top-right, bottom-right, bottom-left].
///
/// The two leftmost corners form the left edge and are split top/bottom by y.
/// Of the remaining pair, the one farthest from top-left is the diagonal
/// (bottom-right). The top edge stays the more horizontal one for rotations up
/// to 45°, so width and height keep their meaning on tilted objects.
pub fn order_corners(corners: [Point; 4]) -> [Point; 4] {
    let mut sorted = corners;
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));

    let (tl, bl) = if sorted[0].y <= sorted[1].y {
        (sorted[0], sorted[1])
    } else {
        (sorted[1], sorted[0])
    };
    let (tr, br) = if tl.distance(sorted[2]) >= tl.distance(sorted[3]) {
        (sorted[3], sorted[2])
    } else {
        (sorted[2], sorted[3])
    };
    [tl, tr, br, bl]
}

fn axis_aligned_bounds(points: &[PixelPoint<i32>]) -> [Point; 4] {
    let mut min = Vec2::new(f64::MAX, f64::MAX);
    let mut max = Vec2::new(f64::MIN, f64::MIN);
    for p in points {
        min.x = min.x.min(p.x as f64);
        min.y = min.y.min(p.y as f64);
        max.x = max.x.max(p.x as f64);
        max.y = max.y.max(p.y as f64);
    }
    if points.is_empty() {
        return [Point::ZERO; 4];
    }
    [
        Point::new(min.x, min.y),
        Point::new(max.x, min.y),
        Point::new(max.x, max.y),
        Point::new(min.x, max.y),
    ]
}
