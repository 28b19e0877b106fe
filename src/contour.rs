use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::point::Point;

/// An external object boundary, in pixel coordinates (y=0 is top of image).
#[derive(Debug, Clone)]
pub struct Contour {
    /// Closed boundary polyline through boundary pixel centres.
    pub points: Vec<Point<i32>>,
    /// Left-most x of the boundary (bounding box origin).
    pub min_x: i32,
}

/// Extract the external boundaries of all foreground regions.
///
/// Holes and regions nested inside holes are not reported. The result is
/// sorted left-to-right by bounding box; regions sharing a left edge keep
/// their detection order.
pub fn extract(mask: &GrayImage) -> Vec<Contour> {
    let mut contours: Vec<Contour> = find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .filter_map(|c| {
            let min_x = c.points.iter().map(|p| p.x).min()?;
            Some(Contour { points: c.points, min_x })
        })
        .collect();

    order_left_to_right(&mut contours);
    contours
}

/// Stable sort by left-most x.
pub fn order_left_to_right(contours: &mut [Contour]) {
    contours.sort_by_key(|c| c.min_x);
}

/// Unsigned polygon area via the shoelace formula.
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: i64 = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].x as i64 * points[j].y as i64 - points[j].x as i64 * points[i].y as i64
        })
        .sum();
    twice.abs() as f64 / 2.0
}
