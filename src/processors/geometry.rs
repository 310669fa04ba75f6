//! Geometric primitives for text-region analysis.
//!
//! The skew estimators reason about text lines through the minimum-area
//! rectangle of each merged blob, so this module provides points, polygonal
//! regions, and a rotating-calipers minimum-area rectangle.

use imageproc::contours::Contour;
use itertools::Itertools;

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// X-coordinate of the point.
    pub x: f32,
    /// Y-coordinate of the point.
    pub y: f32,
}

impl Point {
    /// Creates a new point with the given coordinates.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A polygonal region represented by a collection of points.
#[derive(Debug, Clone)]
pub struct TextRegion {
    /// The points that outline the region.
    pub points: Vec<Point>,
}

/// A rotated rectangle described by center, size, and orientation.
#[derive(Debug, Clone, Copy)]
pub struct MinAreaRect {
    /// Center of the rectangle.
    pub center: Point,
    /// Extent along the rectangle's primary edge.
    pub width: f32,
    /// Extent perpendicular to the primary edge.
    pub height: f32,
    /// Orientation of the primary edge in degrees.
    pub angle: f32,
}

impl MinAreaRect {
    fn degenerate() -> Self {
        Self {
            center: Point::new(0.0, 0.0),
            width: 0.0,
            height: 0.0,
            angle: 0.0,
        }
    }
}

impl TextRegion {
    /// Creates a region from a vector of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Creates an axis-aligned rectangular region from corner coordinates.
    pub fn from_coords(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            points: vec![
                Point::new(x1, y1),
                Point::new(x2, y1),
                Point::new(x2, y2),
                Point::new(x1, y2),
            ],
        }
    }

    /// Creates a region from an imageproc contour.
    pub fn from_contour(contour: &Contour<u32>) -> Self {
        let points = contour
            .points
            .iter()
            .map(|p| Point::new(p.x as f32, p.y as f32))
            .collect();
        Self { points }
    }

    /// Calculates the region area using the shoelace formula.
    ///
    /// Returns 0.0 for regions with fewer than 3 points.
    pub fn area(&self) -> f32 {
        if self.points.len() < 3 {
            return 0.0;
        }
        let n = self.points.len();
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += self.points[i].x * self.points[j].y;
            area -= self.points[j].x * self.points[i].y;
        }
        area.abs() / 2.0
    }

    /// Computes the convex hull of the region using Graham's scan.
    fn convex_hull(&self) -> TextRegion {
        if self.points.len() < 3 {
            return self.clone();
        }

        let mut points = self.points.clone();

        // Anchor at the lowest point, leftmost on ties.
        let mut start_idx = 0;
        for i in 1..points.len() {
            if points[i].y < points[start_idx].y
                || (points[i].y == points[start_idx].y && points[i].x < points[start_idx].x)
            {
                start_idx = i;
            }
        }
        points.swap(0, start_idx);
        let start = points[0];

        points[1..].sort_by(|a, b| {
            let cross = cross_product(&start, a, b);
            if cross == 0.0 {
                let dist_a = (a.x - start.x).powi(2) + (a.y - start.y).powi(2);
                let dist_b = (b.x - start.x).powi(2) + (b.y - start.y).powi(2);
                dist_a
                    .partial_cmp(&dist_b)
                    .unwrap_or(std::cmp::Ordering::Equal)
            } else if cross > 0.0 {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Greater
            }
        });

        let mut hull: Vec<Point> = Vec::new();
        for point in points {
            while hull.len() > 1
                && cross_product(&hull[hull.len() - 2], &hull[hull.len() - 1], &point) <= 0.0
            {
                hull.pop();
            }
            hull.push(point);
        }

        TextRegion::new(hull)
    }

    /// Computes the minimum-area rectangle enclosing the region.
    ///
    /// Uses rotating calipers on the convex hull. With fewer than 3 points,
    /// or a degenerate hull, falls back to the axis-aligned extents.
    ///
    /// # Returns
    ///
    /// A `MinAreaRect` whose `angle` is the orientation of the edge the
    /// smallest rectangle rests on, in degrees.
    pub fn min_area_rect(&self) -> MinAreaRect {
        if self.points.len() < 3 {
            return MinAreaRect::degenerate();
        }

        let hull = self.convex_hull();
        let hull_points = &hull.points;

        if hull_points.len() < 3 {
            let Some((min_x, max_x)) = self.points.iter().map(|p| p.x).minmax().into_option()
            else {
                return MinAreaRect::degenerate();
            };
            let Some((min_y, max_y)) = self.points.iter().map(|p| p.y).minmax().into_option()
            else {
                return MinAreaRect::degenerate();
            };
            return MinAreaRect {
                center: Point::new((min_x + max_x) / 2.0, (min_y + max_y) / 2.0),
                width: max_x - min_x,
                height: max_y - min_y,
                angle: 0.0,
            };
        }

        let mut min_area = f32::MAX;
        let mut min_rect = MinAreaRect::degenerate();

        let n = hull_points.len();
        for i in 0..n {
            let j = (i + 1) % n;

            let edge_x = hull_points[j].x - hull_points[i].x;
            let edge_y = hull_points[j].y - hull_points[i].y;
            let edge_length = (edge_x * edge_x + edge_y * edge_y).sqrt();
            if edge_length < f32::EPSILON {
                continue;
            }

            let nx = edge_x / edge_length;
            let ny = edge_y / edge_length;
            let px = -ny;
            let py = nx;

            let mut min_n = f32::MAX;
            let mut max_n = f32::MIN;
            let mut min_p = f32::MAX;
            let mut max_p = f32::MIN;

            for point in hull_points {
                let proj_n = nx * (point.x - hull_points[i].x) + ny * (point.y - hull_points[i].y);
                min_n = min_n.min(proj_n);
                max_n = max_n.max(proj_n);

                let proj_p = px * (point.x - hull_points[i].x) + py * (point.y - hull_points[i].y);
                min_p = min_p.min(proj_p);
                max_p = max_p.max(proj_p);
            }

            let width = max_n - min_n;
            let height = max_p - min_p;
            let area = width * height;

            if area < min_area {
                min_area = area;

                let center_n = (min_n + max_n) / 2.0;
                let center_p = (min_p + max_p) / 2.0;

                min_rect = MinAreaRect {
                    center: Point::new(
                        hull_points[i].x + center_n * nx + center_p * px,
                        hull_points[i].y + center_n * ny + center_p * py,
                    ),
                    width,
                    height,
                    angle: f32::atan2(ny, nx).to_degrees(),
                };
            }
        }

        min_rect
    }
}

fn cross_product(p1: &Point, p2: &Point, p3: &Point) -> f32 {
    (p2.x - p1.x) * (p3.y - p1.y) - (p2.y - p1.y) * (p3.x - p1.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shoelace_area_of_unit_square() {
        let region = TextRegion::from_coords(0.0, 0.0, 2.0, 2.0);
        assert_eq!(region.area(), 4.0);
    }

    #[test]
    fn area_of_degenerate_region_is_zero() {
        let region = TextRegion::new(vec![Point::new(1.0, 1.0), Point::new(5.0, 5.0)]);
        assert_eq!(region.area(), 0.0);
    }

    #[test]
    fn min_area_rect_of_axis_aligned_box() {
        let region = TextRegion::from_coords(10.0, 20.0, 50.0, 40.0);
        let rect = region.min_area_rect();
        assert!((rect.center.x - 30.0).abs() < 1e-3);
        assert!((rect.center.y - 30.0).abs() < 1e-3);
        let (short, long) = if rect.width < rect.height {
            (rect.width, rect.height)
        } else {
            (rect.height, rect.width)
        };
        assert!((long - 40.0).abs() < 1e-3);
        assert!((short - 20.0).abs() < 1e-3);
    }

    #[test]
    fn min_area_rect_recovers_tilted_orientation() {
        // A 100x10 box rotated by 15 degrees around the origin.
        let angle = 15.0f32.to_radians();
        let (sin, cos) = angle.sin_cos();
        let corners = [(0.0, 0.0), (100.0, 0.0), (100.0, 10.0), (0.0, 10.0)];
        let points = corners
            .iter()
            .map(|&(x, y): &(f32, f32)| Point::new(x * cos - y * sin, x * sin + y * cos))
            .collect();
        let rect = TextRegion::new(points).min_area_rect();

        let long_edge_angle = if rect.width >= rect.height {
            rect.angle
        } else {
            rect.angle + 90.0
        };
        let normalized = (long_edge_angle.rem_euclid(180.0) + 180.0).rem_euclid(180.0);
        let folded = if normalized > 90.0 {
            normalized - 180.0
        } else {
            normalized
        };
        assert!((folded - 15.0).abs() < 0.5, "angle was {folded}");
    }

    #[test]
    fn contour_conversion_keeps_point_count() {
        let contour = Contour {
            points: vec![
                imageproc::point::Point::new(0u32, 0u32),
                imageproc::point::Point::new(4u32, 0u32),
                imageproc::point::Point::new(4u32, 3u32),
            ],
            border_type: imageproc::contours::BorderType::Outer,
            parent: None,
        };
        let region = TextRegion::from_contour(&contour);
        assert_eq!(region.points.len(), 3);
        assert_eq!(region.points[2], Point::new(4.0, 3.0));
    }
}
