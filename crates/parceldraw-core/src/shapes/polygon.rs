//! Freeform polygon shape.

use super::{ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist, points_bounds};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fewest vertices a polygon may have.
pub const MIN_POLYGON_POINTS: usize = 3;
/// Most vertices a simplified polygon may have.
pub const MAX_POLYGON_POINTS: usize = 20;

/// Downsample a dense freehand point sequence to `target_count` points.
///
/// The target is clamped to `MIN_POLYGON_POINTS..=MAX_POLYGON_POINTS`. When
/// the input is already short enough it is returned unchanged; otherwise the
/// points are picked with an even index stride so the first and last samples
/// survive. The output always has `min(target, points.len())` entries.
pub fn simplify_polygon(points: &[Point], target_count: usize) -> Vec<Point> {
    let target = target_count.clamp(MIN_POLYGON_POINTS, MAX_POLYGON_POINTS);
    if points.len() <= target {
        return points.to_vec();
    }
    let last = points.len() - 1;
    (0..target)
        .map(|i| points[(i * last / (target - 1)).min(last)])
        .collect()
}

/// A closed polygon with individually editable vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PolygonData")]
pub struct Polygon {
    pub(crate) id: ShapeId,
    /// Vertices in canvas coordinates (at least three).
    points: Vec<Point>,
    /// Style properties.
    pub style: ShapeStyle,
}

/// Unchecked serialized form of a [`Polygon`].
#[derive(Deserialize)]
struct PolygonData {
    id: ShapeId,
    points: Vec<Point>,
    style: ShapeStyle,
}

impl TryFrom<PolygonData> for Polygon {
    type Error = String;

    fn try_from(data: PolygonData) -> Result<Self, Self::Error> {
        if data.points.len() < MIN_POLYGON_POINTS {
            return Err(format!(
                "polygon needs at least {MIN_POLYGON_POINTS} points, got {}",
                data.points.len()
            ));
        }
        Ok(Self {
            id: data.id,
            points: data.points,
            style: data.style,
        })
    }
}

impl Polygon {
    /// Create a polygon, or `None` if fewer than three points are given.
    pub fn from_points(points: Vec<Point>) -> Option<Self> {
        if points.len() < MIN_POLYGON_POINTS {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            points,
            style: ShapeStyle::default(),
        })
    }

    /// Simplify raw samples to `target_count` vertices and build a polygon.
    pub fn from_samples(samples: &[Point], target_count: usize) -> Option<Self> {
        Self::from_points(simplify_polygon(samples, target_count))
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Move a single vertex. Out-of-range indices are ignored.
    pub fn set_point(&mut self, index: usize, point: Point) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                *p = point;
                true
            }
            None => false,
        }
    }

    /// Even-odd containment test.
    pub fn contains(&self, point: Point) -> bool {
        let mut inside = false;
        let n = self.points.len();
        if n < MIN_POLYGON_POINTS {
            return false;
        }
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (self.points[i], self.points[j]);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Iterate over the closed edges.
    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

impl ShapeTrait for Polygon {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn bounds(&self) -> Rect {
        points_bounds(&self.points)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        if self.style.fill_color.is_some() && self.contains(point) {
            return true;
        }
        self.edges()
            .any(|(a, b)| point_to_segment_dist(point, a, b) <= tolerance + self.style.stroke_width / 2.0)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((first, rest)) = self.points.split_first() {
            path.move_to(*first);
            for p in rest {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }
}
