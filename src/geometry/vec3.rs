//! Vector helpers over `[f64; 3]`.
//!
//! Face normals use Newell's method, which is exact for planar polygons and
//! degrades gracefully for slightly non-planar or non-convex ones. A normal
//! whose length falls below [`EPS`] is treated as degenerate.

/// A point or direction in 3-space.
pub type Point3 = [f64; 3];

/// Length below which a vector is considered zero.
pub const EPS: f64 = 1e-12;

#[inline]
pub fn add(a: Point3, b: Point3) -> Point3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Point3, s: f64) -> Point3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Point3, b: Point3) -> Point3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Point3) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`, or `None` if `a` is (nearly) zero.
pub fn normalize(a: Point3) -> Option<Point3> {
    let n = norm(a);
    (n > EPS).then(|| scale(a, 1.0 / n))
}

/// Component of `a` perpendicular to the unit vector `axis`.
#[inline]
pub fn reject(a: Point3, axis: Point3) -> Point3 {
    sub(a, scale(axis, dot(a, axis)))
}

/// Unnormalized Newell normal of a closed polygon. Its length is twice the
/// polygon's area.
pub fn newell_normal<I>(points: I) -> Point3
where
    I: IntoIterator<Item = Point3>,
{
    let mut iter = points.into_iter();
    let Some(first) = iter.next() else {
        return [0.0; 3];
    };
    let mut n = [0.0; 3];
    let mut prev = first;
    for p in iter.chain(std::iter::once(first)) {
        n[0] += (prev[1] - p[1]) * (prev[2] + p[2]);
        n[1] += (prev[2] - p[2]) * (prev[0] + p[0]);
        n[2] += (prev[0] - p[0]) * (prev[1] + p[1]);
        prev = p;
    }
    n
}

/// Unit normal of triangle `(a, b, c)` by the right-hand rule, or `None`
/// for a degenerate triangle.
pub fn triangle_normal(a: Point3, b: Point3, c: Point3) -> Option<Point3> {
    normalize(cross(sub(b, a), sub(c, a)))
}

/// Axis-aligned bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Point3,
    pub max: Point3,
}

impl BoundingBox {
    /// Box around `points`, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            for k in 0..3 {
                bbox.min[k] = bbox.min[k].min(p[k]);
                bbox.max[k] = bbox.max[k].max(p[k]);
            }
        }
        Some(bbox)
    }

    pub fn extent(&self) -> Point3 {
        sub(self.max, self.min)
    }

    /// Largest side length.
    pub fn max_extent(&self) -> f64 {
        let e = self.extent();
        e[0].max(e[1]).max(e[2])
    }
}
