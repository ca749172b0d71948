use nq_core::Point2d;

/// Intersection of two straight pieces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PieceIntersection {
    None,
    Point(Point2d),
    /// Collinear overlap between the two given points.
    Overlap(Point2d, Point2d),
}

/// Intersects `p0-p1` with `q0-q1`, end points included.
///
/// Zero-length pieces never intersect.
pub fn intersect_pieces(p0: Point2d, p1: Point2d, q0: Point2d, q1: Point2d) -> PieceIntersection {
    let r = p1 - p0;
    let s = q1 - q0;
    let rr = r.dot(r);
    if rr == 0.0 || s.dot(s) == 0.0 {
        return PieceIntersection::None;
    }

    let qp = q0 - p0;
    let denom = r.cross(s);

    if denom == 0.0 {
        if qp.cross(r) != 0.0 {
            return PieceIntersection::None;
        }

        let t0 = qp.dot(r) / rr;
        let t1 = t0 + s.dot(r) / rr;
        let lo = t0.min(t1).max(0.0);
        let hi = t0.max(t1).min(1.0);
        if lo > hi {
            return PieceIntersection::None;
        }

        let a = p0 + r * lo;
        let b = p0 + r * hi;
        return if a == b {
            PieceIntersection::Point(a)
        } else {
            PieceIntersection::Overlap(a, b)
        };
    }

    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        PieceIntersection::Point(p0 + r * t)
    } else {
        PieceIntersection::None
    }
}
