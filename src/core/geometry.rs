use crate::core::vec2::Vec2;
use crate::error::{Error, Result};

/// Scale used to round cosines to four decimals before `acos`. Floating
/// error can push a normalized dot product just past ±1, which would
/// otherwise turn into NaN.
const COS_ROUND_SCALE: f32 = 1e4;

/// Winding sums with absolute value below this classify as outside.
/// Interior points sum to ±2π and exterior points to ~0, so the gap is
/// wide; the threshold only absorbs floating error near edge extensions.
const WINDING_EPS: f32 = 0.1;

/// Tolerance for degenerate geometric inputs (edge lengths, parallelism).
const GEOM_EPS: f32 = 1e-6;

/// A polygon vertex: a position plus a tag for the edge leaving it.
///
/// The tag applies to the edge from this vertex to the next one in ring
/// order. Wall edges reflect particles; open edges let them pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Vertex position.
    pub position: Vec2,
    /// Whether the edge leaving this vertex is a reflecting wall.
    pub wall: bool,
}

impl Vertex {
    /// A vertex whose outgoing edge is a reflecting wall.
    pub const fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            wall: true,
        }
    }

    /// A vertex whose outgoing edge is an opening: particles crossing
    /// that edge leave the polygon instead of reflecting.
    pub const fn open(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            wall: false,
        }
    }
}

/// One oriented polygon edge with its derived frame.
///
/// `tangent` points from `begin` to `end`; `normal` is the tangent rotated
/// a quarter turn, `(tangent.y, -tangent.x)`. Under the y-down screen
/// convention and the canonical winding the normal points away from the
/// interior. The wall flag is copied from the begin vertex at
/// construction, so per-edge behavior never needs a vertex-index lookup.
#[derive(Debug, Clone, Copy)]
pub struct Face {
    begin: Vec2,
    end: Vec2,
    tangent: Vec2,
    normal: Vec2,
    wall: bool,
}

impl Face {
    /// Build a face between two distinct points.
    ///
    /// Errors:
    /// - `Error::Geometry` if the endpoints are non-finite or too close
    ///   for a meaningful tangent.
    pub fn new(begin: Vec2, end: Vec2, wall: bool) -> Result<Self> {
        if !begin.is_finite() || !end.is_finite() {
            return Err(Error::Geometry("face endpoints must be finite".into()));
        }
        if begin.dist(end) < GEOM_EPS {
            return Err(Error::Geometry(
                "face endpoints must be distinct (zero-length edge)".into(),
            ));
        }
        let tangent = (end - begin).normalize();
        let normal = Vec2::new(tangent.y, -tangent.x);
        Ok(Self {
            begin,
            end,
            tangent,
            normal,
            wall,
        })
    }

    pub fn begin(&self) -> Vec2 {
        self.begin
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    /// Unit vector from `begin` to `end`.
    pub fn tangent(&self) -> Vec2 {
        self.tangent
    }

    /// Unit normal; outward for faces of a canonically wound polygon.
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Whether particles reflect off this face.
    pub fn is_wall(&self) -> bool {
        self.wall
    }

    /// True iff `p` lies strictly on the positive side of the directed
    /// edge. That side is the interior one for canonically wound polygons;
    /// points exactly on the line report false.
    pub fn is_point_on_right(&self, p: Vec2) -> bool {
        self.tangent.cross(p - self.begin) > 0.0
    }

    /// True iff `p` projects onto the finite segment, i.e. lies in the
    /// band the face sweeps when moved along its normal.
    pub fn is_point_within_scope(&self, p: Vec2) -> bool {
        self.tangent.dot(p - self.begin) >= 0.0 && self.tangent.dot(p - self.end) <= 0.0
    }

    /// Signed angle subtended by the face endpoints as seen from `p`.
    ///
    /// Magnitude comes from the arccosine of the normalized dot product of
    /// the endpoint-relative vectors, with the cosine rounded first so
    /// floating error cannot push it past ±1 into NaN. Sign comes from the
    /// cross product of the same two vectors. Summed over a closed ring
    /// this yields the winding angle of `p`. A point coinciding with an
    /// endpoint subtends nothing and returns 0.
    pub fn observation_angle(&self, p: Vec2) -> f32 {
        let to_begin = self.begin - p;
        let to_end = self.end - p;
        let norms = to_begin.length() * to_end.length();
        if norms < GEOM_EPS {
            return 0.0;
        }
        let cos = (to_begin.dot(to_end) / norms * COS_ROUND_SCALE).round() / COS_ROUND_SCALE;
        let angle = cos.acos();
        if to_begin.cross(to_end) < 0.0 {
            -angle
        } else {
            angle
        }
    }

    /// Distance from `p` to the finite segment: perpendicular distance
    /// when the projection falls inside the segment, distance to the
    /// nearer endpoint otherwise.
    pub fn distance_to_point(&self, p: Vec2) -> f32 {
        let along = self.tangent.dot(p - self.begin);
        let clamped = along.clamp(0.0, self.begin.dist(self.end));
        p.dist(self.begin + self.tangent * clamped)
    }

    /// Intersection of this face's infinite line with another's.
    ///
    /// Errors:
    /// - `Error::Math` if the tangents are parallel within tolerance and
    ///   no single intersection point exists.
    pub fn intersect(&self, other: &Face) -> Result<Vec2> {
        let den = self.tangent.cross(other.tangent);
        if den.abs() < GEOM_EPS {
            return Err(Error::Math("cannot intersect parallel face lines".into()));
        }
        let t = (other.begin - self.begin).cross(other.tangent) / den;
        Ok(self.begin + self.tangent * t)
    }

    /// The same face translated by `distance` along its normal.
    pub fn shift_out(&self, distance: f32) -> Face {
        let offset = self.normal * distance;
        Face {
            begin: self.begin + offset,
            end: self.end + offset,
            tangent: self.tangent,
            normal: self.normal,
            wall: self.wall,
        }
    }

    /// Mirror a free vector (velocity, direction) across the face line:
    /// the tangential component is kept, the normal component negated.
    /// Applying it twice returns the original vector.
    pub fn reflect_vector(&self, v: Vec2) -> Vec2 {
        let tangential = self.tangent * self.tangent.dot(v);
        let normal = self.normal * self.normal.dot(v);
        tangential - normal
    }

    /// Mirror a position across the face line. The decomposition is taken
    /// relative to `begin`, which is re-added afterwards.
    pub fn reflect_point(&self, p: Vec2) -> Vec2 {
        self.begin + self.reflect_vector(p - self.begin)
    }
}

/// A closed simple polygon with per-edge wall tags.
///
/// The ring is validated once at construction and immutable afterwards:
/// at least 3 finite vertices, no zero-length edges, no folded adjacent
/// edges, no self-intersection, and the canonical winding (interior on
/// the right of every directed edge under the y-down convention, which is
/// a positive shoelace sum). Faces are derived one per consecutive vertex
/// pair, wrap-around edge included.
///
/// Collinear same-direction adjacent edges are legal; they are how a
/// straight wall gets subdivided into wall and opening runs.
#[derive(Debug, Clone)]
pub struct Polygon {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Polygon {
    /// Validate a vertex ring and derive its faces.
    pub fn new(vertices: Vec<Vertex>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Error::Geometry(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.position.is_finite()) {
            return Err(Error::Geometry(
                "polygon vertex coordinates must be finite".into(),
            ));
        }

        let n = vertices.len();
        let mut faces = Vec::with_capacity(n);
        for i in 0..n {
            let begin = vertices[i];
            let end = vertices[(i + 1) % n];
            let face = Face::new(begin.position, end.position, begin.wall)
                .map_err(|_| Error::Geometry(format!("zero-length edge at vertex {i}")))?;
            faces.push(face);
        }

        // Folded adjacent edges (anti-parallel tangents) make the ring
        // retrace itself, which breaks the winding sum.
        for i in 0..n {
            let a = &faces[i];
            let b = &faces[(i + 1) % n];
            if a.tangent.cross(b.tangent).abs() < GEOM_EPS && a.tangent.dot(b.tangent) < 0.0 {
                return Err(Error::Geometry(format!(
                    "edges {} and {} fold back onto each other",
                    i,
                    (i + 1) % n
                )));
            }
        }

        // Simplicity: no two non-adjacent edges may touch or cross.
        for i in 0..n {
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue; // wrap-around neighbors
                }
                if segments_intersect(faces[i].begin, faces[i].end, faces[j].begin, faces[j].end) {
                    return Err(Error::Geometry(format!(
                        "edges {i} and {j} intersect; the polygon must be simple"
                    )));
                }
            }
        }

        // Canonical winding keeps every face normal pointing outward.
        if shoelace_sum(&vertices) <= GEOM_EPS {
            return Err(Error::Geometry(
                "vertices must wind with the interior on the right of each edge; \
                 reverse the ring order"
                    .into(),
            ));
        }

        Ok(Self { vertices, faces })
    }

    /// Build a polygon with every edge tagged as a wall.
    pub fn from_coords(coords: &[(f32, f32)]) -> Result<Self> {
        Self::new(coords.iter().map(|&(x, y)| Vertex::new(x, y)).collect())
    }

    /// Winding-angle containment test.
    ///
    /// Sums the signed angle subtended by every face as seen from `p`:
    /// ~±2π when `p` is inside a simple polygon, ~0 when outside. Unlike a
    /// right-of-every-edge test this remains correct for non-convex rings.
    pub fn is_inside(&self, p: Vec2) -> bool {
        let winding: f32 = self.faces.iter().map(|f| f.observation_angle(p)).sum();
        winding.abs() > WINDING_EPS
    }

    /// The face nearest to `p`; ties keep the first face in ring order.
    pub fn closest_face(&self, p: Vec2) -> &Face {
        let mut best = &self.faces[0];
        let mut best_dist = best.distance_to_point(p);
        for face in &self.faces[1..] {
            let dist = face.distance_to_point(p);
            if dist < best_dist {
                best = face;
                best_dist = dist;
            }
        }
        best
    }

    /// Offset ring: every edge shifted outward by `margin`, adjacent
    /// shifted edge lines re-intersected to rebuild the corners.
    ///
    /// This is a presentation helper for drawing the boundary with a
    /// visual margin; it must never feed back into containment. Collinear
    /// adjacent edges have no unique offset corner, so rings containing
    /// them report `Error::Math`.
    pub fn coords_inflated(&self, margin: f32) -> Result<Vec<Vec2>> {
        let shifted: Vec<Face> = self.faces.iter().map(|f| f.shift_out(margin)).collect();
        let n = shifted.len();
        let mut ring = Vec::with_capacity(n);
        for i in 0..n {
            let prev = &shifted[(i + n - 1) % n];
            ring.push(prev.intersect(&shifted[i])?);
        }
        Ok(ring)
    }

    /// Vertex ring in construction order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Derived faces, one per vertex; the wrap-around edge comes last.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Axis-aligned bounding box as `(min, max)` corners.
    pub fn bounding_box(&self) -> (Vec2, Vec2) {
        let mut min = self.vertices[0].position;
        let mut max = min;
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.position.x);
            min.y = min.y.min(v.position.y);
            max.x = max.x.max(v.position.x);
            max.y = max.y.max(v.position.y);
        }
        (min, max)
    }

    /// Enclosed area; positive for the canonical winding.
    pub fn area(&self) -> f32 {
        0.5 * shoelace_sum(&self.vertices)
    }
}

// ============ Internal helpers ============

/// Twice the signed area of the ring.
fn shoelace_sum(vertices: &[Vertex]) -> f32 {
    let n = vertices.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = vertices[i].position;
        let b = vertices[(i + 1) % n].position;
        sum += a.x * b.y - b.x * a.y;
    }
    sum
}

fn orient(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).cross(c - a)
}

/// Assumes `p` collinear with `a`-`b`; checks it lies within the span.
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) - GEOM_EPS
        && p.x <= a.x.max(b.x) + GEOM_EPS
        && p.y >= a.y.min(b.y) - GEOM_EPS
        && p.y <= a.y.max(b.y) + GEOM_EPS
}

/// Segment intersection including touching endpoints and collinear
/// overlap; collinear but disjoint segments do not intersect.
fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d1 = orient(b1, b2, a1);
    let d2 = orient(b1, b2, a2);
    let d3 = orient(a1, a2, b1);
    let d4 = orient(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1.abs() <= GEOM_EPS && on_segment(b1, b2, a1))
        || (d2.abs() <= GEOM_EPS && on_segment(b1, b2, a2))
        || (d3.abs() <= GEOM_EPS && on_segment(a1, a2, b1))
        || (d4.abs() <= GEOM_EPS && on_segment(a1, a2, b2))
}
