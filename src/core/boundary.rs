use crate::core::geometry::{Face, Polygon};
use crate::core::particle::Particle;

/// How to pick the face a particle crossed when it turns up outside.
///
/// The two policies diverge near concave corners, where the nearest face
/// is not always the one that was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitFacePolicy {
    /// Face with the smallest distance to the new position.
    #[default]
    Closest,
    /// First wall face in ring order that has the particle inside its
    /// scope band and strictly on its outer side; falls back to
    /// `Closest` when no face matches.
    FirstWall,
}

/// What to do with a particle that is outside on two consecutive checks.
///
/// Escapees are never destroyed: identifiers are store indices and the
/// parallel driver needs the slice to stay contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapedPolicy {
    /// Leave it drifting; callers may inspect `escaped_count`.
    #[default]
    Ignore,
    /// Zero its implicit velocity every step while outside.
    Freeze,
}

/// What the confinement pass did to one particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryOutcome {
    /// Still inside; untouched.
    Inside,
    /// Crossed a wall face and was mirrored back.
    Reflected,
    /// Crossed an open face and left the polygon.
    PassedThrough,
    /// Outside on this check and the previous one.
    Escaped,
}

/// Per-particle confinement check, run once per particle per step right
/// after integration.
///
/// A particle that just crossed the boundary is mirrored across the exit
/// face: the previous position reflects to become the new reference
/// point and the velocity reflects with it, so speed is preserved
/// exactly. The reflection uses the previous position's relation to the
/// face rather than the trajectory/face intersection, which is accurate
/// while per-step displacement stays small against boundary curvature.
pub fn confine(
    particle: &mut Particle,
    polygon: &Polygon,
    exit_face: ExitFacePolicy,
    escaped: EscapedPolicy,
) -> BoundaryOutcome {
    if polygon.is_inside(particle.position) {
        return BoundaryOutcome::Inside;
    }
    if !polygon.is_inside(particle.last_position) {
        if escaped == EscapedPolicy::Freeze {
            particle.stop();
        }
        return BoundaryOutcome::Escaped;
    }

    let face = select_exit_face(polygon, particle, exit_face);
    if !face.is_wall() {
        return BoundaryOutcome::PassedThrough;
    }

    let velocity = particle.velocity();
    let anchor = face.reflect_point(particle.last_position);
    particle.last_position = anchor;
    particle.position = anchor + face.reflect_vector(velocity);
    BoundaryOutcome::Reflected
}

fn select_exit_face<'a>(
    polygon: &'a Polygon,
    particle: &Particle,
    policy: ExitFacePolicy,
) -> &'a Face {
    match policy {
        ExitFacePolicy::Closest => polygon.closest_face(particle.position),
        ExitFacePolicy::FirstWall => polygon
            .faces()
            .iter()
            .find(|f| {
                f.is_wall()
                    && f.is_point_within_scope(particle.position)
                    && !f.is_point_on_right(particle.position)
            })
            .unwrap_or_else(|| polygon.closest_face(particle.position)),
    }
}
