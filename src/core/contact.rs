use crate::core::particle::{Particle, PARTICLE_RADIUS};
use crate::core::vec2::Vec2;

/// Center distance at which two particles touch: the sum of their radii.
pub const CONTACT_DISTANCE: f32 = 2.0 * PARTICLE_RADIUS;

/// Pairs closer than this are treated as coincident and skipped: their
/// contact normal is undefined.
const CONTACT_EPS: f32 = 1e-4;

/// Pairwise response applied to overlapping particles.
///
/// The variants trace the solver's escalation path: plain overlap
/// separation, then separation plus elastic velocity exchange. Chosen
/// once at solver construction; there is no per-pair dispatch cost
/// beyond a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactModel {
    /// Positional separation plus frictionless equal-mass velocity
    /// exchange.
    #[default]
    Elastic,
    /// Positional separation only; velocities untouched.
    Overlap,
    /// No pairwise interaction at all.
    Disabled,
}

impl ContactModel {
    /// Resolve one candidate pair. Returns whether the pair was actually
    /// in contact and modified.
    ///
    /// The gate is `eps < d < CONTACT_DISTANCE` on the center distance:
    /// disjoint pairs and coincident centers both fall through untouched.
    pub fn resolve(&self, a: &mut Particle, b: &mut Particle) -> bool {
        if matches!(self, ContactModel::Disabled) {
            return false;
        }
        let b_to_a = a.position - b.position;
        let dist2 = b_to_a.length2();
        if dist2 >= CONTACT_DISTANCE * CONTACT_DISTANCE || dist2 <= CONTACT_EPS {
            return false;
        }
        let dist = dist2.sqrt();
        let normal = b_to_a * (1.0 / dist);

        separate(a, b, normal, dist);
        if matches!(self, ContactModel::Elastic) {
            exchange_velocities(a, b, normal);
        }
        true
    }
}

/// Split the overlap symmetrically along the line of centers. Both the
/// current and the reference position move, so the implicit velocities
/// are unchanged by the separation and the pair ends at exactly
/// `CONTACT_DISTANCE` apart.
fn separate(a: &mut Particle, b: &mut Particle, normal: Vec2, dist: f32) {
    let correction = normal * (0.5 * (CONTACT_DISTANCE - dist));
    a.position += correction;
    a.last_position += correction;
    b.position -= correction;
    b.last_position -= correction;
}

/// Frictionless equal-mass elastic exchange: each velocity is split into
/// a component along the line of centers and one along the contact
/// tangent; the normal components swap owners, the tangential components
/// stay. Conserves momentum and kinetic energy exactly.
fn exchange_velocities(a: &mut Particle, b: &mut Particle, normal: Vec2) {
    let tangent = Vec2::new(normal.y, -normal.x);
    let va = a.velocity();
    let vb = b.velocity();

    let va_new = tangent * tangent.dot(va) + normal * normal.dot(vb);
    let vb_new = tangent * tangent.dot(vb) + normal * normal.dot(va);

    a.last_position = a.position - va_new;
    b.last_position = b.position - vb_new;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(ax: f32, bx: f32) -> (Particle, Particle) {
        (
            Particle::new(0, Vec2::new(ax, 0.0)).unwrap(),
            Particle::new(1, Vec2::new(bx, 0.0)).unwrap(),
        )
    }

    #[test]
    fn resting_overlap_separates_to_contact_distance() {
        let (mut a, mut b) = pair(0.0, 0.8);
        assert!(ContactModel::Elastic.resolve(&mut a, &mut b));
        assert!((a.position.x - (-0.1)).abs() < 1e-6);
        assert!((b.position.x - 0.9).abs() < 1e-6);
        assert!((a.position.dist(b.position) - CONTACT_DISTANCE).abs() < 1e-6);
        // Separation must not fabricate velocity.
        assert!(a.velocity().length() < 1e-6);
        assert!(b.velocity().length() < 1e-6);
    }

    #[test]
    fn disjoint_pair_untouched() {
        let (mut a, mut b) = pair(0.0, 1.5);
        assert!(!ContactModel::Elastic.resolve(&mut a, &mut b));
        assert_eq!(b.position.x, 1.5);
    }

    #[test]
    fn coincident_centers_skipped() {
        let (mut a, mut b) = pair(2.0, 2.0);
        assert!(!ContactModel::Elastic.resolve(&mut a, &mut b));
        assert_eq!(a.position, b.position);
    }

    #[test]
    fn head_on_exchange_swaps_normal_velocities() {
        let (mut a, mut b) = pair(0.0, 0.9);
        a.set_velocity(Vec2::new(0.5, 0.0)).unwrap();
        b.set_velocity(Vec2::new(-0.5, 0.0)).unwrap();
        assert!(ContactModel::Elastic.resolve(&mut a, &mut b));
        assert!(a.velocity().dist(Vec2::new(-0.5, 0.0)) < 1e-5);
        assert!(b.velocity().dist(Vec2::new(0.5, 0.0)) < 1e-5);
    }

    #[test]
    fn grazing_contact_keeps_tangential_velocity() {
        let (mut a, mut b) = pair(0.0, 0.9);
        a.set_velocity(Vec2::new(0.0, 0.7)).unwrap();
        assert!(ContactModel::Elastic.resolve(&mut a, &mut b));
        // a moved purely along the contact tangent; b gains nothing.
        assert!(a.velocity().dist(Vec2::new(0.0, 0.7)) < 1e-5);
        assert!(b.velocity().length() < 1e-5);
    }

    #[test]
    fn overlap_model_never_touches_velocity() {
        let (mut a, mut b) = pair(0.0, 0.9);
        a.set_velocity(Vec2::new(0.5, 0.0)).unwrap();
        assert!(ContactModel::Overlap.resolve(&mut a, &mut b));
        assert!(a.velocity().dist(Vec2::new(0.5, 0.0)) < 1e-5);
        assert!((a.position.dist(b.position) - CONTACT_DISTANCE).abs() < 1e-6);
    }

    #[test]
    fn disabled_model_is_inert() {
        let (mut a, mut b) = pair(0.0, 0.5);
        assert!(!ContactModel::Disabled.resolve(&mut a, &mut b));
        assert_eq!(b.position.x, 0.5);
    }
}
