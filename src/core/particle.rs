use crate::core::vec2::Vec2;
use crate::error::{Error, Result};

/// Disk radius shared by every particle. Two particles touch at center
/// distance 1; masses are uniform and normalized to 1.
pub const PARTICLE_RADIUS: f32 = 0.5;

/// RGB color tag carried by a particle for presentation. The physics
/// never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Hue-wheel mapping of a scalar: sin² channels a third of a period
    /// apart. Feeding it a scaled particle id paints the gas as a smooth
    /// rainbow.
    pub fn rainbow(t: f32) -> Color {
        use std::f32::consts::TAU;
        let r = t.sin();
        let g = (t + 0.33 * TAU).sin();
        let b = (t + 0.66 * TAU).sin();
        Color {
            r: (255.0 * r * r) as u8,
            g: (255.0 * g * g) as u8,
            b: (255.0 * b * b) as u8,
        }
    }
}

/// A Verlet particle.
///
/// Velocity is implicit: `position - last_position` is the displacement
/// of the most recent step. Acceleration accumulates between integrations
/// and is consumed (reset) by each one.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable identifier (index in the owning store).
    pub id: u32,
    /// Current position.
    pub position: Vec2,
    /// Position at the previous step.
    pub last_position: Vec2,
    /// Acceleration accumulated since the last integration.
    pub acceleration: Vec2,
    /// Presentation-only color tag.
    pub color: Color,
}

impl Particle {
    /// Create a particle at rest.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if the position is not finite.
    pub fn new(id: u32, position: Vec2) -> Result<Self> {
        if !position.is_finite() {
            return Err(Error::InvalidParam("position must be finite".into()));
        }
        Ok(Self {
            id,
            position,
            last_position: position,
            acceleration: Vec2::ZERO,
            color: Color::WHITE,
        })
    }

    /// Implicit velocity: the displacement of the most recent step.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position - self.last_position
    }

    /// Set the implicit velocity by moving the previous position.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `v` is not finite.
    pub fn set_velocity(&mut self, v: Vec2) -> Result<()> {
        if !v.is_finite() {
            return Err(Error::InvalidParam("velocity must be finite".into()));
        }
        self.last_position = self.position - v;
        Ok(())
    }

    /// Accumulate acceleration for the next integration.
    #[inline]
    pub fn accelerate(&mut self, a: Vec2) {
        self.acceleration += a;
    }

    /// One position-Verlet step: advance by the previous displacement
    /// plus the accumulated acceleration, then reset the accumulator.
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        let displacement = self.position - self.last_position;
        self.last_position = self.position;
        self.position += displacement + self.acceleration * (dt * dt);
        self.acceleration = Vec2::ZERO;
    }

    /// Zero the implicit velocity in place.
    #[inline]
    pub fn stop(&mut self) {
        self.last_position = self.position;
    }

    /// Kinetic energy at unit mass: 1/2 |v|².
    #[inline]
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.velocity().length2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_particle_starts_at_rest() -> Result<()> {
        let p = Particle::new(3, Vec2::new(1.0, 2.0))?;
        assert_eq!(p.id, 3);
        assert_eq!(p.position, Vec2::new(1.0, 2.0));
        assert_eq!(p.velocity(), Vec2::ZERO);
        assert_eq!(p.acceleration, Vec2::ZERO);
        assert_eq!(p.color, Color::WHITE);
        Ok(())
    }

    #[test]
    fn non_finite_position_rejected() {
        let err = Particle::new(0, Vec2::new(f32::NAN, 0.0)).unwrap_err();
        assert!(err.to_string().contains("finite"));
    }

    #[test]
    fn velocity_round_trips_through_last_position() -> Result<()> {
        let mut p = Particle::new(0, Vec2::new(5.0, 5.0))?;
        p.set_velocity(Vec2::new(0.3, -0.4))?;
        assert!(p.velocity().dist(Vec2::new(0.3, -0.4)) < 1e-6);
        assert!((p.kinetic_energy() - 0.125).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn non_finite_velocity_rejected() -> Result<()> {
        let mut p = Particle::new(0, Vec2::ZERO)?;
        let err = p.set_velocity(Vec2::new(0.0, f32::INFINITY)).unwrap_err();
        assert!(err.to_string().contains("finite"));
        Ok(())
    }

    #[test]
    fn integration_carries_displacement_and_consumes_acceleration() -> Result<()> {
        let mut p = Particle::new(0, Vec2::new(1.0, 0.0))?;
        p.set_velocity(Vec2::new(0.5, 0.0))?;
        p.accelerate(Vec2::new(0.0, 2.0));
        p.integrate(1.0);
        assert!(p.position.dist(Vec2::new(1.5, 2.0)) < 1e-6);
        assert_eq!(p.last_position, Vec2::new(1.0, 0.0));
        assert_eq!(p.acceleration, Vec2::ZERO);
        Ok(())
    }

    #[test]
    fn stop_zeroes_velocity() -> Result<()> {
        let mut p = Particle::new(0, Vec2::new(1.0, 1.0))?;
        p.set_velocity(Vec2::new(1.0, -1.0))?;
        p.stop();
        assert_eq!(p.velocity(), Vec2::ZERO);
        Ok(())
    }

    #[test]
    fn rainbow_channels_stay_in_range() {
        // u8 casts are the range check; just make sure distinct inputs
        // give distinct hues.
        let a = Color::rainbow(0.1);
        let b = Color::rainbow(2.1);
        assert_ne!(a, b);
    }
}
