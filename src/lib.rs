//! polyflow: a multithreaded Verlet particle simulation confined by an
//! arbitrary closed 2D polygon.
//!
//! The crate models rarefied-gas-like flow: equal-radius disks integrate
//! with position Verlet, exchange velocity on contact, and reflect off
//! the wall faces of a possibly non-convex boundary polygon. Containment
//! uses a winding-angle test, so concave shapes (nozzles, channels) work
//! out of the box; faces tagged open let particles leave.
//!
//! Each [`Solver::step`] resolves pairwise contacts serially through a
//! uniform-grid broad phase, then fans the integrate-and-confine pass
//! out over a fixed worker pool and blocks until every chunk finishes.
//! Between steps all particle state is freely readable.
//!
//! ```no_run
//! use polyflow::{seeded_rng, Polygon, Solver, SolverConfig};
//!
//! # fn main() -> polyflow::Result<()> {
//! let boundary = Polygon::from_coords(&[
//!     (0.0, 0.0),
//!     (100.0, 0.0),
//!     (100.0, 60.0),
//!     (0.0, 60.0),
//! ])?;
//! let mut solver = Solver::new(boundary, SolverConfig::default())?;
//! let mut rng = seeded_rng(Some(42));
//! solver.populate(1_000, 0.2, &mut rng)?;
//! for _ in 0..60 {
//!     solver.step(1.0 / 60.0)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;

pub use crate::core::{
    confine, seeded_rng, BoundaryOutcome, CollisionGrid, Color, ContactModel, EscapedPolicy,
    ExitFacePolicy, Face, Particle, ParticleStore, Polygon, Solver, SolverConfig, Vec2, Vertex,
    WorkerPool, CONTACT_DISTANCE, PARTICLE_RADIUS,
};
pub use crate::error::{Error, Result};
