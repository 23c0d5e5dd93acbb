//! Core simulation types: geometry, particles, contact response,
//! boundary confinement and the parallel solver that drives them.

pub mod boundary;
pub mod contact;
pub mod geometry;
pub mod grid;
pub mod particle;
pub mod pool;
pub mod solver;
pub mod store;
pub mod vec2;

pub use boundary::{confine, BoundaryOutcome, EscapedPolicy, ExitFacePolicy};
pub use contact::{ContactModel, CONTACT_DISTANCE};
pub use geometry::{Face, Polygon, Vertex};
pub use grid::CollisionGrid;
pub use particle::{Color, Particle, PARTICLE_RADIUS};
pub use pool::WorkerPool;
pub use solver::{seeded_rng, Solver, SolverConfig};
pub use store::ParticleStore;
pub use vec2::Vec2;
