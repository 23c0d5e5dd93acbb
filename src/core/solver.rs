use crate::core::boundary::{confine, EscapedPolicy, ExitFacePolicy};
use crate::core::contact::ContactModel;
use crate::core::geometry::Polygon;
use crate::core::grid::CollisionGrid;
use crate::core::particle::{Color, PARTICLE_RADIUS};
use crate::core::pool::WorkerPool;
use crate::core::store::ParticleStore;
use crate::core::vec2::Vec2;
use crate::error::{Error, Result};
use log::{debug, warn};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};

/// Per-particle placement attempts before `populate` gives up.
const MAX_PLACEMENT_ATTEMPTS: usize = 100_000;

/// Hue step between consecutive particle ids in `populate`.
const RAINBOW_STEP: f32 = 1e-4;

/// Solver construction parameters.
///
/// The three policy fields replace what the design evolved as solver
/// subclasses: boundary and contact behavior are swappable variants
/// chosen here, once, instead of overridable methods.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Constant acceleration applied to every particle each step.
    pub gravity: Vec2,
    /// Worker thread count for the parallel update.
    pub workers: usize,
    /// Internal subdivisions of each `step(dt)`.
    pub sub_steps: usize,
    /// Pairwise response model.
    pub contact: ContactModel,
    /// Exit-face selection for boundary reflection.
    pub exit_face: ExitFacePolicy,
    /// Handling of particles outside on two consecutive checks.
    pub escaped: EscapedPolicy,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::ZERO,
            workers: 4,
            sub_steps: 1,
            contact: ContactModel::default(),
            exit_face: ExitFacePolicy::default(),
            escaped: EscapedPolicy::default(),
        }
    }
}

/// Polygon-confined multithreaded Verlet solver.
///
/// Owns the boundary polygon, the particle store, the broad-phase grid
/// and the worker pool. Each step runs the contact pass serially, then
/// fans the integrate-and-confine pass out across the pool; the call
/// blocks until every chunk finishes, so callers may read particle state
/// freely between steps.
#[derive(Debug)]
pub struct Solver {
    polygon: Polygon,
    store: ParticleStore,
    grid: CollisionGrid,
    pool: WorkerPool,
    config: SolverConfig,
    time: f32,
}

impl Solver {
    /// Build a solver around a validated polygon.
    ///
    /// Errors:
    /// - `Error::InvalidParam` on zero workers, zero sub_steps or
    ///   non-finite gravity.
    /// - `Error::Pool` if the worker pool cannot be built.
    pub fn new(polygon: Polygon, config: SolverConfig) -> Result<Self> {
        if config.sub_steps == 0 {
            return Err(Error::InvalidParam("sub_steps must be > 0".into()));
        }
        if !config.gravity.is_finite() {
            return Err(Error::InvalidParam("gravity must be finite".into()));
        }
        let pool = WorkerPool::new(config.workers)?;
        let (min, max) = polygon.bounding_box();
        let grid = CollisionGrid::for_region(min, max)?;
        debug!(
            "solver ready: {} faces, {} workers, {} sub-steps",
            polygon.faces().len(),
            config.workers,
            config.sub_steps
        );
        Ok(Self {
            polygon,
            store: ParticleStore::new(),
            grid,
            pool,
            config,
            time: 0.0,
        })
    }

    /// Advance the simulation by `dt`.
    ///
    /// Each sub-step runs two phases:
    /// 1. Contact pass, serial: rebuild the broad-phase grid and resolve
    ///    every candidate pair. Running this on one thread is what keeps
    ///    pairwise writes race-free; an external broad phase driving
    ///    [`Solver::solve_contact`] must provide the same serialization.
    /// 2. Update pass, parallel: gravity, Verlet integration and the
    ///    boundary check, fanned out over disjoint particle chunks with
    ///    the polygon shared read-only.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if `dt` is not finite and positive.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(Error::InvalidParam("dt must be finite and > 0".into()));
        }
        let sub_dt = dt / self.config.sub_steps as f32;
        for _ in 0..self.config.sub_steps {
            self.contact_pass();
            self.update_pass(sub_dt);
        }
        self.time += dt;
        Ok(())
    }

    /// Resolve one externally supplied candidate pair with the
    /// configured contact model. Returns whether the pair was in contact.
    ///
    /// Callers running their own broad phase must apply pairs from a
    /// single thread; this method takes `&mut self` precisely so two
    /// pairs cannot be resolved concurrently.
    ///
    /// Errors:
    /// - `Error::InvalidParam` when the ids are equal or out of range.
    pub fn solve_contact(&mut self, i: u32, j: u32) -> Result<bool> {
        let len = self.store.len();
        if i == j || i as usize >= len || j as usize >= len {
            return Err(Error::InvalidParam(format!(
                "contact pair ({i}, {j}) is not two distinct particles of {len}"
            )));
        }
        let (a, b) = self.store.pair_mut(i as usize, j as usize);
        Ok(self.config.contact.resolve(a, b))
    }

    /// Create `count` particles uniformly inside the polygon.
    ///
    /// Positions come from rejection sampling over the bounding box;
    /// each particle gets a chaotic start velocity with components in
    /// `±jitter/2` and a rainbow color keyed to its id. The generator is
    /// caller-owned: pass a seeded one for reproducible setups.
    ///
    /// Errors:
    /// - `Error::InvalidParam` on negative or non-finite jitter.
    /// - `Error::Geometry` when a sample point cannot be placed inside
    ///   the polygon within the attempt budget.
    pub fn populate(&mut self, count: usize, jitter: f32, rng: &mut impl Rng) -> Result<()> {
        if !jitter.is_finite() || jitter < 0.0 {
            return Err(Error::InvalidParam(
                "jitter must be finite and >= 0".into(),
            ));
        }
        let (min, max) = self.polygon.bounding_box();
        let lo = min + Vec2::new(PARTICLE_RADIUS, PARTICLE_RADIUS);
        let hi = max - Vec2::new(PARTICLE_RADIUS, PARTICLE_RADIUS);
        if hi.x <= lo.x || hi.y <= lo.y {
            return Err(Error::Geometry(
                "polygon is narrower than a particle diameter".into(),
            ));
        }

        for _ in 0..count {
            let mut attempts = 0usize;
            let position = loop {
                if attempts >= MAX_PLACEMENT_ATTEMPTS {
                    warn!("populate gave up after {attempts} attempts");
                    return Err(Error::Geometry(
                        "failed to sample a point inside the polygon; \
                         is the interior a tiny fraction of the bounding box?"
                            .into(),
                    ));
                }
                attempts += 1;
                let candidate = Vec2::new(
                    rng.random_range(lo.x..=hi.x),
                    rng.random_range(lo.y..=hi.y),
                );
                if self.polygon.is_inside(candidate) {
                    break candidate;
                }
            };

            let id = self.store.create(position)?;
            let particle = &mut self.store[id];
            particle.last_position += Vec2::new(
                jitter * (rng.random::<f32>() - 0.5),
                jitter * (rng.random::<f32>() - 0.5),
            );
            particle.color = Color::rainbow(id as f32 * RAINBOW_STEP);
        }
        debug!("populated {count} particles, {} total", self.store.len());
        Ok(())
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn particles(&self) -> &ParticleStore {
        &self.store
    }

    pub fn particles_mut(&mut self) -> &mut ParticleStore {
        &mut self.store
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Accumulated simulation time.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Total kinetic energy at unit mass (diagnostic).
    pub fn kinetic_energy(&self) -> f32 {
        self.store.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Total momentum at unit mass (diagnostic).
    pub fn momentum(&self) -> Vec2 {
        self.store
            .iter()
            .fold(Vec2::ZERO, |acc, p| acc + p.velocity())
    }

    /// Number of particles currently outside the polygon (diagnostic).
    pub fn escaped_count(&self) -> usize {
        self.store
            .iter()
            .filter(|p| !self.polygon.is_inside(p.position))
            .count()
    }

    // ============ Internal helpers ============

    fn contact_pass(&mut self) {
        if self.config.contact == ContactModel::Disabled {
            return;
        }
        self.grid.rebuild(self.store.as_slice());
        let grid = &self.grid;
        let store = &mut self.store;
        let model = self.config.contact;
        grid.for_each_candidate_pair(|i, j| {
            let (a, b) = store.pair_mut(i, j);
            model.resolve(a, b);
        });
    }

    fn update_pass(&mut self, dt: f32) {
        let polygon = &self.polygon;
        let gravity = self.config.gravity;
        let exit_face = self.config.exit_face;
        let escaped = self.config.escaped;
        self.pool.dispatch(self.store.as_mut_slice(), |_, chunk| {
            for particle in chunk {
                particle.accelerate(gravity);
                particle.integrate(dt);
                confine(particle, polygon, exit_face, escaped);
            }
        });
    }
}

/// Seed helper: an explicit seed gives reproducible runs, `None` draws
/// one from the thread-local generator.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::seed_from_u64(rng().random()),
    }
}
