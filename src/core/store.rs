use crate::core::particle::Particle;
use crate::core::vec2::Vec2;
use crate::error::Result;
use std::ops::{Index, IndexMut};

/// Owner of the particle array.
///
/// Identifiers are indices: the store only ever appends, so an id handed
/// out by `create` stays valid for the lifetime of the store and the
/// slice stays contiguous for the parallel driver. Nothing is ever
/// removed (escaped particles are handled by policy, not destruction).
#[derive(Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a particle at rest at `position` and return its identifier.
    ///
    /// Errors:
    /// - `Error::InvalidParam` if the position is not finite.
    pub fn create(&mut self, position: Vec2) -> Result<u32> {
        let id = self.particles.len() as u32;
        self.particles.push(Particle::new(id, position)?);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Particle> {
        self.particles.get(id as usize)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Particle> {
        self.particles.get_mut(id as usize)
    }

    /// Mutable access to two distinct particles at once, the borrow shape
    /// pairwise contact resolution needs.
    ///
    /// Panics if `i == j` or either index is out of range.
    pub fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Particle, &mut Particle) {
        assert!(i != j, "pair_mut requires two distinct indices");
        if i < j {
            let (head, tail) = self.particles.split_at_mut(j);
            (&mut head[i], &mut tail[0])
        } else {
            let (head, tail) = self.particles.split_at_mut(i);
            (&mut tail[0], &mut head[j])
        }
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }
}

impl Index<u32> for ParticleStore {
    type Output = Particle;

    fn index(&self, id: u32) -> &Particle {
        &self.particles[id as usize]
    }
}

impl IndexMut<u32> for ParticleStore {
    fn index_mut(&mut self, id: u32) -> &mut Particle {
        &mut self.particles[id as usize]
    }
}
