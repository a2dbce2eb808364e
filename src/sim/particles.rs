//! Explosion particle pool
//!
//! Fixed number of slots allocated once. A slot is dormant while its life is
//! at or below zero; spawning reuses dormant slots in index order and never
//! grows the pool.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::actor::ColorTag;
use crate::consts::{PARTICLE_POOL_CAPACITY, PARTICLES_PER_BURST};

/// Half-range of each initial velocity component
const BURST_SPEED: f32 = 7.5;
/// Spin rate around the x and z axes (radians/s)
const SPIN_RATE: f32 = 5.0;

/// One pool slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    /// Seconds left; dormant at or below zero
    pub life: f32,
    pub spin: f32,
    pub color: ColorTag,
}

impl Particle {
    const DORMANT: Self = Self {
        pos: Vec3::ZERO,
        vel: Vec3::ZERO,
        life: 0.0,
        spin: 0.0,
        color: ColorTag(0xFFFFFF),
    };

    pub fn is_active(&self) -> bool {
        self.life > 0.0
    }
}

/// Per-instance render data for an active slot
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    /// Shrinks with remaining life
    pub scale: f32,
    /// Rotation about x and z
    pub rotation: [f32; 2],
    pub color: [f32; 4],
}

/// Fixed-capacity explosion pool
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    burst_limit: usize,
    rng: Pcg32,
}

impl ParticlePool {
    pub fn new(seed: u64) -> Self {
        Self::with_capacity(PARTICLE_POOL_CAPACITY, PARTICLES_PER_BURST, seed)
    }

    pub fn with_capacity(capacity: usize, burst_limit: usize, seed: u64) -> Self {
        Self {
            slots: vec![Particle::DORMANT; capacity],
            burst_limit,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.is_active()).count()
    }

    pub fn slot(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index)
    }

    /// Activate up to one burst worth of dormant slots at `pos`
    ///
    /// Returns how many slots were activated. Fewer than the burst limit (or
    /// zero) means the pool ran out of dormant slots.
    pub fn spawn(&mut self, pos: Vec3, color: ColorTag) -> usize {
        let mut spawned = 0;
        for slot in self.slots.iter_mut() {
            if spawned >= self.burst_limit {
                break;
            }
            if slot.is_active() {
                continue;
            }

            let vel = Vec3::new(
                self.rng.random_range(-BURST_SPEED..BURST_SPEED),
                self.rng.random_range(-BURST_SPEED..BURST_SPEED),
                self.rng.random_range(-BURST_SPEED..BURST_SPEED),
            );
            *slot = Particle {
                pos,
                vel,
                life: self.rng.random_range(1.0..2.0),
                spin: 0.0,
                color,
            };
            spawned += 1;
        }

        if spawned < self.burst_limit {
            log::debug!("Particle pool saturated: spawned {spawned}/{}", self.burst_limit);
        }
        spawned
    }

    /// Decay and move every active slot
    pub fn advance(&mut self, dt: f32) {
        for p in self.slots.iter_mut().filter(|p| p.is_active()) {
            p.life -= dt;
            p.pos += p.vel * dt;
            p.spin += SPIN_RATE * dt;
        }
    }

    /// Return every slot to dormant
    pub fn clear(&mut self) {
        for p in self.slots.iter_mut() {
            p.life = 0.0;
        }
    }

    /// Render data for the active slots
    pub fn instances(&self) -> impl Iterator<Item = ParticleInstance> + '_ {
        self.slots.iter().filter(|p| p.is_active()).map(|p| ParticleInstance {
            position: p.pos.to_array(),
            scale: p.life.max(0.0),
            rotation: [p.spin, p.spin],
            color: p.color.to_rgba(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_caps_at_burst_limit() {
        let mut pool = ParticlePool::new(1);
        assert_eq!(pool.spawn(Vec3::ZERO, ColorTag(0xFF0000)), PARTICLES_PER_BURST);
        assert_eq!(pool.active_count(), PARTICLES_PER_BURST);
    }

    #[test]
    fn test_spawn_truncates_when_pool_full() {
        let mut pool = ParticlePool::new(2);
        let mut total = 0;
        for _ in 0..7 {
            total += pool.spawn(Vec3::ZERO, ColorTag(0x00FFFF));
        }
        assert_eq!(total, PARTICLE_POOL_CAPACITY);
        assert_eq!(pool.spawn(Vec3::ZERO, ColorTag(0x00FFFF)), 0);
        assert_eq!(pool.active_count(), PARTICLE_POOL_CAPACITY);
    }

    #[test]
    fn test_spawned_values_in_range() {
        let mut pool = ParticlePool::new(3);
        pool.spawn(Vec3::new(1.0, 0.0, -4.0), ColorTag(0xFF0000));
        for p in pool.slots.iter().filter(|p| p.is_active()) {
            assert!((1.0..2.0).contains(&p.life));
            assert!(p.vel.abs().max_element() <= BURST_SPEED);
            assert_eq!(p.pos, Vec3::new(1.0, 0.0, -4.0));
        }
    }

    #[test]
    fn test_slots_return_to_dormant_and_are_reused() {
        let mut pool = ParticlePool::new(4);
        pool.spawn(Vec3::ZERO, ColorTag(0xFF0000));
        for _ in 0..25 {
            pool.advance(0.1);
        }
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.instances().count(), 0);

        // Reuses the lowest slots again
        pool.spawn(Vec3::ZERO, ColorTag(0x00FFFF));
        assert!(pool.slot(0).is_some_and(Particle::is_active));
        assert!(!pool.slot(PARTICLES_PER_BURST).is_some_and(Particle::is_active));
    }

    #[test]
    fn test_instances_scale_with_life() {
        let mut pool = ParticlePool::with_capacity(4, 1, 5);
        pool.spawn(Vec3::ZERO, ColorTag(0x00FFFF));
        let life = pool.slot(0).map(|p| p.life).unwrap();
        pool.advance(0.5);

        let inst: Vec<_> = pool.instances().collect();
        assert_eq!(inst.len(), 1);
        assert!((inst[0].scale - (life - 0.5)).abs() < 1e-5);
        assert_eq!(inst[0].color, [0.0, 1.0, 1.0, 1.0]);
        let bytes = bytemuck::cast_slice::<_, u8>(&inst[..]);
        assert_eq!(bytes.len(), std::mem::size_of::<ParticleInstance>());
    }

    proptest! {
        #[test]
        fn prop_pool_never_exceeds_capacity(
            steps in prop::collection::vec((any::<bool>(), 0.0f32..0.5), 1..60),
        ) {
            let mut pool = ParticlePool::new(9);
            for (spawn, dt) in steps {
                if spawn {
                    let before = pool.active_count();
                    let n = pool.spawn(Vec3::ZERO, ColorTag(0xFF0000));
                    prop_assert!(n <= PARTICLES_PER_BURST);
                    prop_assert_eq!(pool.active_count(), before + n);
                }
                pool.advance(dt);
                prop_assert!(pool.active_count() <= pool.capacity());
            }
        }
    }
}
