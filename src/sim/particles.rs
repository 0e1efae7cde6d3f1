//! Cosmetic hit bursts

use glam::Vec2;

use super::rng::RandomSource;
use super::state::Particle;
use crate::consts::{BURST_PARTICLES, PARTICLE_DAMPING};

/// Emit a burst of particles at a point, tinted by the triggering event
pub fn spawn_burst(particles: &mut Vec<Particle>, rng: &mut impl RandomSource, at: Vec2, tint: u32) {
    particles.reserve(BURST_PARTICLES);
    for _ in 0..BURST_PARTICLES {
        let vel = Vec2::new(rng.range(-2.8, 2.8), rng.range(-2.8, 2.8));
        let life = rng.range(20.0, 44.0);
        let size = rng.range(1.4, 3.6);
        particles.push(Particle {
            pos: at,
            vel,
            life,
            size,
            tint,
        });
    }
}

/// Move, damp and age particles, dropping the expired ones
pub fn tick_particles(particles: &mut Vec<Particle>) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel *= PARTICLE_DAMPING;
        particle.life -= 1.0;
    }
    particles.retain(Particle::is_alive);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::{ScriptedRng, seeded};

    #[test]
    fn test_burst_ranges() {
        let mut particles = Vec::new();
        let mut rng = seeded(3);
        spawn_burst(&mut particles, &mut rng, Vec2::new(10.0, 20.0), 0xabcdef);
        assert_eq!(particles.len(), 12);
        for p in &particles {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert_eq!(p.tint, 0xabcdef);
            assert!(p.vel.x.abs() <= 2.8 && p.vel.y.abs() <= 2.8);
            assert!((20.0..44.0).contains(&p.life));
            assert!((1.4..3.6).contains(&p.size));
        }
    }

    #[test]
    fn test_tick_damps_and_expires() {
        let mut particles = Vec::new();
        // vel (2.8, 2.8)-ish, life 20, size 1.4
        let mut rng = ScriptedRng::new(&[1.0, 1.0, 0.0, 0.0]);
        spawn_burst(&mut particles, &mut rng, Vec2::ZERO, 0);
        let first = particles[0].clone();
        assert_eq!(first.life, 20.0);

        tick_particles(&mut particles);
        let moved = &particles[0];
        assert_eq!(moved.pos, first.vel);
        assert!((moved.vel.x - first.vel.x * 0.96).abs() < 1e-6);
        assert_eq!(moved.life, 19.0);

        for _ in 0..19 {
            tick_particles(&mut particles);
        }
        assert!(particles.is_empty());
    }
}
