use super::{Effect, EffectId, Lifecycle};
use crate::constants::*;
use crate::render::{ObjectDescriptor, Renderer, Shape, Visual};
use glam::{Quat, Vec3};
use rand::prelude::*;
use smallvec::SmallVec;
use std::f32::consts::{PI, TAU};
use std::time::Duration;

/// Random point on a sphere of `radius`.
///
/// `phi` is drawn uniformly in \[0, π\] rather than through `acos`, so points
/// cluster toward the poles. The drones' wandering pattern depends on it.
pub fn sample_sphere_point(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let phi = rng.gen_range(0.0..=PI);
    let theta = rng.gen_range(0.0..TAU);
    Vec3::new(
        radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// One explosion fragment. Velocity is per frame and fixed at creation.
#[derive(Debug)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub scale: f32,
    visual: Visual,
}

struct Explosion {
    particles: SmallVec<[Particle; EXPLOSION_PARTICLES]>,
    age: Duration,
}

/// Decorative sprite wandering between random points on the drone shell.
pub struct Drone {
    id: EffectId,
    pub position: Vec3,
    pub target: Vec3,
    speed: f32,
    scale: f32,
    age: Duration,
    state: Lifecycle,
    explosion: Option<Explosion>,
    rng: StdRng,
    body: Visual,
}

impl Drone {
    /// Place a new drone on the shell. The drone keeps `rng` for retargeting
    /// and for its explosion.
    pub fn spawn(id: EffectId, mut rng: StdRng, renderer: &mut dyn Renderer) -> Self {
        let position = sample_sphere_point(&mut rng, DRONE_ORBIT_RADIUS);
        let target = sample_sphere_point(&mut rng, DRONE_ORBIT_RADIUS);
        let speed = rng.gen_range(DRONE_SPEED_MIN..=DRONE_SPEED_MAX);
        let body = Visual::spawn(
            renderer,
            &ObjectDescriptor {
                shape: Shape::Drone,
                color: DRONE_COLOR,
                position,
                scale: DRONE_SCALE,
            },
        );
        let drone = Self {
            id,
            position,
            target,
            speed,
            scale: DRONE_SCALE,
            age: Duration::ZERO,
            state: Lifecycle::Active,
            explosion: None,
            rng,
            body,
        };
        drone.face_target(renderer);
        drone
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_active(&self) -> bool {
        self.state == Lifecycle::Active
    }

    pub fn particles(&self) -> &[Particle] {
        self.explosion
            .as_ref()
            .map(|e| e.particles.as_slice())
            .unwrap_or(&[])
    }

    pub fn explosion_age(&self) -> Option<Duration> {
        self.explosion.as_ref().map(|e| e.age)
    }

    /// Start the explosion. Only the first call on an active drone does
    /// anything; returns whether this call started it.
    pub fn begin_retiring(&mut self, renderer: &mut dyn Renderer) -> bool {
        if self.state != Lifecycle::Active {
            return false;
        }
        let mut particles = SmallVec::new();
        for _ in 0..EXPLOSION_PARTICLES {
            let velocity = Vec3::new(
                self.rng
                    .gen_range(-EXPLOSION_PARTICLE_SPEED..=EXPLOSION_PARTICLE_SPEED),
                self.rng
                    .gen_range(-EXPLOSION_PARTICLE_SPEED..=EXPLOSION_PARTICLE_SPEED),
                self.rng
                    .gen_range(-EXPLOSION_PARTICLE_SPEED..=EXPLOSION_PARTICLE_SPEED),
            );
            let visual = Visual::spawn(
                renderer,
                &ObjectDescriptor {
                    shape: Shape::Particle,
                    color: EXPLOSION_COLOR,
                    position: self.position,
                    scale: EXPLOSION_PARTICLE_SCALE,
                },
            );
            particles.push(Particle {
                position: self.position,
                velocity,
                scale: EXPLOSION_PARTICLE_SCALE,
                visual,
            });
        }
        self.explosion = Some(Explosion {
            particles,
            age: Duration::ZERO,
        });
        self.state = Lifecycle::Retiring;
        log::debug!("[drone] {} hit at |p|={:.3}", self.id.0, self.position.length());
        true
    }

    fn face_target(&self, renderer: &mut dyn Renderer) {
        let dir = (self.target - self.position).normalize_or_zero();
        if dir != Vec3::ZERO {
            renderer.set_orientation(self.body.handle(), Quat::from_rotation_arc(Vec3::Z, dir));
        }
    }

    fn fly(&mut self, dt: Duration, renderer: &mut dyn Renderer) {
        // Travel along the great circle; straight chords stall near antipodes.
        let from = self.position.normalize_or_zero();
        let to = self.target.normalize_or_zero();
        let remaining = from.angle_between(to);
        if remaining > f32::EPSILON {
            let mut axis = from.cross(to);
            if axis.length_squared() < 1e-12 {
                axis = from.any_orthogonal_vector();
            }
            let angle = (self.speed * dt.as_secs_f32() / DRONE_ORBIT_RADIUS).min(remaining);
            let rotated = Quat::from_axis_angle(axis.normalize(), angle) * from;
            self.position = rotated.normalize_or_zero() * DRONE_ORBIT_RADIUS;
        }
        if self.position.distance(self.target) < DRONE_RETARGET_DISTANCE {
            self.target = sample_sphere_point(&mut self.rng, DRONE_ORBIT_RADIUS);
        }
        renderer.set_position(self.body.handle(), self.position);
        self.face_target(renderer);
    }

    fn explode(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> Lifecycle {
        let Some(explosion) = self.explosion.as_mut() else {
            return Lifecycle::Done;
        };
        explosion.age += dt;
        for p in explosion.particles.iter_mut() {
            p.position += p.velocity;
            p.scale *= EXPLOSION_SHRINK;
            renderer.set_position(p.visual.handle(), p.position);
            renderer.set_scale(p.visual.handle(), p.scale);
        }
        self.scale *= EXPLOSION_SHRINK;
        renderer.set_scale(self.body.handle(), self.scale);
        if explosion.age > Duration::from_millis(EXPLOSION_DURATION_MS) {
            Lifecycle::Done
        } else {
            Lifecycle::Retiring
        }
    }
}

impl Effect for Drone {
    fn id(&self) -> EffectId {
        self.id
    }

    fn lifecycle(&self) -> Lifecycle {
        self.state
    }

    fn age(&self) -> Duration {
        self.age
    }

    fn advance(&mut self, dt: Duration, renderer: &mut dyn Renderer) -> Lifecycle {
        self.age += dt;
        self.state = match self.state {
            Lifecycle::Active => {
                self.fly(dt, renderer);
                Lifecycle::Active
            }
            Lifecycle::Retiring => self.explode(dt, renderer),
            Lifecycle::Done => Lifecycle::Done,
        };
        self.state
    }

    fn release(self, renderer: &mut dyn Renderer) {
        if let Some(explosion) = self.explosion {
            for p in explosion.particles {
                p.visual.release(renderer);
            }
        }
        self.body.release(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;

    fn drone(seed: u64, renderer: &mut HeadlessRenderer) -> Drone {
        Drone::spawn(EffectId(0), StdRng::seed_from_u64(seed), renderer)
    }

    #[test]
    fn sampled_points_lie_on_the_shell() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let p = sample_sphere_point(&mut rng, DRONE_ORBIT_RADIUS);
            assert!((p.length() - DRONE_ORBIT_RADIUS).abs() < 1e-5);
        }
    }

    #[test]
    fn sampling_is_pole_biased() {
        // With phi uniform, |y| > 0.7r happens ~50.6% of the time; area-uniform
        // sampling gives 30%.
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let polar = (0..n)
            .filter(|_| sample_sphere_point(&mut rng, 1.0).y.abs() > 0.7)
            .count();
        let frac = polar as f32 / n as f32;
        assert!(frac > 0.48 && frac < 0.53, "polar fraction {frac}");
    }

    #[test]
    fn speed_is_drawn_from_range_and_fixed() {
        let mut r = HeadlessRenderer::new();
        let mut d = drone(3, &mut r);
        let s = d.speed();
        assert!((DRONE_SPEED_MIN..=DRONE_SPEED_MAX).contains(&s));
        for _ in 0..200 {
            d.advance(Duration::from_millis(16), &mut r);
        }
        assert_eq!(d.speed(), s);
    }

    #[test]
    fn explosion_ends_after_duration_and_releases_everything() {
        let mut r = HeadlessRenderer::new();
        let mut d = drone(5, &mut r);
        assert!(d.begin_retiring(&mut r));
        assert_eq!(d.particles().len(), EXPLOSION_PARTICLES);
        assert_eq!(r.live(), 1 + EXPLOSION_PARTICLES);

        let step = Duration::from_millis(100);
        let mut last = Lifecycle::Retiring;
        for _ in 0..10 {
            last = d.advance(step, &mut r);
        }
        // exactly 1000ms elapsed: not yet past the duration
        assert_eq!(last, Lifecycle::Retiring);
        assert_eq!(d.advance(step, &mut r), Lifecycle::Done);
        d.release(&mut r);
        assert_eq!(r.live(), 0);
        assert_eq!(r.invalid_ops, 0);
    }

    #[test]
    fn shrink_is_per_frame_not_per_second() {
        let mut r = HeadlessRenderer::new();
        let mut a = drone(9, &mut r);
        let mut b = drone(9, &mut r);
        a.begin_retiring(&mut r);
        b.begin_retiring(&mut r);
        a.advance(Duration::from_millis(1), &mut r);
        b.advance(Duration::from_millis(50), &mut r);
        assert_eq!(a.scale(), b.scale());
        assert!((a.scale() - DRONE_SCALE * EXPLOSION_SHRINK).abs() < 1e-7);
    }

    #[test]
    fn reaches_an_antipodal_target() {
        let mut r = HeadlessRenderer::new();
        let mut d = drone(1, &mut r);
        let start = d.position;
        d.target = -start;
        let goal = d.target;

        let dt = Duration::from_millis(16);
        d.advance(dt, &mut r);
        let expected = d.speed() * dt.as_secs_f32();
        assert!((d.position.distance(start) - expected).abs() < 1e-4);

        let mut frames = 1;
        while d.target == goal {
            d.advance(dt, &mut r);
            assert!((d.position.length() - DRONE_ORBIT_RADIUS).abs() < 1e-4);
            frames += 1;
            assert!(frames < 2000, "still {} from target", d.position.distance(goal));
        }
        assert!(d.position.distance(goal) < DRONE_RETARGET_DISTANCE + expected);
    }

    #[test]
    fn picks_a_new_target_when_close() {
        let mut r = HeadlessRenderer::new();
        let mut d = drone(4, &mut r);
        let side = d.position.normalize().any_orthonormal_vector();
        d.target = (d.position + side * 0.05).normalize() * DRONE_ORBIT_RADIUS;
        let old = d.target;
        d.advance(Duration::from_millis(16), &mut r);
        assert_ne!(d.target, old);
        assert!((d.target.length() - DRONE_ORBIT_RADIUS).abs() < 1e-5);
    }

    #[test]
    fn body_faces_the_target() {
        let mut r = HeadlessRenderer::new();
        let mut d = drone(6, &mut r);
        for _ in 0..10 {
            d.advance(Duration::from_millis(16), &mut r);
        }
        let rec = r.get(d.body.handle()).unwrap();
        let facing = rec.orientation * Vec3::Z;
        let wanted = (d.target - d.position).normalize();
        assert!(facing.abs_diff_eq(wanted, 1e-4), "{facing} vs {wanted}");
    }

    #[test]
    fn particles_step_by_velocity_whatever_the_dt() {
        for ms in [1, 50] {
            let mut r = HeadlessRenderer::new();
            let mut d = drone(8, &mut r);
            d.begin_retiring(&mut r);
            let before: Vec<(Vec3, Vec3)> =
                d.particles().iter().map(|p| (p.position, p.velocity)).collect();
            d.advance(Duration::from_millis(ms), &mut r);
            for (p, (start, velocity)) in d.particles().iter().zip(before) {
                assert!(p.position.abs_diff_eq(start + velocity, 1e-7));
            }
        }
    }
}
