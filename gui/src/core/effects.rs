use helpers::buffer::RingBuffer;
use helpers::geometry::{Point2d, Vector2d};
use racegame::core::car::EffectEvent;
use rand::Rng;

/// Car body dimensions used for drawing (length along the heading, width across it)
pub const CAR_LENGTH: f64 = 40.0;
pub const CAR_WIDTH: f64 = 20.0;

const MAX_NO_SKID_MARKS: usize = 500;
const SKID_MARK_FADE_FACTOR: f64 = 0.999;
const SKID_MARK_MIN_ALPHA: f64 = 0.05;
const SMOKE_DECAY: f64 = 0.02;
const CRASH_DECAY: f64 = 0.03;
const SPEED_LINE_DECAY: f64 = 0.05;
const PARTICLE_GROWTH_FACTOR: f64 = 1.02;
const NO_CRASH_PARTICLES: usize = 30;

pub const SMOKE_COLOR: [u8; 3] = [136, 136, 136];
pub const CRASH_COLORS: [[u8; 3]; 2] = [[255, 68, 68], [255, 170, 0]];

/// Particle is used for tire smoke and crash bursts. Size is a radius.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Point2d,
    pub vel: Vector2d,
    pub size: f64,
    pub alpha: f64,
    pub decay: f64,
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Copy)]
pub struct SkidMark {
    pub pos: Point2d,
    pub alpha: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SpeedLine {
    pub pos: Point2d,
    pub angle: f64,
    pub length: f64,
    pub alpha: f64,
}

/// Effects contains all visual effects owned by the renderer. They are created from the effect
/// events of the simulation and age once per drawn frame.
#[derive(Debug)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub skid_marks: RingBuffer<SkidMark>,
    pub speed_lines: Vec<SpeedLine>,
}

impl Default for Effects {
    fn default() -> Self {
        Effects {
            particles: vec![],
            skid_marks: RingBuffer::new(MAX_NO_SKID_MARKS),
            speed_lines: vec![],
        }
    }
}

impl Effects {
    pub fn add_events(&mut self, events: &[EffectEvent]) {
        let mut rng = rand::thread_rng();

        for event in events.iter() {
            match *event {
                EffectEvent::TireSmoke { pos, angle } => {
                    // one puff behind each rear wheel
                    for side in [-1.0, 1.0] {
                        self.particles.push(Particle {
                            pos: get_body_point(
                                &pos,
                                angle,
                                -CAR_LENGTH / 2.0,
                                side * CAR_WIDTH / 2.0,
                            ),
                            vel: Vector2d {
                                dx: rng.gen_range(-1.0..1.0),
                                dy: rng.gen_range(-1.0..1.0),
                            },
                            size: rng.gen_range(8.0..16.0),
                            alpha: 0.6,
                            decay: SMOKE_DECAY,
                            color: SMOKE_COLOR,
                        });
                    }
                }
                EffectEvent::SkidMark { pos, angle } => {
                    for side in [-1.0, 1.0] {
                        self.skid_marks.push(SkidMark {
                            pos: get_body_point(
                                &pos,
                                angle,
                                -CAR_LENGTH / 2.0,
                                side * CAR_WIDTH / 3.0,
                            ),
                            alpha: 0.4,
                        });
                    }
                }
                EffectEvent::SpeedLine { pos, angle } => {
                    let behind = get_body_point(&pos, angle, -rng.gen_range(50.0..80.0), 0.0);
                    self.speed_lines.push(SpeedLine {
                        pos: Point2d::new(
                            behind.x + rng.gen_range(-20.0..20.0),
                            behind.y + rng.gen_range(-20.0..20.0),
                        ),
                        angle,
                        length: rng.gen_range(20.0..50.0),
                        alpha: 0.8,
                    });
                }
                EffectEvent::CrashBurst { pos } => {
                    for i in 0..NO_CRASH_PARTICLES {
                        let dir = i as f64 / NO_CRASH_PARTICLES as f64 * 2.0 * std::f64::consts::PI;
                        self.particles.push(Particle {
                            pos,
                            vel: Vector2d::from_angle(dir).mult(rng.gen_range(3.0..8.0)),
                            size: rng.gen_range(5.0..15.0),
                            alpha: 1.0,
                            decay: CRASH_DECAY,
                            color: CRASH_COLORS[rng.gen_range(0..CRASH_COLORS.len())],
                        });
                    }
                }
            }
        }
    }

    /// The method ages all effects by one frame and removes the faded ones.
    pub fn update(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos = particle.pos.shift(&particle.vel);
            particle.size *= PARTICLE_GROWTH_FACTOR;
            particle.alpha -= particle.decay;
        }
        self.particles.retain(|particle| particle.alpha > 0.0);

        for skid_mark in self.skid_marks.iter_mut() {
            skid_mark.alpha *= SKID_MARK_FADE_FACTOR;
        }
        self.skid_marks
            .retain(|skid_mark| skid_mark.alpha > SKID_MARK_MIN_ALPHA);

        for speed_line in self.speed_lines.iter_mut() {
            speed_line.alpha -= SPEED_LINE_DECAY;
        }
        self.speed_lines.retain(|speed_line| speed_line.alpha > 0.0);
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.skid_marks.clear();
        self.speed_lines.clear();
    }
}

/// get_body_point returns the world position of a point given in the car frame (forward along
/// the heading, side to the right of it).
pub fn get_body_point(pos: &Point2d, angle: f64, forward: f64, side: f64) -> Point2d {
    let heading = Vector2d::from_angle(angle);
    pos.shift(&heading.mult(forward))
        .shift(&heading.normal_vector().mult(side))
}
