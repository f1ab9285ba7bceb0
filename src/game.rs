//! Core simulation: bird physics, pipe scrolling, collision, score and the
//! session state machine. No I/O lives here; the RNG is seeded at
//! construction so a session can be driven deterministically from tests.

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::*;

/// The player-controlled sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub velocity: f64,
    pub gravity: f64,
    pub lift: f64,
}

impl Bird {
    fn new() -> Self {
        Self {
            x: BIRD_X,
            y: BIRD_START_Y,
            width: BIRD_WIDTH,
            height: BIRD_HEIGHT,
            velocity: 0.0,
            gravity: GRAVITY,
            lift: FLAP_IMPULSE,
        }
    }

    pub fn flap(&mut self) {
        self.velocity = self.lift;
    }

    /// One integration step: gravity into velocity, velocity into position,
    /// then clamp to the field. Clamping kills the velocity.
    pub fn update(&mut self) {
        self.velocity += self.gravity;
        self.y += self.velocity;

        if self.y + self.height > FIELD_HEIGHT {
            self.y = FIELD_HEIGHT - self.height;
            self.velocity = 0.0;
        }
        if self.y < 0.0 {
            self.y = 0.0;
            self.velocity = 0.0;
        }
    }
}

/// One scrolling rectangle. Pipes always come in top/bottom pairs; the top
/// member is the one with `y == 0` and carries the pair's score marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub passed: bool,
}

impl Pipe {
    pub fn is_top(&self) -> bool {
        self.y == 0.0
    }
}

/// Session mode. The frame step only runs while `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ready,
    Playing,
    GameOver,
}

/// What the control input did, so the caller can drive audio off it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    Flapped,
    Reset,
}

/// Everything the simulation mutates, in one place.
pub struct Game {
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub score: u32,
    pub best: u32,
    pub mode: Mode,
    rng: Pcg32,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self {
            bird: Bird::new(),
            pipes: Vec::new(),
            score: 0,
            best: 0,
            mode: Mode::Ready,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Full reset back to the ready screen. The RNG and the best score
    /// survive; everything else returns to its starting value.
    pub fn reset(&mut self) {
        self.bird = Bird::new();
        self.pipes.clear();
        self.score = 0;
        self.mode = Mode::Ready;
    }

    /// The single discrete input, interpreted by mode: start, flap, or reset.
    pub fn control(&mut self) -> Transition {
        match self.mode {
            Mode::Ready => {
                self.mode = Mode::Playing;
                Transition::Started
            }
            Mode::Playing => {
                self.bird.flap();
                Transition::Flapped
            }
            Mode::GameOver => {
                self.reset();
                Transition::Reset
            }
        }
    }

    /// One frame of the active game. Outside `Playing` this is a no-op; the
    /// frozen states only ever re-render.
    pub fn frame(&mut self) {
        if self.mode != Mode::Playing {
            return;
        }

        self.bird.update();
        self.advance_pipes();

        if self.collides() {
            self.mode = Mode::GameOver;
            self.best = self.best.max(self.score);
        } else {
            self.award_score();
        }
    }

    /// Scroll, cull, and spawn. Culling uses a stable filter so no element is
    /// skipped while the list compacts.
    fn advance_pipes(&mut self) {
        for p in &mut self.pipes {
            p.x -= PIPE_SPEED;
        }
        self.pipes.retain(|p| p.x + p.width >= 0.0);

        if self.should_spawn() {
            self.spawn_pair();
        }
    }

    /// A pair is due when the list is empty or the second-to-last pipe (the
    /// top of the newest pair) has scrolled past the spawn threshold.
    fn should_spawn(&self) -> bool {
        match self
            .pipes
            .len()
            .checked_sub(2)
            .and_then(|i| self.pipes.get(i))
        {
            None => true,
            Some(p) => p.x < FIELD_WIDTH - PIPE_SPACING,
        }
    }

    /// Emit one top/bottom pair at the right edge. The top segment height is
    /// an integer drawn uniformly from [MIN_SEGMENT, FIELD_HEIGHT - GAP -
    /// MIN_SEGMENT); the bottom segment takes whatever the gap leaves over.
    fn spawn_pair(&mut self) {
        let span = (FIELD_HEIGHT - PIPE_GAP - 2.0 * PIPE_MIN_SEGMENT) as u32;
        let top_height = PIPE_MIN_SEGMENT + self.rng.random_range(0..span) as f64;

        self.pipes.push(Pipe {
            x: FIELD_WIDTH,
            y: 0.0,
            width: PIPE_WIDTH,
            height: top_height,
            passed: false,
        });
        self.pipes.push(Pipe {
            x: FIELD_WIDTH,
            y: top_height + PIPE_GAP,
            width: PIPE_WIDTH,
            height: FIELD_HEIGHT - top_height - PIPE_GAP,
            passed: false,
        });
    }

    /// True if the bird overlaps any pipe. Hitting the floor or ceiling is
    /// not a collision; the clamp in `Bird::update` already handled it.
    pub fn collides(&self) -> bool {
        self.pipes.iter().any(|p| {
            aabb_overlap(
                self.bird.x,
                self.bird.y,
                self.bird.width,
                self.bird.height,
                p.x,
                p.y,
                p.width,
                p.height,
            )
        })
    }

    /// Score the first unscored top pipe whose right edge has passed the
    /// bird's left edge, then stop. At most one point per frame.
    fn award_score(&mut self) {
        for p in &mut self.pipes {
            if p.is_top() && !p.passed && p.x + p.width < self.bird.x {
                p.passed = true;
                self.score += 1;
                break;
            }
        }
    }
}

/// Standard 4-condition axis-aligned bounding box overlap test.
#[allow(clippy::too_many_arguments)]
pub fn aabb_overlap(
    ax: f64,
    ay: f64,
    aw: f64,
    ah: f64,
    bx: f64,
    by: f64,
    bw: f64,
    bh: f64,
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}
