//! Fixed gameplay constants. The play field uses logical units; the renderer
//! scales them to whatever terminal it finds itself in.

/// Logical play field size.
pub const FIELD_WIDTH: f64 = 480.0;
pub const FIELD_HEIGHT: f64 = 400.0;

/// Bird geometry and starting position.
pub const BIRD_X: f64 = 50.0;
pub const BIRD_START_Y: f64 = 150.0;
pub const BIRD_WIDTH: f64 = 30.0;
pub const BIRD_HEIGHT: f64 = 30.0;

/// Per-frame physics.
pub const GRAVITY: f64 = 0.2;
pub const FLAP_IMPULSE: f64 = -4.0;

/// Pipe geometry and motion.
pub const PIPE_WIDTH: f64 = 50.0;
pub const PIPE_GAP: f64 = 120.0;
pub const PIPE_SPEED: f64 = 2.0;
/// A new pair spawns once the previous pair is this far from the right edge.
pub const PIPE_SPACING: f64 = 200.0;
/// Neither segment of a pair may be shorter than this.
pub const PIPE_MIN_SEGMENT: f64 = 50.0;

/// Frame period in milliseconds (~60 fps; physics constants are per-frame).
pub const FRAME_MS: u64 = 16;
