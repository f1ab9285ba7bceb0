//! Procedurally synthesized music and sound effects. Everything is rendered
//! up front with fundsp and played through rodio sinks; there are no asset
//! files. Audio is strictly best-effort: if no output device can be opened
//! the game runs against the no-op backend and never notices.

use fundsp::prelude::*;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

const SAMPLE_RATE: f64 = 44100.0;

/// Capability interface the game loop talks to at state transitions.
pub trait Audio {
    fn play_music(&mut self);
    fn pause_music(&mut self);
    /// Restart the music track from the beginning (leaves it paused).
    fn rewind_music(&mut self);
    fn music_playing(&self) -> bool;
    fn flap_sfx(&mut self);
    fn death_sfx(&mut self);
}

/// Substituted when no audio device is available.
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_music(&mut self) {}
    fn pause_music(&mut self) {}
    fn rewind_music(&mut self) {}
    fn music_playing(&self) -> bool {
        false
    }
    fn flap_sfx(&mut self) {}
    fn death_sfx(&mut self) {}
}

/// Real backend: one persistent sink looping the music track, plus detached
/// one-shot sinks for effects.
pub struct Speaker {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Sink,
    track: Vec<f32>,
    flap: Vec<f32>,
    death: Vec<f32>,
}

impl Speaker {
    pub fn open() -> Option<Self> {
        let (stream, handle) = OutputStream::try_default().ok()?;
        let music = Sink::try_new(&handle).ok()?;
        music.pause();

        let track = render_track();
        music.append(looped(&track));

        Some(Self {
            _stream: stream,
            handle,
            music,
            track,
            flap: render_flap(),
            death: render_death(),
        })
    }

    fn one_shot(&self, samples: &[f32]) {
        // Playback failure is deliberately ignored.
        if let Ok(sink) = Sink::try_new(&self.handle) {
            sink.append(SamplesBuffer::new(1, SAMPLE_RATE as u32, samples.to_vec()));
            sink.detach();
        }
    }
}

impl Audio for Speaker {
    fn play_music(&mut self) {
        self.music.play();
    }

    fn pause_music(&mut self) {
        self.music.pause();
    }

    fn rewind_music(&mut self) {
        self.music.stop();
        self.music.pause();
        self.music.append(looped(&self.track));
    }

    fn music_playing(&self) -> bool {
        !self.music.is_paused()
    }

    fn flap_sfx(&mut self) {
        self.one_shot(&self.flap);
    }

    fn death_sfx(&mut self) {
        self.one_shot(&self.death);
    }
}

fn looped(samples: &[f32]) -> impl Source<Item = f32> + Send + 'static {
    SamplesBuffer::new(1, SAMPLE_RATE as u32, samples.to_vec()).repeat_infinite()
}

fn render(duration: f64, node: &mut dyn AudioUnit) -> Vec<f32> {
    let wave = Wave::render(SAMPLE_RATE, duration, node);
    (0..wave.len()).map(|i| wave.at(0, i)).collect()
}

/// Eight-note triangle loop standing in for the page's background track.
fn render_track() -> Vec<f32> {
    const NOTES: [f32; 8] = [261.63, 329.63, 392.00, 523.25, 392.00, 329.63, 293.66, 349.23];
    const NOTE_RATE: f32 = 2.0;

    let melody = lfo(|t: f32| NOTES[(t * NOTE_RATE) as usize % NOTES.len()]);
    let pluck = lfo(|t: f32| {
        let phase = (t * NOTE_RATE).fract();
        lerp(0.16, 0.04, phase)
    });
    let mut node = (melody >> triangle()) * pluck;
    render(NOTES.len() as f64 / NOTE_RATE as f64, &mut node)
}

/// Short rising blip for a flap.
fn render_flap() -> Vec<f32> {
    let chirp = lfo(|t: f32| lerp(300.0, 700.0, (t / 0.08).min(1.0)));
    let fade = lfo(|t: f32| lerp(0.12, 0.0, (t / 0.1).min(1.0)));
    let mut node = (chirp >> triangle()) * fade;
    render(0.1, &mut node)
}

/// Falling saw sweep, 400 Hz down to 80 Hz, fading out over half a second.
fn render_death() -> Vec<f32> {
    let sweep = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let fade = lfo(|t: f32| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
    let mut node = (sweep >> saw()) * fade;
    render(0.5, &mut node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_clips_are_finite_and_bounded() {
        for clip in [render_track(), render_flap(), render_death()] {
            assert!(!clip.is_empty());
            assert!(clip.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        }
    }

    #[test]
    fn clip_lengths_match_their_durations() {
        for (clip, duration) in [
            (render_flap(), 0.1),
            (render_death(), 0.5),
            (render_track(), 4.0),
        ] {
            let expected = duration * SAMPLE_RATE;
            assert!((clip.len() as f64 - expected).abs() <= 1.0);
        }
    }
}
