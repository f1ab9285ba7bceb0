mod audio;
mod config;
mod game;
mod render;

use std::io::{self, Stdout, stdout};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, terminal,
};

use crate::audio::{Audio, NullAudio, Speaker};
use crate::config::FRAME_MS;
use crate::game::{Game, Mode, Transition};
use crate::render::PixelBuf;

enum Action {
    Continue,
    Quit,
}

/// The game plus its collaborators: audio backend and the user's music
/// preference, which is read again each time play begins.
struct App {
    game: Game,
    audio: Box<dyn Audio>,
    music_enabled: bool,
}

impl App {
    fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Char('m') => self.toggle_music(),
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => self.control(),
            _ => {
                // Any key restarts from the game-over screen.
                if self.game.mode == Mode::GameOver {
                    self.control();
                }
            }
        }
        Action::Continue
    }

    fn control(&mut self) {
        match self.game.control() {
            Transition::Started => {
                if self.music_enabled {
                    self.audio.rewind_music();
                    self.audio.play_music();
                }
            }
            Transition::Flapped => self.audio.flap_sfx(),
            Transition::Reset => self.audio.pause_music(),
        }
    }

    /// Flips the music preference and takes effect immediately, like a
    /// play/pause button would. The stored flag is authoritative so the
    /// toggle keeps flipping even on the no-op backend.
    fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        if self.music_enabled {
            self.audio.play_music();
        } else {
            self.audio.pause_music();
        }
    }
}

fn handle_event(app: &mut App, buf: &mut PixelBuf, ev: Event) -> Action {
    match ev {
        Event::Key(key) => app.handle_key(key.code),
        Event::Resize(cols, rows) => {
            buf.resize(cols as usize, rows as usize * 2);
            Action::Continue
        }
        _ => Action::Continue,
    }
}

fn run(app: &mut App, buf: &mut PixelBuf, out: &mut Stdout) -> io::Result<()> {
    let frame_dur = Duration::from_millis(FRAME_MS);

    loop {
        if app.game.mode == Mode::Playing {
            let frame_start = Instant::now();

            while event::poll(Duration::ZERO)? {
                if let Action::Quit = handle_event(app, buf, event::read()?) {
                    return Ok(());
                }
            }

            app.game.frame();
            if app.game.mode == Mode::GameOver {
                app.audio.pause_music();
                app.audio.death_sfx();
            }

            render::draw_frame(buf, &app.game, app.music_enabled);
            buf.present(out)?;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_dur {
                std::thread::sleep(frame_dur - elapsed);
            }
        } else {
            // Ready and game-over screens are frozen: draw once, then wait
            // for input instead of rescheduling.
            render::draw_frame(buf, &app.game, app.music_enabled);
            buf.present(out)?;

            if let Action::Quit = handle_event(app, buf, event::read()?) {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent_app() -> App {
        App {
            game: Game::new(1),
            audio: Box::new(NullAudio),
            music_enabled: false,
        }
    }

    #[test]
    fn music_toggle_flips_even_without_a_device() {
        let mut app = silent_app();
        assert!(!app.audio.music_playing());

        app.toggle_music();
        assert!(app.music_enabled);
        app.toggle_music();
        assert!(!app.music_enabled);
        app.toggle_music();
        assert!(app.music_enabled);
    }

    #[test]
    fn music_key_routes_to_the_toggle() {
        let mut app = silent_app();
        app.handle_key(KeyCode::Char('m'));
        assert!(app.music_enabled);
        app.handle_key(KeyCode::Char('m'));
        assert!(!app.music_enabled);
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::DisableLineWrap,
    )?;

    let (cols, rows) = terminal::size()?;
    let mut buf = PixelBuf::new(cols as usize, rows as usize * 2);

    let audio: Box<dyn Audio> = match Speaker::open() {
        Some(speaker) => Box::new(speaker),
        None => Box::new(NullAudio),
    };
    let mut app = App {
        game: Game::new(clock_seed()),
        audio,
        music_enabled: false,
    };

    let result = run(&mut app, &mut buf, &mut out);

    execute!(
        out,
        terminal::LeaveAlternateScreen,
        cursor::Show,
        terminal::EnableLineWrap,
    )?;
    terminal::disable_raw_mode()?;
    result
}
