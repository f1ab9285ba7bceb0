//! Terminal renderer. The game simulates in a fixed 480x400 logical field;
//! this module rasterizes it into an RGB pixel buffer two pixels per
//! terminal row (upper-half-block trick) and draws score and overlay text
//! with a tiny 3x5 bitmap font.

use std::io::{self, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};

use crate::config::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::game::{Game, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    fn dimmed(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }
}

const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const PIPE_EDGE: Rgb = Rgb(60, 110, 24);
const PIPE_BODY: Rgb = Rgb(100, 170, 40);
const PIPE_SHINE: Rgb = Rgb(140, 210, 60);
const BIRD_BODY: Rgb = Rgb(245, 200, 66);
const BIRD_EYE: Rgb = Rgb(20, 20, 20);
const PANEL: Rgb = Rgb(220, 195, 120);
const PANEL_EDGE: Rgb = Rgb(30, 30, 30);
const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(255, 225, 100);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer ────────────────────────────────────────────────────────────

pub struct PixelBuf {
    pub w: usize,
    /// Pixel height, twice the terminal row count.
    pub h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![SKY_TOP; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.resize(w * h, SKY_TOP);
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Flush the buffer to the terminal, two pixels per cell via `▀`.
    /// Color change escapes are elided while the running fg/bg still match.
    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if top == bot {
                    if bg != Some(top) {
                        queue!(out, style::SetBackgroundColor(to_ccolor(top)))?;
                        bg = Some(top);
                    }
                    queue!(out, style::Print(' '))?;
                } else {
                    if fg != Some(top) {
                        queue!(out, style::SetForegroundColor(to_ccolor(top)))?;
                        fg = Some(top);
                    }
                    if bg != Some(bot) {
                        queue!(out, style::SetBackgroundColor(to_ccolor(bot)))?;
                        bg = Some(bot);
                    }
                    queue!(out, style::Print('\u{2580}'))?;
                }
            }
            if row < rows - 1 {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

fn to_ccolor(c: Rgb) -> CColor {
    CColor::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [[u8; 15]; 26] = [
    [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // A
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,1,0], // B
    [0,1,1, 1,0,0, 1,0,0, 1,0,0, 0,1,1], // C
    [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0], // D
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1], // E
    [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0], // F
    [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1], // G
    [1,0,1, 1,0,1, 1,1,1, 1,0,1, 1,0,1], // H
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1], // I
    [0,0,1, 0,0,1, 0,0,1, 1,0,1, 0,1,0], // J
    [1,0,1, 1,1,0, 1,0,0, 1,1,0, 1,0,1], // K
    [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1], // L
    [1,0,1, 1,1,1, 1,0,1, 1,0,1, 1,0,1], // M
    [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1], // N
    [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // O
    [1,1,0, 1,0,1, 1,1,0, 1,0,0, 1,0,0], // P
    [0,1,0, 1,0,1, 1,0,1, 0,1,0, 0,0,1], // Q
    [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1], // R
    [0,1,1, 1,0,0, 0,1,0, 0,0,1, 1,1,0], // S
    [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0], // T
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // U
    [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0], // V
    [1,0,1, 1,0,1, 1,0,1, 1,1,1, 1,0,1], // W
    [1,0,1, 1,0,1, 0,1,0, 1,0,1, 1,0,1], // X
    [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0], // Y
    [1,1,1, 0,0,1, 0,1,0, 1,0,0, 1,1,1], // Z
];

#[rustfmt::skip]
const BANG: [u8; 15] = [0,1,0, 0,1,0, 0,1,0, 0,0,0, 0,1,0];

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    match ch {
        '0'..='9' => Some(&DIGITS[ch as usize - '0' as usize]),
        'A'..='Z' => Some(&LETTERS[ch as usize - 'A' as usize]),
        '!' => Some(&BANG),
        _ => None,
    }
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, g: &[u8; 15], fg: Rgb, shadow: bool) {
    for row in 0..5 {
        for col in 0..3 {
            if g[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                if shadow {
                    buf.set(px + 1, py + 1, SHADOW);
                }
                buf.set(px, py, fg);
            }
        }
    }
}

/// Draw uppercase text at (x, y); 4 pixels of advance per character.
pub fn draw_text(buf: &mut PixelBuf, x: i32, y: i32, text: &str, fg: Rgb, shadow: bool) {
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            draw_glyph(buf, x + i as i32 * 4, y, g, fg, shadow);
        }
    }
}

pub fn draw_text_centered(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let w = text.chars().count() as i32 * 4 - 1;
    draw_text(buf, cx - w / 2, y, text, fg, true);
}

// ── Scene ───────────────────────────────────────────────────────────────────

/// Redraw the whole frame from current game state.
pub fn draw_frame(buf: &mut PixelBuf, game: &Game, music_on: bool) {
    draw_sky(buf);
    draw_pipes(buf, game);
    draw_bird(buf, game);

    draw_text(buf, 2, 2, &format!("SCORE {}", game.score), WHITE, true);
    let music = if music_on { "MUSIC ON" } else { "MUSIC OFF" };
    draw_text(buf, 2, buf.h as i32 - 7, music, WHITE, true);

    match game.mode {
        Mode::Ready => {
            draw_text_centered(buf, buf.w as i32 / 2, buf.h as i32 / 2, "PRESS SPACE TO START", WHITE);
        }
        Mode::Playing => {}
        Mode::GameOver => draw_game_over(buf, game),
    }
}

/// Map a logical field rectangle to buffer pixels.
fn field_rect(buf: &PixelBuf, x: f64, y: f64, w: f64, h: f64) -> (i32, i32, i32, i32) {
    let sx = buf.w as f64 / FIELD_WIDTH;
    let sy = buf.h as f64 / FIELD_HEIGHT;
    let x0 = (x * sx) as i32;
    let y0 = (y * sy) as i32;
    let x1 = ((x + w) * sx) as i32;
    let y1 = ((y + h) * sy) as i32;
    (x0, y0, (x1 - x0).max(1), (y1 - y0).max(1))
}

fn draw_sky(buf: &mut PixelBuf) {
    let h = buf.h;
    for y in 0..h {
        let t = (y as u16 * 256) / h.max(1) as u16;
        let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
        for x in 0..buf.w {
            buf.set(x as i32, y as i32, c);
        }
    }
}

fn draw_pipes(buf: &mut PixelBuf, game: &Game) {
    for p in &game.pipes {
        let (x, y, w, h) = field_rect(buf, p.x, p.y, p.width, p.height);
        buf.fill_rect(x, y, w, h, PIPE_BODY);
        // Left edge dark, a shine column a third of the way in.
        buf.fill_rect(x, y, 1, h, PIPE_EDGE);
        buf.fill_rect(x + w - 1, y, 1, h, PIPE_EDGE);
        if w > 3 {
            buf.fill_rect(x + w / 3, y, 1, h, PIPE_SHINE);
        }
    }
}

fn draw_bird(buf: &mut PixelBuf, game: &Game) {
    let b = &game.bird;
    let (x, y, w, h) = field_rect(buf, b.x, b.y, b.width, b.height);
    buf.fill_rect(x, y, w, h, BIRD_BODY);
    buf.fill_rect(x + 1, y, w.max(2) - 1, 1, GOLD);
    buf.set(x + w - 2, y + 1, BIRD_EYE);
}

fn draw_game_over(buf: &mut PixelBuf, game: &Game) {
    // Dim the frozen frame behind the panel.
    for y in 0..buf.h {
        for x in 0..buf.w {
            let c = buf.get(x, y);
            buf.set(x as i32, y as i32, c.dimmed());
        }
    }

    let cx = buf.w as i32 / 2;
    let cy = buf.h as i32 / 2;
    let panel_w = 90.min(buf.w as i32 - 2);
    let panel_h = 34.min(buf.h as i32 - 2);
    let px = cx - panel_w / 2;
    let py = cy - panel_h / 2;
    buf.fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, PANEL_EDGE);
    buf.fill_rect(px, py, panel_w, panel_h, PANEL);

    draw_text_centered(buf, cx, py + 3, "GAME OVER!", SHADOW);
    draw_text_centered(buf, cx, py + 11, &format!("SCORE {}", game.score), WHITE);
    draw_text_centered(buf, cx, py + 18, &format!("BEST {}", game.best), GOLD);
    draw_text_centered(buf, cx, py + 26, "PRESS SPACE TO RESTART", SHADOW);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_ignores_out_of_bounds() {
        let mut buf = PixelBuf::new(8, 8);
        buf.set(-1, 0, WHITE);
        buf.set(0, -1, WHITE);
        buf.set(8, 0, WHITE);
        buf.set(0, 8, WHITE);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(buf.get(x, y), SKY_TOP);
            }
        }
    }

    #[test]
    fn fill_rect_clips_to_the_buffer() {
        let mut buf = PixelBuf::new(4, 4);
        buf.fill_rect(-2, -2, 10, 10, WHITE);
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(buf.get(x, y), WHITE);
            }
        }
    }

    #[test]
    fn every_message_character_has_a_glyph() {
        for msg in [
            "PRESS SPACE TO START",
            "GAME OVER!",
            "PRESS SPACE TO RESTART",
            "SCORE 0123456789",
            "BEST 42",
            "MUSIC ON",
            "MUSIC OFF",
        ] {
            for ch in msg.chars() {
                assert!(
                    ch == ' ' || glyph(ch).is_some(),
                    "no glyph for {ch:?} in {msg:?}"
                );
            }
        }
    }

    #[test]
    fn field_rect_never_degenerates() {
        let buf = PixelBuf::new(40, 20);
        let (_, _, w, h) = field_rect(&buf, 0.0, 0.0, 1.0, 1.0);
        assert!(w >= 1 && h >= 1);
    }
}
