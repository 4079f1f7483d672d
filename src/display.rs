//! Terminal renderer for the binary.
//!
//! Reads the game through `Game::views` and the HUD, and projects the
//! world square [-1, 1]² onto the character grid.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use flight_shooter::curve::ReferenceFrame;
use flight_shooter::entities::{EntityClass, GameStatus, RenderView};
use flight_shooter::Game;
use nalgebra::Vector3;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_TIME: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_HEALTH: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_PATH: Color = Color::DarkRed;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_BULLET_ENEMY: Color = Color::Magenta;
const C_COIN: Color = Color::Yellow;
const C_SCENERY: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

/// Screen geometry: the world square [-1, 1]² mapped inside the border.
struct Field {
    width: u16,
    height: u16,
}

impl Field {
    fn cell(&self, position: &Vector3<f32>) -> Option<(u16, u16)> {
        let (x, y) = (position.x, position.y);
        if !(-1.0..=1.0).contains(&x) || !(-1.0..=1.0).contains(&y) {
            return None;
        }
        // Play rows span 2 ..= height-3, play columns 1 ..= width-2.
        let cols = self.width.saturating_sub(3) as f32;
        let rows = self.height.saturating_sub(5) as f32;
        let col = 1 + ((x + 1.0) / 2.0 * cols).round() as u16;
        let row = 2 + ((1.0 - y) / 2.0 * rows).round() as u16;
        Some((col, row))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let field = Field { width, height };

    out.queue(terminal::Clear(terminal::ClearType::All))?;
    draw_border(out, &field)?;

    match game.status() {
        GameStatus::Ready => draw_ready(out, &field)?,
        GameStatus::Active => {
            draw_hud(out, game, &field)?;
            draw_flight_paths(out, game, &field)?;
            let views = game.views();
            // Scenery first so everything else paints over it.
            for view in views.iter().filter(|v| v.class == EntityClass::Scenery) {
                draw_view(out, view, &field)?;
            }
            for view in views.iter().filter(|v| v.class != EntityClass::Scenery) {
                draw_view(out, view, &field)?;
            }
            draw_controls_hint(out, &field)?;
        }
        GameStatus::Over => draw_game_over(out, game, &field)?,
    }

    // cursor parks on the bottom row
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, field: &Field) -> std::io::Result<()> {
    let w = field.width as usize;
    let h = field.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(field.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &Game, field: &Field) -> std::io::Result<()> {
    let hud = game.hud();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(format!("Time:{:>5}s", hud.elapsed_secs)))?;

    let score = format!("Score:{:>6}", hud.score);
    let sx = (field.width / 2).saturating_sub(score.len() as u16 / 2);
    out.queue(cursor::MoveTo(sx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score))?;

    let health = format!("Health:{:>4}", hud.health);
    let hx = field.width.saturating_sub(health.len() as u16 + 1);
    out.queue(cursor::MoveTo(hx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_HEALTH))?;
    out.queue(Print(&health))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_flight_paths<W: Write>(out: &mut W, game: &Game, field: &Field) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_PATH))?;
    for wave in game.waves().waves() {
        let frame: &ReferenceFrame = wave.frame();
        for point in wave.curve().points(50) {
            if let Some((col, row)) = field.cell(&frame.to_world(point)) {
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print("·"))?;
            }
        }
    }
    Ok(())
}

fn draw_view<W: Write>(out: &mut W, view: &RenderView, field: &Field) -> std::io::Result<()> {
    let (glyph, color) = match view.class {
        EntityClass::Player => {
            // Bank the sprite while the airplane tilts.
            let glyph = if view.rotation.y < 0.0 {
                "◢"
            } else if view.rotation.y > 0.0 {
                "◣"
            } else {
                "▲"
            };
            (glyph, C_PLAYER)
        }
        EntityClass::PlayerBullet => ("║", C_BULLET_PLAYER),
        EntityClass::Enemy => ("▼", C_ENEMY),
        EntityClass::EnemyBullet => ("↓", C_BULLET_ENEMY),
        EntityClass::Coin => ("★", C_COIN),
        EntityClass::Scenery => ("▓", C_SCENERY),
        EntityClass::FlightPath => return Ok(()),
    };
    if let Some((col, row)) = field.cell(&view.position) {
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, field: &Field) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, field.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("W A S D / ← ↑ → ↓ : Fly   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    field: &Field,
    lines: &[(String, Color)],
) -> std::io::Result<()> {
    let cx = field.width / 2;
    let start_row = (field.height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(msg))?;
    }
    Ok(())
}

fn draw_ready<W: Write>(out: &mut W, field: &Field) -> std::io::Result<()> {
    let lines = [
        ("✈  FLIGHT  SHOOTER  ✈".to_string(), Color::Cyan),
        (String::new(), Color::White),
        ("Dodge the waves, shoot them down, grab the stars.".to_string(), Color::DarkGrey),
        ("SPACE - Start   Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, field, &lines)
}

fn draw_game_over<W: Write>(out: &mut W, game: &Game, field: &Field) -> std::io::Result<()> {
    let score = game.final_score().unwrap_or(game.player().score);
    let lines = [
        ("╔════════════════════╗".to_string(), Color::Red),
        ("║    GAME  OVER      ║".to_string(), Color::Red),
        ("╚════════════════════╝".to_string(), Color::Red),
        (format!("Final Score: {:>6}", score), Color::Yellow),
        ("SPACE - Continue  Q - Quit".to_string(), Color::White),
    ];
    draw_centered(out, field, &lines)
}
