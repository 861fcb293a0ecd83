//! Canvas drawing for one frame. Layers are painted back to front in the order
//! `draw_frame` lists them; nothing here mutates the world.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::entities::{Enemy, EnemyKind, Explosion, Laser, Pickup, Shooter};
use super::weapons::ENEMY_SHOT_COLOR;
use super::world::{FrameEvents, World};

const BACKGROUND: &str = "#000428";
const FIRE_COLORS: [&str; 4] = ["#ff4400", "#ff6600", "#ff8800", "#ffaa00"];
const HUD_FONT: &str = "24px Arial";

const ENERGY_BAR_WIDTH: f64 = 200.0;
const ENERGY_BAR_HEIGHT: f64 = 25.0;
const ENERGY_BAR_TICKS: u32 = 10;

fn rgba(c: [u8; 3], a: f64) -> String {
    format!("rgba({}, {}, {}, {})", c[0], c[1], c[2], a)
}

pub fn draw_frame(
    ctx: &CanvasRenderingContext2d,
    world: &World,
    events: &FrameEvents,
    now: f64,
) -> Result<(), JsValue> {
    let (w, h) = (world.width, world.height);

    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, w, h);

    draw_stars(ctx, world)?;
    let beam = world.weapon().color;
    for laser in &world.lasers {
        draw_laser(ctx, laser, beam)?;
    }
    for enemy in &world.enemies {
        draw_enemy(ctx, enemy)?;
    }
    let lifetime = world.config.explosion_lifetime;
    for explosion in &world.explosions {
        draw_explosion(ctx, explosion, lifetime)?;
    }
    for power_up in &world.power_ups {
        draw_power_up(ctx, power_up)?;
    }
    draw_ship(ctx, world.ship.x, world.ship.y, now)?;
    draw_hud(ctx, world, now)?;

    if world.energy_fraction() < 0.3 {
        let a = (now / 100.0).sin() * 0.2 + 0.2;
        ctx.set_fill_style_str(&format!("rgba(255, 0, 0, {a})"));
        ctx.fill_rect(0.0, 0.0, w, h);
    }
    if events.heal_flash {
        radial_glow(ctx, world.ship.x, world.ship.y, 60.0, [0, 255, 128], 0.3)?;
    }
    draw_exhaust(ctx, world.ship.x, world.ship.y);
    for cell in &world.energy_cells {
        draw_energy_cell(ctx, cell)?;
    }
    if world.power_level > 0 && !world.is_game_over() {
        let a = 0.2 + (now / 200.0).sin() * 0.1;
        radial_glow(ctx, world.ship.x, world.ship.y, 40.0, [255, 255, 0], a)?;
    }
    if world.is_game_over() {
        draw_game_over(ctx, world)?;
    }
    Ok(())
}

fn disc(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(x, y, r.max(0.0), 0.0, TAU)?;
    ctx.fill();
    Ok(())
}

fn polygon(ctx: &CanvasRenderingContext2d, pts: &[(f64, f64)]) {
    let Some(&(x0, y0)) = pts.first() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(x0, y0);
    for &(x, y) in &pts[1..] {
        ctx.line_to(x, y);
    }
    ctx.close_path();
    ctx.fill();
}

/// Soft circular glow fading from `alpha` at the centre to transparent at `r`.
fn radial_glow(
    ctx: &CanvasRenderingContext2d,
    x: f64,
    y: f64,
    r: f64,
    color: [u8; 3],
    alpha: f64,
) -> Result<(), JsValue> {
    let g = ctx.create_radial_gradient(x, y, 0.0, x, y, r)?;
    g.add_color_stop(0.0, &rgba(color, alpha))?;
    g.add_color_stop(1.0, &rgba(color, 0.0))?;
    ctx.set_fill_style_canvas_gradient(&g);
    disc(ctx, x, y, r)
}

fn draw_stars(ctx: &CanvasRenderingContext2d, world: &World) -> Result<(), JsValue> {
    ctx.set_fill_style_str("rgba(255, 255, 255, 0.5)");
    for star in &world.stars {
        disc(ctx, star.x, star.y, star.size)?;
    }
    Ok(())
}

fn draw_laser(ctx: &CanvasRenderingContext2d, laser: &Laser, player_color: [u8; 3]) -> Result<(), JsValue> {
    let color = match laser.owner {
        Shooter::Player => player_color,
        Shooter::Enemy => ENEMY_SHOT_COLOR,
    };
    ctx.save();
    ctx.translate(laser.x, laser.y)?;
    ctx.rotate(laser.heading())?;

    // trail
    let trail = ctx.create_linear_gradient(0.0, 20.0, 0.0, -20.0);
    trail.add_color_stop(0.0, "rgba(255, 255, 255, 0)")?;
    trail.add_color_stop(0.3, &rgba(color, 0.2))?;
    trail.add_color_stop(0.7, &rgba(color, 0.4))?;
    trail.add_color_stop(1.0, &rgba(color, 0.1))?;
    ctx.set_fill_style_canvas_gradient(&trail);
    polygon(ctx, &[(-3.0, 20.0), (3.0, 20.0), (2.0, -20.0), (-2.0, -20.0)]);

    // core
    let core = ctx.create_linear_gradient(0.0, 10.0, 0.0, -10.0);
    core.add_color_stop(0.0, "rgba(255, 255, 255, 0.3)")?;
    core.add_color_stop(0.5, &rgba(color, 1.0))?;
    core.add_color_stop(1.0, "rgba(255, 255, 255, 0.3)")?;
    ctx.set_fill_style_canvas_gradient(&core);
    polygon(ctx, &[(-1.0, 10.0), (1.0, 10.0), (1.0, -10.0), (-1.0, -10.0)]);

    ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
    disc(ctx, 0.0, 0.0, 1.0)?;

    let glow = ctx.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, 15.0)?;
    glow.add_color_stop(0.0, &rgba(color, 0.3))?;
    glow.add_color_stop(0.5, &rgba(color, 0.1))?;
    glow.add_color_stop(1.0, &rgba(color, 0.0))?;
    ctx.set_fill_style_canvas_gradient(&glow);
    disc(ctx, 0.0, 0.0, 15.0)?;

    ctx.restore();
    Ok(())
}

fn draw_enemy(ctx: &CanvasRenderingContext2d, enemy: &Enemy) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(enemy.x, enemy.y)?;

    let trail = ctx.create_linear_gradient(0.0, -30.0, 0.0, 10.0);
    trail.add_color_stop(0.0, "rgba(255, 80, 0, 0)")?;
    trail.add_color_stop(0.5, "rgba(255, 80, 0, 0.3)")?;
    trail.add_color_stop(1.0, "rgba(255, 80, 0, 0.7)")?;
    ctx.set_fill_style_canvas_gradient(&trail);
    polygon(ctx, &[(-15.0, -30.0), (15.0, -30.0), (10.0, 10.0), (-10.0, 10.0)]);

    radial_glow(ctx, 0.0, 0.0, 40.0, [255, 80, 0], 0.3)?;

    // hulls point downward, toward the player
    match enemy.kind {
        EnemyKind::Scout => {
            ctx.set_fill_style_str("#8a2be2");
            polygon(ctx, &[(-22.0, -18.0), (22.0, -18.0), (0.0, 26.0)]);
            ctx.set_fill_style_str("#d8b4ff");
            disc(ctx, 0.0, -4.0, 6.0)?;
        }
        EnemyKind::Fan => {
            ctx.set_fill_style_str("#2e8b57");
            polygon(
                ctx,
                &[(-28.0, -14.0), (-10.0, -20.0), (10.0, -20.0), (28.0, -14.0), (14.0, 10.0), (0.0, 24.0), (-14.0, 10.0)],
            );
            ctx.set_fill_style_str("#b4ffd8");
            disc(ctx, -8.0, -4.0, 4.0)?;
            disc(ctx, 8.0, -4.0, 4.0)?;
        }
        EnemyKind::Twin => {
            ctx.set_fill_style_str("#b22222");
            polygon(ctx, &[(-8.0, -22.0), (8.0, -22.0), (10.0, 18.0), (-10.0, 18.0)]);
            ctx.fill_rect(-24.0, -10.0, 12.0, 26.0);
            ctx.fill_rect(12.0, -10.0, 12.0, 26.0);
            ctx.set_fill_style_str("#ffd0d0");
            disc(ctx, 0.0, 0.0, 5.0)?;
        }
    }

    ctx.restore();
    Ok(())
}

fn draw_explosion(ctx: &CanvasRenderingContext2d, e: &Explosion, lifetime: u32) -> Result<(), JsValue> {
    let opacity = e.opacity(lifetime);
    let g = ctx.create_radial_gradient(e.x, e.y, 0.0, e.x, e.y, e.size)?;
    g.add_color_stop(0.0, &format!("rgba(255, 255, 255, {opacity})"))?;
    g.add_color_stop(0.4, &format!("rgba(255, 170, 0, {opacity})"))?;
    g.add_color_stop(1.0, "rgba(255, 68, 0, 0)")?;
    ctx.set_fill_style_canvas_gradient(&g);
    disc(ctx, e.x, e.y, e.size)?;

    // ring of sparks, tinted by the flare colour
    ctx.set_global_alpha(opacity * 0.5);
    ctx.set_fill_style_str(e.flare.css());
    for j in 0..8 {
        let angle = j as f64 / 8.0 * TAU;
        let px = e.x + angle.cos() * e.size * 0.8;
        let py = e.y + angle.sin() * e.size * 0.8;
        disc(ctx, px, py, 2.0)?;
    }
    ctx.set_global_alpha(1.0);
    Ok(())
}

fn draw_power_up(ctx: &CanvasRenderingContext2d, p: &Pickup) -> Result<(), JsValue> {
    radial_glow(ctx, p.x, p.y, 20.0, [255, 255, 0], 0.3)?;
    let r = p.size / 2.0;
    let inner = r * 0.45;
    let mut pts = Vec::with_capacity(10);
    for i in 0..10 {
        let a = -PI / 2.0 + i as f64 * PI / 5.0;
        let rr = if i % 2 == 0 { r } else { inner };
        pts.push((p.x + a.cos() * rr, p.y + a.sin() * rr));
    }
    ctx.set_fill_style_str("#ffd700");
    polygon(ctx, &pts);
    ctx.set_stroke_style_str("#fff6a0");
    ctx.set_line_width(1.5);
    ctx.stroke();
    Ok(())
}

fn draw_energy_cell(ctx: &CanvasRenderingContext2d, c: &Pickup) -> Result<(), JsValue> {
    let (w, h) = (c.size * 0.6, c.size);
    let (x, y) = (c.x - w / 2.0, c.y - h / 2.0);
    ctx.set_fill_style_str("#1e3d2f");
    ctx.fill_rect(x, y, w, h);
    ctx.set_fill_style_str("#00ff80");
    ctx.fill_rect(x + 3.0, y + h * 0.35, w - 6.0, h * 0.6);
    ctx.fill_rect(c.x - w * 0.2, y - 3.0, w * 0.4, 3.0);
    ctx.set_stroke_style_str("#b0ffd8");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(x, y, w, h);
    Ok(())
}

fn draw_ship(ctx: &CanvasRenderingContext2d, x: f64, y: f64, now: f64) -> Result<(), JsValue> {
    ctx.save();
    ctx.translate(x, y)?;

    ctx.set_fill_style_str("#c0c8d8");
    polygon(ctx, &[(0.0, -30.0), (10.0, -6.0), (26.0, 18.0), (8.0, 14.0), (-8.0, 14.0), (-26.0, 18.0), (-10.0, -6.0)]);
    ctx.set_fill_style_str("#5a6478");
    polygon(ctx, &[(-10.0, -6.0), (-26.0, 18.0), (-8.0, 14.0)]);
    polygon(ctx, &[(10.0, -6.0), (26.0, 18.0), (8.0, 14.0)]);
    ctx.set_fill_style_str("#4fc3f7");
    disc(ctx, 0.0, -8.0, 5.0)?;

    // thruster flame, flickering with time
    let fire = (now / 100.0).sin() * 3.0 + 7.0;
    for (i, color) in FIRE_COLORS.iter().enumerate() {
        let i = i as f64;
        let r = fire - i;
        ctx.set_fill_style_str(color);
        disc(ctx, 0.0, 25.0 + i * 5.0, r)?;
        disc(ctx, -6.0, 25.0 + i * 4.0, r * 0.6)?;
        disc(ctx, 6.0, 25.0 + i * 4.0, r * 0.6)?;
    }

    ctx.restore();
    Ok(())
}

fn draw_exhaust(ctx: &CanvasRenderingContext2d, x: f64, y: f64) {
    let g = ctx.create_linear_gradient(x, y, x, y + 30.0);
    if g.add_color_stop(0.0, "rgba(255, 100, 0, 0.5)").is_err()
        || g.add_color_stop(1.0, "rgba(255, 200, 0, 0)").is_err()
    {
        return;
    }
    ctx.set_fill_style_canvas_gradient(&g);
    polygon(ctx, &[(x - 10.0, y), (x + 10.0, y), (x, y + 30.0)]);
    polygon(ctx, &[(x - 15.0, y), (x - 5.0, y), (x - 10.0, y + 20.0)]);
    polygon(ctx, &[(x + 5.0, y), (x + 15.0, y), (x + 10.0, y + 20.0)]);
}

fn energy_palette(fraction: f64) -> (&'static str, &'static str) {
    if fraction > 0.6 {
        ("rgba(0, 255, 0, 0.7)", "rgba(150, 255, 150, 0.9)")
    } else if fraction > 0.3 {
        ("rgba(255, 255, 0, 0.7)", "rgba(255, 255, 150, 0.9)")
    } else {
        ("rgba(255, 0, 0, 0.7)", "rgba(255, 150, 150, 0.9)")
    }
}

fn draw_hud(ctx: &CanvasRenderingContext2d, world: &World, now: f64) -> Result<(), JsValue> {
    ctx.set_fill_style_str("white");
    ctx.set_font(HUD_FONT);
    ctx.set_text_align("left");
    ctx.fill_text(&format!("Meteoros: {}", world.score), 20.0, 40.0)?;

    let bx = world.width - ENERGY_BAR_WIDTH - 20.0;
    let by = 20.0;

    let back = ctx.create_linear_gradient(bx, by, bx + ENERGY_BAR_WIDTH, by);
    back.add_color_stop(0.0, "rgba(50, 50, 50, 0.5)")?;
    back.add_color_stop(1.0, "rgba(70, 70, 70, 0.5)")?;
    ctx.set_fill_style_canvas_gradient(&back);
    ctx.fill_rect(bx, by, ENERGY_BAR_WIDTH, ENERGY_BAR_HEIGHT);

    let fraction = world.energy_fraction();
    let pulse = (now / 200.0).sin() * 0.1;
    let (c0, c1) = energy_palette(fraction);
    // zero-length gradients are invalid; keep the end point past the start
    let fill_end = bx + (ENERGY_BAR_WIDTH * fraction).max(1.0);
    let fill = ctx.create_linear_gradient(bx, by, fill_end, by);
    fill.add_color_stop(0.0, c0)?;
    fill.add_color_stop(1.0, c1)?;
    ctx.set_fill_style_canvas_gradient(&fill);
    if fraction > 0.0 {
        let fill_w = (ENERGY_BAR_WIDTH * (fraction + pulse)).max(0.0);
        ctx.fill_rect(bx, by, fill_w, ENERGY_BAR_HEIGHT);
    }

    ctx.set_stroke_style_str("rgba(255, 255, 255, 0.2)");
    ctx.set_line_width(1.0);
    let spacing = ENERGY_BAR_WIDTH / ENERGY_BAR_TICKS as f64;
    for i in 1..ENERGY_BAR_TICKS {
        let tx = bx + i as f64 * spacing;
        line(ctx, tx, by, tx, by + ENERGY_BAR_HEIGHT);
    }

    ctx.set_stroke_style_str("white");
    ctx.set_line_width(2.0);
    ctx.stroke_rect(bx, by, ENERGY_BAR_WIDTH, ENERGY_BAR_HEIGHT);

    let halo = 3.0;
    ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.3 + pulse));
    ctx.set_line_width(1.0);
    ctx.stroke_rect(bx - halo, by - halo, ENERGY_BAR_WIDTH + halo * 2.0, ENERGY_BAR_HEIGHT + halo * 2.0);

    let label = format!("Energia: {}%", (fraction * 100.0).round() as u32);
    ctx.set_text_align("right");
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
    ctx.fill_text(&label, bx - 8.0, by + 18.0)?;
    ctx.set_fill_style_str("white");
    ctx.fill_text(&label, bx - 10.0, by + 16.0)?;
    ctx.set_text_align("left");
    Ok(())
}

fn draw_game_over(ctx: &CanvasRenderingContext2d, world: &World) -> Result<(), JsValue> {
    let (w, h) = (world.width, world.height);
    ctx.set_fill_style_str("rgba(0, 0, 0, 0.7)");
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.set_fill_style_str("white");
    ctx.set_text_align("center");
    ctx.set_font("bold 48px Arial");
    ctx.fill_text("Game Over!", w / 2.0, h / 2.0 - 50.0)?;

    ctx.set_font(HUD_FONT);
    ctx.fill_text(&format!("Pontuação Final: {}", world.score), w / 2.0, h / 2.0)?;

    let b = world.restart_button();
    ctx.set_fill_style_str("#4CAF50");
    ctx.fill_rect(b.x, b.y, b.w, b.h);
    ctx.set_fill_style_str("white");
    ctx.fill_text("Jogar Novamente", w / 2.0, b.y + 32.0)?;
    ctx.set_text_align("left");
    Ok(())
}

fn line(ctx: &CanvasRenderingContext2d, x1: f64, y1: f64, x2: f64, y2: f64) {
    ctx.begin_path();
    ctx.move_to(x1, y1);
    ctx.line_to(x2, y2);
    ctx.stroke();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_formats_css() {
        assert_eq!(rgba([0, 255, 255], 0.3), "rgba(0, 255, 255, 0.3)");
        assert_eq!(rgba([255, 0, 136], 0.0), "rgba(255, 0, 136, 0)");
    }

    #[test]
    fn energy_palette_thresholds() {
        assert_eq!(energy_palette(1.0).0, "rgba(0, 255, 0, 0.7)");
        assert_eq!(energy_palette(0.6).0, "rgba(255, 255, 0, 0.7)");
        assert_eq!(energy_palette(0.3).0, "rgba(255, 0, 0, 0.7)");
    }
}
