//! Frame-stepped simulation of the shooter.
//!
//! `World` owns every entity list and advances them one animation frame per
//! [`World::step`]. It never touches the DOM; the host loop feeds it the
//! `requestAnimationFrame` timestamp and pointer positions, then hands it to
//! the renderer. Every entity's `x`/`y` is its centre.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::entities::{Aabb, Enemy, EnemyKind, Explosion, Flare, Laser, Pickup, Ship, Shooter, Star};
use super::weapons::{BASE_WEAPON, WeaponLevel, enemy_volley, player_volley};
use crate::config::ShooterConfig;

/// Particles thrown out when an enemy is destroyed.
const BURST_PARTICLES: usize = 15;
/// Sparkles announcing a power-up.
const POWER_UP_SPARKLES: usize = 10;
/// Entities enter from just above the top edge.
const SPAWN_Y: f64 = -20.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    GameOver,
}

/// What happened during one frame. Used by the host for logging and by the
/// renderer for one-shot effects.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameEvents {
    pub volley_fired: bool,
    pub enemies_destroyed: u32,
    pub hits_taken: u32,
    pub power_ups_collected: u32,
    pub energy_cells_collected: u32,
    /// New power level when it changed this frame (pickup or decay).
    pub power_level_changed: Option<usize>,
    /// Energy rose compared with the start of the frame.
    pub heal_flash: bool,
    /// The ship ran out of energy this frame.
    pub game_over: bool,
}

pub struct World {
    pub config: ShooterConfig,
    pub width: f64,
    pub height: f64,
    pub ship: Ship,
    pub lasers: Vec<Laser>,
    pub enemies: Vec<Enemy>,
    pub power_ups: Vec<Pickup>,
    pub energy_cells: Vec<Pickup>,
    pub explosions: Vec<Explosion>,
    pub stars: Vec<Star>,
    pub score: u32,
    pub energy: u32,
    pub power_level: usize,
    power_decay_at: Option<f64>,
    invulnerable_until: f64,
    last_shot_ms: f64,
    phase: Phase,
    dragging: bool,
    rng: StdRng,
}

impl World {
    pub fn new(config: ShooterConfig, width: f64, height: f64, seed: u64) -> Self {
        let mut world = Self {
            energy: config.max_energy,
            config,
            width,
            height,
            ship: Ship { x: 0.0, y: 0.0 },
            lasers: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            energy_cells: Vec::new(),
            explosions: Vec::new(),
            stars: Vec::new(),
            score: 0,
            power_level: 0,
            power_decay_at: None,
            invulnerable_until: f64::NEG_INFINITY,
            last_shot_ms: 0.0,
            phase: Phase::Playing,
            dragging: false,
            rng: StdRng::seed_from_u64(seed),
        };
        world.resize(width, height);
        world
    }

    // --- Queries -------------------------------------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invulnerable_until
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn energy_fraction(&self) -> f64 {
        self.energy as f64 / self.config.max_energy as f64
    }

    pub fn weapon(&self) -> &WeaponLevel {
        let idx = self.power_level.min(self.config.max_power_level());
        self.config.weapon_levels.get(idx).unwrap_or(&BASE_WEAPON)
    }

    /// Box the ship occupies for pickup collection.
    pub fn ship_bounds(&self) -> Aabb {
        let s = self.config.ship_size;
        Aabb::centred(self.ship.x, self.ship.y, s, s)
    }

    /// "Play again" button shown on the game-over screen.
    pub fn restart_button(&self) -> Aabb {
        Aabb::new(self.width / 2.0 - 100.0, self.height / 2.0 + 50.0, 200.0, 50.0)
    }

    pub fn hits_restart_button(&self, x: f64, y: f64) -> bool {
        let b = self.restart_button();
        x > b.x && x < b.x + b.w && y > b.y && y < b.y + b.h
    }

    // --- Host events ---------------------------------------------------------

    /// Canvas resized: recentre the ship near the bottom and reseed the star field.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.ship.x = width / 2.0;
        self.ship.y = height - self.config.ship_start_offset_y;
        let count = self.config.star_count;
        self.stars = (0..count)
            .map(|_| Star::random(&mut self.rng, width, height))
            .collect();
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.is_game_over() {
            return;
        }
        self.dragging = true;
        self.place_ship(x, y);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if !self.dragging || self.is_game_over() {
            return;
        }
        self.place_ship(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    fn place_ship(&mut self, x: f64, y: f64) {
        let mx = self.config.ship_margin_x;
        let my = self.config.ship_margin_y;
        self.ship.x = clamp_span(x, mx, self.width - mx);
        self.ship.y = clamp_span(y, my, self.height - my);
    }

    /// Back to a fresh round. Stars keep scrolling from where they are.
    pub fn restart(&mut self) {
        self.phase = Phase::Playing;
        self.energy = self.config.max_energy;
        self.score = 0;
        self.power_level = 0;
        self.power_decay_at = None;
        self.invulnerable_until = f64::NEG_INFINITY;
        self.dragging = false;
        self.lasers.clear();
        self.enemies.clear();
        self.power_ups.clear();
        self.energy_cells.clear();
        self.explosions.clear();
    }

    // --- Frame ---------------------------------------------------------------

    /// Advance the simulation by one frame at timestamp `now` (ms).
    /// Does nothing once the game is over.
    pub fn step(&mut self, now: f64) -> FrameEvents {
        let mut ev = FrameEvents::default();
        if self.is_game_over() {
            return ev;
        }
        let energy_before = self.energy;

        self.scroll_stars();
        self.spawn_hazards(now);
        self.auto_fire(now, &mut ev);
        self.update_lasers(now, &mut ev);
        self.update_enemies(now, &mut ev);
        self.update_explosions();
        self.update_power_ups(now, &mut ev);
        self.decay_power(now, &mut ev);
        self.update_energy_cells(&mut ev);

        ev.heal_flash = self.energy > energy_before;
        ev
    }

    fn scroll_stars(&mut self) {
        for star in &mut self.stars {
            star.y += star.speed;
            if star.y > self.height {
                star.y = 0.0;
                star.x = self.rng.gen_range(0.0..self.width.max(1.0));
            }
        }
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.r#gen::<f64>() < p
    }

    fn random_x(&mut self) -> f64 {
        self.rng.gen_range(0.0..self.width.max(1.0))
    }

    fn spawn_hazards(&mut self, now: f64) {
        if self.chance(self.config.enemy_spawn_chance) {
            let kind = EnemyKind::random(&mut self.rng);
            let x = self.random_x();
            self.spawn_enemy(kind, x, SPAWN_Y, now);
        }
        if self.chance(self.config.power_up_spawn_chance) {
            let x = self.random_x();
            self.spawn_power_up(x, SPAWN_Y);
            for _ in 0..POWER_UP_SPARKLES {
                let sx = self.random_x();
                let size = self.rng.gen_range(1.0..4.0);
                self.explosions.push(Explosion::new(sx, SPAWN_Y, size, Flare::Yellow));
            }
        }
        if self.chance(self.config.energy_cell_spawn_chance) {
            let x = self.random_x();
            self.spawn_energy_cell(x, SPAWN_Y);
        }
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, x: f64, y: f64, now: f64) {
        self.enemies.push(Enemy {
            kind,
            x,
            y,
            size: self.config.enemy_size,
            last_shot_ms: now,
        });
    }

    pub fn spawn_power_up(&mut self, x: f64, y: f64) {
        self.power_ups.push(Pickup { x, y, size: self.config.pickup_size });
    }

    pub fn spawn_energy_cell(&mut self, x: f64, y: f64) {
        self.energy_cells.push(Pickup { x, y, size: self.config.pickup_size });
    }

    fn auto_fire(&mut self, now: f64, ev: &mut FrameEvents) {
        let weapon = *self.weapon();
        if now - self.last_shot_ms > weapon.fire_rate_ms {
            let volley = player_volley(&weapon, self.ship.x, self.ship.y, self.config.player_shot_speed);
            self.lasers.extend(volley);
            self.last_shot_ms = now;
            ev.volley_fired = true;
        }
    }

    fn is_offscreen(&self, x: f64, y: f64) -> bool {
        let m = self.config.offscreen_margin;
        x < -m || x > self.width + m || y < -m || y > self.height + m
    }

    fn update_lasers(&mut self, now: f64, ev: &mut FrameEvents) {
        let half = self.config.ship_hit_half_extent;
        let mut i = self.lasers.len();
        while i > 0 {
            i -= 1;
            let laser = &mut self.lasers[i];
            laser.x += laser.vx;
            laser.y += laser.vy;
            let (lx, ly, owner) = (laser.x, laser.y, laser.owner);

            if self.is_offscreen(lx, ly) {
                self.lasers.swap_remove(i);
                continue;
            }

            let hits_ship = owner == Shooter::Enemy
                && !self.is_invulnerable(now)
                && (lx - self.ship.x).abs() < half
                && (ly - self.ship.y).abs() < half;
            if hits_ship {
                self.lasers.swap_remove(i);
                self.take_hit(now, ev);
            }
        }
    }

    fn take_hit(&mut self, now: f64, ev: &mut FrameEvents) {
        self.energy = self.energy.saturating_sub(self.config.damage_per_hit);
        self.explosions
            .push(Explosion::new(self.ship.x, self.ship.y, 1.0, Flare::Red));
        self.invulnerable_until = now + self.config.invulnerability_ms;
        ev.hits_taken += 1;
        tracing::debug!(energy = self.energy, "ship hit");
        if self.energy == 0 && self.phase == Phase::Playing {
            self.phase = Phase::GameOver;
            ev.game_over = true;
        }
    }

    fn update_enemies(&mut self, now: f64, ev: &mut FrameEvents) {
        let speed = self.config.enemy_speed;
        let interval = self.config.enemy_fire_interval_ms;
        let shot_speed = self.config.enemy_shot_speed;
        let floor = self.height + self.config.offscreen_margin;

        let mut i = self.enemies.len();
        while i > 0 {
            i -= 1;
            let enemy = &mut self.enemies[i];
            enemy.y += speed;

            let on_screen = enemy.y > 0.0 && enemy.y < self.height;
            if on_screen && now - enemy.last_shot_ms > interval {
                enemy.last_shot_ms = now;
                self.lasers
                    .extend(enemy_volley(enemy.kind, enemy.x, enemy.y, shot_speed));
            }

            if enemy.y > floor {
                self.enemies.swap_remove(i);
                continue;
            }

            let bounds = enemy.bounds();
            let hit = self.lasers.iter().rposition(|l| {
                l.owner == Shooter::Player && l.bounds().overlaps(&bounds)
            });
            if let Some(j) = hit {
                let dead = self.enemies.swap_remove(i);
                self.lasers.swap_remove(j);
                self.score += 1;
                ev.enemies_destroyed += 1;
                self.burst(dead.x, dead.y);
            }
        }
    }

    fn burst(&mut self, x: f64, y: f64) {
        self.explosions.push(Explosion::new(x, y, 1.0, Flare::Orange));
        for k in 0..BURST_PARTICLES {
            let angle = self.rng.gen_range(0.0..std::f64::consts::TAU);
            let distance = self.rng.gen_range(0.0..30.0);
            let size = self.rng.gen_range(2.0..6.0);
            let flare = if k % 2 == 0 { Flare::Orange } else { Flare::Ember };
            self.explosions.push(Explosion::new(
                x + angle.cos() * distance,
                y + angle.sin() * distance,
                size,
                flare,
            ));
        }
    }

    fn update_explosions(&mut self) {
        let lifetime = self.config.explosion_lifetime;
        for e in &mut self.explosions {
            e.age += 1;
            e.size += 2.0;
        }
        self.explosions.retain(|e| e.age <= lifetime);
    }

    fn update_power_ups(&mut self, now: f64, ev: &mut FrameEvents) {
        let speed = self.config.pickup_speed;
        let floor = self.height + self.config.offscreen_margin;
        let ship = self.ship_bounds();
        let playing = !self.is_game_over();
        let mut collected = 0;
        self.power_ups.retain_mut(|p| {
            p.y += speed;
            if p.y > floor {
                return false;
            }
            if playing && p.bounds().overlaps(&ship) {
                collected += 1;
                return false;
            }
            true
        });
        for _ in 0..collected {
            self.power_level = (self.power_level + 1).min(self.config.max_power_level());
            self.power_decay_at = Some(now + self.config.power_decay_ms);
            ev.power_ups_collected += 1;
            ev.power_level_changed = Some(self.power_level);
        }
    }

    /// Each upgrade wears off one tier after `power_decay_ms`; the timer
    /// restarts on every pickup and after every step down.
    fn decay_power(&mut self, now: f64, ev: &mut FrameEvents) {
        let Some(at) = self.power_decay_at else {
            return;
        };
        if now < at {
            return;
        }
        self.power_level = self.power_level.saturating_sub(1);
        self.power_decay_at = (self.power_level > 0).then(|| now + self.config.power_decay_ms);
        ev.power_level_changed = Some(self.power_level);
    }

    fn update_energy_cells(&mut self, ev: &mut FrameEvents) {
        let speed = self.config.pickup_speed;
        let floor = self.height + self.config.offscreen_margin;
        let ship = self.ship_bounds();
        let playing = !self.is_game_over();
        let mut collected = 0;
        self.energy_cells.retain_mut(|c| {
            c.y += speed;
            if c.y > floor {
                return false;
            }
            if playing && c.bounds().overlaps(&ship) {
                collected += 1;
                return false;
            }
            true
        });
        for _ in 0..collected {
            self.energy = self
                .energy
                .saturating_add(self.config.energy_cell_restore)
                .min(self.config.max_energy);
            ev.energy_cells_collected += 1;
        }
    }
}

/// `clamp` that tolerates an inverted range (tiny canvases) by pinning to `lo`.
fn clamp_span(v: f64, lo: f64, hi: f64) -> f64 {
    if hi < lo { lo } else { v.clamp(lo, hi) }
}
