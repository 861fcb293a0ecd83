//! Player weapon tiers and enemy fire patterns.

use serde::{Deserialize, Serialize};

use super::entities::{EnemyKind, Laser, Shooter};

/// One power tier of the ship's auto-fire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeaponLevel {
    /// Shots per volley
    pub count: u32,
    /// Horizontal gap between adjacent muzzles (px)
    pub spread: f64,
    /// Minimum time between volleys (ms)
    pub fire_rate_ms: f64,
    /// Outermost shot deflection from vertical (degrees)
    pub angle_deg: f64,
    /// Beam colour, RGB
    pub color: [u8; 3],
}

/// Single cyan beam; the unpowered tier, also used when a table is empty.
pub const BASE_WEAPON: WeaponLevel =
    WeaponLevel { count: 1, spread: 0.0, fire_rate_ms: 300.0, angle_deg: 0.0, color: [0, 255, 255] };

pub fn default_weapon_levels() -> Vec<WeaponLevel> {
    vec![
        BASE_WEAPON,
        WeaponLevel { count: 2, spread: 15.0, fire_rate_ms: 250.0, angle_deg: 8.0, color: [255, 0, 255] }, // magenta
        WeaponLevel { count: 3, spread: 12.0, fire_rate_ms: 200.0, angle_deg: 12.0, color: [255, 255, 0] }, // yellow
        WeaponLevel { count: 4, spread: 10.0, fire_rate_ms: 150.0, angle_deg: 16.0, color: [255, 0, 0] }, // red
        WeaponLevel { count: 5, spread: 8.0, fire_rate_ms: 100.0, angle_deg: 20.0, color: [255, 136, 0] }, // orange
        WeaponLevel { count: 6, spread: 6.0, fire_rate_ms: 50.0, angle_deg: 25.0, color: [255, 0, 136] }, // pink
    ]
}

pub const ENEMY_SHOT_COLOR: [u8; 3] = [255, 0, 0];

pub const SHOT_WIDTH: f64 = 12.0;
pub const SHOT_HEIGHT: f64 = 24.0;

/// Muzzle layout for a volley: (horizontal offset px, angle degrees) per shot.
/// A single shot goes straight up; wider volleys fan evenly from `-angle` to `+angle`.
pub fn volley_pattern(level: &WeaponLevel) -> Vec<(f64, f64)> {
    if level.count <= 1 {
        return vec![(0.0, 0.0)];
    }
    let n = level.count as f64;
    (0..level.count)
        .map(|i| {
            let i = i as f64;
            let progress = i / (n - 1.0);
            let angle = -level.angle_deg + level.angle_deg * 2.0 * progress;
            let offset = level.spread * (i - (n - 1.0) / 2.0);
            (offset, angle)
        })
        .collect()
}

/// Player lasers fired from a ship centred at (`ship_x`, `ship_y`).
pub fn player_volley(level: &WeaponLevel, ship_x: f64, ship_y: f64, speed: f64) -> Vec<Laser> {
    volley_pattern(level)
        .into_iter()
        .map(|(offset, angle)| {
            let r = angle.to_radians();
            Laser {
                x: ship_x - 4.0 + offset,
                y: ship_y - 20.0,
                width: SHOT_WIDTH,
                height: SHOT_HEIGHT,
                vx: r.sin() * speed,
                vy: -r.cos() * speed,
                owner: Shooter::Player,
            }
        })
        .collect()
}

/// Shots an enemy of `kind` at (`x`, `y`) releases when its fire timer elapses.
pub fn enemy_volley(kind: EnemyKind, x: f64, y: f64, speed: f64) -> Vec<Laser> {
    let shot = |sx: f64, vx: f64, vy: f64| Laser {
        x: sx,
        y: y + 20.0,
        width: SHOT_WIDTH,
        height: SHOT_HEIGHT,
        vx,
        vy,
        owner: Shooter::Enemy,
    };
    match kind {
        EnemyKind::Scout => vec![shot(x, 0.0, speed)],
        EnemyKind::Fan => [-20.0_f64, 0.0, 20.0]
            .iter()
            .map(|deg| {
                let r = deg.to_radians();
                shot(x, r.sin() * speed, r.cos() * speed)
            })
            .collect(),
        EnemyKind::Twin => vec![shot(x - 15.0, 0.0, speed), shot(x + 15.0, 0.0, speed)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_shot_goes_straight_up() {
        let lvl = default_weapon_levels()[0];
        let shots = player_volley(&lvl, 100.0, 300.0, 8.0);
        assert_eq!(shots.len(), 1);
        let s = &shots[0];
        assert!((s.x - 96.0).abs() < 1e-9);
        assert!((s.y - 280.0).abs() < 1e-9);
        assert!(s.vx.abs() < 1e-9);
        assert!((s.vy + 8.0).abs() < 1e-9);
    }

    #[test]
    fn volley_fans_symmetrically() {
        let lvl = default_weapon_levels()[2];
        let pattern = volley_pattern(&lvl);
        assert_eq!(pattern.len(), 3);
        assert!((pattern[0].0 + 12.0).abs() < 1e-9);
        assert!((pattern[0].1 + 12.0).abs() < 1e-9);
        assert!(pattern[1].0.abs() < 1e-9 && pattern[1].1.abs() < 1e-9);
        assert!((pattern[2].0 - 12.0).abs() < 1e-9);
        assert!((pattern[2].1 - 12.0).abs() < 1e-9);
    }

    #[test]
    fn every_level_fires_its_count_at_constant_speed() {
        for lvl in default_weapon_levels() {
            let shots = player_volley(&lvl, 0.0, 0.0, 8.0);
            assert_eq!(shots.len() as u32, lvl.count);
            for s in shots {
                assert!((s.vx.hypot(s.vy) - 8.0).abs() < 1e-9);
                assert!(s.vy < 0.0, "player shots travel upward");
            }
        }
    }

    #[test]
    fn fire_rate_increases_with_level() {
        let lvls = default_weapon_levels();
        for pair in lvls.windows(2) {
            assert!(pair[1].fire_rate_ms < pair[0].fire_rate_ms);
        }
    }

    #[test]
    fn enemy_patterns() {
        let scout = enemy_volley(EnemyKind::Scout, 50.0, 10.0, 5.0);
        assert_eq!(scout.len(), 1);
        assert!((scout[0].y - 30.0).abs() < 1e-9);

        let fan = enemy_volley(EnemyKind::Fan, 50.0, 10.0, 5.0);
        assert_eq!(fan.len(), 3);
        assert!(fan[0].vx < 0.0 && fan[2].vx > 0.0);
        assert!(fan.iter().all(|s| s.vy > 0.0 && s.owner == Shooter::Enemy));

        let twin = enemy_volley(EnemyKind::Twin, 50.0, 10.0, 5.0);
        assert_eq!(twin.len(), 2);
        assert!((twin[0].x - 35.0).abs() < 1e-9);
        assert!((twin[1].x - 65.0).abs() < 1e-9);
    }
}
