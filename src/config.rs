//! Tuning knobs for the shooter.
//!
//! Every gameplay constant lives in [`ShooterConfig`]. The page may hand a
//! partial JSON object to `start_space_game`; missing keys keep their default.
//! Rates are per frame (the loop runs on `requestAnimationFrame`) and times
//! are in milliseconds of `performance.now()`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::space::weapons::{WeaponLevel, default_weapon_levels};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterConfig {
    // --- Spawning (chance per frame) ---
    pub enemy_spawn_chance: f64,
    pub power_up_spawn_chance: f64,
    pub energy_cell_spawn_chance: f64,
    pub star_count: usize,

    // --- Motion (px per frame) ---
    pub enemy_speed: f64,
    pub pickup_speed: f64,
    pub player_shot_speed: f64,
    pub enemy_shot_speed: f64,

    // --- Sizes (px) ---
    pub enemy_size: f64,
    pub pickup_size: f64,
    pub ship_size: f64,
    /// Half extent of the square around the ship centre that enemy shots hit.
    pub ship_hit_half_extent: f64,
    /// How far outside the canvas an entity may drift before it is dropped.
    pub offscreen_margin: f64,

    // --- Ship placement ---
    pub ship_margin_x: f64,
    pub ship_margin_y: f64,
    pub ship_start_offset_y: f64,

    // --- Energy ---
    pub max_energy: u32,
    pub damage_per_hit: u32,
    pub energy_cell_restore: u32,

    // --- Timers (ms) ---
    pub enemy_fire_interval_ms: f64,
    pub invulnerability_ms: f64,
    pub power_decay_ms: f64,

    /// Frames an explosion lives.
    pub explosion_lifetime: u32,

    pub weapon_levels: Vec<WeaponLevel>,
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            enemy_spawn_chance: 0.01,
            power_up_spawn_chance: 0.001,
            energy_cell_spawn_chance: 0.001,
            star_count: 100,
            enemy_speed: 2.0,
            pickup_speed: 2.0,
            player_shot_speed: 8.0,
            enemy_shot_speed: 5.0,
            enemy_size: 40.0,
            pickup_size: 30.0,
            ship_size: 50.0,
            ship_hit_half_extent: 25.0,
            offscreen_margin: 20.0,
            ship_margin_x: 25.0,
            ship_margin_y: 100.0,
            ship_start_offset_y: 150.0,
            max_energy: 100,
            damage_per_hit: 20,
            energy_cell_restore: 20,
            enemy_fire_interval_ms: 1500.0,
            invulnerability_ms: 1000.0,
            power_decay_ms: 7000.0,
            explosion_lifetime: 20,
            weapon_levels: default_weapon_levels(),
        }
    }
}

impl ShooterConfig {
    /// Parse a (possibly partial) JSON object and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: ShooterConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let chances = [
            ("enemy_spawn_chance", self.enemy_spawn_chance),
            ("power_up_spawn_chance", self.power_up_spawn_chance),
            ("energy_cell_spawn_chance", self.energy_cell_spawn_chance),
        ];
        for (field, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, format!("{p} is not within [0, 1]")));
            }
        }

        let positives = [
            ("enemy_speed", self.enemy_speed),
            ("pickup_speed", self.pickup_speed),
            ("player_shot_speed", self.player_shot_speed),
            ("enemy_shot_speed", self.enemy_shot_speed),
            ("enemy_size", self.enemy_size),
            ("pickup_size", self.pickup_size),
            ("ship_size", self.ship_size),
            ("ship_hit_half_extent", self.ship_hit_half_extent),
        ];
        for (field, v) in positives {
            if !(v.is_finite() && v > 0.0) {
                return Err(invalid(field, format!("{v} must be a positive number")));
            }
        }

        let non_negative = [
            ("offscreen_margin", self.offscreen_margin),
            ("ship_margin_x", self.ship_margin_x),
            ("ship_margin_y", self.ship_margin_y),
            ("ship_start_offset_y", self.ship_start_offset_y),
            ("enemy_fire_interval_ms", self.enemy_fire_interval_ms),
            ("invulnerability_ms", self.invulnerability_ms),
            ("power_decay_ms", self.power_decay_ms),
        ];
        for (field, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(invalid(field, format!("{v} must not be negative")));
            }
        }

        if self.max_energy == 0 {
            return Err(invalid("max_energy", "must be greater than zero".into()));
        }
        let per_event = [
            ("damage_per_hit", self.damage_per_hit),
            ("energy_cell_restore", self.energy_cell_restore),
        ];
        for (field, v) in per_event {
            if v > self.max_energy {
                return Err(invalid(field, format!("{v} exceeds max_energy ({})", self.max_energy)));
            }
        }
        if self.explosion_lifetime == 0 {
            return Err(invalid("explosion_lifetime", "must be at least one frame".into()));
        }
        if self.weapon_levels.is_empty() {
            return Err(invalid("weapon_levels", "needs at least one level".into()));
        }
        for lvl in &self.weapon_levels {
            if lvl.count == 0 {
                return Err(invalid("weapon_levels", "a level fires zero shots".into()));
            }
            if !(lvl.fire_rate_ms.is_finite() && lvl.fire_rate_ms >= 0.0) {
                return Err(invalid("weapon_levels", "fire_rate_ms must not be negative".into()));
            }
        }
        Ok(())
    }

    /// Highest reachable power level (index into `weapon_levels`).
    pub fn max_power_level(&self) -> usize {
        self.weapon_levels.len().saturating_sub(1)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = ShooterConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.max_power_level(), 5);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ShooterConfig::from_json(r#"{ "enemy_spawn_chance": 0.05, "max_energy": 150 }"#)
            .unwrap();
        assert!((cfg.enemy_spawn_chance - 0.05).abs() < 1e-12);
        assert_eq!(cfg.max_energy, 150);
        assert_eq!(cfg.star_count, 100);
        assert_eq!(cfg.weapon_levels.len(), 6);
    }

    #[test]
    fn rejects_probability_above_one() {
        let err = ShooterConfig::from_json(r#"{ "power_up_spawn_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { field: "power_up_spawn_chance", .. }
        ));
    }

    #[test]
    fn rejects_empty_weapon_table() {
        let err = ShooterConfig::from_json(r#"{ "weapon_levels": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "weapon_levels", .. }));
    }

    #[test]
    fn rejects_energy_amounts_above_the_maximum() {
        let err = ShooterConfig::from_json(r#"{ "energy_cell_restore": 4294967295 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "energy_cell_restore", .. }));

        let err = ShooterConfig::from_json(r#"{ "max_energy": 50, "damage_per_hit": 60 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "damage_per_hit", .. }));

        assert!(ShooterConfig::from_json(r#"{ "max_energy": 50, "energy_cell_restore": 50 }"#).is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        let err = ShooterConfig::from_json("{ enemy_speed: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
