//! Per-frame entity records. Positions are canvas pixels with y growing downward
//! and name the entity's centre; collision boxes are built around it.

use rand::Rng;

/// Axis-aligned box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Aabb {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Box of size `w`x`h` centred on (`cx`, `cy`).
    pub fn centred(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Strict overlap; boxes that only touch edges do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ship {
    pub x: f64,
    pub y: f64,
}

/// Who fired a laser. Player shots hurt enemies, enemy shots hurt the ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shooter {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Laser {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    pub owner: Shooter,
}

impl Laser {
    pub fn bounds(&self) -> Aabb {
        Aabb::centred(self.x, self.y, self.width, self.height)
    }

    /// Heading used to rotate the beam sprite (0 = pointing along its travel axis).
    pub fn heading(&self) -> f64 {
        match self.owner {
            Shooter::Player => self.vx.atan2(-self.vy),
            Shooter::Enemy => self.vx.atan2(self.vy),
        }
    }
}

/// Enemy hull types; each has its own fire pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    /// Single straight shot
    Scout,
    /// Three-way fan
    Fan,
    /// Two parallel shots from the wing tips
    Twin,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Scout, EnemyKind::Fan, EnemyKind::Twin];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub last_shot_ms: f64,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::centred(self.x, self.y, self.size, self.size)
    }
}

/// Falling collectible: weapon upgrades and energy cells share this shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pickup {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl Pickup {
    pub fn bounds(&self) -> Aabb {
        Aabb::centred(self.x, self.y, self.size, self.size)
    }
}

/// Palette for explosion particles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flare {
    /// Enemy destroyed
    Orange,
    /// Secondary burst particle
    Ember,
    /// Ship took a hit
    Red,
    /// Power-up entering the screen
    Yellow,
}

impl Flare {
    pub fn css(self) -> &'static str {
        match self {
            Flare::Orange => "#ffaa00",
            Flare::Ember => "#ff4400",
            Flare::Red => "#ff0000",
            Flare::Yellow => "#ffff00",
        }
    }
}

/// Expanding, fading ring. Grows every frame and dies after a fixed age.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Explosion {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub age: u32,
    pub flare: Flare,
}

impl Explosion {
    pub fn new(x: f64, y: f64, size: f64, flare: Flare) -> Self {
        Self { x, y, size, age: 0, flare }
    }

    /// Opacity in [0, 1] given the lifetime in frames.
    pub fn opacity(&self, lifetime: u32) -> f64 {
        (1.0 - self.age as f64 / lifetime as f64).clamp(0.0, 1.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
}

impl Star {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.gen_range(0.0..width.max(1.0)),
            y: rng.gen_range(0.0..height.max(1.0)),
            size: rng.gen_range(1.0..3.0),
            speed: rng.gen_range(1.0..3.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aabb_overlap_is_strict() {
        let a = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Aabb::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn centred_box_is_shifted_by_half_extent() {
        assert_eq!(Aabb::centred(10.0, 10.0, 4.0, 2.0), Aabb::new(8.0, 9.0, 4.0, 2.0));
    }

    #[test]
    fn laser_heading_follows_travel() {
        let up = Laser { x: 0.0, y: 0.0, width: 12.0, height: 24.0, vx: 0.0, vy: -8.0, owner: Shooter::Player };
        assert!(up.heading().abs() < 1e-9);
        let down = Laser { owner: Shooter::Enemy, vy: 5.0, ..up };
        assert!(down.heading().abs() < 1e-9);
        let slanted = Laser { vx: 1.0, ..up };
        assert!(slanted.heading() > 0.0);
    }

    #[test]
    fn explosion_fades_out() {
        let mut e = Explosion::new(0.0, 0.0, 1.0, Flare::Orange);
        assert!((e.opacity(20) - 1.0).abs() < 1e-9);
        e.age = 10;
        assert!((e.opacity(20) - 0.5).abs() < 1e-9);
        e.age = 25;
        assert_eq!(e.opacity(20), 0.0);
    }
}
