//! Falling-flake drift: individual flakes fall and deposit into a pile.
//!
//! Unlike the height-field pile in [`crate::simulator`], the drift pile
//! has no target, melt or smoothing. Each landed flake adds to exactly
//! one column, so the surface stays grainy.

use glam::Vec2;
use rand::Rng;

use crate::{config::DriftConfig, height_field::HeightField, types::column_index};

/// Height above the top edge at which new flakes appear.
pub const SPAWN_Y: f32 = -10.0;
/// Smallest flake radius.
pub const MIN_RADIUS: f32 = 1.5;
/// Width of the radius range above [`MIN_RADIUS`].
pub const RADIUS_SPREAD: f32 = 2.0;

/// A single falling flake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Flake {
    pub pos: Vec2,
    pub radius: f32,
}

impl Flake {
    /// Spawns a flake at a random x above the viewport.
    pub fn random(width: f32, rng: &mut impl Rng) -> Self {
        let x = rng.random::<f32>() * width;
        let radius = rng.random::<f32>() * RADIUS_SPREAD + MIN_RADIUS;
        Self {
            pos: Vec2::new(x, SPAWN_Y),
            radius,
        }
    }
}

/// Flakes in flight plus the pile they land on.
///
/// ### Fields
/// - `flakes` - Flakes still falling, in canvas-local pixels.
/// - `pile` - Deposited height per column, measured up from the bottom edge.
/// - `width`, `height` - Viewport size the field was last sized to.
#[derive(Debug, Clone)]
pub struct DriftField {
    pub flakes: Vec<Flake>,
    pub pile: Vec<f32>,
    width: f32,
    height: f32,
}

impl DriftField {
    /// Creates an empty drift field for a viewport of `width` x `height` pixels.
    ///
    /// The pile has one column per pixel, like [`HeightField::new`].
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            flakes: Vec::with_capacity(64),
            pile: vec![0.0; HeightField::columns_for(width)],
            width,
            height,
        }
    }

    /// Adapts to a new viewport size.
    ///
    /// A change in column count zeroes the pile and drops every flake in
    /// flight; otherwise only the stored size changes.
    ///
    /// ### Returns
    /// `true` if the field was reset.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.width = width;
        self.height = height;

        let n = HeightField::columns_for(width);
        if self.pile.len() == n {
            return false;
        }

        log::debug!("drift field resized {} -> {} columns, resetting", self.pile.len(), n);
        self.pile = vec![0.0; n];
        self.flakes.clear();
        true
    }

    /// Drops all flakes and zeroes the pile.
    pub fn clear(&mut self) {
        self.flakes.clear();
        self.pile.fill(0.0);
    }

    /// Viewport height in pixels; the pile grows up from this edge.
    #[inline]
    pub fn viewport_height(&self) -> f32 {
        self.height
    }

    /// Advances every flake by one tick.
    ///
    /// `cfg` is expected to have passed [`DriftConfig::validate`]; a
    /// `spawn_chance` outside `[0, 1]` is clamped and NaN never spawns.
    ///
    /// 1. With probability `cfg.spawn_chance`, one new flake is spawned.
    /// 2. Every flake falls by `cfg.fall_speed`.
    /// 3. A flake at or below the pile surface of its column deposits
    ///    `cfg.acc_rate * radius` there and is removed. Column heights
    ///    never exceed the viewport height.
    ///
    /// ### Returns
    /// The number of flakes that landed this tick.
    pub fn advance(&mut self, cfg: &DriftConfig, rng: &mut impl Rng) -> usize {
        let spawn_chance = if cfg.spawn_chance.is_nan() {
            0.0
        } else {
            cfg.spawn_chance.clamp(0.0, 1.0)
        };
        if rng.random_bool(f64::from(spawn_chance)) {
            self.flakes.push(Flake::random(self.width, rng));
        }

        let mut landed = 0;
        let mut i = self.flakes.len();
        while i > 0 {
            i -= 1;
            self.flakes[i].pos.y += cfg.fall_speed;
            let flake = self.flakes[i];
            let col = column_index(flake.pos.x, self.pile.len());
            if flake.pos.y >= self.height - self.pile[col] {
                let h = &mut self.pile[col];
                *h = (*h + cfg.acc_rate * flake.radius).min(self.height);
                self.flakes.swap_remove(i);
                landed += 1;
            }
        }
        landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn zero_spawn_chance_never_spawns() {
        let mut drift = DriftField::new(50.0, 100.0);
        let cfg = DriftConfig {
            spawn_chance: 0.0,
            ..DriftConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            drift.advance(&cfg, &mut rng);
        }
        assert!(drift.flakes.is_empty());
        assert!(drift.pile.iter().all(|&h| h == 0.0));
    }

    #[test]
    fn certain_spawn_creates_flake_above_viewport() {
        let mut drift = DriftField::new(50.0, 100.0);
        let cfg = DriftConfig {
            spawn_chance: 1.0,
            ..DriftConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(2);

        drift.advance(&cfg, &mut rng);

        assert_eq!(drift.flakes.len(), 1);
        let f = drift.flakes[0];
        assert_eq!(f.pos.y, SPAWN_Y + cfg.fall_speed);
        assert!(f.pos.x >= 0.0 && f.pos.x < 50.0);
        assert!(f.radius >= MIN_RADIUS && f.radius < MIN_RADIUS + RADIUS_SPREAD);
    }

    #[test]
    fn landing_flake_deposits_into_its_column() {
        let mut drift = DriftField::new(10.0, 20.0);
        let cfg = DriftConfig {
            fall_speed: 1.0,
            acc_rate: 0.5,
            spawn_chance: 0.0,
        };
        drift.pile[4] = 2.0;
        drift.flakes.push(Flake {
            pos: Vec2::new(4.5, 17.5),
            radius: 2.0,
        });
        drift.flakes.push(Flake {
            pos: Vec2::new(7.0, 0.0),
            radius: 2.0,
        });
        let mut rng = StdRng::seed_from_u64(3);

        // The first flake passes the surface at y = 20 - 2 and lands.
        let landed = drift.advance(&cfg, &mut rng);

        assert_eq!(landed, 1);
        assert_eq!(drift.pile[4], 3.0);
        assert_eq!(drift.flakes.len(), 1);
        assert_eq!(drift.flakes[0].pos, Vec2::new(7.0, 1.0));
    }

    #[test]
    fn flake_at_right_edge_lands_in_last_column() {
        let mut drift = DriftField::new(10.5, 20.0);
        let cfg = DriftConfig {
            fall_speed: 1.0,
            acc_rate: 1.0,
            spawn_chance: 0.0,
        };
        drift.flakes.push(Flake {
            pos: Vec2::new(10.4, 19.5),
            radius: 1.5,
        });

        drift.advance(&cfg, &mut StdRng::seed_from_u64(4));
        assert_eq!(drift.pile[9], 1.5);
    }

    #[test]
    fn column_height_is_capped_at_viewport() {
        let mut drift = DriftField::new(4.0, 5.0);
        let cfg = DriftConfig {
            fall_speed: 1.0,
            acc_rate: 10.0,
            spawn_chance: 0.0,
        };
        drift.flakes.push(Flake {
            pos: Vec2::new(1.0, 4.5),
            radius: 3.0,
        });

        drift.advance(&cfg, &mut StdRng::seed_from_u64(5));
        assert_eq!(drift.pile[1], 5.0);
    }

    #[test]
    fn out_of_range_spawn_chance_is_clamped_instead_of_panicking() {
        let mut drift = DriftField::new(50.0, 100.0);
        let mut rng = StdRng::seed_from_u64(6);

        let always = DriftConfig {
            spawn_chance: 3.0,
            ..DriftConfig::default()
        };
        drift.advance(&always, &mut rng);
        assert_eq!(drift.flakes.len(), 1);

        let never = DriftConfig {
            spawn_chance: f32::NAN,
            ..DriftConfig::default()
        };
        let negative = DriftConfig {
            spawn_chance: -1.0,
            ..DriftConfig::default()
        };
        drift.advance(&never, &mut rng);
        drift.advance(&negative, &mut rng);
        assert_eq!(drift.flakes.len(), 1);
    }

    #[test]
    fn resize_to_new_width_drops_flakes_and_pile() {
        let mut drift = DriftField::new(10.0, 20.0);
        drift.pile[2] = 4.0;
        drift.flakes.push(Flake {
            pos: Vec2::new(1.0, 1.0),
            radius: 2.0,
        });

        assert!(!drift.resize(10.0, 30.0));
        assert_eq!(drift.flakes.len(), 1);
        assert_eq!(drift.pile[2], 4.0);

        assert!(drift.resize(20.0, 30.0));
        assert!(drift.flakes.is_empty());
        assert_eq!(drift.pile, vec![0.0; 20]);
    }
}
