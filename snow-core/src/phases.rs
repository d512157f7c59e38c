//! Per-tick passes of the height-field snow pile.
//!
//! A tick runs the passes in this order:
//! 1. [`growth_phase`] — every target column accretes the same jittered
//!    amount, capped at `max_height`.
//! 2. [`melt_phase`] — target columns near the pointer are lowered with a
//!    radial falloff, provided the pointer is close to the surface.
//! 3. [`relax_phase`] — the rendered pile eases toward the target.
//! 4. [`smooth_phase`] — a few rounds of 3-point diffusion over the pile,
//!    with the first and last column pinned.
//!
//! Melt reads the *current* pile to locate the surface, so it must run
//! before relaxation moves the pile for this tick.

use rand::Rng;

use crate::{config::PileConfig, height_field::HeightField, types::Pointer};

/// Raises every target column by one jittered amount.
///
/// Draws a single `U` in `[0, 1)` for the whole tick and adds
/// `grow_rate * (0.8 + 0.4 * U)` to each target column, clamping at
/// `cfg.max_height`. Using one draw per tick keeps the surface coherent
/// instead of speckled.
///
/// ### Parameters
/// - `field` - Height field whose `target` is raised.
/// - `cfg` - Pile configuration providing `grow_rate` and `max_height`.
/// - `rng` - Random source for the per-tick jitter.
///
/// ### Returns
/// The amount added this tick (before clamping).
pub fn growth_phase(field: &mut HeightField, cfg: &PileConfig, rng: &mut impl Rng) -> f32 {
    let u: f32 = rng.random();
    let add = cfg.grow_rate * (0.8 + 0.4 * u);

    for t in &mut field.target {
        *t = (*t + add).min(cfg.max_height);
    }
    add
}

/// Lowers target columns around the pointer.
///
/// Nothing happens unless the pointer is inside the canvas with known
/// coordinates. Otherwise:
///
/// 1. The pointer x is clamped to a column `xi` and the surface y at that
///    column is computed from the current pile.
/// 2. If the pointer is more than `cfg.melt_band` pixels above or below
///    that surface, the pass is skipped.
/// 3. Every column within `cfg.melt_radius` of the pointer loses
///    `melt_strength * falloff * max_height`, floored at zero, where
///    `falloff = (1 - min(1, |dx| / melt_radius)) ^ melt_falloff`.
///
/// ### Returns
/// `true` if the melt was applied.
pub fn melt_phase(field: &mut HeightField, cfg: &PileConfig, pointer: &Pointer) -> bool {
    let Some(pos) = pointer.active_pos() else {
        return false;
    };
    if field.is_empty() {
        return false;
    }

    let xi = field.column_at(pos.x);
    let surface_y = field.surface_y(xi, cfg.base_thickness);
    if (pos.y - surface_y).abs() > cfg.melt_band {
        return false;
    }

    let last = field.len() - 1;
    let left = (pos.x - cfg.melt_radius).floor().max(0.0) as usize;
    let right = ((pos.x + cfg.melt_radius).ceil().max(0.0) as usize).min(last);
    let amount = cfg.melt_strength * cfg.max_height;

    for x in left..=right {
        let dx = x as f32 - pos.x;
        let t = (dx.abs() / cfg.melt_radius).min(1.0);
        let falloff = (1.0 - t).powf(cfg.melt_falloff);
        let target = &mut field.target[x];
        *target = (*target - amount * falloff).max(0.0);
    }
    true
}

/// Moves each pile column a fixed fraction of the way to its target.
///
/// With `cfg.ease == 1.0` the pile snaps to the target exactly.
pub fn relax_phase(field: &mut HeightField, cfg: &PileConfig) {
    for (p, &t) in field.pile.iter_mut().zip(&field.target) {
        *p += (t - *p) * cfg.ease;
    }
}

/// Applies `cfg.smooth_passes` rounds of `(left + 2 * center + right) / 4`.
///
/// The first and last columns act as pinned endpoints and keep their
/// values. Fields shorter than three columns have no interior and are
/// left untouched.
pub fn smooth_phase(field: &mut HeightField, cfg: &PileConfig) {
    let n = field.pile.len();
    if n < 3 {
        return;
    }

    let HeightField { pile, scratch, .. } = field;
    for _ in 0..cfg.smooth_passes {
        scratch[0] = pile[0];
        scratch[n - 1] = pile[n - 1];
        for i in 1..n - 1 {
            scratch[i] = (pile[i - 1] + pile[i] * 2.0 + pile[i + 1]) / 4.0;
        }
        pile.copy_from_slice(scratch);
    }
}
