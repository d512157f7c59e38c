//! The height-field simulator: explicit state plus one `advance` per tick.

use rand::Rng;

use crate::{config::PileConfig, height_field::HeightField, phases, types::Pointer};

/// What happened during one [`Simulator::advance`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Amount added to each target column by growth.
    pub grown: f32,
    /// Whether the pointer melt was applied.
    pub melted: bool,
}

/// Owns the snow pile and advances it once per tick.
///
/// The configuration is fixed for the duration of a tick. Callers may
/// swap it between ticks with [`Simulator::set_config`], which re-clamps
/// the field so the height invariant keeps holding.
///
/// ### Fields
/// - `field` - The [`HeightField`] (pile, target, scratch) sized to the viewport.
/// - `cfg` - Pile parameters; expected to have passed [`PileConfig::validate`].
/// - `pointer` - Latest [`Pointer`] sample, overwritten by input handlers
///   between ticks and read by the melt pass at the start of each tick.
#[derive(Debug, Clone)]
pub struct Simulator {
    field: HeightField,
    cfg: PileConfig,
    pointer: Pointer,
}

impl Simulator {
    /// Creates a zero-filled simulator for a viewport of `width` x `height` pixels.
    ///
    /// `cfg` should come from [`crate::config::Config::load`] or have passed
    /// [`PileConfig::validate`]; a zero `melt_radius`, for example, makes
    /// the melt falloff undefined.
    pub fn new(cfg: PileConfig, width: f32, height: f32) -> Self {
        Self {
            field: HeightField::new(width, height),
            cfg,
            pointer: Pointer::absent(),
        }
    }

    /// Parameters used by the next tick.
    pub fn config(&self) -> &PileConfig {
        &self.cfg
    }

    /// Replaces the configuration between ticks.
    ///
    /// History is kept, but both pile and target are capped at the new
    /// `max_height` right away, so lowering it never leaves columns above
    /// the limit while the pile eases down.
    pub fn set_config(&mut self, cfg: PileConfig) {
        if cfg.max_height < self.cfg.max_height {
            log::debug!("max height lowered to {}, clamping field", cfg.max_height);
        }
        self.cfg = cfg;
        self.field.clamp_to(cfg.max_height);
    }

    /// Current pile and target heights, read by the renderer.
    pub fn field(&self) -> &HeightField {
        &self.field
    }

    /// Pointer sample the next melt pass will use.
    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    /// Stores the latest pointer sample for the next tick.
    pub fn set_pointer(&mut self, pointer: Pointer) {
        self.pointer = pointer;
    }

    /// Marks the pointer as gone (mouse leave or touch end).
    pub fn clear_pointer(&mut self) {
        self.pointer = Pointer::absent();
    }

    /// Adapts to a new viewport size.
    ///
    /// A change in column count is a full reset of the dynamics; see
    /// [`HeightField::resize`].
    ///
    /// ### Returns
    /// `true` if the field was reset.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        self.field.resize(width, height)
    }

    /// Zeroes the pile and target without changing the viewport.
    pub fn reset(&mut self) {
        self.field.clear();
    }

    /// Advances the simulation by a single tick.
    ///
    /// The tick consists of:
    /// 1. [`phases::growth_phase`]
    /// 2. [`phases::melt_phase`] with the latest pointer sample
    /// 3. [`phases::relax_phase`]
    /// 4. [`phases::smooth_phase`]
    pub fn advance(&mut self, rng: &mut impl Rng) -> TickReport {
        let grown = phases::growth_phase(&mut self.field, &self.cfg, rng);
        let melted = phases::melt_phase(&mut self.field, &self.cfg, &self.pointer);
        phases::relax_phase(&mut self.field, &self.cfg);
        phases::smooth_phase(&mut self.field, &self.cfg);

        TickReport { grown, melted }
    }
}
