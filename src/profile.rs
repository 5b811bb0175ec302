//! Level-based profile formulas
//!
//! Pool maxima grow linearly with level; the experience needed to reach
//! a level grows quadratically.

/// Health gained per level
pub const HP_PER_LVL: f64 = 50.0;
/// Stamina gained per level
pub const SP_PER_LVL: f64 = 50.0;
/// Chakra gained per level
pub const CP_PER_LVL: f64 = 50.0;

/// Total experience required to reach `level`
pub fn calc_level_requirements(level: u32) -> u64 {
    (1..=u64::from(level)).map(|l| 500 + (l - 1) * 500).sum()
}

/// Maximum health at `level`
pub fn calc_hp(level: u32) -> f64 {
    100.0 + HP_PER_LVL * (f64::from(level) - 1.0)
}

/// Maximum stamina at `level`
pub fn calc_sp(level: u32) -> f64 {
    100.0 + SP_PER_LVL * (f64::from(level) - 1.0)
}

/// Maximum chakra at `level`
pub fn calc_cp(level: u32) -> f64 {
    100.0 + CP_PER_LVL * (f64::from(level) - 1.0)
}
