use palette::Srgba;

pub mod model;

pub use model::{RadialMenu, SectorVisual};

pub const BASE_SCALE: f64 = 1.0;
pub const HIGHLIGHT_SCALE: f64 = 1.1;

pub fn base_tint() -> Srgba<f64> {
    Srgba::new(1.0, 1.0, 1.0, 1.0)
}

pub fn highlight_tint() -> Srgba<f64> {
    Srgba::new(1.0, 0.92, 0.016, 1.0)
}
