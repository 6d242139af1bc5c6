pub mod baked;
pub mod flat;
pub mod unlit;
