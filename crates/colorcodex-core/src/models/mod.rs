//! Data models for ColorCodex

mod color;

pub use color::{is_valid_color_code, random_color_code, ColorId, ColorRecord, NewColor};
