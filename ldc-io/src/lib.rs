//! Image and configuration I/O for lens distortion correction

pub mod config;
pub mod error;
pub mod image;
pub mod remap;

pub use config::DemoConfig;
pub use error::{IoError, Result};
pub use crate::image::{Rect, draw_rect, load_rgb, save_rgb};
pub use remap::remap_image;
