mod colors;
mod config;

pub use colors::{parse_color, parse_style, ColorScheme};
pub use config::{Colors, Config, Settings};
