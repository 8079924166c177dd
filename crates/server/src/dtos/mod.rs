pub mod common;
pub mod params;
pub mod settings;
