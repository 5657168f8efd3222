pub mod bundle;
pub mod iconset;
pub mod render;
