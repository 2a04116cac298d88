pub mod raw;
pub mod normalize;
pub mod loader;
