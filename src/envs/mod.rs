pub mod grid_world;
pub mod slippery_chain;
