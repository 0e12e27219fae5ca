pub mod campaign;
pub mod group;
pub mod target;
