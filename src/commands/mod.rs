pub mod extract;
pub mod grids;
