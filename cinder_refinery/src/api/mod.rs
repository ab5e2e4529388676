pub mod grouped;
pub mod map;
pub mod reduce;
