pub mod concat;
pub mod system;
