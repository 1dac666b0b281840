pub mod file;
pub mod traits;
