pub mod analysis;
pub mod candidate;
