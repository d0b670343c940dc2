pub mod owner;
pub mod profile;
pub mod stats;
