pub mod dump;
pub mod plan;
