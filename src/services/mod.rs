pub mod cases;
pub mod demo_seed;
pub mod metrics;
pub mod repository;
