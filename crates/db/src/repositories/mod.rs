//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod planting_log_repo;
pub mod species_repo;
pub mod variety_repo;

pub use category_repo::CategoryRepo;
pub use planting_log_repo::PlantingLogRepo;
pub use species_repo::SpeciesRepo;
pub use variety_repo::VarietyRepo;
