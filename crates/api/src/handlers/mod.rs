pub mod category;
pub mod dashboard;
pub mod planting_log;
pub mod species;
pub mod variety;
