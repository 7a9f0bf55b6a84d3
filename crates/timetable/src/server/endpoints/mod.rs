pub mod planner;
pub mod status;
