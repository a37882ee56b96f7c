pub mod delivery;
pub mod scheduler;
