pub mod mastery;
pub mod scheduler;
