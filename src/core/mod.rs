pub mod error;
pub mod priority;
pub mod queue;
