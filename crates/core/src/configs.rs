pub mod deploy;
pub mod stages;
pub mod tasks;
