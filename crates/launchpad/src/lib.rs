pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod media;
pub mod profiles;
pub mod telemetry;
pub mod workflows;

#[cfg(test)]
pub(crate) mod testing;
