pub mod approval;
pub mod registration;
