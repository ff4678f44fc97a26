pub mod backups;
pub mod errors;
pub mod tables;
