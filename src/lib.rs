pub mod command_structure;
pub mod config;
pub mod restore;
pub mod result;
