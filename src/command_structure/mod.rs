pub mod command_trait;
pub mod logging_args;
