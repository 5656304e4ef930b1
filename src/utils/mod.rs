pub mod command;
pub mod pg_tools;

pub use command::{CommandRunner, Invocation, SystemRunner};
