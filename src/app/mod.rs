// Presentation layer: console front end over the order session.

pub mod console;
pub mod table;

pub use console::{parse_command, Command, Console, Reply};
