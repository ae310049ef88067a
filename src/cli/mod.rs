mod commands;
mod handlers;

pub use commands::{Cli, ConvertArgs};
pub use handlers::handle_convert;
