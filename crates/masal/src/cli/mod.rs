//! Command-line interface module.

mod commands;
mod generate;
mod quota;

pub use commands::{Cli, Commands, GenerateArgs};
pub use generate::generate_story;
pub use quota::{redeem_promo, show_quota};
