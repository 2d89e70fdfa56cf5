//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use masal_core::{AgeGroup, Gender};
use std::path::PathBuf;

/// Masal - illustrated, narrated children's stories
#[derive(Parser, Debug)]
#[command(name = "masal")]
#[command(about = "Illustrated, narrated children's stories", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Storage file holding quota and promo state
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Configuration file to load instead of the default locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write, illustrate and narrate a story
    Generate(GenerateArgs),

    /// Show remaining stories and when the quota resets
    Quota,

    /// Redeem a promo code for one extra story
    Promo {
        /// The promo code
        code: String,
    },
}

/// Story request and output options
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Name of the child who becomes the hero
    #[arg(long)]
    pub name: String,

    /// Age group: 3-5, 6-8 or 9+
    #[arg(long)]
    pub age: AgeGroup,

    /// Gender of the hero: girl, boy or unspecified
    #[arg(long, default_value = "unspecified")]
    pub gender: Gender,

    /// Theme of the adventure
    #[arg(long)]
    pub theme: String,

    /// Lesson the story should carry
    #[arg(long, default_value = "")]
    pub advice: String,

    /// Hair color of the hero
    #[arg(long)]
    pub hair: Option<String>,

    /// Eye color of the hero
    #[arg(long)]
    pub eye: Option<String>,

    /// Directory the story is written to
    #[arg(long, default_value = "masal-story")]
    pub out: PathBuf,

    /// Rate limit tier from the configuration
    #[arg(long)]
    pub tier: Option<String>,
}
