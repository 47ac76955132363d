pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod measure;
pub mod musicxml;
pub mod notation;

pub use api::{export_musicxml, generate, generate_builtin, generate_seeded};
pub use config::{BalancePolicy, DifficultyConfig, DifficultyRegistry, DifficultyTag, DurationWeight};
pub use error::*;
pub use generator::BeatRequest;
pub use measure::*;
pub use musicxml::to_musicxml;
pub use notation::{layout, layout_beat, DisplayUnit};
