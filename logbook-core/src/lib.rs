pub mod config;
pub mod date;
pub mod error;
pub mod exercise;
pub mod markdown;
pub mod merge;
pub mod models;
pub mod parse;
pub mod render;

pub use config::{LogbookConfig, OutputFormat};
pub use error::LogbookError;
pub use exercise::parse_exercise;
pub use merge::{merge, merge_with, MergeOptions};
pub use parse::{parse, parse_week_log};
pub use render::{render_json, render_markdown, RenderOptions};
