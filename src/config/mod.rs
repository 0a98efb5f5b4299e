//! Command-line configuration.

mod args;
mod duration;
mod plan;

pub use args::ImportArgs;
pub use duration::{parse_duration, MAX_DURATION};
pub use plan::{split_list, ImportPlan};
