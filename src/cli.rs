//! CLI domain: parse, route, output, and presentation only.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{format_routes_text, format_simulation_text};
pub use route::{simulate, FrameRow, RunContext, SimulationReport};
