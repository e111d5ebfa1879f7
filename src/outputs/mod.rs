//! Renderers that present feed outcomes.
//!
//! # Submodules
//!
//! - [`terminal`]: Prints article cards and error panels to stdout
//! - [`json`]: Writes each outcome as a JSON snapshot for other consumers
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── latest.json
//!     └── ai-ml-robots.json
//! ```

pub mod json;
pub mod terminal;
