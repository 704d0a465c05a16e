pub mod chunk_plan;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod language;
pub mod pipeline;
pub mod postprocess;
pub mod render;
pub mod report;
pub mod session;
pub mod util;
