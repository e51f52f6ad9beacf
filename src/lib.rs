pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod normalize;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod stats;
pub mod utility;
