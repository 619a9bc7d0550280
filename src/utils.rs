pub use {chrono, csv, derive_more, yaml_rust};

pub mod constants;
pub mod queue;
