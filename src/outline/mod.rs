pub mod builder;

pub use builder::{build_outline, child_weight};
