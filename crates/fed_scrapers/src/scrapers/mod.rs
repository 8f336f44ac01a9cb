pub mod federal_reserve;

pub use federal_reserve::{Pipeline, RunSummary};
