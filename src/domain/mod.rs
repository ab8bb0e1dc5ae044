pub mod models;

pub use models::{MapResult, Outcome, ReconciledScore, ResultTier, Side, SideAttribution};
