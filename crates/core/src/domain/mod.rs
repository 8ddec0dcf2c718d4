pub mod decision;
pub mod query;
