pub mod drill;
pub mod result;
pub mod tally;
