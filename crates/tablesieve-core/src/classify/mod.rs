pub mod engine;
pub mod outcome;

pub use engine::{is_valid_table, TableClassifier};
pub use outcome::{Rejection, Verdict};
