pub mod error;
pub mod regression;
pub mod training_set;
