pub mod validation;

pub use validation::parse_score_value;
