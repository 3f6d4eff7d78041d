pub mod age_grade_calculator;
pub mod age_grade_table;
pub mod constants;
pub mod error;
pub mod precision;
pub mod result_ranker;
pub mod structures;
pub mod tabulation;
