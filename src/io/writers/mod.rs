pub mod comparison;
pub mod error_log;

pub use comparison::write_comparison_csv;
pub use error_log::write_error_log;
