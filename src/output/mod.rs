pub mod reporter;
pub mod writer_csv;
pub mod writer_json;

pub use reporter::{format_hit, print_summary};
pub use writer_csv::write_csv;
pub use writer_json::write_json;
