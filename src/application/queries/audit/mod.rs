mod export;

pub use export::{CSV_HEADERS, EMPTY_CSV_EXPORT, render_csv, render_json};
