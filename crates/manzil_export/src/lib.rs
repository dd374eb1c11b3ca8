//! Output formats for detected lunar station crossings.
//!
//! Writers emit events in the order given and never re-sort. Instants are
//! rendered in the caller's IANA timezone for tabular output and in UTC
//! for calendar entries.

pub mod csv_out;
pub mod error;
pub mod ics;
pub mod options;
pub mod preview;

pub use csv_out::write_csv;
pub use error::ExportError;
pub use ics::write_ics;
pub use options::{ExportOptions, LOCAL_TIME_FORMAT};
pub use preview::{PreviewRow, PreviewTable, preview_rows};
