pub mod headers;
pub mod number;
pub mod reader;

pub use headers::{CanonicalField, HeaderMapping, HeaderResolution};
pub use number::{parse_date, parse_decimal};
pub use reader::{read_vendor_quotes, IngestIssue, IngestReport};
