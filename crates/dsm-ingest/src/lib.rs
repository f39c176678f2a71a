pub mod bulk;
pub mod dedupe;
pub mod delimited;

pub use bulk::{bulk_import, parse_bulk};
pub use dedupe::dedupe_codes;
pub use delimited::{ImportError, delimited_import, parse_delimited};
