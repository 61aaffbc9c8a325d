//! Evaluate composable filter trees against dynamically typed records.
//!
//! ```
//! use recq::{filter_records, Filter, NumberOp, Record, StringOp, Value};
//!
//! let records: Vec<Record> = vec![
//!     [("name", Value::from("Alexandra")), ("score", Value::from(12.0))].into_iter().collect(),
//!     [("name", Value::from("Bob")), ("score", Value::from(3.0))].into_iter().collect(),
//! ];
//! let filter = Filter::and(vec![
//!     Filter::string("name", StringOp::StartsWith, "Alex"),
//!     Filter::number("score", NumberOp::Gte, 10.0),
//! ]);
//!
//! assert_eq!(filter_records(&records, &filter).len(), 1);
//! ```

pub mod error;
pub mod filter;
pub mod frontmatter;
pub mod record;
pub mod source;
pub mod values;

pub use error::LoadError;
#[cfg(feature = "parallel")]
pub use filter::filter_records_par;
pub use filter::{
    evaluate, filter_records, filter_records_owned, DateOp, Filter, NumberOp, StringOp,
};
pub use record::{Record, Value};
