pub mod ast;
pub mod date;
pub mod eval;

pub use ast::{DateOp, Filter, NumberOp, StringOp};
#[cfg(feature = "parallel")]
pub use eval::filter_records_par;
pub use eval::{evaluate, filter_records, filter_records_owned};
