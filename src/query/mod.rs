//! Query handling for SQLSnap.
//!
//! Request dispatch and SQL pagination rewriting.

pub mod dispatcher;
pub mod pagination;

pub use dispatcher::{Dispatcher, QueryRequest};
pub use pagination::{has_pagination, paginate, strip_terminator, Pagination, PaginationStyle};
