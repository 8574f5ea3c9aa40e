//! The grid model's closed error surface. The parser crate never fails;
//! everything here belongs to the page/history/screen layer instead.

#[derive(Debug, thiserror::Error, Eq, PartialEq)]
pub enum Error {
    /// An allocation needed to grow a page, line, or history failed.
    /// Rust's global allocator aborts the process rather than returning
    /// control on allocation failure, so nothing in this crate can
    /// actually construct this variant today; it's kept so a consumer
    /// matching on `Error` doesn't need changing if a fallible allocator
    /// is ever plugged in underneath.
    #[error("out of memory")]
    OutOfMemory,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
