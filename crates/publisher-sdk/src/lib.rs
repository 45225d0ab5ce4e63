// publisher-sdk: Foundation layer for the artifact publisher.
// This crate has ZERO dependencies on other publisher crates and provides
// the tracing seam plus the file and object-key helpers the publisher uses.

pub mod build_constants;
pub mod io_util;
pub mod key_util;
pub mod trace;

// Re-export commonly used items at crate root
pub use build_constants::{PublisherPackage, Source};
pub use io_util::IOUtil;
pub use key_util::KeyUtil;
pub use trace::TraceWriter;
