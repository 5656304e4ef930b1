pub(crate) mod dump_cache;

pub use dump_cache::{DumpCache, DEFAULT_DUMP_ROOT};
