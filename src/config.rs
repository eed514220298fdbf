/// Number of processed entries per transactional batch
pub const BATCH_SIZE: usize = 10_000;

/// Progress update interval (tick every N input lines)
pub const PROGRESS_INTERVAL: u64 = 1_000;

/// Default output database filename
pub const DEFAULT_OUTPUT: &str = "dictionary.db";
