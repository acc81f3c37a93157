//! Configuration and constants for the CLI.

/// Nanoseconds per millisecond, for raw-log duration conversion
pub const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Default number of most expensive predicates to highlight
pub const DEFAULT_TOP_N: usize = 20;

/// Upper bound on the top-N parameter
pub const MAX_TOP_N: usize = 1000;

/// File name of the JSON profile artifact
pub const PROFILE_JSON_FILENAME: &str = "query-evaluation-profile.json";

/// File name of the Mermaid diagram artifact
pub const PROFILE_DIAGRAM_FILENAME: &str = "query-evaluation-profile.md";

// Summary-format marker values
pub const SENTINEL_EMPTY_STRATEGY: &str = "SENTINEL_EMPTY";
pub const CACHE_HIT_STRATEGY: &str = "CACHEHIT";

/// Maximum characters of a predicate name embedded in a diagram label
pub const MAX_LABEL_CHARS: usize = 50;

/// Characters of a malformed record quoted in skip diagnostics
pub const RECORD_EXCERPT_CHARS: usize = 120;
