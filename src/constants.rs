//! Global constants used throughout the facade codebase.
//!
//! File names, default tags and the few magic strings that the emitted
//! bootstrap block and the deployment layout agree on.

/// Default shrinkwrap file name, relative to the project root.
pub const DEFAULT_LOCKFILE: &str = "shrinkwrap.json";

/// Default package descriptor file name, relative to the project root.
pub const DEFAULT_PACKAGE_FILE: &str = "package.json";

/// Project configuration file name.
pub const CONFIG_FILE: &str = "facade.toml";

/// Per package-version content hash manifest, under `<root>/<name>/<version>/`.
pub const HASH_MANIFEST_FILE: &str = "md5.json";

/// Extension appended to module sub-paths and used for default entry files.
pub const DEFAULT_MODULE_EXTENSION: &str = ".js";

/// Tags that mean "any installed version" unless configured otherwise.
pub const DEFAULT_WILDCARD_TAGS: &[&str] = &["*", "latest"];

/// Prefix of the combined pseudo-path served by the concat endpoint.
pub const COMBO_PREFIX: &str = "/concat/";

/// Replaces `/` inside each combo constituent.
pub const COMBO_SEPARATOR: &str = "~";

/// Joins combo constituents.
pub const COMBO_JOINER: &str = ",";

/// Substituted for the first digit of a hash-sharded host; the client loader
/// swaps it for a host-pool index.
pub const HOST_PLACEHOLDER: &str = "{n}";

/// Global object exposed by the client-side loader.
pub const LOADER_GLOBAL: &str = "neuron";

/// Environment variable that toggles content-hash cache-busting.
pub const CACHE_BUSTING_ENV: &str = "FACADE_CACHE_BUSTING";

/// Upper bound on lock graph traversal depth.
///
/// Matches the deepest graph a shrinkwrap file can express: each level nests
/// two JSON objects and `serde_json` stops at 127 nested values, so
/// [`LockGraph::load`](crate::lockfile::LockGraph::load) rejects deeper files
/// with a parse error. Graphs built in code are truncated here.
pub const MAX_GRAPH_DEPTH: usize = 63;

/// Format used by the `timestr` directive.
pub const TIMESTR_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
