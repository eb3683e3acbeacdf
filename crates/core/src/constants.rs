/// Constants used throughout the textcache codebase
// Storage layout
pub const DEFAULT_ROOT_DIR: &str = "text_cache";
pub const IDENTIFIER_SEPARATOR: &str = "_";

// Shard geometry: three levels of three hex characters each
pub const SHARD_LEVELS: usize = 3;
pub const SHARD_WIDTH: usize = 3;

// Compressed payload framing: `<encoding>|<deflated bytes>`
pub const ENCODING_SEPARATOR: u8 = b'|';
pub const DEFAULT_ENCODING: &str = "UTF-8";

// Environment variable names
pub const TEXTCACHE_ROOT_VAR: &str = "TEXTCACHE_ROOT";
pub const TEXTCACHE_ENV_VAR: &str = "TEXTCACHE_ENV";
pub const TEXTCACHE_BACKEND_VAR: &str = "TEXTCACHE_BACKEND";
pub const TEXTCACHE_COMPRESSION_VAR: &str = "TEXTCACHE_COMPRESSION";
pub const TEXTCACHE_COMPRESSION_LEVEL_VAR: &str = "TEXTCACHE_COMPRESSION_LEVEL";
pub const TEXTCACHE_LOG_VAR: &str = "TEXTCACHE_LOG";

// Deflate levels accepted by the compression layer
pub const MAX_COMPRESSION_LEVEL: u32 = 9;
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;
