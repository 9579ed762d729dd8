// Single source of truth for all default values.

// --- Interval ---
pub const DEFAULT_TARGET_INTERVAL_MS: u64 = 1_000;

// --- Debounce ---
pub const DEFAULT_DEBOUNCE_DELAY_MS: u64 = 250;
pub const DEFAULT_FLUSH_ON_DROP: bool = true;

// --- Tracing ---
pub const DEFAULT_LOG_FILTER: &str = "cadence=info";
pub const LOG_ENV_VAR: &str = "CADENCE_LOG";

// --- Files ---
pub const PROJECT_CONFIG_FILENAME: &str = "cadence.toml";
