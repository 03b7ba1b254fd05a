//! Default values for Pedigree configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// File Locations
// ============================================================================

/// Project-local config file name.
pub const DEFAULT_CONFIG_FILE: &str = "pedigree.toml";

/// Directory name under the user's config/data directories.
pub const APP_DIR_NAME: &str = "pedigree";

/// User config file name inside `~/.config/pedigree/`.
pub const USER_CONFIG_FILE: &str = "config.toml";

// ============================================================================
// Record Store Defaults
// ============================================================================

/// Table holding horse records.
pub const DEFAULT_STORE_TABLE: &str = "horses";

/// Object-storage bucket holding horse photos.
pub const DEFAULT_STORE_BUCKET: &str = "horse-photos";

/// Folder inside the bucket where new photos are uploaded.
pub const DEFAULT_PHOTO_PREFIX: &str = "photos";

// ============================================================================
// Lineage Defaults
// ============================================================================

/// Generations materialized in an ancestry tree, root included.
pub const DEFAULT_MAX_DEPTH: usize = 5;

// ============================================================================
// Tree Layout Defaults (pixels in the web viewer)
// ============================================================================

pub const DEFAULT_NODE_WIDTH: f64 = 200.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 72.0;

/// Horizontal space between two generations.
pub const DEFAULT_LEVEL_GAP: f64 = 80.0;

/// Vertical space between two stacked cards.
pub const DEFAULT_SIBLING_GAP: f64 = 20.0;

pub const DEFAULT_MIN_SCALE: f64 = 0.3;
pub const DEFAULT_MAX_SCALE: f64 = 2.5;

// ============================================================================
// Sharing Defaults
// ============================================================================

/// Origin embedded in share links (the `pedigree serve` address).
pub const DEFAULT_SHARE_ORIGIN: &str = "http://localhost:3333";

/// How long a transient notice stays on screen.
pub const DEFAULT_NOTICE_SECONDS: u64 = 3;

// ============================================================================
// Server Defaults
// ============================================================================

pub const DEFAULT_SERVER_PORT: u16 = 3333;

// ============================================================================
// Logging Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file used by the terminal UI.
pub const DEFAULT_LOG_FILE: &str = "pedigree.log";
