//! Core library for Pedigree: horse records, ancestry resolution, tree
//! layout, the registration form and the view-state controller that ties
//! them to a hosted record store.

pub mod config;
pub mod controller;
pub mod form;
pub mod horse;
pub mod layout;
pub mod lineage;
pub mod share;
pub mod store;

pub use config::{
    Config, ConfigError, LineageConfig, LogConfig, ServerConfig, ShareConfig, StoreConfig,
};
pub use controller::{AddError, Clipboard, Controller, Detail, LoadState, Notice, View};
pub use form::{FormError, FormField, HorseForm, ParentRole, PhotoPreview, PhotoUpload};
pub use horse::{Horse, HorseId, NewHorse, RecordError, Sex};
pub use layout::{LayoutConfig, TreeLayout, Viewport};
pub use lineage::{materialize, ParentLink, TreeNode, DEFAULT_MAX_DEPTH};
pub use share::{page_link, share_url, StartupQuery};
pub use store::{RecordStore, StoreError, SupabaseStore};
