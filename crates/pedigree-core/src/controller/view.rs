use std::time::Instant;

use crate::horse::{Horse, HorseId};

/// Navigation mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Details(HorseId),
    Add,
    LineageTree(HorseId),
}

impl View {
    /// Horse the view is about, if any.
    pub fn horse_id(&self) -> Option<&HorseId> {
        match self {
            Self::Details(id) | Self::LineageTree(id) => Some(id),
            Self::List | Self::Add => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::List => "Horses",
            Self::Details(_) => "Details",
            Self::Add => "Register Horse",
            Self::LineageTree(_) => "Lineage",
        }
    }
}

/// Outcome of the last collection load.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing loaded yet.
    #[default]
    Pending,
    Ready,
    /// The last fetch failed; the user can retry.
    Failed { message: String },
}

/// What the detail view shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detail<'a> {
    Found(&'a Horse),
    /// Deep link to a horse that is missing or not loaded yet.
    NotFound(&'a HorseId),
}

/// A transient message, dismissed once `expires_at` passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Link shown for manual copying when the clipboard was unavailable.
    pub link: Option<String>,
    pub expires_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Best-effort text clipboard.
pub trait Clipboard {
    fn copy(&mut self, text: &str) -> std::io::Result<()>;
}
