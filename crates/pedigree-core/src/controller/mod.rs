//! View-state controller.
//!
//! Owns the in-memory horse collection, the navigation mode and the
//! registration form. Front ends read state through accessors and change
//! it only through intent methods (`select_horse`, `request_add`,
//! `request_tree`, `go_back`, `submit`, ...).
//!
//! ```text
//!   List ──select──▶ Details ──tree──▶ LineageTree
//!    ▲ │               │  ▲               │
//!    │ └─add─▶ Add     └──┴─────back──────┘
//!    └──back/submit/cancel──┘
//! ```
//!
//! Selecting a horse from any view opens its details.

mod error;
mod view;

pub use error::AddError;
pub use view::{Clipboard, Detail, LoadState, Notice, View};

use std::time::{Duration, Instant};

use crate::config::Config;
use crate::form::{
    parent_candidates, photo_object_name, FormField, HorseForm, ParentRole, PhotoUpload,
};
use crate::horse::{Horse, HorseId, NewHorse};
use crate::lineage::{find_horse, materialize, resolve_parent, ParentLink, TreeNode};
use crate::share::{share_url, StartupQuery};
use crate::store::RecordStore;

/// Application state plus the store it writes through.
pub struct Controller<S> {
    store: S,
    horses: Vec<Horse>,
    view: View,
    shared: bool,
    load_state: LoadState,
    form: HorseForm,
    submit_error: Option<String>,
    notice: Option<Notice>,
    max_depth: usize,
    photo_prefix: String,
    notice_ttl: Duration,
}

impl<S: RecordStore> Controller<S> {
    /// Create a controller; the startup query picks the first view.
    ///
    /// An `id` opens that horse's details, flagged as shared when
    /// `shared=true` came with it. Without an `id` the list is shown.
    pub fn new(store: S, config: &Config, query: StartupQuery) -> Self {
        let (view, shared) = match query.id {
            Some(id) => (View::Details(id), query.shared),
            None => (View::List, false),
        };

        Self {
            store,
            horses: Vec::new(),
            view,
            shared,
            load_state: LoadState::Pending,
            form: HorseForm::default(),
            submit_error: None,
            notice: None,
            max_depth: config.lineage.max_depth,
            photo_prefix: config.store.photo_prefix.clone(),
            notice_ttl: config.share.notice_ttl(),
        }
    }

    // =========================================================================
    // Read Access
    // =========================================================================

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn horses(&self) -> &[Horse] {
        &self.horses
    }

    /// Whether the current view came from a share link (read-only).
    pub fn is_shared(&self) -> bool {
        self.shared
    }

    /// Mutations are hidden in shared views.
    pub fn can_mutate(&self) -> bool {
        !self.shared
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn form(&self) -> &HorseForm {
        &self.form
    }

    /// Message from the last failed submission, if the form is still open.
    pub fn submit_error(&self) -> Option<&str> {
        self.submit_error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The horse behind the details or tree view.
    pub fn detail(&self) -> Option<Detail<'_>> {
        let id = self.view.horse_id()?;
        Some(match find_horse(&self.horses, id) {
            Some(horse) => Detail::Found(horse),
            None => Detail::NotFound(id),
        })
    }

    /// Ancestry tree of the current horse; `None` when it cannot be found.
    pub fn lineage(&self) -> Option<TreeNode> {
        let id = self.view.horse_id()?;
        materialize(find_horse(&self.horses, id), &self.horses, self.max_depth)
    }

    /// Resolved father and mother of `horse`.
    pub fn parents<'a>(&'a self, horse: &Horse) -> (ParentLink<'a>, ParentLink<'a>) {
        (
            resolve_parent(&self.horses, horse.father_id.as_ref()),
            resolve_parent(&self.horses, horse.mother_id.as_ref()),
        )
    }

    /// Horses offered for a parent slot in the form.
    pub fn parent_candidates(&self, role: ParentRole) -> Vec<&Horse> {
        parent_candidates(&self.horses, role)
    }

    // =========================================================================
    // Navigation Intents
    // =========================================================================

    /// Open the details of a horse (from the list or a tree node).
    pub fn select_horse(&mut self, id: HorseId) {
        tracing::debug!("Selecting horse {}", id);
        self.view = View::Details(id);
    }

    /// Open the registration form. Ignored outside the list and in shared views.
    pub fn request_add(&mut self) {
        if self.shared || self.view != View::List {
            tracing::debug!("Ignoring add request in {:?}", self.view);
            return;
        }
        self.submit_error = None;
        self.view = View::Add;
    }

    /// Show the ancestry of the horse in the details view.
    pub fn request_tree(&mut self) {
        if let View::Details(id) = &self.view {
            self.view = View::LineageTree(id.clone());
        }
    }

    /// Step back one level. Leaving the details view ends a shared view.
    pub fn go_back(&mut self) {
        match &self.view {
            View::List => {}
            View::Details(_) => {
                self.shared = false;
                self.view = View::List;
            }
            View::LineageTree(id) => self.view = View::Details(id.clone()),
            View::Add => self.cancel_add(),
        }
    }

    /// Leave the registration form, discarding its input.
    pub fn cancel_add(&mut self) {
        if self.view == View::Add {
            self.form = HorseForm::default();
            self.submit_error = None;
            self.view = View::List;
        }
    }

    // =========================================================================
    // Form Intents
    // =========================================================================

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value.into());
    }

    /// Pick a parent; `None` is the "none registered" choice.
    pub fn set_parent(&mut self, role: ParentRole, id: Option<HorseId>) {
        let value = id.map(|id| id.as_str().to_string()).unwrap_or_default();
        self.form.set(role.field(), value);
    }

    pub fn attach_photo(&mut self, photo: PhotoUpload) {
        self.form.photo = Some(photo);
    }

    pub fn clear_photo(&mut self) {
        self.form.photo = None;
    }

    // =========================================================================
    // Store Operations
    // =========================================================================

    /// Replace the collection with a fresh read from the store.
    ///
    /// A failure keeps the previous collection and leaves a retryable
    /// [`LoadState::Failed`].
    pub async fn fetch_all(&mut self) -> &LoadState {
        match self.store.fetch_all().await {
            Ok(horses) => {
                tracing::info!("Loaded {} horses", horses.len());
                self.horses = horses;
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!("Failed to load horses: {}", e);
                self.load_state = LoadState::Failed {
                    message: e.to_string(),
                };
            }
        }
        &self.load_state
    }

    /// User-triggered re-run of [`Controller::fetch_all`].
    pub async fn retry(&mut self) -> &LoadState {
        self.fetch_all().await
    }

    /// Validate the form and register the horse it describes.
    pub async fn submit(&mut self) -> Result<HorseId, AddError> {
        if self.view != View::Add {
            return Err(AddError::NotEditing);
        }

        let horse = match self.form.validate() {
            Ok(horse) => horse,
            Err(e) => return Err(self.fail_add(AddError::Invalid(e))),
        };
        let photo = self.form.photo.clone();

        self.add_horse(horse, photo.as_ref()).await
    }

    /// Upload the optional photo, then insert the record.
    ///
    /// On success the stored record is appended to the collection (no
    /// re-fetch) and the list is shown. On failure the view and form stay
    /// as they are and the error is kept for display.
    pub async fn add_horse(
        &mut self,
        mut horse: NewHorse,
        photo: Option<&PhotoUpload>,
    ) -> Result<HorseId, AddError> {
        if let Some(photo) = photo {
            match self.upload_photo(photo).await {
                Ok(url) => horse.photo_url = Some(url),
                Err(e) => return Err(self.fail_add(e)),
            }
        }

        match self.store.insert(&horse).await {
            Ok(created) => {
                tracing::info!("Registered horse {} ({})", created.name, created.id);
                let id = created.id.clone();
                self.horses.push(created);
                self.form = HorseForm::default();
                self.submit_error = None;
                self.view = View::List;
                Ok(id)
            }
            Err(e) => {
                if let Some(url) = &horse.photo_url {
                    tracing::warn!("Insert failed; uploaded photo left in place at {}", url);
                }
                Err(self.fail_add(AddError::Insert(e)))
            }
        }
    }

    async fn upload_photo(&self, photo: &PhotoUpload) -> Result<String, AddError> {
        let path = photo_object_name(&photo.file_name, &self.photo_prefix);

        self.store
            .upload(&path, photo.bytes.clone(), photo.content_type())
            .await
            .map_err(AddError::Upload)?;

        match self.store.public_url(&path).await {
            Ok(Some(url)) if !url.trim().is_empty() => Ok(url),
            Ok(_) => Err(AddError::MissingPublicUrl(path)),
            Err(e) => Err(AddError::Upload(e)),
        }
    }

    fn fail_add(&mut self, error: AddError) -> AddError {
        tracing::warn!("Registration failed: {}", error);
        self.submit_error = Some(error.to_string());
        error
    }

    // =========================================================================
    // Sharing
    // =========================================================================

    /// Build the share link for the horse in the details view and try to
    /// copy it. Returns the link, or `None` outside the details view.
    ///
    /// If copying fails the notice carries the link for manual copying.
    pub fn share(
        &mut self,
        origin: &str,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> Option<String> {
        let View::Details(id) = &self.view else {
            return None;
        };
        let link = share_url(origin, id);

        let notice = match clipboard.copy(&link) {
            Ok(()) => Notice {
                message: "Link copied to clipboard".to_string(),
                link: None,
                expires_at: now + self.notice_ttl,
            },
            Err(e) => {
                tracing::debug!("Clipboard unavailable: {}", e);
                Notice {
                    message: "Could not copy automatically; copy this link:".to_string(),
                    link: Some(link.clone()),
                    expires_at: now + self.notice_ttl,
                }
            }
        };

        self.notice = Some(notice);
        Some(link)
    }

    /// Dismiss an expired notice.
    pub fn tick(&mut self, now: Instant) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }
}
