use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use shared::domain::{
    ProfileField, ProfileRecord, SectionId, StoredUser, UserId, UserRecord,
};
use shared::error::{EditError, ValidationError};
use storage::{load_profile, save_profile, DocumentStore, UserStore};

pub mod editor;
pub mod nav;
pub mod notify;

pub use editor::{EditSession, ProfileEditor};
pub use nav::Nav;
pub use notify::{Notice, NoticeEvent, Notifier, NOTICE_TTL};

/// Document keys for the persisted client state.
pub const PROFILE_DOC_KEY: &str = "profileData";
pub const CURRENT_VIEW_KEY: &str = "currentView";
pub const ACTIVE_TAB_KEY: &str = "activeProfileTab";

/// Persistence failures surfaced at the client boundary. Neither is fatal:
/// reads fall back to defaults, writes leave the already-completed state
/// transition in place.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read from storage: {source}")]
    Read {
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to write to storage: {source}")]
    Write {
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Committed-record summary shown above the tabs. Never reads draft state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileHeader {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Activation context of the draft editing controller: loads the committed
/// record on mount, owns the controller, and performs the fire-and-forget
/// persistence write on commit.
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    notifier: Notifier,
    editor: Mutex<ProfileEditor>,
}

impl ProfileService {
    /// Reads the persisted profile; a missing document means the default
    /// record, and a read failure falls back to the default record as
    /// well. The previously active tab is restored best-effort.
    pub async fn load(store: Arc<dyn DocumentStore>, notifier: Notifier) -> Arc<Self> {
        let committed = match load_profile(&*store, PROFILE_DOC_KEY).await {
            Ok(Some(record)) => record,
            Ok(None) => ProfileRecord::default(),
            Err(err) => {
                warn!("failed to read profile document, using defaults: {err:#}");
                ProfileRecord::default()
            }
        };

        let mut editor = ProfileEditor::new(committed);
        if let Ok(Some(value)) = store.load_document(ACTIVE_TAB_KEY).await {
            if let Some(tab) = value.as_str().and_then(SectionId::parse) {
                let _ = editor.select_tab(tab);
            }
        }

        Arc::new(Self {
            store,
            notifier,
            editor: Mutex::new(editor),
        })
    }

    pub async fn enter_edit(&self, section: SectionId) -> Result<(), EditError> {
        self.editor.lock().await.enter_edit(section)
    }

    pub async fn cancel_edit(&self, section: SectionId) -> Result<(), EditError> {
        self.editor.lock().await.cancel_edit(section)
    }

    pub async fn set_field(
        &self,
        field: ProfileField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        self.editor.lock().await.set_field(field, value)
    }

    pub async fn set_field_external(
        &self,
        external: &str,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        self.editor.lock().await.set_field_external(external, value)
    }

    /// Commits the active draft and schedules the persistence write. The
    /// write is fire-and-forget: the edit session is back in VIEW before
    /// durability is known, and a failed write only produces a notice.
    pub async fn commit(&self, section: SectionId) -> Result<(), EditError> {
        let record = self.editor.lock().await.commit(section)?.clone();

        let store = Arc::clone(&self.store);
        let notifier = self.notifier.clone();
        tokio::spawn(async move {
            match save_profile(&*store, PROFILE_DOC_KEY, &record).await {
                Ok(()) => {
                    info!(section = section.as_str(), "profile saved");
                    notifier.notice("Profile saved.");
                }
                Err(err) => {
                    warn!("profile save failed: {err:#}");
                    notifier.notice("Failed to save profile.");
                }
            }
        });

        Ok(())
    }

    /// Switches the visible tab (rejected while a section is being
    /// edited) and persists the choice best-effort.
    pub async fn select_tab(&self, section: SectionId) -> Result<(), EditError> {
        self.editor.lock().await.select_tab(section)?;

        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(err) = store
                .save_document(ACTIVE_TAB_KEY, &json!(section.as_str()))
                .await
            {
                debug!("failed to persist active tab: {err:#}");
            }
        });

        Ok(())
    }

    /// Re-reads the committed record after an external update and applies
    /// the resynchronization rule.
    pub async fn reload(&self) -> Result<(), StoreError> {
        let record = load_profile(&*self.store, PROFILE_DOC_KEY)
            .await
            .map_err(|source| StoreError::Read { source })?
            .unwrap_or_default();
        self.editor.lock().await.resync(record);
        Ok(())
    }

    pub async fn committed(&self) -> ProfileRecord {
        self.editor.lock().await.committed().clone()
    }

    pub async fn visible(&self) -> ProfileRecord {
        self.editor.lock().await.visible().clone()
    }

    pub async fn is_editing(&self, section: SectionId) -> bool {
        self.editor.lock().await.is_editing(section)
    }

    pub async fn active_tab(&self) -> SectionId {
        self.editor.lock().await.active_tab()
    }

    pub async fn header(&self) -> ProfileHeader {
        let editor = self.editor.lock().await;
        let committed = editor.committed();
        let first = some_or(&committed.first_name, "User");
        let last = some_or(&committed.last_name, "Name");
        let phone = if committed.phone.is_empty() {
            String::new()
        } else {
            format!("{} {}", committed.phone_country_code, committed.phone)
        };
        ProfileHeader {
            name: format!("{first} {last}"),
            email: some_or(&committed.email, "email@example.com").to_string(),
            phone,
        }
    }
}

fn some_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// The full user list, re-emitted after every observed change.
    UsersChanged(Vec<StoredUser>),
}

/// Add-user drawer form. Kept server-side of the view so a rejected
/// submission preserves what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub contact: String,
}

/// The user-list screen: a push-updated list plus the add-user drawer.
pub struct Dashboard {
    store: Arc<dyn UserStore>,
    notifier: Notifier,
    events: broadcast::Sender<DashboardEvent>,
    form: Mutex<UserForm>,
}

impl Dashboard {
    pub fn new(store: Arc<dyn UserStore>, notifier: Notifier) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            store,
            notifier,
            events,
            form: Mutex::new(UserForm::default()),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Fetches the user list (ascending by name) and pushes it to
    /// subscribers.
    pub async fn refresh(&self) -> Result<Vec<StoredUser>, StoreError> {
        match self.store.list_users().await {
            Ok(users) => {
                let _ = self.events.send(DashboardEvent::UsersChanged(users.clone()));
                Ok(users)
            }
            Err(source) => {
                warn!("failed to list users: {source:#}");
                self.notifier.notice("Error loading users.");
                Err(StoreError::Read { source })
            }
        }
    }

    pub async fn form(&self) -> UserForm {
        self.form.lock().await.clone()
    }

    pub async fn set_form(&self, form: UserForm) {
        *self.form.lock().await = form;
    }

    /// Closing the drawer discards the form.
    pub async fn close_drawer(&self) {
        *self.form.lock().await = UserForm::default();
    }

    /// Submits the add-user form. Name and e-mail are required; a rejected
    /// submission adds nothing and leaves the form untouched for
    /// correction. Contact defaults to "N/A".
    pub async fn submit(&self) -> Result<UserId, ClientError> {
        let form = self.form.lock().await.clone();
        let name = form.name.trim();
        let email = form.email.trim();

        if name.is_empty() || email.is_empty() {
            self.notifier
                .notice("Please fill in required fields (Name and E-mail).");
            let field = if name.is_empty() { "name" } else { "email" };
            return Err(ValidationError::required(field).into());
        }

        let contact = form.contact.trim();
        let record = UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            contact: if contact.is_empty() {
                "N/A".to_string()
            } else {
                contact.to_string()
            },
            created_at: Utc::now(),
        };

        match self.store.add_user(&record).await {
            Ok(user_id) => {
                self.close_drawer().await;
                self.notifier
                    .notice(format!("User {} added successfully!", record.name));
                let _ = self.refresh().await;
                Ok(user_id)
            }
            Err(source) => {
                warn!("failed to add user: {source:#}");
                self.notifier.notice("Failed to add user.");
                Err(StoreError::Write { source }.into())
            }
        }
    }

    pub async fn remove(&self, user_id: UserId) -> Result<(), StoreError> {
        match self.store.remove_user(user_id).await {
            Ok(true) => {
                self.notifier.notice("User deleted successfully!");
                let _ = self.refresh().await;
                Ok(())
            }
            Ok(false) => {
                self.notifier.notice("User not found.");
                Ok(())
            }
            Err(source) => {
                warn!(user_id = user_id.0, "failed to delete user: {source:#}");
                self.notifier.notice("Failed to delete user.");
                Err(StoreError::Write { source })
            }
        }
    }

    /// The view action: surfaces the user's details as a notice and a log
    /// line.
    pub async fn view(&self, user_id: UserId) -> Result<Option<StoredUser>, StoreError> {
        match self.store.get_user(user_id).await {
            Ok(Some(user)) => {
                info!(
                    name = %user.name,
                    email = %user.email,
                    contact = %user.contact,
                    "view details"
                );
                self.notifier
                    .notice(format!("Viewing details for {}", user.name));
                Ok(Some(user))
            }
            Ok(None) => Ok(None),
            Err(source) => {
                warn!(user_id = user_id.0, "failed to load user: {source:#}");
                self.notifier.notice("Failed to load user.");
                Err(StoreError::Read { source })
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
