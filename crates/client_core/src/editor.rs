use std::collections::HashMap;

use shared::domain::{ProfileField, ProfileRecord, SectionId};
use shared::error::{EditError, ValidationError};

/// Per-section transient edit state. While `active` is false the draft is
/// not authoritative and always equals the last committed record.
#[derive(Debug, Clone)]
pub struct EditSession {
    active: bool,
    draft: ProfileRecord,
}

impl EditSession {
    fn synced(committed: &ProfileRecord) -> Self {
        Self {
            active: false,
            draft: committed.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn draft(&self) -> &ProfileRecord {
        &self.draft
    }
}

/// Suspends direct mutation of the committed profile behind per-section
/// draft copies. Each section moves between exactly two states:
///
/// ```text
/// VIEW --enter_edit--> EDITING
/// EDITING --cancel_edit--> VIEW   (draft discarded)
/// EDITING --commit--> VIEW        (draft becomes committed)
/// ```
///
/// At most one section is in EDITING across the whole record; while one
/// is, tab switching and edits to other sections are rejected. The
/// controller never talks to storage itself: `commit` hands the new
/// committed record back to the caller, which owns the persistence write.
#[derive(Debug)]
pub struct ProfileEditor {
    committed: ProfileRecord,
    sessions: HashMap<SectionId, EditSession>,
    active_section: Option<SectionId>,
    active_tab: SectionId,
}

impl ProfileEditor {
    pub fn new(committed: ProfileRecord) -> Self {
        let sessions = SectionId::ALL
            .iter()
            .map(|section| (*section, EditSession::synced(&committed)))
            .collect();
        Self {
            committed,
            sessions,
            active_section: None,
            active_tab: SectionId::BasicInfo,
        }
    }

    pub fn committed(&self) -> &ProfileRecord {
        &self.committed
    }

    pub fn active_section(&self) -> Option<SectionId> {
        self.active_section
    }

    pub fn active_tab(&self) -> SectionId {
        self.active_tab
    }

    pub fn is_editing(&self, section: SectionId) -> bool {
        self.active_section == Some(section)
    }

    /// The record a section's view renders: the draft while that section
    /// is in edit mode, the committed record otherwise.
    pub fn visible_for(&self, section: SectionId) -> &ProfileRecord {
        match self.sessions.get(&section) {
            Some(session) if session.active => &session.draft,
            _ => &self.committed,
        }
    }

    pub fn visible(&self) -> &ProfileRecord {
        self.visible_for(self.active_tab)
    }

    /// Tab switching is disabled repo-wide while any section is in edit
    /// mode.
    pub fn select_tab(&mut self, section: SectionId) -> Result<(), EditError> {
        if let Some(active) = self.active_section {
            return Err(EditError::SectionLocked { active });
        }
        self.active_tab = section;
        Ok(())
    }

    pub fn enter_edit(&mut self, section: SectionId) -> Result<(), EditError> {
        match self.active_section {
            Some(active) if active == section => Err(EditError::AlreadyEditing),
            Some(active) => Err(EditError::SectionLocked { active }),
            None => {
                // The draft is already synchronized to committed; entering
                // edit mode only activates it.
                self.session_mut(section).active = true;
                self.active_section = Some(section);
                Ok(())
            }
        }
    }

    /// Discards in-progress changes. Calling this on a section already in
    /// VIEW has no effect.
    pub fn cancel_edit(&mut self, section: SectionId) -> Result<(), EditError> {
        if self.active_section != Some(section) {
            return Ok(());
        }
        let committed = self.committed.clone();
        let session = self.session_mut(section);
        session.draft = committed;
        session.active = false;
        self.active_section = None;
        Ok(())
    }

    /// Writes one draft field. Rejected unless the owning section is in
    /// edit mode; the email field is rejected unconditionally.
    pub fn set_field(
        &mut self,
        field: ProfileField,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        if field == ProfileField::Email {
            return Err(ValidationError::immutable(field.external_id()).into());
        }
        let section = field.section();
        if self.active_section != Some(section) {
            return Err(EditError::NotEditing);
        }
        let value = match field {
            // File selection retains only the file name, never content.
            ProfileField::Resume => file_name_of(&value.into()),
            _ => value.into(),
        };
        self.session_mut(section).draft.set_raw(field, value);
        Ok(())
    }

    /// `set_field` keyed by the external camelCase identifier. Unknown
    /// identifiers are rejected.
    pub fn set_field_external(
        &mut self,
        external: &str,
        value: impl Into<String>,
    ) -> Result<(), EditError> {
        let field = ProfileField::parse(external)?;
        self.set_field(field, value)
    }

    /// Full replace of the committed record by the section's draft. The
    /// email field never moves through a commit, so a stale draft cannot
    /// revert it.
    pub fn commit(&mut self, section: SectionId) -> Result<&ProfileRecord, EditError> {
        if self.active_section != Some(section) {
            return Err(EditError::NotEditing);
        }
        let mut next = self.session_mut(section).draft.clone();
        next.email = self.committed.email.clone();
        self.committed = next;
        self.active_section = None;
        for session in self.sessions.values_mut() {
            session.active = false;
            session.draft = self.committed.clone();
        }
        Ok(&self.committed)
    }

    /// Resynchronization rule: when the committed record changes through
    /// any path other than `commit` (reload, external update), every
    /// inactive draft is overwritten. A draft currently in edit mode is
    /// preserved.
    pub fn resync(&mut self, committed: ProfileRecord) {
        self.committed = committed;
        for session in self.sessions.values_mut() {
            if session.active {
                // Email never diverges from committed, even mid-edit.
                session.draft.email = self.committed.email.clone();
            } else {
                session.draft = self.committed.clone();
            }
        }
    }

    fn session_mut(&mut self, section: SectionId) -> &mut EditSession {
        self.sessions
            .entry(section)
            .or_insert_with(|| EditSession::synced(&self.committed))
    }
}

fn file_name_of(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

#[cfg(test)]
#[path = "tests/editor_tests.rs"]
mod tests;
