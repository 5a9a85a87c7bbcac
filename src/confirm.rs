//! Confirmation gates guarding tag deletion.
//!
//! A gate only holds checkbox and text state; the dialogs render it and
//! run the deletion once [`LocalDeleteGate::is_satisfied`] or
//! [`RemoteDeleteGate::is_satisfied`] returns true.

/// Final confirmation before `git tag -d`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalDeleteGate {
    tag: String,
    /// Tag exists locally; `None` while the lookup is running
    exists: Option<bool>,
    pub understands_irreversible: bool,
}

impl LocalDeleteGate {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            exists: None,
            understands_irreversible: false,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_exists(&mut self, exists: bool) {
        self.exists = Some(exists);
    }

    pub fn exists(&self) -> Option<bool> {
        self.exists
    }

    pub fn is_satisfied(&self) -> bool {
        self.exists == Some(true) && self.understands_irreversible
    }
}

/// Checkboxes shown in the remote deletion dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCheck {
    AffectsAll,
    NotifiedTeam,
    TagIsIncorrect,
    AcceptsResponsibility,
    /// Only offered when the tag is missing locally
    DeleteAnyway,
}

impl RemoteCheck {
    pub fn label(&self) -> &'static str {
        match self {
            RemoteCheck::AffectsAll => "I understand this affects ALL collaborators",
            RemoteCheck::NotifiedTeam => "I have notified other team members",
            RemoteCheck::TagIsIncorrect => "This tag is definitely incorrect or obsolete",
            RemoteCheck::AcceptsResponsibility => "I accept full responsibility for this action",
            RemoteCheck::DeleteAnyway => "Tag not found locally: attempt deletion anyway",
        }
    }
}

/// Final confirmation before `git push <remote> --delete <tag>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDeleteGate {
    tag: String,
    exists_locally: Option<bool>,
    affects_all: bool,
    notified_team: bool,
    tag_is_incorrect: bool,
    accepts_responsibility: bool,
    delete_anyway: bool,
    pub typed_name: String,
}

impl RemoteDeleteGate {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            exists_locally: None,
            affects_all: false,
            notified_team: false,
            tag_is_incorrect: false,
            accepts_responsibility: false,
            delete_anyway: false,
            typed_name: String::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn set_exists_locally(&mut self, exists: bool) {
        self.exists_locally = Some(exists);
    }

    pub fn exists_locally(&self) -> Option<bool> {
        self.exists_locally
    }

    /// Checkboxes currently offered, in display order
    pub fn checks(&self) -> Vec<RemoteCheck> {
        let mut checks = Vec::new();
        if self.exists_locally == Some(false) {
            checks.push(RemoteCheck::DeleteAnyway);
        }
        checks.extend([
            RemoteCheck::AffectsAll,
            RemoteCheck::NotifiedTeam,
            RemoteCheck::TagIsIncorrect,
            RemoteCheck::AcceptsResponsibility,
        ]);
        checks
    }

    pub fn is_checked(&self, check: RemoteCheck) -> bool {
        match check {
            RemoteCheck::AffectsAll => self.affects_all,
            RemoteCheck::NotifiedTeam => self.notified_team,
            RemoteCheck::TagIsIncorrect => self.tag_is_incorrect,
            RemoteCheck::AcceptsResponsibility => self.accepts_responsibility,
            RemoteCheck::DeleteAnyway => self.delete_anyway,
        }
    }

    pub fn toggle(&mut self, check: RemoteCheck) {
        let flag = match check {
            RemoteCheck::AffectsAll => &mut self.affects_all,
            RemoteCheck::NotifiedTeam => &mut self.notified_team,
            RemoteCheck::TagIsIncorrect => &mut self.tag_is_incorrect,
            RemoteCheck::AcceptsResponsibility => &mut self.accepts_responsibility,
            RemoteCheck::DeleteAnyway => &mut self.delete_anyway,
        };
        *flag = !*flag;
    }

    /// Whether the re-typed name matches the tag exactly
    pub fn name_matches(&self) -> bool {
        self.typed_name.trim() == self.tag
    }

    /// Notifying the team is advisory; every other requirement is mandatory
    pub fn is_satisfied(&self) -> bool {
        let local_ok = match self.exists_locally {
            Some(true) => true,
            Some(false) => self.delete_anyway,
            None => false,
        };
        local_ok
            && self.affects_all
            && self.tag_is_incorrect
            && self.accepts_responsibility
            && self.name_matches()
    }
}
