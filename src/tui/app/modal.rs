//! Confirmation dialogs and small input forms
//!
//! While a modal is open it receives every keystroke. It resolves to
//! confirmed or cancelled; the reducer then runs or drops its
//! [`PendingAction`].

use crossterm::event::{KeyCode, KeyEvent};

/// What to do once the modal is confirmed. Carries ids, never indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    DeleteContainer { id: String, name: String },
    DeleteImage { id: String, tag: String },
    DeleteGroup { id: String, name: String },
    RemoveFromGroup { group_id: String, container_id: String },
    CreateGroup,
    DeleteVolume { name: String },
    PruneVolumes,
    PullImage,
    CreateNetwork,
    DeleteNetwork { id: String, name: String },
    DisconnectFromNetwork { network_id: String, container_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub required: bool,
}

impl FormField {
    pub fn required(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            required: true,
        }
    }

    pub fn optional(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalKind {
    Confirm { message: String },
    Form { fields: Vec<FormField>, focus: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOutcome {
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub title: String,
    pub kind: ModalKind,
    pub action: PendingAction,
}

impl ModalState {
    pub fn confirm(message: impl Into<String>, action: PendingAction) -> Self {
        Self {
            title: "⚠ CONFIRMATION REQUIRED".to_string(),
            kind: ModalKind::Confirm {
                message: message.into(),
            },
            action,
        }
    }

    pub fn form(title: impl Into<String>, fields: Vec<FormField>, action: PendingAction) -> Self {
        Self {
            title: title.into(),
            kind: ModalKind::Form { fields, focus: 0 },
            action,
        }
    }

    /// Trimmed field values in declaration order
    pub fn values(&self) -> Vec<String> {
        match &self.kind {
            ModalKind::Confirm { .. } => Vec::new(),
            ModalKind::Form { fields, .. } => {
                fields.iter().map(|f| f.value.trim().to_string()).collect()
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalOutcome {
        match &mut self.kind {
            ModalKind::Confirm { .. } => match key.code {
                KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                    ModalOutcome::Confirmed
                }
                KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => ModalOutcome::Cancelled,
                _ => ModalOutcome::Pending,
            },
            ModalKind::Form { fields, focus } => {
                let count = fields.len().max(1);
                match key.code {
                    KeyCode::Esc => return ModalOutcome::Cancelled,
                    KeyCode::Enter => {
                        let complete = fields
                            .iter()
                            .all(|f| !f.required || !f.value.trim().is_empty());
                        return if complete {
                            ModalOutcome::Confirmed
                        } else {
                            ModalOutcome::Pending
                        };
                    }
                    KeyCode::Tab | KeyCode::Down => *focus = (*focus + 1) % count,
                    KeyCode::BackTab | KeyCode::Up => *focus = (*focus + count - 1) % count,
                    KeyCode::Backspace => {
                        if let Some(field) = fields.get_mut(*focus) {
                            field.value.pop();
                        }
                    }
                    KeyCode::Char(c) => {
                        if let Some(field) = fields.get_mut(*focus) {
                            field.value.push(c);
                        }
                    }
                    _ => {}
                }
                ModalOutcome::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(modal: &mut ModalState, text: &str) {
        for c in text.chars() {
            modal.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_confirm_keys() {
        let mut modal = ModalState::confirm("sure?", PendingAction::PruneVolumes);
        assert_eq!(modal.handle_key(key(KeyCode::Char('q'))), ModalOutcome::Pending);
        assert_eq!(modal.handle_key(key(KeyCode::Char('y'))), ModalOutcome::Confirmed);
        assert_eq!(modal.handle_key(key(KeyCode::Esc)), ModalOutcome::Cancelled);
        assert_eq!(modal.handle_key(key(KeyCode::Char('N'))), ModalOutcome::Cancelled);
    }

    #[test]
    fn test_form_requires_required_fields() {
        let mut modal = ModalState::form(
            "Create New Group",
            vec![FormField::required("Name"), FormField::optional("Description")],
            PendingAction::CreateGroup,
        );
        assert_eq!(modal.handle_key(key(KeyCode::Enter)), ModalOutcome::Pending);

        type_text(&mut modal, "web ");
        modal.handle_key(key(KeyCode::Tab));
        type_text(&mut modal, "frontends");
        modal.handle_key(key(KeyCode::Backspace));
        assert_eq!(modal.handle_key(key(KeyCode::Enter)), ModalOutcome::Confirmed);
        assert_eq!(modal.values(), vec!["web".to_string(), "frontend".to_string()]);
    }

    #[test]
    fn test_form_focus_wraps() {
        let mut modal = ModalState::form(
            "Create New Network",
            vec![FormField::required("Name"), FormField::optional("Driver")],
            PendingAction::CreateNetwork,
        );
        modal.handle_key(key(KeyCode::BackTab));
        type_text(&mut modal, "overlay");
        modal.handle_key(key(KeyCode::Down));
        type_text(&mut modal, "mesh");
        assert_eq!(modal.values(), vec!["mesh".to_string(), "overlay".to_string()]);
    }
}
