use crate::git;

use super::ModalForm;

pub const MESSAGE_PLACEHOLDER: &str = "Description of stashed changes";

/// One optional message, then `git stash push`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StashForm {
    created: Option<String>,
}

impl StashForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// The trimmed message of the stash that was created, once one was.
    pub fn created(&self) -> Option<&str> {
        self.created.as_deref()
    }
}

impl ModalForm for StashForm {
    fn title(&self) -> &'static str {
        "Create Stash"
    }

    fn field_count(&self) -> usize {
        1
    }

    fn field_label(&self, _field: usize) -> &'static str {
        "Message (optional)"
    }

    fn field_value(&self, _field: usize) -> &str {
        ""
    }

    fn submit_command(&self, _field: usize, value: &str) -> Vec<String> {
        git::stash_push_args(value)
    }

    fn commit(&mut self, _field: usize, value: String) {
        self.created = Some(value.trim().to_owned());
    }

    fn submit_failure_message(&self, _field: usize, detail: &str) -> String {
        format!("Failed to create stash: {detail}")
    }

    fn is_prompt(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::gateway::Ticket;
    use crate::modal::tests::{failed, ok, type_text};
    use crate::modal::{ModalEffect, ModalInput, ModalSession, Phase, Reconciled};

    use super::StashForm;

    fn open() -> ModalSession<StashForm> {
        let (session, effect) = ModalSession::open(StashForm::new());
        assert_eq!(effect, ModalEffect::None);
        session
    }

    #[test]
    fn opens_straight_into_the_editor() {
        let session = open();
        assert_eq!(session.phase(), Phase::Editing);
        assert_eq!(session.buffer(), "");
    }

    #[test]
    fn escape_closes_instead_of_idling() {
        let mut session = open();
        type_text(&mut session, "half typed");
        assert_eq!(session.handle_input(ModalInput::Cancel), ModalEffect::Close);
    }

    #[test]
    fn empty_message_pushes_without_flag() {
        let mut session = open();
        type_text(&mut session, "   ");

        assert_eq!(
            session.handle_input(ModalInput::Submit),
            ModalEffect::Request(vec![vec![String::from("stash"), String::from("push")]])
        );
    }

    #[test]
    fn message_is_trimmed_and_recorded_on_success() {
        let mut session = open();
        type_text(&mut session, "  wip parser  ");

        let effect = session.handle_input(ModalInput::Submit);
        assert_eq!(
            effect,
            ModalEffect::Request(vec![vec![
                String::from("stash"),
                String::from("push"),
                String::from("-m"),
                String::from("wip parser"),
            ]])
        );

        session.await_ticket(Ticket::from_raw(1));
        let reconciled = session.complete(Ticket::from_raw(1), Ok(vec![ok("Saved working directory")]));
        assert!(matches!(reconciled, Reconciled::Submitted { .. }));
        assert_eq!(session.form().created(), Some("wip parser"));
    }

    #[test]
    fn failure_returns_to_editor_with_message_kept() {
        let mut session = open();
        type_text(&mut session, "retry me");
        session.handle_input(ModalInput::Submit);
        session.await_ticket(Ticket::from_raw(2));

        let reconciled = session.complete(
            Ticket::from_raw(2),
            Ok(vec![failed(1, "No local changes to save")]),
        );
        assert_eq!(reconciled, Reconciled::SubmitFailed);
        assert_eq!(
            session.error(),
            Some("Failed to create stash: No local changes to save")
        );

        session.handle_input(ModalInput::Char('x'));
        assert_eq!(session.phase(), Phase::Editing);
        assert_eq!(session.buffer(), "retry me");
        assert_eq!(session.form().created(), None);
    }
}
