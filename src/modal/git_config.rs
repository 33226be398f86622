use crate::gateway::GitCommandResult;
use crate::git::{self, USER_EMAIL_KEY, USER_NAME_KEY};

use super::ModalForm;

pub const FIELD_NAME: usize = 0;
pub const FIELD_EMAIL: usize = 1;

const FIELDS: [(&str, &str); 2] = [("Name", USER_NAME_KEY), ("Email", USER_EMAIL_KEY)];

/// Global `user.name` / `user.email`, edited one field at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitConfigForm {
    name: String,
    email: String,
}

impl GitConfigForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    fn key(field: usize) -> &'static str {
        FIELDS.get(field).map_or(USER_NAME_KEY, |(_, key)| key)
    }

    fn slot(&mut self, field: usize) -> &mut String {
        if field == FIELD_EMAIL {
            &mut self.email
        } else {
            &mut self.name
        }
    }
}

impl ModalForm for GitConfigForm {
    fn title(&self) -> &'static str {
        "Git Identity"
    }

    fn field_count(&self) -> usize {
        FIELDS.len()
    }

    fn field_label(&self, field: usize) -> &'static str {
        FIELDS.get(field).map_or("", |(label, _)| label)
    }

    fn field_value(&self, field: usize) -> &str {
        if field == FIELD_EMAIL {
            &self.email
        } else {
            &self.name
        }
    }

    fn load_commands(&self) -> Option<Vec<Vec<String>>> {
        Some(
            FIELDS
                .iter()
                .map(|(_, key)| git::config_get_args(key))
                .collect(),
        )
    }

    fn apply_loaded(&mut self, results: &[GitCommandResult]) {
        for (field, result) in results.iter().enumerate().take(FIELDS.len()) {
            *self.slot(field) = git::config_value(result);
        }
    }

    fn submit_command(&self, field: usize, value: &str) -> Vec<String> {
        git::config_set_args(Self::key(field), value.trim())
    }

    fn commit(&mut self, field: usize, value: String) {
        *self.slot(field) = value.trim().to_owned();
    }
}

#[cfg(test)]
mod tests {
    use crate::gateway::Ticket;
    use crate::modal::tests::{failed, not_found, ok, type_text};
    use crate::modal::{ModalEffect, ModalInput, ModalSession, Phase, Reconciled};

    use super::{FIELD_EMAIL, GitConfigForm};

    fn loaded(name: &str, email: &str) -> ModalSession<GitConfigForm> {
        let (mut session, effect) = ModalSession::open(GitConfigForm::new());
        let ModalEffect::Request(commands) = effect else {
            panic!("identity form should load on open");
        };
        assert_eq!(
            commands,
            vec![
                vec!["config", "--global", "user.name"],
                vec!["config", "--global", "user.email"],
            ]
        );
        assert_eq!(session.phase(), Phase::Loading);

        session.await_ticket(Ticket::from_raw(1));
        let reconciled = session.complete(Ticket::from_raw(1), Ok(vec![ok(name), ok(email)]));
        assert_eq!(reconciled, Reconciled::Loaded);
        session
    }

    #[test]
    fn loads_current_identity() {
        let session = loaded("Jane Doe\n", "jane@example.com\n");

        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.form().name(), "Jane Doe");
        assert_eq!(session.form().email(), "jane@example.com");
    }

    #[test]
    fn unset_keys_load_as_empty_not_error() {
        let (mut session, _) = ModalSession::open(GitConfigForm::new());
        session.await_ticket(Ticket::from_raw(1));

        let reconciled = session.complete(Ticket::from_raw(1), Ok(vec![failed(1, ""), failed(1, "")]));
        assert_eq!(reconciled, Reconciled::Loaded);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.form().name(), "");
        assert_eq!(session.error(), None);
    }

    #[test]
    fn transport_failure_while_loading_is_an_error() {
        let (mut session, _) = ModalSession::open(GitConfigForm::new());
        session.await_ticket(Ticket::from_raw(2));

        let reconciled = session.complete(Ticket::from_raw(2), Err(not_found()));
        assert_eq!(reconciled, Reconciled::LoadFailed);
        assert_eq!(session.phase(), Phase::Error);
        assert!(
            session
                .error()
                .is_some_and(|msg| msg.starts_with("Failed to load git identity"))
        );
    }

    #[test]
    fn escape_while_loading_closes() {
        let (mut session, _) = ModalSession::open(GitConfigForm::new());
        assert_eq!(session.handle_input(ModalInput::Cancel), ModalEffect::Close);
    }

    #[test]
    fn editing_email_submits_discrete_arguments() {
        let mut session = loaded("", "old@example.com");
        session.handle_input(ModalInput::Down);
        session.handle_input(ModalInput::Char('e'));
        assert_eq!(session.buffer(), "old@example.com");

        for _ in 0.."old@example.com".len() {
            session.handle_input(ModalInput::Backspace);
        }
        type_text(&mut session, "new@example.com");

        let effect = session.handle_input(ModalInput::Submit);
        assert_eq!(
            effect,
            ModalEffect::Request(vec![vec![
                String::from("config"),
                String::from("--global"),
                String::from("user.email"),
                String::from("new@example.com"),
            ]])
        );

        session.await_ticket(Ticket::from_raw(3));
        let reconciled = session.complete(Ticket::from_raw(3), Ok(vec![ok("")]));
        assert_eq!(
            reconciled,
            Reconciled::Submitted {
                field: FIELD_EMAIL,
                value: String::from("new@example.com"),
            }
        );
        assert_eq!(session.form().email(), "new@example.com");
    }

    #[test]
    fn rejected_write_keeps_previous_value() {
        let mut session = loaded("Jane", "");
        session.handle_input(ModalInput::Submit);
        type_text(&mut session, " Doe");
        session.handle_input(ModalInput::Submit);
        session.await_ticket(Ticket::from_raw(4));

        let reconciled = session.complete(
            Ticket::from_raw(4),
            Ok(vec![failed(255, "error: could not lock config file")]),
        );
        assert_eq!(reconciled, Reconciled::SubmitFailed);
        assert_eq!(session.form().name(), "Jane");
        assert_eq!(
            session.error(),
            Some("Failed to save name: error: could not lock config file")
        );
    }
}
