//! Generic load → edit → submit → reconcile machine shared by every dialog
//! that talks to git.
//!
//! A [`ModalSession`] never runs git itself. Inputs produce a
//! [`ModalEffect::Request`] which the owner dispatches on the gateway queue
//! and binds back with [`ModalSession::await_ticket`]; the completion is then
//! fed to [`ModalSession::complete`]. Sessions are dropped on close, so a late
//! completion simply finds nobody waiting for it.

pub mod edit;
pub mod git_config;
pub mod stash;

use crate::gateway::{GatewayError, GitCommandResult, Ticket};

pub use edit::EditBuffer;
pub use git_config::GitConfigForm;
pub use stash::StashForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Idle,
    Editing,
    Submitting,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalInput {
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Submit,
    Cancel,
    Backspace,
    Delete,
    Char(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEffect {
    None,
    Request(Vec<Vec<String>>),
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    Loaded,
    LoadFailed,
    Submitted { field: usize, value: String },
    SubmitFailed,
    Ignored,
}

/// The per-dialog behaviour plugged into the shared machine.
pub trait ModalForm {
    fn title(&self) -> &'static str;

    fn field_count(&self) -> usize;

    fn field_label(&self, field: usize) -> &'static str;

    fn field_value(&self, field: usize) -> &str;

    /// Commands whose output seeds the fields; `None` opens straight to idle.
    fn load_commands(&self) -> Option<Vec<Vec<String>>> {
        None
    }

    fn apply_loaded(&mut self, _results: &[GitCommandResult]) {}

    fn submit_command(&self, field: usize, value: &str) -> Vec<String>;

    fn commit(&mut self, field: usize, value: String);

    fn load_failure_message(&self, error: &GatewayError) -> String {
        format!("Failed to load {}: {error}", self.title().to_lowercase())
    }

    fn submit_failure_message(&self, field: usize, detail: &str) -> String {
        format!("Failed to save {}: {detail}", self.field_label(field).to_lowercase())
    }

    /// Prompt forms open in the editor and close on Esc instead of idling.
    fn is_prompt(&self) -> bool {
        false
    }
}

#[derive(Debug)]
struct PendingSubmit {
    field: usize,
    value: String,
}

#[derive(Debug)]
pub struct ModalSession<F> {
    form: F,
    phase: Phase,
    selected: usize,
    editor: EditBuffer,
    error: Option<String>,
    waiting_on: Option<Ticket>,
    pending: Option<PendingSubmit>,
}

impl<F: ModalForm> ModalSession<F> {
    /// Opens a session; a returned request must be dispatched and bound.
    pub fn open(form: F) -> (Self, ModalEffect) {
        let load = form.load_commands();
        let mut session = Self {
            form,
            phase: Phase::Idle,
            selected: 0,
            editor: EditBuffer::default(),
            error: None,
            waiting_on: None,
            pending: None,
        };

        match load {
            Some(commands) if !commands.is_empty() => {
                session.phase = Phase::Loading;
                (session, ModalEffect::Request(commands))
            }
            _ => {
                session.enter_resting_phase();
                (session, ModalEffect::None)
            }
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn buffer(&self) -> &str {
        self.editor.text()
    }

    pub fn editor(&self) -> &EditBuffer {
        &self.editor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn waiting_on(&self) -> Option<Ticket> {
        self.waiting_on
    }

    pub fn await_ticket(&mut self, ticket: Ticket) {
        self.waiting_on = Some(ticket);
    }

    pub fn handle_input(&mut self, input: ModalInput) -> ModalEffect {
        match self.phase {
            Phase::Loading | Phase::Submitting => match input {
                ModalInput::Cancel => ModalEffect::Close,
                _ => ModalEffect::None,
            },
            // Prompts keep what was typed so a failed submit can be retried.
            Phase::Error => {
                self.error = None;
                self.phase = if self.form.is_prompt() {
                    Phase::Editing
                } else {
                    Phase::Idle
                };
                ModalEffect::None
            }
            Phase::Idle => self.handle_idle_input(input),
            Phase::Editing => self.handle_editing_input(input),
        }
    }

    /// Reconciles a finished request. Completions for any ticket other than
    /// the one this session is waiting on are ignored.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<GitCommandResult>, GatewayError>,
    ) -> Reconciled {
        if self.waiting_on != Some(ticket) {
            tracing::debug!(?ticket, "ignoring completion for another request");
            return Reconciled::Ignored;
        }
        self.waiting_on = None;

        match self.phase {
            Phase::Loading => match outcome {
                Ok(results) => {
                    self.form.apply_loaded(&results);
                    self.enter_resting_phase();
                    Reconciled::Loaded
                }
                Err(error) => {
                    self.fail(self.form.load_failure_message(&error));
                    Reconciled::LoadFailed
                }
            },
            Phase::Submitting => {
                let Some(pending) = self.pending.take() else {
                    self.enter_resting_phase();
                    return Reconciled::Ignored;
                };

                let failure = match &outcome {
                    Ok(results) => results
                        .iter()
                        .find(|result| !result.success())
                        .map(crate::git::failure_detail),
                    Err(error) => Some(error.to_string()),
                };

                match failure {
                    None => {
                        self.form.commit(pending.field, pending.value.clone());
                        self.editor.clear();
                        self.phase = Phase::Idle;
                        Reconciled::Submitted {
                            field: pending.field,
                            value: pending.value,
                        }
                    }
                    Some(detail) => {
                        self.fail(self.form.submit_failure_message(pending.field, &detail));
                        Reconciled::SubmitFailed
                    }
                }
            }
            Phase::Idle | Phase::Editing | Phase::Error => Reconciled::Ignored,
        }
    }

    fn handle_idle_input(&mut self, input: ModalInput) -> ModalEffect {
        let count = self.form.field_count();
        match input {
            ModalInput::Cancel => ModalEffect::Close,
            ModalInput::Up if count > 0 => {
                self.selected = (self.selected + count - 1) % count;
                ModalEffect::None
            }
            ModalInput::Down if count > 0 => {
                self.selected = (self.selected + 1) % count;
                ModalEffect::None
            }
            ModalInput::Submit | ModalInput::Char('e') if count > 0 => {
                self.start_editing();
                ModalEffect::None
            }
            _ => ModalEffect::None,
        }
    }

    fn handle_editing_input(&mut self, input: ModalInput) -> ModalEffect {
        match input {
            ModalInput::Cancel => {
                self.editor.clear();
                if self.form.is_prompt() {
                    return ModalEffect::Close;
                }
                self.phase = Phase::Idle;
                return ModalEffect::None;
            }
            ModalInput::Submit => return self.submit(),
            ModalInput::Char(ch) => self.editor.insert(ch),
            ModalInput::Backspace => self.editor.backspace(),
            ModalInput::Delete => self.editor.delete(),
            ModalInput::Left => self.editor.move_left(),
            ModalInput::Right => self.editor.move_right(),
            ModalInput::Home => self.editor.move_home(),
            ModalInput::End => self.editor.move_end(),
            ModalInput::Up | ModalInput::Down => {}
        }
        ModalEffect::None
    }

    fn submit(&mut self) -> ModalEffect {
        let field = self.selected;
        let value = self.editor.text().to_owned();
        let command = self.form.submit_command(field, &value);

        self.pending = Some(PendingSubmit { field, value });
        self.phase = Phase::Submitting;
        ModalEffect::Request(vec![command])
    }

    fn start_editing(&mut self) {
        self.editor = EditBuffer::with_text(self.form.field_value(self.selected));
        self.phase = Phase::Editing;
    }

    fn enter_resting_phase(&mut self) {
        if self.form.is_prompt() {
            self.start_editing();
        } else {
            self.phase = Phase::Idle;
        }
    }

    fn fail(&mut self, message: String) {
        tracing::warn!(title = self.form.title(), %message, "modal operation failed");
        self.pending = None;
        self.error = Some(message);
        self.phase = Phase::Error;
    }
}
