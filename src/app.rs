//! Application state and core logic

use crate::config::ContactConfig;
use crate::state::{
    AppState, ContactPipeline, ContactSubmission, Focus, SubmissionReceipt, SubmissionStatus,
};
use crate::transport::{SubmissionError, SubmissionTransport};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::Instrument;
use uuid::Uuid;

/// Modified keys are commands, never text
const COMMAND_MODIFIERS: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SUPER);

/// A finished request, reported back by the worker task
type SubmissionOutcome = (Uuid, Result<SubmissionReceipt, SubmissionError>);

/// Main application struct
pub struct App {
    /// Contact form state and submit cycle
    pub pipeline: ContactPipeline,
    /// UI state beside the form
    pub state: AppState,
    /// Copy feedback message
    pub copy_message: Option<String>,
    /// Backend that receives submissions
    transport: Arc<dyn SubmissionTransport>,
    outcome_tx: UnboundedSender<SubmissionOutcome>,
    outcome_rx: UnboundedReceiver<SubmissionOutcome>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &ContactConfig, transport: Arc<dyn SubmissionTransport>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let state = AppState::new(config.contact_entries.clone(), transport.name());

        Self {
            pipeline: ContactPipeline::with_success_window(config.success_window()),
            state,
            copy_message: None,
            transport,
            outcome_tx,
            outcome_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Apply finished submissions and fire the success reset when due.
    /// Returns true when anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome, now);
            changed = true;
        }
        self.pipeline.tick(now) || changed
    }

    /// Handle key events
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        self.copy_message = None;

        if key.code == KeyCode::Esc {
            self.quit = true;
            return Ok(());
        }

        match self.pipeline.status() {
            SubmissionStatus::Succeeded => {
                // Any key leaves the success view early
                self.pipeline.dismiss_success();
                self.state.focus = Focus::default();
                Ok(())
            }
            SubmissionStatus::Idle | SubmissionStatus::Submitting => self.handle_form_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let on_button_row = self.state.is_button_row_focused();

        match key.code {
            KeyCode::Tab => self.state.next_focus(),
            KeyCode::BackTab => self.state.prev_focus(),
            KeyCode::Down if on_button_row => self.state.next_focus(),
            KeyCode::Up if on_button_row => self.state.prev_focus(),
            // Keyboard shortcuts (work from anywhere)
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => self.submit(),
            KeyCode::Enter if key.modifiers.contains(crate::platform::SUBMIT_MODIFIER) => {
                self.submit()
            }
            // Button row
            KeyCode::Enter if on_button_row => self.submit(),
            KeyCode::Char('y') if on_button_row => self.copy_contact(),
            // Field input
            KeyCode::Char(c) if !key.modifiers.intersects(COMMAND_MODIFIERS) => {
                if let Some(field) = self.state.focus.field() {
                    self.pipeline.edit_field(field, |value| value.push(c));
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.state.focus.field() {
                    self.pipeline.edit_field(field, |value| {
                        value.pop();
                    });
                }
            }
            KeyCode::Enter => match self.state.focus.field() {
                Some(field) if field.is_multiline() => {
                    self.pipeline.edit_field(field, |value| value.push('\n'))
                }
                _ => self.state.next_focus(),
            },
            _ => {}
        }
        Ok(())
    }

    /// Start a submission if the form is valid and nothing is in flight
    pub fn submit(&mut self) {
        match self.pipeline.begin_submit() {
            Some(submission) => self.spawn_submission(submission),
            None => {
                // Jump to the first field that needs attention
                if let Some((field, _)) = self.pipeline.errors().iter().next() {
                    self.state.focus = Focus::Field(field);
                }
            }
        }
    }

    /// Send the request on a worker task; the outcome comes back through the channel.
    ///
    /// The request runs in its own task so a panic inside the transport still
    /// reports an outcome and the form never stays in `Submitting`.
    fn spawn_submission(&self, submission: ContactSubmission) {
        let transport = Arc::clone(&self.transport);
        let tx = self.outcome_tx.clone();
        let id = submission.id;
        let span = tracing::info_span!("contact_submission", submission_id = %id);

        tokio::spawn(async move {
            let request =
                tokio::spawn(async move { transport.submit(&submission).await }.instrument(span));
            let result = match request.await {
                Ok(result) => result,
                Err(err) => Err(SubmissionError::Transport(format!(
                    "submission task failed: {err}"
                ))),
            };
            if tx.send((id, result)).is_err() {
                tracing::debug!(submission_id = %id, "App closed before submission finished");
            }
        });
    }

    fn apply_outcome(&mut self, (id, result): SubmissionOutcome, now: Instant) {
        self.pipeline.complete_submit(id, result, now);
        if self.pipeline.status() == SubmissionStatus::Succeeded {
            self.state.focus = Focus::default();
        }
    }

    /// Copy the first contact detail to the clipboard
    fn copy_contact(&mut self) {
        let Some(entry) = self.state.contact_entries.first() else {
            self.copy_message = Some("No contact details configured".to_string());
            return;
        };
        let value = entry.value.clone();
        match self.copy_to_clipboard(&value) {
            Ok(()) => self.copy_message = Some(format!("Copied {value}")),
            Err(err) => {
                tracing::warn!(error = %err, "Clipboard unavailable");
                self.copy_message = Some("Clipboard unavailable".to_string());
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Field, FormInput};
    use crate::transport::MockSubmissionTransport;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn app_with(mut transport: MockSubmissionTransport) -> App {
        transport.expect_name().return_const("mock");
        App::new(&ContactConfig::default(), Arc::new(transport))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn fill_form(app: &mut App) {
        type_text(app, "Ada");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(app, "ada@example.com");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(app, "Hello");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(app, "hello there");
    }

    async fn wait_for_outcome(app: &mut App) {
        let outcome = app.outcome_rx.recv().await.unwrap();
        app.apply_outcome(outcome, Instant::now());
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut app = app_with(MockSubmissionTransport::new());
        fill_form(&mut app);

        assert_eq!(
            app.pipeline.input(),
            &FormInput {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                subject: "Hello".into(),
                message: "hello there".into(),
            }
        );
    }

    #[test]
    fn test_backspace_and_newline_in_message() {
        let mut app = app_with(MockSubmissionTransport::new());
        app.state.focus = Focus::Field(Field::Message);
        type_text(&mut app, "ab");
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "c");

        assert_eq!(app.pipeline.input().message, "a\nc");
    }

    #[test]
    fn test_modified_characters_are_not_typed() {
        let mut app = app_with(MockSubmissionTransport::new());
        for modifiers in [KeyModifiers::ALT, KeyModifiers::SUPER, KeyModifiers::CONTROL] {
            app.handle_key(KeyEvent::new(KeyCode::Char('x'), modifiers))
                .unwrap();
        }
        app.handle_key(KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT))
            .unwrap();

        assert_eq!(app.pipeline.input().name, "A");
    }

    #[test]
    fn test_enter_in_single_line_field_moves_focus() {
        let mut app = app_with(MockSubmissionTransport::new());
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.state.focus, Focus::Field(Field::Email));
    }

    #[test]
    fn test_invalid_submit_never_calls_transport_and_focuses_first_error() {
        let mut transport = MockSubmissionTransport::new();
        transport.expect_submit().never();
        let mut app = app_with(transport);
        type_text(&mut app, "Ada");
        app.state.focus = Focus::SubmitButton;

        app.handle_key(key(KeyCode::Enter)).unwrap();

        assert_eq!(app.pipeline.status(), SubmissionStatus::Idle);
        assert_eq!(app.pipeline.errors().len(), 3);
        assert_eq!(app.state.focus, Focus::Field(Field::Email));
    }

    #[test]
    fn test_typing_clears_that_fields_error() {
        let mut app = app_with(MockSubmissionTransport::new());
        app.submit();
        assert!(app.pipeline.errors().contains(Field::Name));

        app.state.focus = Focus::Field(Field::Name);
        type_text(&mut app, "x");

        assert!(!app.pipeline.errors().contains(Field::Name));
        assert!(app.pipeline.errors().contains(Field::Email));
    }

    #[tokio::test]
    async fn test_successful_submit_clears_form() {
        let mut transport = MockSubmissionTransport::new();
        transport
            .expect_submit()
            .times(1)
            .returning(|_| Ok(SubmissionReceipt::new(None)));
        let mut app = app_with(transport);
        fill_form(&mut app);

        app.handle_key(ctrl('s')).unwrap();
        assert_eq!(app.pipeline.status(), SubmissionStatus::Submitting);

        wait_for_outcome(&mut app).await;
        assert_eq!(app.pipeline.status(), SubmissionStatus::Succeeded);
        assert!(app.pipeline.input().is_empty());
        assert_eq!(app.state.focus, Focus::default());
    }

    #[tokio::test]
    async fn test_success_window_comes_from_config() {
        let mut transport = MockSubmissionTransport::new();
        transport.expect_name().return_const("mock");
        transport
            .expect_submit()
            .returning(|_| Ok(SubmissionReceipt::new(None)));
        let config = ContactConfig {
            success_window_secs: Some(1),
            ..Default::default()
        };
        let mut app = App::new(&config, Arc::new(transport));
        fill_form(&mut app);
        app.submit();

        let outcome = app.outcome_rx.recv().await.unwrap();
        let sent_at = Instant::now();
        app.apply_outcome(outcome, sent_at);
        assert_eq!(app.pipeline.status(), SubmissionStatus::Succeeded);

        assert!(!app.tick(sent_at + Duration::from_millis(999)));
        assert!(app.tick(sent_at + Duration::from_secs(1)));
        assert_eq!(app.pipeline.status(), SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn test_second_submit_while_sending_is_ignored() {
        let mut transport = MockSubmissionTransport::new();
        transport
            .expect_submit()
            .times(1)
            .returning(|_| Ok(SubmissionReceipt::new(None)));
        let mut app = app_with(transport);
        fill_form(&mut app);

        app.handle_key(ctrl('s')).unwrap();
        app.handle_key(ctrl('s')).unwrap();

        wait_for_outcome(&mut app).await;
        assert_eq!(app.pipeline.status(), SubmissionStatus::Succeeded);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_input_and_shows_error() {
        let mut transport = MockSubmissionTransport::new();
        transport
            .expect_submit()
            .times(1)
            .returning(|_| Err(SubmissionError::Rejected("Invalid access key".to_string())));
        let mut app = app_with(transport);
        fill_form(&mut app);
        let before = app.pipeline.input().clone();

        app.submit();
        wait_for_outcome(&mut app).await;

        assert_eq!(app.pipeline.status(), SubmissionStatus::Idle);
        assert_eq!(app.pipeline.input(), &before);
        assert_eq!(app.pipeline.last_failure(), Some("Invalid access key"));
    }

    struct PanickingTransport;

    #[async_trait::async_trait]
    impl SubmissionTransport for PanickingTransport {
        async fn submit(
            &self,
            _submission: &ContactSubmission,
        ) -> Result<SubmissionReceipt, SubmissionError> {
            panic!("transport blew up")
        }

        fn name(&self) -> &'static str {
            "panicking"
        }
    }

    #[tokio::test]
    async fn test_panicking_transport_still_leaves_submitting() {
        let mut app = App::new(&ContactConfig::default(), Arc::new(PanickingTransport));
        fill_form(&mut app);

        app.submit();
        wait_for_outcome(&mut app).await;

        assert_eq!(app.pipeline.status(), SubmissionStatus::Idle);
        assert!(app
            .pipeline
            .last_failure()
            .unwrap()
            .contains("submission task failed"));
    }

    #[tokio::test]
    async fn test_any_key_dismisses_success_view() {
        let mut transport = MockSubmissionTransport::new();
        transport
            .expect_submit()
            .returning(|_| Ok(SubmissionReceipt::new(None)));
        let mut app = app_with(transport);
        fill_form(&mut app);
        app.submit();
        wait_for_outcome(&mut app).await;

        app.handle_key(key(KeyCode::Char('q'))).unwrap();

        assert_eq!(app.pipeline.status(), SubmissionStatus::Idle);
        // The dismissing key is not typed into the form
        assert!(app.pipeline.input().is_empty());
    }

    #[tokio::test]
    async fn test_tick_applies_outcome_from_channel() {
        let mut transport = MockSubmissionTransport::new();
        transport
            .expect_submit()
            .returning(|_| Ok(SubmissionReceipt::new(None)));
        let mut app = app_with(transport);
        fill_form(&mut app);
        app.submit();

        let outcome = app.outcome_rx.recv().await.unwrap();
        app.outcome_tx.send(outcome).unwrap();

        assert!(app.tick(Instant::now()));
        assert_eq!(app.pipeline.status(), SubmissionStatus::Succeeded);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app_with(MockSubmissionTransport::new());
        assert!(!app.should_quit());
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn test_copy_without_contact_entries() {
        let mut app = app_with(MockSubmissionTransport::new());
        app.state.focus = Focus::SubmitButton;
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(
            app.copy_message.as_deref(),
            Some("No contact details configured")
        );
    }

    #[test]
    fn test_status_bar_name_comes_from_transport() {
        let app = app_with(MockSubmissionTransport::new());
        assert_eq!(app.state.transport_name, "mock");
    }
}
