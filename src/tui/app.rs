use std::time::{Duration, Instant};

use super::input::InputAction;
use super::mode::Focus;
use crate::app::Config;
use crate::constants::UI_SCROLL_LINES;
use crate::session::{SessionController, Toast};
use crate::view::SessionView;

/// Application state
pub struct App {
    /// Conversation session, owned by the UI task
    pub controller: SessionController,
    /// Last rendered sidebar and pane
    pub view: SessionView,
    /// Composer buffer
    pub input: String,
    /// Is the app running?
    pub running: bool,
    /// Panel receiving keys
    pub focus: Focus,
    /// Delete confirmation prompt is open
    pub confirming_delete: bool,
    /// Lines scrolled up from the bottom of the pane
    pub scroll_back: u16,
    pub show_sidebar: bool,
    pub show_templates: bool,
    /// Highlighted row in the conversation list
    pub sidebar_cursor: usize,
    /// Highlighted row in the template list
    pub template_cursor: usize,
    /// Backend shown in the header
    pub server_url: String,
    toast: Option<(Toast, Instant)>,
    toast_duration: Duration,
}

impl App {
    /// Create a new app instance
    pub fn new(controller: SessionController, config: &Config) -> Self {
        let view = SessionView::new(controller.state());
        Self {
            controller,
            view,
            input: String::new(),
            running: true,
            focus: Focus::default(),
            confirming_delete: false,
            scroll_back: 0,
            show_sidebar: config.ui.show_sidebar,
            show_templates: config.ui.show_templates,
            sidebar_cursor: 0,
            template_cursor: 0,
            server_url: config.server.base_url.clone(),
            toast: None,
            toast_duration: Duration::from_secs(config.ui.toast_secs),
        }
    }

    /// Kick off the startup calls
    pub fn start(&mut self) {
        self.controller.initialize();
        self.controller.load_templates();
    }

    /// Apply finished remote calls and refresh whatever they invalidated
    pub fn sync(&mut self) {
        self.controller.try_process();
        self.refresh();
        self.expire_toast();
    }

    fn refresh(&mut self) {
        let render = self.controller.take_render();
        self.view.apply(self.controller.state(), render);

        if render.sidebar {
            if let Some(active) = self.view.active_index() {
                self.sidebar_cursor = active;
            }
        }
        if render.pane {
            self.scroll_back = 0;
        }
        if render.focus_composer {
            self.focus = Focus::Composer;
        }

        if let Some(toast) = self.controller.take_toast() {
            self.toast = Some((toast, Instant::now()));
        }
    }

    fn expire_toast(&mut self) {
        if let Some((_, shown_at)) = &self.toast {
            if shown_at.elapsed() >= self.toast_duration {
                self.toast = None;
            }
        }
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref().map(|(toast, _)| toast)
    }

    /// Dispatch one input action
    pub fn handle_action(&mut self, action: InputAction) {
        match action {
            InputAction::Quit => self.quit(),
            InputAction::Submit => self.submit(),
            InputAction::Insert(c) => self.input.push(c),
            InputAction::Delete => {
                self.input.pop();
            }
            InputAction::Up => self.move_cursor(-1),
            InputAction::Down => self.move_cursor(1),
            InputAction::Activate => self.activate(),
            InputAction::FocusNext => {
                self.focus = self.focus.cycle_visible(self.show_sidebar, self.show_templates);
            }
            InputAction::FocusPrev => {
                self.focus = self
                    .focus
                    .cycle_visible_reverse(self.show_sidebar, self.show_templates);
            }
            InputAction::ScrollUp => self.scroll_up(UI_SCROLL_LINES),
            InputAction::ScrollDown => self.scroll_down(UI_SCROLL_LINES),
            InputAction::NewConversation => self.controller.start_new_conversation(),
            InputAction::RequestDelete => self.confirming_delete = true,
            InputAction::Confirm => {
                if self.confirming_delete {
                    self.confirming_delete = false;
                    self.controller.delete_current();
                }
            }
            InputAction::Cancel => {
                if self.confirming_delete {
                    self.confirming_delete = false;
                } else if self.focus == Focus::Composer {
                    self.input.clear();
                } else {
                    self.focus = Focus::Composer;
                }
            }
            InputAction::ToggleSidebar => self.toggle_sidebar(),
            InputAction::None => {}
        }
        self.refresh();
    }

    /// Send the composer contents; they are kept if nothing was sent
    pub fn submit(&mut self) {
        if self.controller.submit(&self.input) {
            self.input.clear();
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            Focus::Conversations => (&mut self.sidebar_cursor, self.view.sidebar.len()),
            Focus::Templates => (
                &mut self.template_cursor,
                self.controller.templates().questions.len(),
            ),
            Focus::Composer => return,
        };
        if len == 0 {
            *cursor = 0;
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn activate(&mut self) {
        match self.focus {
            Focus::Conversations => {
                if let Some(entry) = self.view.sidebar.get(self.sidebar_cursor) {
                    let id = entry.id.clone();
                    self.controller.select(&id);
                }
            }
            Focus::Templates => {
                if let Some(question) = self.controller.templates().get(self.template_cursor) {
                    self.input = question.to_string();
                    self.focus = Focus::Composer;
                }
            }
            Focus::Composer => {}
        }
    }

    /// Toggle sidebar visibility
    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
        if !self.focus.is_visible(self.show_sidebar, self.show_templates) {
            self.focus = Focus::Composer;
        }
    }

    /// Scroll the pane towards older messages
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_back = self.scroll_back.saturating_add(amount);
    }

    /// Scroll the pane towards the newest message
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(amount);
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MockConversationApi;
    use crate::session::{ConversationId, Turn};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn history() -> HashMap<ConversationId, Vec<Turn>> {
        HashMap::from([
            (
                ConversationId::new("a"),
                vec![Turn::question("antigua", "2024-05-01 10:00:00")],
            ),
            (
                ConversationId::new("b"),
                vec![Turn::question("reciente", "2024-05-02 10:00:00")],
            ),
        ])
    }

    async fn started_app(api: MockConversationApi) -> App {
        let mut app = App::new(SessionController::new(Arc::new(api)), &Config::default());
        app.start();
        app.controller.settle().await;
        app.sync();
        app
    }

    fn base_api() -> MockConversationApi {
        let mut api = MockConversationApi::new();
        api.expect_fetch_history().returning(|| Ok(history()));
        api.expect_user_type().returning(|| Ok(Some("agricultor".into())));
        api
    }

    #[tokio::test]
    async fn test_startup_renders_history() {
        let app = started_app(base_api()).await;
        assert_eq!(app.view.sidebar.len(), 2);
        assert_eq!(app.view.sidebar[0].label, "reciente");
        assert_eq!(app.sidebar_cursor, 0);
    }

    #[tokio::test]
    async fn test_submit_clears_composer() {
        let mut api = base_api();
        api.expect_send_message()
            .returning(|_, _| Ok("respuesta".to_string()));

        let mut app = started_app(api).await;
        app.input = "hola".to_string();
        app.scroll_back = 5;
        app.handle_action(InputAction::Submit);

        assert!(app.input.is_empty());
        assert_eq!(app.scroll_back, 0);
        assert_eq!(app.view.pane.last().map(|l| l.text.as_str()), Some("EcoSmart está pensando..."));

        app.controller.settle().await;
        app.sync();
        assert_eq!(app.view.pane.last().map(|l| l.text.as_str()), Some("respuesta"));
    }

    #[tokio::test]
    async fn test_opening_a_conversation_from_the_sidebar() {
        let mut app = started_app(base_api()).await;
        app.handle_action(InputAction::FocusNext);
        assert_eq!(app.focus, Focus::Conversations);

        app.handle_action(InputAction::Down);
        app.handle_action(InputAction::Activate);

        assert_eq!(app.controller.state().current_id(), Some(&ConversationId::new("a")));
        assert_eq!(app.focus, Focus::Composer);
        assert_eq!(app.view.pane[0].text, "antigua");
    }

    #[tokio::test]
    async fn test_template_fills_composer_without_sending() {
        let mut api = base_api();
        api.expect_send_message().never();

        let mut app = started_app(api).await;
        app.focus = Focus::Templates;
        app.handle_action(InputAction::Down);
        app.handle_action(InputAction::Activate);

        assert_eq!(app.input, "¿Qué tipo de suelo es ideal para [nombre del cultivo]?");
        assert_eq!(app.focus, Focus::Composer);
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let mut api = base_api();
        api.expect_delete_conversation().times(1).returning(|_| Ok(()));
        api.expect_create_conversation()
            .times(1)
            .returning(|| Ok(ConversationId::new("nueva")));

        let mut app = started_app(api).await;

        app.handle_action(InputAction::RequestDelete);
        assert!(app.confirming_delete);
        app.handle_action(InputAction::Cancel);
        assert!(!app.confirming_delete);
        assert_eq!(app.controller.in_flight(), 0);

        app.handle_action(InputAction::RequestDelete);
        app.handle_action(InputAction::Confirm);
        assert!(app.toast().is_some());

        app.controller.settle().await;
        app.sync();
        let ids: Vec<&str> = app.view.sidebar.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"nueva"));
        assert!(!ids.contains(&"b"));
    }
}
