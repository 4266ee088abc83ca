use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::auth::{AuthError, AuthFacade, validation};
use crate::models::{Catalog, QuestionSet, Section, Topic};
use crate::prefs::{ColorScheme, Side, SidebarStore, Signal, ThemeStore};
use crate::protocol::User;
use crate::quiz::QuizSession;
use crate::storage::SlotStore;

const SCROLL_PAGE: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Topic,
    Quiz,
    Result,
    Login,
    Register,
    Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicTab {
    #[default]
    Overview,
    Examples,
    Practice,
}

impl TopicTab {
    pub const ALL: [TopicTab; 3] = [TopicTab::Overview, TopicTab::Examples, TopicTab::Practice];

    pub fn title(self) -> &'static str {
        match self {
            TopicTab::Overview => "Overview",
            TopicTab::Examples => "Examples",
            TopicTab::Practice => "Practice",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// An actionable row on the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeEntry {
    Topic(usize),
    FullQuiz,
    Login,
    Register,
    Profile,
    Logout,
}

/// Where the reader is inside the topic pages. `child` 0 is the section
/// itself, `n` is its n-th child section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TopicCursor {
    pub topic: usize,
    pub section: usize,
    pub child: usize,
    pub tab: TopicTab,
    pub scroll: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
}

pub struct FormField {
    pub label: &'static str,
    pub value: String,
    pub secret: bool,
}

impl FormField {
    fn new(label: &'static str, secret: bool) -> Self {
        Self {
            label,
            value: String::new(),
            secret,
        }
    }
}

pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl Form {
    pub fn login() -> Self {
        Self {
            kind: FormKind::Login,
            fields: vec![FormField::new("Email", false), FormField::new("Password", true)],
            focus: 0,
        }
    }

    pub fn register() -> Self {
        Self {
            kind: FormKind::Register,
            fields: vec![
                FormField::new("Display name (optional)", false),
                FormField::new("Email", false),
                FormField::new("Password", true),
                FormField::new("Confirm password", true),
            ],
            focus: 0,
        }
    }

    fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|field| field.value.as_str())
            .unwrap_or_default()
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    fn focus_previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    fn focused_mut(&mut self) -> Option<&mut String> {
        self.fields.get_mut(self.focus).map(|field| &mut field.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub is_error: bool,
}

/// Work that has to leave the event loop and wait on the auth backend.
pub enum Task {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        password_confirm: String,
        display_name: Option<String>,
    },
    Logout,
    LoadProfile,
}

pub struct App {
    catalog: Catalog,
    view: View,
    home_selected: usize,
    topic: TopicCursor,
    quiz: Option<QuizSession>,
    quiz_origin: View,
    result_scroll: u16,
    form: Form,
    profile: Option<User>,
    status: Option<Status>,
    auth: AuthFacade,
    theme: ThemeStore,
    sidebars: SidebarStore,
    viewport: Signal<u16>,
    system_scheme: Signal<ColorScheme>,
    should_quit: bool,
}

impl App {
    /// Build the shell. The saved session is restored without contacting the server.
    pub fn new(
        catalog: Catalog,
        mut auth: AuthFacade,
        store: Arc<dyn SlotStore>,
        system_scheme: ColorScheme,
        width: u16,
    ) -> Self {
        let viewport = Signal::new(width);
        let system_scheme = Signal::new(system_scheme);
        let theme = ThemeStore::new(Arc::clone(&store), system_scheme.clone());
        let sidebars = SidebarStore::new(store, &viewport);
        if let Some(user) = auth.restore().user.as_ref() {
            info!(user = %user.id, "restored saved session");
        }

        Self {
            catalog,
            view: View::Home,
            home_selected: 0,
            topic: TopicCursor::default(),
            quiz: None,
            quiz_origin: View::Home,
            result_scroll: 0,
            form: Form::login(),
            profile: None,
            status: None,
            auth,
            theme,
            sidebars,
            viewport,
            system_scheme,
            should_quit: false,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn home_selected(&self) -> usize {
        self.home_selected
    }

    pub fn topic_cursor(&self) -> TopicCursor {
        self.topic
    }

    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub fn result_scroll(&self) -> u16 {
        self.result_scroll
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn profile(&self) -> Option<&User> {
        self.profile.as_ref()
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn auth(&self) -> &AuthFacade {
        &self.auth
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn sidebars(&self) -> &SidebarStore {
        &self.sidebars
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn resize(&self, width: u16) {
        self.viewport.set(width);
    }

    /// Terminals give no notice when their palette changes, so the scheme is
    /// resolved once at startup. Embedders that can detect a change call this.
    pub fn set_system_scheme(&self, scheme: ColorScheme) {
        self.system_scheme.set(scheme);
    }

    pub fn home_entries(&self) -> Vec<HomeEntry> {
        let mut entries: Vec<HomeEntry> = (0..self.catalog.topics.len())
            .map(HomeEntry::Topic)
            .collect();
        if !self.catalog.quiz.is_empty() {
            entries.push(HomeEntry::FullQuiz);
        }
        if self.auth.is_authenticated() {
            entries.extend([HomeEntry::Profile, HomeEntry::Logout]);
        } else {
            entries.extend([HomeEntry::Login, HomeEntry::Register]);
        }
        entries
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        self.catalog.topics.get(self.topic.topic)
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.current_topic()?.sections.get(self.topic.section)
    }

    /// The section whose content is showing: the current one or one of its children.
    pub fn focused_section(&self) -> Option<&Section> {
        let section = self.current_section()?;
        match self.topic.child {
            0 => Some(section),
            n => section.children.get(n - 1),
        }
    }

    fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: false,
        });
    }

    fn set_error(&mut self, text: impl Into<String>) {
        self.status = Some(Status {
            text: text.into(),
            is_error: true,
        });
    }

    /// Apply one key press. A returned task must be passed to [`App::perform`].
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Task> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        if matches!(self.view, View::Login | View::Register) {
            return self.handle_form_key(key);
        }

        self.status = None;
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('t') => {
                self.toggle_theme();
                return None;
            }
            KeyCode::Char('[') => {
                self.toggle_sidebar(Side::Left);
                return None;
            }
            KeyCode::Char(']') => {
                self.toggle_sidebar(Side::Right);
                return None;
            }
            _ => {}
        }

        match self.view {
            View::Home => self.handle_home_key(key.code),
            View::Topic => {
                self.handle_topic_key(key.code);
                None
            }
            View::Quiz => {
                self.handle_quiz_key(key.code);
                None
            }
            View::Result => {
                self.handle_result_key(key.code);
                None
            }
            View::Profile => self.handle_profile_key(key.code),
            View::Login | View::Register => None,
        }
    }

    fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => debug!(?theme, "theme toggled"),
            Err(err) => self.set_error(format!("Could not save the theme: {}", err)),
        }
    }

    fn toggle_sidebar(&mut self, side: Side) {
        if let Err(err) = self.sidebars.toggle(side) {
            self.set_error(format!("Could not save the layout: {}", err));
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) -> Option<Task> {
        let entries = self.home_entries();
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.home_selected = (self.home_selected + 1).min(entries.len().saturating_sub(1));
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.home_selected = self.home_selected.saturating_sub(1);
                None
            }
            KeyCode::Enter => {
                let entry = entries.get(self.home_selected).copied()?;
                self.open_entry(entry)
            }
            _ => None,
        }
    }

    fn open_entry(&mut self, entry: HomeEntry) -> Option<Task> {
        match entry {
            HomeEntry::Topic(index) => {
                self.topic = TopicCursor {
                    topic: index,
                    ..TopicCursor::default()
                };
                self.view = View::Topic;
                None
            }
            HomeEntry::FullQuiz => {
                self.start_quiz(self.catalog.quiz.clone(), View::Home);
                None
            }
            HomeEntry::Login => {
                self.form = Form::login();
                self.view = View::Login;
                None
            }
            HomeEntry::Register => {
                self.form = Form::register();
                self.view = View::Register;
                None
            }
            HomeEntry::Profile => {
                self.view = View::Profile;
                self.set_info("Loading profile...");
                Some(Task::LoadProfile)
            }
            HomeEntry::Logout => {
                self.set_info("Signing out...");
                Some(Task::Logout)
            }
        }
    }

    fn handle_topic_key(&mut self, key: KeyCode) {
        let section_count = self
            .current_topic()
            .map(|topic| topic.sections.len())
            .unwrap_or(0);
        let child_count = self
            .current_section()
            .map(|section| section.children.len())
            .unwrap_or(0);

        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                if self.topic.section + 1 < section_count {
                    self.move_to_section(self.topic.section + 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.topic.section > 0 {
                    self.move_to_section(self.topic.section - 1);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.topic.tab = self.topic.tab.next();
                self.topic.scroll = 0;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.topic.tab = self.topic.tab.previous();
                self.topic.scroll = 0;
            }
            KeyCode::Tab => {
                self.topic.child = (self.topic.child + 1) % (child_count + 1);
                self.topic.scroll = 0;
            }
            KeyCode::BackTab => {
                self.topic.child = (self.topic.child + child_count) % (child_count + 1);
                self.topic.scroll = 0;
            }
            KeyCode::PageDown => self.topic.scroll = self.topic.scroll.saturating_add(SCROLL_PAGE),
            KeyCode::PageUp => self.topic.scroll = self.topic.scroll.saturating_sub(SCROLL_PAGE),
            KeyCode::Enter => self.start_practice(),
            KeyCode::Esc => self.view = View::Home,
            _ => {}
        }
    }

    fn move_to_section(&mut self, index: usize) {
        self.topic = TopicCursor {
            topic: self.topic.topic,
            section: index,
            ..TopicCursor::default()
        };
    }

    fn start_practice(&mut self) {
        let Some(set) = self
            .focused_section()
            .filter(|section| section.has_practice())
            .map(Section::practice_set)
        else {
            self.set_info("This section has no practice questions");
            return;
        };
        self.start_quiz(vec![set], View::Topic);
    }

    fn start_quiz(&mut self, sets: Vec<QuestionSet>, origin: View) {
        match QuizSession::new(sets) {
            Ok(session) => {
                info!(
                    sets = session.sets().len(),
                    questions = session.total_questions(),
                    "quiz started"
                );
                self.quiz = Some(session);
                self.quiz_origin = origin;
                self.view = View::Quiz;
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn leave_quiz(&mut self) {
        self.quiz = None;
        self.result_scroll = 0;
        self.view = self.quiz_origin;
    }

    fn handle_quiz_key(&mut self, key: KeyCode) {
        let Some(quiz) = self.quiz.as_mut() else {
            self.view = self.quiz_origin;
            return;
        };

        match key {
            KeyCode::Char(c @ '1'..='9') => {
                if let Some(digit) = c.to_digit(10) {
                    quiz.select_answer(digit as usize - 1);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => quiz.cycle_selection(1),
            KeyCode::Up | KeyCode::Char('k') => quiz.cycle_selection(-1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if quiz.is_answer_submitted() {
                    quiz.advance();
                    if quiz.is_complete() {
                        info!(
                            correct = quiz.correct_count(),
                            total = quiz.total_questions(),
                            "quiz complete"
                        );
                        self.result_scroll = 0;
                        self.view = View::Result;
                    }
                } else if !quiz.submit_answer() {
                    self.set_info("Pick an answer first");
                }
            }
            KeyCode::Char('r') => quiz.reset(),
            KeyCode::Esc => self.leave_quiz(),
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Down | KeyCode::Char('j') => {
                self.result_scroll = self.result_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.result_scroll = self.result_scroll.saturating_sub(1);
            }
            KeyCode::Char('r') => {
                if let Some(quiz) = self.quiz.as_mut() {
                    quiz.reset();
                    self.result_scroll = 0;
                    self.view = View::Quiz;
                }
            }
            KeyCode::Esc | KeyCode::Enter => self.leave_quiz(),
            _ => {}
        }
    }

    fn handle_profile_key(&mut self, key: KeyCode) -> Option<Task> {
        match key {
            KeyCode::Char('r') => {
                self.set_info("Loading profile...");
                Some(Task::LoadProfile)
            }
            KeyCode::Char('o') => {
                self.set_info("Signing out...");
                Some(Task::Logout)
            }
            KeyCode::Esc => {
                self.view = View::Home;
                None
            }
            _ => None,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Task> {
        match key.code {
            KeyCode::Esc => {
                self.status = None;
                self.view = View::Home;
                None
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus_next();
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus_previous();
                None
            }
            KeyCode::Backspace => {
                if let Some(value) = self.form.focused_mut() {
                    value.pop();
                }
                None
            }
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(value) = self.form.focused_mut() {
                    value.push(c);
                }
                None
            }
            _ => None,
        }
    }

    /// Run the caller-side checks and hand the request off, or show why not.
    fn submit_form(&mut self) -> Option<Task> {
        let task = match self.form.kind {
            FormKind::Login => {
                let email = self.form.value(0).trim().to_string();
                let password = self.form.value(1).to_string();
                validation::validate_login(&email, &password)
                    .map(|()| Task::Login { email, password })
            }
            FormKind::Register => {
                let display_name = Some(self.form.value(0).trim())
                    .filter(|name| !name.is_empty())
                    .map(str::to_string);
                let email = self.form.value(1).trim().to_string();
                let password = self.form.value(2).to_string();
                let password_confirm = self.form.value(3).to_string();
                validation::validate_registration(&email, &password, &password_confirm).map(
                    |()| Task::Register {
                        email,
                        password,
                        password_confirm,
                        display_name,
                    },
                )
            }
        };

        match task {
            Ok(task) => {
                let text = match self.form.kind {
                    FormKind::Login => "Signing in...",
                    FormKind::Register => "Creating account...",
                };
                self.set_info(text);
                Some(task)
            }
            Err(err) => {
                debug!(error = %err, "form rejected before submit");
                self.set_error(err.to_string());
                None
            }
        }
    }

    /// Await a task produced by [`App::handle_key`] and fold its outcome into the view.
    pub async fn perform(&mut self, task: Task) {
        match task {
            Task::Login { email, password } => {
                let result = self.auth.login(&email, &password).await;
                self.finish_sign_in(result);
            }
            Task::Register {
                email,
                password,
                password_confirm,
                display_name,
            } => {
                let result = self
                    .auth
                    .register(&email, &password, &password_confirm, display_name.as_deref())
                    .await;
                self.finish_sign_in(result);
            }
            Task::Logout => {
                match self.auth.logout().await {
                    Ok(()) => self.set_info("Signed out"),
                    Err(err) => self.set_error(err.to_string()),
                }
                self.profile = None;
                self.view = View::Home;
                self.home_selected = self.home_selected.min(self.home_entries().len() - 1);
            }
            Task::LoadProfile => match self.auth.current_user().await {
                Ok(user) => {
                    self.profile = Some(user);
                    self.status = None;
                }
                Err(err @ (AuthError::NotAuthenticated | AuthError::Unauthorized(_))) => {
                    warn!(error = %err, "profile needs a fresh sign in");
                    self.profile = None;
                    self.form = Form::login();
                    self.view = View::Login;
                    self.set_error("Please sign in again");
                }
                Err(err) => {
                    warn!(error = %err, "failed to load profile");
                    self.set_error(err.to_string());
                }
            },
        }
    }

    fn finish_sign_in(&mut self, result: Result<User, AuthError>) {
        match result {
            Ok(user) => {
                self.set_info(format!("Signed in as {}", user.name()));
                self.profile = Some(user);
                self.form = Form::login();
                self.view = View::Home;
            }
            Err(err) => {
                warn!(error = %err, "sign in failed");
                self.set_error(err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryBackend;
    use crate::prefs::SIDEBAR_BREAKPOINT;
    use crate::storage::MemoryStore;

    fn app() -> App {
        let store: Arc<dyn SlotStore> = Arc::new(MemoryStore::new());
        let auth = AuthFacade::new(Box::new(MemoryBackend::new()), Arc::clone(&store));
        App::new(
            Catalog::builtin().unwrap(),
            auth,
            store,
            ColorScheme::Dark,
            120,
        )
    }

    fn press(app: &mut App, code: KeyCode) -> Option<Task> {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn select_entry(app: &mut App, entry: HomeEntry) -> Option<Task> {
        let index = app
            .home_entries()
            .iter()
            .position(|candidate| *candidate == entry)
            .unwrap();
        while app.home_selected() > index {
            press(app, KeyCode::Up);
        }
        while app.home_selected() < index {
            press(app, KeyCode::Down);
        }
        press(app, KeyCode::Enter)
    }

    #[test]
    fn opens_topic_and_returns_home() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::Topic(1));
        assert_eq!(app.view(), View::Topic);
        assert_eq!(app.current_topic().unwrap().id, "react");

        press(&mut app, KeyCode::Right);
        assert_eq!(app.topic_cursor().tab, TopicTab::Examples);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.topic_cursor().section, 1);
        assert_eq!(app.topic_cursor().tab, TopicTab::Overview);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view(), View::Home);
    }

    #[test]
    fn child_tabs_cycle_back_to_parent() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::Topic(0));
        while app.current_section().unwrap().children.is_empty() {
            press(&mut app, KeyCode::Down);
        }
        let children = app.current_section().unwrap().children.len();

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.topic_cursor().child, 1);
        assert_eq!(
            app.focused_section().unwrap().id,
            app.current_section().unwrap().children[0].id
        );
        for _ in 0..children {
            press(&mut app, KeyCode::Tab);
        }
        assert_eq!(app.topic_cursor().child, 0);
    }

    #[test]
    fn full_quiz_runs_to_result() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::FullQuiz);
        assert_eq!(app.view(), View::Quiz);

        press(&mut app, KeyCode::Enter);
        assert!(app.status().is_some());
        assert!(!app.quiz().unwrap().is_answer_submitted());

        while app.view() == View::Quiz {
            let correct = app.quiz().unwrap().current_question().correct_option;
            let digit = char::from_digit(correct as u32 + 1, 10).unwrap();
            press(&mut app, KeyCode::Char(digit));
            press(&mut app, KeyCode::Enter);
            assert!(app.quiz().unwrap().is_answer_submitted());
            press(&mut app, KeyCode::Enter);
        }

        assert_eq!(app.view(), View::Result);
        assert_eq!(app.quiz().unwrap().score_percent(), Some(100));

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.view(), View::Quiz);
        assert!(app.quiz().unwrap().answer_history().is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view(), View::Home);
        assert!(app.quiz().is_none());
    }

    #[test]
    fn practice_returns_to_topic() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::Topic(0));
        while !app.current_section().unwrap().has_practice() {
            press(&mut app, KeyCode::Down);
        }

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.view(), View::Quiz);
        assert_eq!(app.quiz().unwrap().sets().len(), 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.view(), View::Topic);
    }

    #[test]
    fn q_types_into_forms_but_quits_elsewhere() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::Login);
        assert_eq!(app.view(), View::Login);

        type_text(&mut app, "q@x.io");
        assert!(!app.should_quit());
        assert_eq!(app.form().fields[0].value, "q@x.io");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());
    }

    #[test]
    fn invalid_login_never_reaches_backend() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::Login);
        type_text(&mut app, "not-an-email");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "password1");

        assert!(press(&mut app, KeyCode::Enter).is_none());
        assert!(app.status().unwrap().is_error);
        assert_eq!(app.view(), View::Login);
    }

    #[tokio::test]
    async fn register_then_sign_out() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::Register);
        type_text(&mut app, "Ada");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "ada@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "password1");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "password1");

        let task = press(&mut app, KeyCode::Enter).unwrap();
        app.perform(task).await;

        assert_eq!(app.view(), View::Home);
        assert!(app.auth().is_authenticated());
        assert_eq!(app.status().unwrap().text, "Signed in as Ada");
        assert!(app.home_entries().contains(&HomeEntry::Profile));

        let task = select_entry(&mut app, HomeEntry::Profile).unwrap();
        app.perform(task).await;
        assert_eq!(app.profile().unwrap().email, "ada@example.com");

        let task = press(&mut app, KeyCode::Char('o')).unwrap();
        app.perform(task).await;
        assert!(!app.auth().is_authenticated());
        assert!(app.home_entries().contains(&HomeEntry::Login));
        assert!(app.home_selected() < app.home_entries().len());
    }

    #[tokio::test]
    async fn wrong_password_stays_on_form() {
        let mut app = app();
        select_entry(&mut app, HomeEntry::Login);
        type_text(&mut app, "ada@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "password1");

        let task = press(&mut app, KeyCode::Enter).unwrap();
        app.perform(task).await;

        assert_eq!(app.view(), View::Login);
        let status = app.status().unwrap();
        assert!(status.is_error);
        assert_eq!(status.text, "Invalid email or password");
    }

    #[test]
    fn system_theme_follows_scheme_signal() {
        let app = app();
        assert_eq!(app.theme().resolved_theme(), ColorScheme::Dark);
        app.set_system_scheme(ColorScheme::Light);
        assert_eq!(app.theme().resolved_theme(), ColorScheme::Light);
    }

    #[test]
    fn theme_and_sidebar_keys() {
        let mut app = app();
        assert_eq!(app.theme().resolved_theme(), ColorScheme::Dark);
        press(&mut app, KeyCode::Char('t'));
        assert_eq!(app.theme().resolved_theme(), ColorScheme::Light);

        assert!(app.sidebars().is_open(Side::Left));
        press(&mut app, KeyCode::Char('['));
        assert!(!app.sidebars().is_open(Side::Left));

        app.resize(SIDEBAR_BREAKPOINT - 1);
        assert!(!app.sidebars().is_open(Side::Right));
        app.resize(SIDEBAR_BREAKPOINT);
        assert!(app.sidebars().is_open(Side::Right));
        assert!(!app.sidebars().is_open(Side::Left));
    }
}
