//! Interactive REPL implementation.
//!
//! Each line is either a slash command or plain input. Plain input goes to
//! the assistant while its panel is open, to the search box in the grid, and
//! to the mounted widget in a tool view.

use std::sync::Arc;

use reedline::Signal;
use tracing::{debug, warn};

use super::commands::{parse_command, show_help, Command, CommandResult};
use super::completion::{category_hint, create_reedline, ToolCompleter, ToolPrompt};
use super::pickers;
use crate::chat::{ChatAssistant, GeminiClient, TextGenerator};
use crate::config::Settings;
use crate::messaging::{Message, Spinner, TerminalRenderer};
use crate::registry::Category;
use crate::shell::{AuthMode, Credentials, Router, ShellAction, ShellState, View};
use crate::widgets::{usage_message, WidgetContext, WidgetError};

/// REPL state.
pub struct Repl {
    state: ShellState,
    router: Router,
    ctx: WidgetContext,
    assistant: ChatAssistant,
    renderer: TerminalRenderer,
    /// Spinners and pickers are only used on a terminal.
    interactive: bool,
}

impl Repl {
    /// Create a new REPL backed by the configured Gemini client.
    pub fn new(settings: &Settings) -> Self {
        let generator = Arc::new(GeminiClient::from_settings(&settings.chat));
        Self::with_parts(
            WidgetContext::from_settings(settings),
            generator,
            settings.dark_mode,
        )
    }

    pub fn with_parts(
        ctx: WidgetContext,
        generator: Arc<dyn TextGenerator>,
        dark_mode: bool,
    ) -> Self {
        Self {
            state: ShellState::new(dark_mode),
            router: Router::new(),
            ctx,
            assistant: ChatAssistant::new(generator),
            renderer: TerminalRenderer::new(dark_mode),
            interactive: false,
        }
    }

    /// Enable spinners and pickers.
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Set the initial grid filter.
    pub fn with_filter(mut self, category: Option<Category>, query: Option<&str>) -> Self {
        if let Some(category) = category {
            self.dispatch(ShellAction::SetCategory(category));
        }
        if let Some(query) = query {
            self.dispatch(ShellAction::SetQuery(query.to_string()));
        }
        self
    }

    /// Open a tool before the loop starts. Unknown ids are an error here
    /// because they come from the command line.
    pub fn with_tool(mut self, id: &str) -> anyhow::Result<Self> {
        self.dispatch(ShellAction::OpenTool(id.to_string()));
        if self.state.active_tool().is_none() {
            anyhow::bail!("Unknown tool '{}'. Run with --list to see tool ids.", id);
        }
        Ok(self)
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn assistant(&self) -> &ChatAssistant {
        &self.assistant
    }

    /// What the main area currently shows.
    pub fn current_view(&self) -> Message {
        match self.router.widget() {
            Some(widget) => widget.render(),
            None => self.state.grid(),
        }
    }

    /// Run the REPL loop.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut line_editor = create_reedline(ToolCompleter::new());
        self.show(&[self.current_view()]);

        loop {
            let prompt = ToolPrompt::for_state(&self.state);

            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match self.handle_input(line).await {
                        Ok(true) => {
                            println!("👋 Bye!");
                            break;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            let _ = self
                                .renderer
                                .render(&Message::error(format!("Error: {}", e)));
                        }
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("👋 Bye!");
                    break;
                }
                Err(err) => {
                    let _ = self
                        .renderer
                        .render(&Message::error(format!("Readline error: {}", err)));
                    break;
                }
            }
        }

        Ok(())
    }

    /// Handle user input (either command or plain text). Returns true to exit.
    pub async fn handle_input(&mut self, input: &str) -> anyhow::Result<bool> {
        let (result, messages) = self.execute(input).await;
        self.show(&messages);
        Ok(result == CommandResult::Exit)
    }

    /// Apply one line and return what should be shown.
    pub async fn execute(&mut self, input: &str) -> (CommandResult, Vec<Message>) {
        if input.starts_with('/') {
            return match parse_command(input) {
                Ok(command) => self.run_command(command).await,
                Err(e) => (
                    CommandResult::Continue,
                    vec![Message::error(format!("{}. Choose one of: {}", e, category_hint()))],
                ),
            };
        }
        (CommandResult::Continue, self.handle_plain(input).await)
    }

    async fn run_command(&mut self, command: Command) -> (CommandResult, Vec<Message>) {
        let messages = match command {
            Command::Exit => return (CommandResult::Exit, Vec::new()),
            Command::Pick => match self.pick(pickers::pick_command) {
                Some(cmd) => match parse_command(cmd) {
                    Ok(picked) => return Box::pin(self.run_command(picked)).await,
                    Err(_) => Vec::new(),
                },
                None => Vec::new(),
            },
            Command::Help => {
                show_help();
                Vec::new()
            }
            Command::Tools => {
                self.dispatch(ShellAction::Home);
                vec![self.state.grid()]
            }
            Command::Category(Some(category)) => self.filter(ShellAction::SetCategory(category)),
            Command::Category(None) => {
                let current = self.state.category;
                match self.pick(|| pickers::pick_category(current)) {
                    Some(category) => self.filter(ShellAction::SetCategory(category)),
                    None => Vec::new(),
                }
            }
            Command::Search(query) => self.filter(ShellAction::SetQuery(query)),
            Command::Open(Some(id)) => self.open_tool(&id),
            Command::Open(None) => {
                let tools = self.state.visible_tools();
                match self.pick(|| pickers::pick_tool(&tools)) {
                    Some(id) => self.open_tool(id),
                    None => Vec::new(),
                }
            }
            Command::Back | Command::Home => self.dispatch(ShellAction::Home),
            Command::Theme => self.dispatch(ShellAction::ToggleTheme),
            Command::Chat(None) => self.dispatch(ShellAction::ToggleChat),
            Command::Chat(Some(text)) => self.ask(&text).await,
            Command::Login => self.authenticate(AuthMode::Login),
            Command::Signup => self.authenticate(AuthMode::Signup),
            Command::Clear => vec![Message::Clear],
            Command::Unknown(cmd) => vec![Message::warning(format!(
                "Unknown command: /{}. Type /help for commands.",
                cmd
            ))],
        };
        (CommandResult::Continue, messages)
    }

    /// Apply `action`, remount as needed, and return the updated view.
    pub fn dispatch(&mut self, action: ShellAction) -> Vec<Message> {
        debug!(?action, "Shell action");
        let before = self.state.clone();
        self.state = std::mem::take(&mut self.state).apply(&action);
        let mounted = self.router.sync(self.state.view);

        match action {
            ShellAction::ToggleTheme => {
                self.renderer.set_dark_mode(self.state.dark_mode);
                let mode = if self.state.dark_mode { "on" } else { "off" };
                vec![Message::success(format!("Dark mode {}", mode))]
            }
            ShellAction::ToggleChat if self.state.chat_open => {
                let mut messages = vec![Message::info(
                    "Study assistant open. Ask anything; /chat closes it.",
                )];
                messages.extend(self.assistant.transcript());
                messages
            }
            ShellAction::ToggleChat => vec![Message::info("Study assistant closed.")],
            _ if mounted => vec![self.current_view()],
            _ if self.state.view == View::Grid
                && (before.view != View::Grid
                    || before.category != self.state.category
                    || before.query != self.state.query) =>
            {
                vec![self.state.grid()]
            }
            _ => Vec::new(),
        }
    }

    /// Change the grid filter and return to the grid.
    fn filter(&mut self, action: ShellAction) -> Vec<Message> {
        self.dispatch(ShellAction::Home);
        self.dispatch(action);
        vec![self.state.grid()]
    }

    fn open_tool(&mut self, id: &str) -> Vec<Message> {
        let messages = self.dispatch(ShellAction::OpenTool(id.to_string()));
        if self.state.active_tool().map(|kind| kind.id()) != Some(id) {
            return vec![Message::error(format!("Unknown tool '{}'.", id))];
        }
        messages
    }

    async fn handle_plain(&mut self, input: &str) -> Vec<Message> {
        if self.state.chat_open {
            return self.ask(input).await;
        }

        if self.router.widget().is_none() {
            // A card number opens that card; anything else searches.
            let visible = self.state.visible_tools();
            if let Ok(n) = input.parse::<usize>() {
                if let Some(tool) = n.checked_sub(1).and_then(|i| visible.get(i)) {
                    return self.open_tool(tool.id);
                }
            }
            return self.dispatch(ShellAction::SetQuery(input.to_string()));
        }

        self.handle_widget_input(input).await
    }

    async fn handle_widget_input(&mut self, input: &str) -> Vec<Message> {
        let interactive = self.interactive;
        let dark_mode = self.state.dark_mode;
        let ctx = &self.ctx;
        let Some(widget) = self.router.widget_mut() else {
            return Vec::new();
        };

        if input.eq_ignore_ascii_case("help") {
            return vec![usage_message(widget)];
        }

        let spinner = match widget.busy_label(input) {
            Some(label) if interactive => Some(Spinner::start(label, dark_mode)),
            _ => None,
        };
        let result = widget.handle(input, ctx).await;
        if let Some(handle) = spinner {
            handle.stop().await;
        }

        match result {
            Ok(messages) => messages,
            Err(e) => {
                match &e {
                    WidgetError::Failed { source, .. } => {
                        warn!(tool = widget.kind().id(), error = %source, "Widget operation failed")
                    }
                    _ => debug!(tool = widget.kind().id(), error = %e, "Widget rejected input"),
                }
                vec![Message::error(e.to_string())]
            }
        }
    }

    /// Send `text` to the assistant and return the reply.
    pub async fn ask(&mut self, text: &str) -> Vec<Message> {
        let spinner = self
            .interactive
            .then(|| Spinner::start("Thinking...", self.state.dark_mode));
        let reply = self.assistant.send(text).await.map(|m| m.to_message());
        if let Some(handle) = spinner {
            handle.stop().await;
        }
        reply.into_iter().collect()
    }

    fn authenticate(&mut self, mode: AuthMode) -> Vec<Message> {
        self.dispatch(ShellAction::OpenAuth(mode));
        let credentials = self.pick(|| pickers::collect_credentials(mode));
        self.submit_auth(credentials)
    }

    /// Finish the auth dialog. Credentials are dropped without being stored.
    pub fn submit_auth(&mut self, credentials: Option<Credentials>) -> Vec<Message> {
        match credentials {
            Some(credentials) => {
                let message = self.state.auth.submit_message();
                drop(credentials);
                self.dispatch(ShellAction::SubmitAuth);
                message.map(Message::success).into_iter().collect()
            }
            None => {
                self.dispatch(ShellAction::CloseAuth);
                Vec::new()
            }
        }
    }

    fn pick<T>(&self, picker: impl FnOnce() -> Option<T>) -> Option<T> {
        if self.interactive {
            picker()
        } else {
            None
        }
    }

    fn show(&self, messages: &[Message]) {
        if let Err(e) = self.renderer.render_all(messages) {
            warn!(error = %e, "Failed to render output");
        }
    }
}
