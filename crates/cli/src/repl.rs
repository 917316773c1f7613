//! Interactive chat REPL with persistent history.

use anyhow::Result;
use mcore::{ChatController, Clock, Message, Responder, Storage};
use rustyline::error::ReadlineError;
use std::path::PathBuf;

/// One parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Message(String),
    New,
    List,
    Select(String),
    Delete(String),
    Actions,
    /// Quick action by its 1-based position in `/actions`.
    Action(usize),
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    /// Parse a line; `/`-prefixed lines are commands.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix('/') else {
            return if line.is_empty() {
                Self::Empty
            } else {
                Self::Message(line.to_owned())
            };
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map(|(name, arg)| (name, arg.trim()))
            .unwrap_or((command, ""));
        match (name, arg) {
            ("new", _) => Self::New,
            ("list", _) => Self::List,
            ("select", id) if !id.is_empty() => Self::Select(id.to_owned()),
            ("delete", id) if !id.is_empty() => Self::Delete(id.to_owned()),
            ("actions", _) => Self::Actions,
            ("action", n) => match n.parse() {
                Ok(n) if n > 0 => Self::Action(n),
                _ => Self::Unknown(line.to_owned()),
            },
            ("help", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            _ => Self::Unknown(line.to_owned()),
        }
    }
}

const HELP: &str = "\
/new             start a new conversation
/list            list conversations
/select <id>     switch conversation
/delete <id>     delete a conversation
/actions         show quick actions
/action <n>      send quick action n
/quit            leave";

/// Interactive chat over a [`ChatController`].
pub struct ChatRepl<R, S, C> {
    chat: ChatController<R, S, C>,
    editor: rustyline::DefaultEditor,
    history_path: Option<PathBuf>,
}

impl<R: Responder, S: Storage, C: Clock> ChatRepl<R, S, C> {
    pub fn new(chat: ChatController<R, S, C>) -> Result<Self> {
        let mut editor = rustyline::DefaultEditor::new()?;
        let history_path = history_file_path();
        if let Some(ref path) = history_path {
            let _ = editor.load_history(path);
        }
        Ok(Self {
            chat,
            editor,
            history_path,
        })
    }

    /// Run the interactive loop until `/quit` or Ctrl+D.
    pub async fn run(&mut self) -> Result<()> {
        println!("MAISYS Client Care (/help for commands, Ctrl+D to exit)");
        self.print_actions();

        loop {
            match self.editor.readline("> ") {
                Ok(line) => {
                    let input = Input::parse(&line);
                    if input != Input::Empty {
                        let _ = self.editor.add_history_entry(line.trim());
                    }
                    if !self.handle(input).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        self.save_history();
        Ok(())
    }

    /// Handle one input; `false` ends the loop.
    async fn handle(&mut self, input: Input) -> bool {
        match input {
            Input::Empty => {}
            Input::Message(text) => print_reply(self.chat.send(&text).await),
            Input::New => {
                self.chat.new_conversation();
                println!("New conversation.");
            }
            Input::List => self.print_conversations(),
            Input::Select(id) => {
                if self.chat.select_conversation(&id) {
                    println!("Switched to \"{}\".", self.chat.title());
                } else {
                    println!("No conversation {id}.");
                }
            }
            Input::Delete(id) => {
                if !self.chat.delete_conversation(&id) {
                    println!("No conversation {id}.");
                }
            }
            Input::Actions => self.print_actions(),
            Input::Action(n) => match self.chat.quick_actions().get(n - 1) {
                Some(action) => {
                    println!("> {action}");
                    print_reply(self.chat.quick_action(action).await);
                }
                None => println!("No quick action {n}."),
            },
            Input::Help => println!("{HELP}"),
            Input::Quit => return false,
            Input::Unknown(line) => println!("Unknown command {line}; try /help."),
        }
        true
    }

    fn print_actions(&self) {
        for (i, action) in self.chat.quick_actions().iter().enumerate() {
            println!("  {}. {action}", i + 1);
        }
    }

    fn print_conversations(&self) {
        if self.chat.conversations().is_empty() {
            println!("No conversations yet.");
            return;
        }
        for conversation in self.chat.conversations() {
            let marker = if self.chat.active() == Some(conversation.id.as_str()) {
                '*'
            } else {
                ' '
            };
            println!(
                "{marker} {}  {}  ({})",
                conversation.id,
                conversation.title,
                conversation.timestamp.format("%d/%m %H:%M")
            );
        }
    }

    fn save_history(&mut self) {
        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = self.editor.save_history(path);
        }
    }
}

fn print_reply(reply: Option<&Message>) {
    if let Some(reply) = reply {
        let name = reply.agent_name.as_deref().unwrap_or("MAISYS");
        println!("{name}: {}", reply.content);
    }
}

/// History lives at `~/.config/maisys/history`.
fn history_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("maisys").join("history"))
}
