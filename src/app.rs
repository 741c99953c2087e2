use crate::core::error::LennyError;
use crate::display;
use crate::history::{HistoryEntry, Sender};
use crate::input::{self, ConsoleInput};
use crate::lenny::{ChatReply, Lenny};

/// Sender tag used for Lenny's own turns in the console transcript
const LENNY_SENDER: &str = "lenny";

/// Interactive console session over a single dispatcher.
pub struct Application {
    lenny: Lenny,
    transcript: Vec<HistoryEntry>,
}

impl Application {
    pub fn new(lenny: Lenny) -> Self {
        Self {
            lenny,
            transcript: Vec::new(),
        }
    }

    pub async fn run(&mut self) -> Result<(), LennyError> {
        display::display_banner(self.lenny.provider().label(), self.lenny.model());
        let mut editor = input::create_editor()?;

        loop {
            match input::read_input(&mut editor)? {
                ConsoleInput::Exit => break,
                ConsoleInput::Blank => continue,
                ConsoleInput::Message(text) => match self.exchange(text).await {
                    ChatReply::Response(reply) => display::display_reply(&reply),
                    ChatReply::Error(message) => display::display_error(&message),
                },
            }
        }

        display::display_goodbye();
        Ok(())
    }

    /// Send one message with the session so far as history, then record
    /// both turns.
    async fn exchange(&mut self, text: String) -> ChatReply {
        let reply = self.lenny.send_msg(Some(&text), &self.transcript).await;
        if let ChatReply::Response(answer) = &reply {
            self.transcript.push(HistoryEntry::new(Sender::User, text));
            self.transcript.push(HistoryEntry::new(
                Sender::Other(LENNY_SENDER.to_string()),
                answer.clone(),
            ));
        }
        reply
    }
}
