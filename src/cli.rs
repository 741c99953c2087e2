use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Lenny, the Camp Pool persona service", long_about = None)]
pub struct Args {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Serve the chat HTTP API (default)
    Serve {
        /// Address to bind, overrides LENNY_BIND_ADDR
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Chat with Lenny in the terminal
    Chat,
}

impl Args {
    pub fn command(&self) -> Command {
        match &self.command {
            Some(Command::Serve { bind }) => Command::Serve { bind: bind.clone() },
            Some(Command::Chat) => Command::Chat,
            None => Command::Serve { bind: None },
        }
    }
}
