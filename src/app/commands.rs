//! Inbound commands to the application service.
//!
//! These represent actions requested by the user (buttons, title editor)
//! that the [`PetService`](super::service::PetService) interprets and
//! acts upon.

use crate::pet::Interaction;

/// Commands that the UI can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Spend an action to restore energy.
    Feed,

    /// Spend an action to restore happiness.
    Play,

    /// Spend an action to restore health.
    Clean,

    /// Save a new display title.  Blank input restores the default.
    Rename(String),

    /// Start over with a fresh egg.
    Reset,
}

impl AppCommand {
    /// The interaction behind a button command, if any.
    pub fn interaction(&self) -> Option<Interaction> {
        match self {
            Self::Feed => Some(Interaction::Feed),
            Self::Play => Some(Interaction::Play),
            Self::Clean => Some(Interaction::Clean),
            Self::Rename(_) | Self::Reset => None,
        }
    }

    /// Parse a console command line (`feed`, `rename Pingu`, ...).
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        match word.to_ascii_lowercase().as_str() {
            "feed" => Some(Self::Feed),
            "play" => Some(Self::Play),
            "clean" => Some(Self::Clean),
            "reset" => Some(Self::Reset),
            "rename" => Some(Self::Rename(rest.trim().to_string())),
            _ => None,
        }
    }
}
