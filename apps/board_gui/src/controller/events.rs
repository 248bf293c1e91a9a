//! Backend-to-UI events and error modeling for the board controller.

use board_core::BoardSnapshot;
use shared::error::ErrorNotice;

pub enum UiEvent {
    Info(String),
    BoardLoaded(Box<BoardSnapshot>),
    /// Inline notice that replaces the board.
    LoadFailed(ErrorNotice),
    PageAdvanced(usize),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Data,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Refresh,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("request failed")
            || message_lower.contains("responded with")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid document")
            || message_lower.contains("read failed")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Data
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Data => "Data",
        UiErrorCategory::Unknown => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_command_processor_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected (possible startup/runtime failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
        assert_eq!(err_label(err.category()), "Transport");
    }

    #[test]
    fn classifies_undecodable_document_as_data_error() {
        let err = UiError::from_message(
            UiErrorContext::Refresh,
            "failed to load shipment data from feed.json: invalid document: expected value",
        );
        assert_eq!(err.category(), UiErrorCategory::Data);
        assert_eq!(err.context(), UiErrorContext::Refresh);
    }
}
