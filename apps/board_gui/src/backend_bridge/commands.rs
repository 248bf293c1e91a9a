//! Backend commands queued from UI to backend worker.

pub enum BackendCommand {
    /// Run a load cycle now.
    Refresh,
    /// Stop timers and end the worker.
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Refresh => "refresh",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
