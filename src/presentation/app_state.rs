// Application state for HTTP handlers
use crate::application::commands::CommandDispatcher;
use crate::application::coordinator::MinerSession;
use std::collections::HashMap;

/// One running miner: its polling session plus a dispatcher sharing the
/// same underlying client.
pub struct MinerHandle {
    pub session: MinerSession,
    pub dispatcher: CommandDispatcher,
}

pub struct AppState {
    pub miners: HashMap<String, MinerHandle>,
}
