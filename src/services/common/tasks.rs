use std::collections::HashMap;

use tokio::task::JoinHandle;

use super::Token;

/// Spawned tasks keyed by the token of the entity they serve.
///
/// Replacing or removing a task aborts it, and so does dropping the map.
#[derive(Debug, Default)]
pub(crate) struct TaskMap {
    tasks: HashMap<Token, JoinHandle<()>>,
}

impl TaskMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks `handle` under `token`, aborting the task it replaces.
    pub fn insert(&mut self, token: Token, handle: JoinHandle<()>) {
        if let Some(previous) = self.tasks.insert(token, handle) {
            previous.abort();
        }
    }

    /// Aborts the task under `token`. Returns whether there was one.
    pub fn abort(&mut self, token: Token) -> bool {
        match self.tasks.remove(&token) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Forgets tasks that have already run to completion.
    pub fn prune(&mut self) {
        self.tasks.retain(|_, handle| !handle.is_finished());
    }

    #[cfg(test)]
    pub fn contains(&self, token: Token) -> bool {
        self.tasks.contains_key(&token)
    }
}

impl Drop for TaskMap {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
