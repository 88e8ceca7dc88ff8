//! Per-user conversation modes.
//!
//! A user is either idle or inside exactly one mode. Switching between two
//! modes always goes through `Idle`: the user has to cancel first.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Idle,
    Talking,
    Translating,
}

impl Mode {
    pub fn select(self, target: Mode) -> Result<Mode, TransitionError> {
        match (self, target) {
            (_, Mode::Idle) => Err(TransitionError::NotSelectable),
            (Mode::Idle, target) => Ok(target),
            (current, _) => Err(TransitionError::Busy { current }),
        }
    }

    pub fn is_idle(self) -> bool {
        self == Mode::Idle
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Idle => "idle",
            Mode::Talking => "talking",
            Mode::Translating => "translating",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("already in {current} mode, cancel it first")]
    Busy { current: Mode },
    #[error("idle is entered by cancelling, not by selecting it")]
    NotSelectable,
}

/// Storage for the current mode of each user.
pub trait ModeStore: Send + Sync {
    fn get(&self, user_id: u64) -> Mode;
    fn set(&self, user_id: u64, mode: Mode);
}

/// Process-local mode storage. Everything resets to `Idle` on restart.
#[derive(Default)]
pub struct InMemoryModes {
    modes: Mutex<HashMap<u64, Mode>>,
}

impl InMemoryModes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModeStore for InMemoryModes {
    fn get(&self, user_id: u64) -> Mode {
        let modes = self.modes.lock().unwrap_or_else(|e| e.into_inner());
        modes.get(&user_id).copied().unwrap_or_default()
    }

    fn set(&self, user_id: u64, mode: Mode) {
        let mut modes = self.modes.lock().unwrap_or_else(|e| e.into_inner());
        if mode.is_idle() {
            modes.remove(&user_id);
        } else {
            modes.insert(user_id, mode);
        }
    }
}

/// Applies the transition rules on top of a [`ModeStore`].
#[derive(Clone)]
pub struct Conversations {
    store: Arc<dyn ModeStore>,
}

impl Conversations {
    pub fn new(store: Arc<dyn ModeStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryModes::new()))
    }

    pub fn mode(&self, user_id: u64) -> Mode {
        self.store.get(user_id)
    }

    pub fn select(&self, user_id: u64, target: Mode) -> Result<Mode, TransitionError> {
        let next = self.store.get(user_id).select(target)?;
        self.store.set(user_id, next);
        tracing::debug!("User {} entered {} mode", user_id, next);
        Ok(next)
    }

    /// Return to `Idle`, yielding the mode that was left.
    pub fn cancel(&self, user_id: u64) -> Mode {
        let previous = self.store.get(user_id);
        if !previous.is_idle() {
            self.store.set(user_id, Mode::Idle);
            tracing::debug!("User {} left {} mode", user_id, previous);
        }
        previous
    }
}
