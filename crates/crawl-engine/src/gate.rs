//! ConfirmationGate: at-most-once operator confirmation shared by
//! concurrent fetches.
//!
//! State machine: `Idle → Prompting → Resolved(answer)`. The first caller to
//! report a failure wins the `Idle → Prompting` transition under the state
//! lock and owns the prompt; every other caller waits on the same watch
//! channel and observes the same answer. Once resolved, the answer is
//! returned without prompting until the gate is dropped.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{watch, Semaphore};

use crawl_core::errors::SourceError;
use crawl_core::events::{EventDispatcher, GatePromptEvent, GateResolvedEvent};
use crawl_core::traits::{is_affirmative, ConfirmationPrompt};
use crawl_core::NodeId;

/// Text shown to the operator.
pub const RETRY_PROMPT: &str = "Retry? (yes) ";

/// Observable phase of a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePhase {
    Idle,
    Prompting,
    Resolved(bool),
}

enum GateState {
    Idle,
    Prompting(watch::Receiver<Option<bool>>),
    Resolved(bool),
}

enum Role {
    Owner(watch::Sender<Option<bool>>),
    Waiter(watch::Receiver<Option<bool>>),
}

pub struct ConfirmationGate<P> {
    prompt: Arc<P>,
    state: Mutex<GateState>,
    /// Bounds concurrent callers to the number of fetches the gate serves.
    waiters: Semaphore,
    capacity: usize,
    prompts_issued: AtomicUsize,
    events: EventDispatcher,
}

impl<P: ConfirmationPrompt> ConfirmationGate<P> {
    /// Create an idle gate serving up to `capacity` concurrent callers.
    pub fn new(prompt: Arc<P>, capacity: usize, events: EventDispatcher) -> Self {
        let capacity = capacity.max(1);
        Self {
            prompt,
            state: Mutex::new(GateState::Idle),
            waiters: Semaphore::new(capacity),
            capacity,
            prompts_issued: AtomicUsize::new(0),
            events,
        }
    }

    /// Ask whether the fetch of `node_id` may keep retrying after `failure`.
    ///
    /// Prompts only if no prompt has been issued or resolved yet; otherwise
    /// waits for, or returns, the shared answer.
    pub async fn confirm(&self, node_id: &NodeId, failure: &SourceError) -> bool {
        let Ok(_permit) = self.waiters.acquire().await else {
            return false;
        };

        loop {
            let role = {
                let mut state = self.lock_state();
                let in_flight = match &*state {
                    GateState::Resolved(answer) => return *answer,
                    GateState::Prompting(rx) => Some(rx.clone()),
                    GateState::Idle => None,
                };
                match in_flight {
                    Some(rx) => Role::Waiter(rx),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        *state = GateState::Prompting(rx);
                        Role::Owner(tx)
                    }
                }
            };

            match role {
                Role::Owner(tx) => return self.prompt_as_owner(tx, node_id, failure).await,
                Role::Waiter(mut rx) => {
                    tracing::debug!(node_id = %node_id, "confirmation already in flight; waiting");
                    match rx.wait_for(Option::is_some).await {
                        Ok(answer) => return answer.unwrap_or(false),
                        // The owner was dropped mid-prompt and reset the gate.
                        Err(_) => continue,
                    }
                }
            }
        }
    }

    async fn prompt_as_owner(
        &self,
        tx: watch::Sender<Option<bool>>,
        node_id: &NodeId,
        failure: &SourceError,
    ) -> bool {
        let mut guard = OwnerGuard {
            gate: self,
            resolved: false,
        };

        self.prompts_issued.fetch_add(1, Ordering::SeqCst);
        tracing::error!(node_id = %node_id, error = %failure, "adjacency lookup failed");
        self.events.emit_gate_prompt(&GatePromptEvent {
            node_id: node_id.clone(),
            error: failure.to_string(),
        });

        let proceed = match self.prompt.ask(RETRY_PROMPT).await {
            Ok(answer) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "confirmation prompt failed; treating as decline");
                false
            }
        };

        *self.lock_state() = GateState::Resolved(proceed);
        guard.resolved = true;
        tx.send_replace(Some(proceed));

        tracing::debug!(proceed, "confirmation gate resolved");
        self.events.emit_gate_resolved(&GateResolvedEvent { proceed });
        proceed
    }

    pub fn phase(&self) -> GatePhase {
        match &*self.lock_state() {
            GateState::Idle => GatePhase::Idle,
            GateState::Prompting(_) => GatePhase::Prompting,
            GateState::Resolved(answer) => GatePhase::Resolved(*answer),
        }
    }

    /// Number of times the underlying prompt was invoked.
    pub fn prompts_issued(&self) -> usize {
        self.prompts_issued.load(Ordering::SeqCst)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P> std::fmt::Debug for ConfirmationGate<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationGate")
            .field("capacity", &self.capacity)
            .field("prompts_issued", &self.prompts_issued.load(Ordering::SeqCst))
            .finish()
    }
}

/// Returns the gate to `Idle` if the owning future is dropped before the
/// prompt resolves, so a later caller can prompt again. Dropping the sender
/// wakes current waiters, which then re-enter the state machine.
struct OwnerGuard<'g, P: ConfirmationPrompt> {
    gate: &'g ConfirmationGate<P>,
    resolved: bool,
}

impl<P: ConfirmationPrompt> Drop for OwnerGuard<'_, P> {
    fn drop(&mut self) {
        if !self.resolved {
            *self.gate.lock_state() = GateState::Idle;
        }
    }
}
