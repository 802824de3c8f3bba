//! Authoritative slice position behind the scrollbar.
//!
//! [`SliceStore::apply`] is the only place the position changes. Writers
//! (resolver seed, navigation completion, native event bridge) describe what
//! they saw as a [`SliceWrite`]; the store decides whether it is still
//! current for the mounted viewport.

use crate::dataflow::Actor;
use futures_signals::signal::{Mutable, Signal};
use shared::SliceState;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteSource {
    Resolver,
    Navigation,
    StackEvent,
    VolumeEvent,
}

/// Generation of the viewport identity the store currently follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportEpoch(u64);

/// Stamp taken when a navigation command is issued.
///
/// A completion is applied only if the viewport identity is unchanged and no
/// other write landed since the command went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationToken {
    pub(crate) epoch: ViewportEpoch,
    pub(crate) sequence: u64,
    pub(crate) revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SliceWrite {
    Seed {
        state: SliceState,
        epoch: ViewportEpoch,
    },
    Observed {
        source: WriteSource,
        state: SliceState,
        epoch: ViewportEpoch,
    },
    Navigated {
        target_index: usize,
        token: NavigationToken,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Applied,
    /// Same position as before; nothing changed.
    Unchanged,
    /// Written for an older viewport identity or superseded by a newer write.
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedWrite {
    pub source: WriteSource,
    pub state: SliceState,
    pub revision: u64,
}

#[derive(Debug)]
struct WriteLedger {
    epoch: Cell<ViewportEpoch>,
    revision: Cell<u64>,
    last_write: Mutable<Option<AppliedWrite>>,
}

#[derive(Clone, Debug)]
pub struct SliceStore {
    state: Actor<SliceState>,
    ledger: Rc<WriteLedger>,
}

impl SliceStore {
    pub fn new() -> Self {
        Self {
            state: Actor::new(SliceState::EMPTY, |_state| async move {}),
            ledger: Rc::new(WriteLedger {
                epoch: Cell::new(ViewportEpoch::default()),
                revision: Cell::new(0),
                last_write: Mutable::new(None),
            }),
        }
    }

    pub fn signal(&self) -> impl Signal<Item = SliceState> + use<> {
        self.state.signal()
    }

    pub fn snapshot(&self) -> SliceState {
        self.state.state.get()
    }

    /// Number of writes that changed the position so far.
    pub fn revision(&self) -> u64 {
        self.ledger.revision.get()
    }

    pub fn last_write(&self) -> Option<AppliedWrite> {
        self.ledger.last_write.get()
    }

    pub fn epoch(&self) -> ViewportEpoch {
        self.ledger.epoch.get()
    }

    /// Start following a new viewport identity; writes stamped earlier turn stale.
    pub(crate) fn begin_epoch(&self) -> ViewportEpoch {
        let ViewportEpoch(current) = self.ledger.epoch.get();
        let next = ViewportEpoch(current + 1);
        self.ledger.epoch.set(next);
        next
    }

    pub(crate) fn navigation_token(&self, sequence: u64) -> NavigationToken {
        NavigationToken {
            epoch: self.epoch(),
            sequence,
            revision: self.revision(),
        }
    }

    pub(crate) fn apply(&self, write: SliceWrite) -> WriteOutcome {
        let epoch = self.epoch();
        let (source, requested) = match write {
            SliceWrite::Seed { state, epoch: stamped } => {
                if stamped != epoch {
                    log::debug!("dropping resolver seed {state} from {stamped:?}, now {epoch:?}");
                    return WriteOutcome::Stale;
                }
                (WriteSource::Resolver, state)
            }
            SliceWrite::Observed {
                source,
                state,
                epoch: stamped,
            } => {
                if stamped != epoch {
                    log::debug!("dropping {source:?} write {state} from {stamped:?}, now {epoch:?}");
                    return WriteOutcome::Stale;
                }
                (source, state)
            }
            SliceWrite::Navigated {
                target_index,
                token,
            } => {
                if token.epoch != epoch {
                    log::debug!(
                        "navigation #{} to {target_index} completed for {:?}, now {epoch:?}",
                        token.sequence,
                        token.epoch
                    );
                    return WriteOutcome::Stale;
                }
                if token.revision != self.revision() {
                    log::debug!(
                        "navigation #{} to {target_index} superseded by a newer write",
                        token.sequence
                    );
                    return WriteOutcome::Stale;
                }
                (
                    WriteSource::Navigation,
                    SliceState {
                        current_index: target_index,
                        total_slices: self.snapshot().total_slices,
                    },
                )
            }
        };

        let next = requested.clamped();
        if next != requested {
            log::warn!("{source:?} wrote out-of-range slice {requested}, clamped to {next}");
        }

        {
            let mut current = self.state.state.lock_mut();
            if *current == next {
                return WriteOutcome::Unchanged;
            }
            *current = next;
        }

        let revision = self.ledger.revision.get() + 1;
        self.ledger.revision.set(revision);
        self.ledger.last_write.set(Some(AppliedWrite {
            source,
            state: next,
            revision,
        }));
        log::trace!("slice state {next} written by {source:?} (revision {revision})");
        WriteOutcome::Applied
    }
}

impl Default for SliceStore {
    fn default() -> Self {
        Self::new()
    }
}
