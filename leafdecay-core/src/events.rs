//! Events consumed and produced by the decay cascade.

use crate::world::BlockRef;

/// Why a block left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalCause {
    /// Explicitly broken, by a player or a tool.
    Broken,
    /// A leaf decayed, either organically or through this cascade.
    Decayed,
}

/// A block removal reported by the host.
#[derive(Debug, Clone)]
pub struct BlockRemoval<S> {
    /// The block that was removed.
    pub block: BlockRef,
    /// Its state right before removal.
    pub state: S,
    /// What removed it.
    pub cause: RemovalCause,
}

impl<S> BlockRemoval<S> {
    /// A block broken explicitly.
    pub const fn broken(block: BlockRef, state: S) -> Self {
        Self {
            block,
            state,
            cause: RemovalCause::Broken,
        }
    }

    /// A leaf that decayed.
    pub const fn decayed(block: BlockRef, state: S) -> Self {
        Self {
            block,
            state,
            cause: RemovalCause::Decayed,
        }
    }
}

/// Announced right before a leaf is decayed. Cancelling it keeps the leaf.
#[derive(Debug)]
pub struct LeavesDecayEvent {
    block: BlockRef,
    cancelled: bool,
}

impl LeavesDecayEvent {
    /// Creates an uncancelled event for `block`.
    #[must_use]
    pub const fn new(block: BlockRef) -> Self {
        Self {
            block,
            cancelled: false,
        }
    }

    /// The leaf about to decay.
    #[must_use]
    pub const fn block(&self) -> &BlockRef {
        &self.block
    }

    /// Vetoes the decay.
    pub const fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Sets the cancelled flag, a later listener may un-cancel.
    pub const fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    /// Whether any listener vetoed the decay.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Observer of [`LeavesDecayEvent`].
pub trait DecayListener {
    /// Called once per announcement, in registration order.
    fn on_leaves_decay(&self, event: &mut LeavesDecayEvent);
}

impl<F> DecayListener for F
where
    F: Fn(&mut LeavesDecayEvent),
{
    fn on_leaves_decay(&self, event: &mut LeavesDecayEvent) {
        self(event);
    }
}

/// Registered decay listeners.
#[derive(Default)]
pub struct DecayListeners {
    listeners: Vec<Box<dyn DecayListener>>,
}

impl DecayListeners {
    /// Creates an empty listener list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener after all existing ones.
    pub fn register(&mut self, listener: impl DecayListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Announces `event` to every listener and returns whether it survived.
    pub fn call(&self, event: &mut LeavesDecayEvent) -> bool {
        for listener in &self.listeners {
            listener.on_leaves_decay(event);
        }
        !event.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use leafdecay_utils::BlockPos;

    use super::*;

    #[test]
    fn test_listeners_run_in_order() {
        let mut listeners = DecayListeners::new();
        listeners.register(|event: &mut LeavesDecayEvent| event.cancel());
        listeners.register(|event: &mut LeavesDecayEvent| event.set_cancelled(false));

        let mut event = LeavesDecayEvent::new(BlockRef::new("world", BlockPos::new(0, 0, 0)));
        assert!(listeners.call(&mut event));
    }

    #[test]
    fn test_veto() {
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);

        let mut listeners = DecayListeners::new();
        listeners.register(move |event: &mut LeavesDecayEvent| {
            counter.set(counter.get() + 1);
            if event.block().pos.y() > 64 {
                event.cancel();
            }
        });

        let mut low = LeavesDecayEvent::new(BlockRef::new("world", BlockPos::new(0, 60, 0)));
        let mut high = LeavesDecayEvent::new(BlockRef::new("world", BlockPos::new(0, 70, 0)));
        assert!(listeners.call(&mut low));
        assert!(!listeners.call(&mut high));
        assert_eq!(seen.get(), 2);
    }
}
