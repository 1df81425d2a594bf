//! Change journal backing all-or-nothing calls.
//!
//! Every ledger write made while a checkpoint is open records the value it
//! overwrote. Reverting to a checkpoint replays those records newest-first;
//! committing the outermost checkpoint forgets them. Checkpoints nest, so a
//! hook that re-enters the engine gets its own revertible scope.

use alloy_primitives::{Address, U256};

/// Position in the journal a call can be rolled back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub(crate) journal_len: usize,
    pub(crate) events_len: usize,
}

/// Previous value of a single ledger cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JournalEntry {
    Invalidator {
        maker: Address,
        slot: U256,
        previous: U256,
    },
    Balance {
        asset: Address,
        holder: Address,
        previous: U256,
    },
    Allowance {
        asset: Address,
        owner: Address,
        spender: Address,
        previous: U256,
    },
    PermitNonce {
        asset: Address,
        owner: Address,
        previous: U256,
    },
    Native {
        account: Address,
        previous: U256,
    },
    Supply {
        asset: Address,
        minted: U256,
        burned: U256,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<JournalEntry>,
    depth: usize,
}

impl Journal {
    /// Whether writes are currently being recorded.
    pub(crate) fn is_recording(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn record(&mut self, entry: JournalEntry) {
        if self.is_recording() {
            self.entries.push(entry);
        }
    }

    pub(crate) fn checkpoint(&mut self, events_len: usize) -> Checkpoint {
        self.depth += 1;
        Checkpoint {
            journal_len: self.entries.len(),
            events_len,
        }
    }

    /// Close the innermost checkpoint, keeping its writes.
    pub(crate) fn commit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.entries.clear();
        }
    }

    /// Close the innermost checkpoint and hand back its writes, newest first.
    pub(crate) fn revert(&mut self, checkpoint: Checkpoint) -> Vec<JournalEntry> {
        self.depth = self.depth.saturating_sub(1);
        let mut undone = self.entries.split_off(checkpoint.journal_len);
        undone.reverse();
        undone
    }
}
