use std::collections::HashMap;

use crate::Core::RegisterInterface;
use crate::Mailbox::effects::SHARD_COUNT;

/// A set of shard indices packed into one byte, bit `i` = shard `i`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShardSet(pub u8);

impl ShardSet {
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, index: u8) -> bool {
        index < SHARD_COUNT && self.0 & (1 << index) != 0
    }

    /// Set indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = u8> + '_ {
        (0..SHARD_COUNT).filter(move |&i| self.contains(i))
    }
}

/// Reports shards that became collected between observations.
///
/// Reads the authoritative `ShardFlags` byte, never the debug mirror.
pub struct ShardWatcher {
    shard_flags: usize,
    last: Option<u8>,
    locations: HashMap<u8, u32>,
}

impl ShardWatcher {
    pub fn new(shard_flags: usize) -> Self {
        Self {
            shard_flags,
            last: None,
            locations: HashMap::new(),
        }
    }

    /// Map shard bit indices to location ids. The first id given for an
    /// index wins.
    pub fn with_locations(mut self, locations: impl IntoIterator<Item = (u8, u32)>) -> Self {
        for (bit, location) in locations {
            self.locations.entry(bit).or_insert(location);
        }
        self
    }

    /// Read `ShardFlags` and return the bits set since the previous call.
    /// The first call only records a baseline and reports nothing.
    pub fn observe<R: RegisterInterface + ?Sized>(&mut self, regs: &R) -> ShardSet {
        let current = regs.read8(self.shard_flags);
        let previous = self.last.replace(current).unwrap_or(current);
        ShardSet(current & !previous)
    }

    /// Location ids for the shards in `set` that have one.
    pub fn locations_for(&self, set: ShardSet) -> Vec<u32> {
        set.indices()
            .filter_map(|i| self.locations.get(&i).copied())
            .collect()
    }

    pub fn last_seen(&self) -> Option<u8> {
        self.last
    }
}
