// Item identifier -> game-state effect.
//
// The mapping is data: each protocol revision is a static table of offsets
// from the base offset. New items go into a table; the poller never changes.

use crate::Core::RegisterInterface;
use crate::Mailbox::layout::{DeviceMap, Mailbox};

/// Base of this game's slice of the flat item-identifier namespace. Must match
/// the value the randomizer allocates item ids from.
pub const BASE_OFFSET: u32 = 3_860_000;

/// Number of collectible shards tracked in `ShardFlags`.
pub const SHARD_COUNT: u8 = 8;

/// A game-state mutation an item triggers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Lives += 1, saturating at 255.
    ExtraLife,
    /// Set bit `index` (0..=7) in `ShardFlags`.
    Shard(u8),
}

/// One row of an item table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemEntry {
    /// Offset from the base offset.
    pub offset: u32,
    pub name: &'static str,
    pub effect: Effect,
}

const fn entry(offset: u32, name: &'static str, effect: Effect) -> ItemEntry {
    ItemEntry {
        offset,
        name,
        effect,
    }
}

/// First protocol: shards only, at `base + 1 ..= base + 8`.
const SHARDS_ONLY: &[ItemEntry] = &[
    entry(1, "Mirror Shard 1", Effect::Shard(0)),
    entry(2, "Mirror Shard 2", Effect::Shard(1)),
    entry(3, "Mirror Shard 3", Effect::Shard(2)),
    entry(4, "Mirror Shard 4", Effect::Shard(3)),
    entry(5, "Mirror Shard 5", Effect::Shard(4)),
    entry(6, "Mirror Shard 6", Effect::Shard(5)),
    entry(7, "Mirror Shard 7", Effect::Shard(6)),
    entry(8, "Mirror Shard 8", Effect::Shard(7)),
];

/// Current protocol: extra life at `base + 1`, shards at `base + 2 ..= base + 9`.
const LIVES_AND_SHARDS: &[ItemEntry] = &[
    entry(1, "1 Up", Effect::ExtraLife),
    entry(2, "Mirror Shard 1", Effect::Shard(0)),
    entry(3, "Mirror Shard 2", Effect::Shard(1)),
    entry(4, "Mirror Shard 3", Effect::Shard(2)),
    entry(5, "Mirror Shard 4", Effect::Shard(3)),
    entry(6, "Mirror Shard 5", Effect::Shard(4)),
    entry(7, "Mirror Shard 6", Effect::Shard(5)),
    entry(8, "Mirror Shard 7", Effect::Shard(6)),
    entry(9, "Mirror Shard 8", Effect::Shard(7)),
];

/// Item-numbering revisions the writer may speak.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Revision {
    ShardsOnly,
    #[default]
    LivesAndShards,
}

impl Revision {
    pub fn entries(self) -> &'static [ItemEntry] {
        match self {
            Revision::ShardsOnly => SHARDS_ONLY,
            Revision::LivesAndShards => LIVES_AND_SHARDS,
        }
    }
}

/// Item table for one base offset and revision.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ItemTable {
    base_offset: u32,
    revision: Revision,
}

impl Default for ItemTable {
    fn default() -> Self {
        Self::new(BASE_OFFSET, Revision::default())
    }
}

impl ItemTable {
    pub fn new(base_offset: u32, revision: Revision) -> Self {
        Self {
            base_offset,
            revision,
        }
    }

    pub fn base_offset(&self) -> u32 {
        self.base_offset
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn entries(&self) -> &'static [ItemEntry] {
        self.revision.entries()
    }

    /// Absolute identifier of `entry` under this table's base offset, or
    /// `None` when it does not fit in a `u32`.
    pub fn item_id(&self, entry: &ItemEntry) -> Option<u32> {
        self.base_offset.checked_add(entry.offset)
    }

    /// Entry for `item_id`, or `None` for anything outside this game's range.
    pub fn lookup(&self, item_id: u32) -> Option<&'static ItemEntry> {
        let offset = item_id.checked_sub(self.base_offset)?;
        self.entries().iter().find(|e| e.offset == offset)
    }

    /// Identifier that grants `effect`, if this revision has one.
    pub fn id_for(&self, effect: Effect) -> Option<u32> {
        self.entries()
            .iter()
            .find(|e| e.effect == effect)
            .and_then(|e| self.item_id(e))
    }

    /// Apply the effect of `item_id` to game state.
    ///
    /// Total over all identifiers: unknown ids, a life at 255, and a shard
    /// that is already set all leave state as it was. Returns the effect that
    /// matched, if any.
    pub fn apply<R: RegisterInterface + ?Sized>(
        &self,
        regs: &R,
        map: &DeviceMap,
        item_id: u32,
    ) -> Option<Effect> {
        let entry = self.lookup(item_id)?;
        match entry.effect {
            Effect::ExtraLife => {
                let lives = regs.read8(map.lives);
                regs.write8(map.lives, lives.saturating_add(1));
            }
            Effect::Shard(index) => {
                let bit = 1u8 << (index % SHARD_COUNT);
                let flags = regs.read8(map.shard_flags);
                regs.write8(map.shard_flags, flags | bit);
                Mailbox::new(regs, map.mailbox).mirror_shards(u32::from(bit));
            }
        }
        log::debug!("applied {} ({}) -> {:?}", entry.name, item_id, entry.effect);
        Some(entry.effect)
    }
}
