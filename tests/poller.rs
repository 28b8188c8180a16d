// tests/poller.rs

use ap_mailbox::Core::{MemoryRegisters, RegisterInterface};
use ap_mailbox::Mailbox::layout::{PENDING_FLAG, SHARD_MIRROR};
use ap_mailbox::Mailbox::Structs::MailboxSnapshot;
use ap_mailbox::Mailbox::{DeviceMap, Effect, MailboxBuilder, PollOutcome, Poller, BASE_OFFSET};
use std::sync::Arc;

fn setup() -> (Arc<MemoryRegisters>, Poller<Arc<MemoryRegisters>>) {
    let regs = Arc::new(MemoryRegisters::new(DeviceMap::SHARED_REGION_SIZE));
    let poller = MailboxBuilder::new().build(regs.clone()).unwrap();
    (regs, poller)
}

/// Play the external writer: fields first, then the flag.
fn post(regs: &MemoryRegisters, item_id: u32, sender_id: u32) {
    let mailbox = ap_mailbox::Mailbox::Mailbox::new(regs, DeviceMap::shared().mailbox);
    mailbox.set_item_id(item_id);
    mailbox.set_sender_id(sender_id);
    mailbox.set_pending(true);
}

#[test]
fn test_idle_poll_only_beats() {
    let (regs, mut poller) = setup();
    let before = regs.dump();

    assert_eq!(poller.poll(), PollOutcome::Idle);

    let after = regs.dump();
    assert_eq!(poller.mailbox().heartbeat(), 1);
    assert_eq!(poller.mailbox().last_item_id(), 0);
    assert_eq!(poller.lives(), 0);
    assert_eq!(poller.shard_flags(), 0);
    // Only the heartbeat word changed.
    let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
    assert_eq!(changed, vec![0x10]);
}

#[test]
fn test_heartbeat_counts_every_poll() {
    let (regs, mut poller) = setup();

    for i in 1..=10u32 {
        if i % 3 == 0 {
            post(&regs, BASE_OFFSET + 2, 1);
        }
        poller.poll();
        assert_eq!(poller.mailbox().heartbeat(), i);
    }
}

#[test]
fn test_heartbeat_wraps() {
    let (regs, mut poller) = setup();
    regs.write32(0x10, u32::MAX);
    poller.poll();
    assert_eq!(poller.mailbox().heartbeat(), 0);
}

#[test]
fn test_delivery_is_recorded_and_acknowledged() {
    let (regs, mut poller) = setup();
    post(&regs, BASE_OFFSET + 1, 42);

    let outcome = poller.poll();
    assert_eq!(
        outcome,
        PollOutcome::Delivered {
            item_id: BASE_OFFSET + 1,
            sender_id: 42,
            effect: Some(Effect::ExtraLife),
        }
    );

    let snapshot = poller.mailbox().snapshot();
    assert_eq!(snapshot.pending_flag, 0);
    assert_eq!(snapshot.debug_last_item_id, BASE_OFFSET + 1);
    assert_eq!(snapshot.debug_last_sender, 42);
    assert_eq!(poller.lives(), 1);
}

#[test]
fn test_unknown_item_still_acknowledged() {
    let (regs, mut poller) = setup();
    regs.write8(DeviceMap::shared().lives, 3);
    post(&regs, 999_999, 5);

    let outcome = poller.poll();
    assert_eq!(
        outcome,
        PollOutcome::Delivered {
            item_id: 999_999,
            sender_id: 5,
            effect: None,
        }
    );
    assert!(!poller.mailbox().is_pending());
    assert_eq!(poller.lives(), 3);
    assert_eq!(poller.shard_flags(), 0);
    assert_eq!(poller.mailbox().last_item_id(), 999_999);
}

#[test]
fn test_one_message_per_poll() {
    let (regs, mut poller) = setup();
    post(&regs, BASE_OFFSET + 2, 1);

    assert!(poller.poll().is_delivered());
    // Writer raises the flag again: seen on the next call, not the same one.
    post(&regs, BASE_OFFSET + 3, 1);
    assert_eq!(poller.shard_flags(), 0b0000_0001);

    assert!(poller.poll().is_delivered());
    assert_eq!(poller.shard_flags(), 0b0000_0011);
    assert_eq!(poller.poll(), PollOutcome::Idle);
}

#[test]
fn test_unexpected_flag_value_is_cleared_without_dispatch() {
    let (regs, mut poller) = setup();
    regs.write32(PENDING_FLAG, 2);
    regs.write32(0x08, BASE_OFFSET + 1);

    assert_eq!(poller.poll(), PollOutcome::Idle);
    assert_eq!(regs.read32(PENDING_FLAG), 0);
    assert_eq!(poller.lives(), 0);
    assert_eq!(poller.mailbox().last_item_id(), 0);
}

#[test]
fn test_flag_is_clear_after_every_poll() {
    let (regs, mut poller) = setup();
    for flag in [0, 1, 2, 0xFF, u32::MAX] {
        regs.write32(PENDING_FLAG, flag);
        poller.poll();
        assert_eq!(regs.read32(PENDING_FLAG), 0, "flag {:#x} left set", flag);
    }
}

#[test]
fn test_shard_mirror_follows_shards() {
    let (regs, mut poller) = setup();
    post(&regs, BASE_OFFSET + 9, 1);
    poller.poll();

    assert_eq!(poller.shard_flags(), 0b1000_0000);
    assert_eq!(regs.read32(SHARD_MIRROR), 0b1000_0000);
}

#[test]
fn test_mirror_is_never_read_back() {
    let (regs, mut poller) = setup();
    // Garbage in the debug mirror must not leak into ShardFlags.
    regs.write32(SHARD_MIRROR, 0x1234_5678);
    post(&regs, BASE_OFFSET + 2, 1);
    poller.poll();

    assert_eq!(poller.shard_flags(), 0b0000_0001);
}

#[test]
fn test_build_resets_mailbox_but_not_game_state() {
    let regs = Arc::new(MemoryRegisters::new(DeviceMap::SHARED_REGION_SIZE));
    let map = DeviceMap::shared();
    regs.write32(PENDING_FLAG, 1);
    regs.write32(0x10, 77);
    regs.write8(map.lives, 9);
    regs.write8(map.shard_flags, 0b101);

    let poller = MailboxBuilder::new().build(regs.clone()).unwrap();

    assert_eq!(poller.mailbox().snapshot(), MailboxSnapshot::default());
    assert_eq!(poller.lives(), 9);
    assert_eq!(poller.shard_flags(), 0b101);
}

#[test]
fn test_debug_output_shows_state() {
    let (regs, mut poller) = setup();
    post(&regs, BASE_OFFSET + 1, 1);
    poller.poll();

    let text = format!("{:?}", poller);
    assert!(text.contains("Poller"));
    assert!(text.contains("lives: 1"));
}
