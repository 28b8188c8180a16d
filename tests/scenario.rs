// End-to-end delivery scenarios plus randomized sweeps over the identifier
// space. Run with: cargo test --test scenario -- --nocapture

use ap_mailbox::Core::{MemoryRegisters, RegisterInterface};
use ap_mailbox::Mailbox::{
    Courier, DeviceMap, MailboxBuilder, PollOutcome, Poller, Revision, BASE_OFFSET,
};
use std::sync::Arc;

struct Game {
    regs: Arc<MemoryRegisters>,
    poller: Poller<Arc<MemoryRegisters>>,
    courier: Courier<Arc<MemoryRegisters>>,
}

impl Game {
    fn new(builder: MailboxBuilder) -> Self {
        let regs = Arc::new(MemoryRegisters::new(DeviceMap::SHARED_REGION_SIZE));
        let poller = builder.build(regs.clone()).unwrap();
        let courier = Courier::new(regs.clone(), poller.device_map().mailbox);
        Self {
            regs,
            poller,
            courier,
        }
    }

    fn deliver(&mut self, item_id: u32) -> PollOutcome {
        self.courier.enqueue(item_id, 1);
        assert!(self.courier.try_deliver());
        let outcome = self.poller.poll();
        assert!(!self.poller.mailbox().is_pending());
        outcome
    }

    fn set_lives(&self, lives: u8) {
        self.regs.write8(self.poller.device_map().lives, lives);
    }
}

#[test]
fn test_reference_scenario() {
    let mut game = Game::new(MailboxBuilder::new());
    game.set_lives(3);
    assert_eq!(game.poller.shard_flags(), 0b0000_0000);

    game.deliver(BASE_OFFSET + 1);
    assert_eq!(game.poller.lives(), 4);

    game.deliver(BASE_OFFSET + 2);
    assert_eq!(game.poller.shard_flags(), 0b0000_0001);

    game.deliver(BASE_OFFSET + 9);
    assert_eq!(game.poller.shard_flags(), 0b1000_0001);

    let outcome = game.deliver(999_999);
    assert!(outcome.is_delivered());
    assert_eq!(game.poller.lives(), 4);
    assert_eq!(game.poller.shard_flags(), 0b1000_0001);
    assert_eq!(game.poller.mailbox().heartbeat(), 4);
}

#[test]
fn test_first_revision_scenario() {
    let mut game = Game::new(MailboxBuilder::new().with_revision(Revision::ShardsOnly));
    game.set_lives(3);

    game.deliver(BASE_OFFSET + 1);
    assert_eq!(game.poller.lives(), 3);
    assert_eq!(game.poller.shard_flags(), 0b0000_0001);

    game.deliver(BASE_OFFSET + 9);
    assert_eq!(game.poller.shard_flags(), 0b0000_0001);
}

#[test]
fn test_custom_base_offset() {
    let mut game = Game::new(MailboxBuilder::new().with_base_offset(500));
    game.deliver(501);
    game.deliver(BASE_OFFSET + 1);
    assert_eq!(game.poller.lives(), 1);
}

#[test]
fn test_random_unknown_ids_change_nothing() {
    let mut rng = fastrand::Rng::with_seed(0x4150_4D42);
    let mut game = Game::new(MailboxBuilder::new());
    game.set_lives(12);

    for _ in 0..2_000 {
        let id = loop {
            let id = rng.u32(..);
            if !(BASE_OFFSET + 1..=BASE_OFFSET + 9).contains(&id) {
                break id;
            }
        };
        let outcome = game.deliver(id);
        assert_eq!(
            outcome,
            PollOutcome::Delivered {
                item_id: id,
                sender_id: 1,
                effect: None
            }
        );
    }

    assert_eq!(game.poller.lives(), 12);
    assert_eq!(game.poller.shard_flags(), 0);
    assert_eq!(game.poller.mailbox().shard_mirror(), 0);
}

#[test]
fn test_random_deliveries_match_model() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut game = Game::new(MailboxBuilder::new());

    let mut lives: u8 = rng.u8(..);
    let mut shards: u8 = 0;
    game.set_lives(lives);

    for step in 0..5_000u32 {
        // Mostly known items, with a sprinkling of neighbours either side.
        let id = BASE_OFFSET + rng.u32(0..=10);
        let idle_polls = rng.usize(0..3);

        game.deliver(id);
        for _ in 0..idle_polls {
            assert_eq!(game.poller.poll(), PollOutcome::Idle);
        }

        match id - BASE_OFFSET {
            1 => lives = lives.saturating_add(1),
            k @ 2..=9 => shards |= 1 << (k - 2),
            _ => {}
        }

        assert_eq!(game.poller.lives(), lives, "lives diverged at step {}", step);
        assert_eq!(game.poller.shard_flags(), shards, "shards diverged at step {}", step);
    }

    assert_eq!(game.poller.lives(), 255);
    assert_eq!(game.poller.shard_flags(), 0xFF);
}

#[test]
fn test_heartbeat_tracks_poll_count() {
    let mut rng = fastrand::Rng::with_seed(99);
    let mut game = Game::new(MailboxBuilder::new());
    let mut polls = 0u32;

    for _ in 0..500 {
        if rng.bool() {
            game.deliver(BASE_OFFSET + rng.u32(0..12));
        } else {
            game.poller.poll();
        }
        polls += 1;
        assert_eq!(game.poller.mailbox().heartbeat(), polls);
        assert!(!game.poller.mailbox().is_pending());
    }
}
