// In demos/host_loop.rs
//
// Stands in for the game: creates the shared mailbox and polls it once per
// frame until Ctrl+C. Pair with the `deliver` demo in another terminal.
use ap_mailbox::Core::SharedRegion;
use ap_mailbox::Mailbox::{MailboxBuilder, PollOutcome, ShardWatcher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// ~60 polls per second, one per game frame.
const FRAME_DURATION: Duration = Duration::from_nanos(16_666_667);

fn main() -> std::io::Result<()> {
    env_logger::init();

    let name = std::env::args().nth(1).unwrap_or_else(|| "ap_mailbox".to_string());
    let mut poller = MailboxBuilder::new().with_region_name(&name).build_shared()?;
    let mut watcher = ShardWatcher::new(poller.device_map().shard_flags);
    watcher.observe(poller.registers());

    let running = Arc::new(AtomicBool::new(true));
    let running_for_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_for_handler.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Host: polling /dev/shm/{} (press Ctrl+C to exit)...", name);

    while running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        if let PollOutcome::Delivered { item_id, sender_id, effect } = poller.poll() {
            println!(
                "Host: item {} from sender {} -> {:?} (lives {}, shards {:#010b})",
                item_id,
                sender_id,
                effect,
                poller.lives(),
                poller.shard_flags()
            );
        }

        let new_shards = watcher.observe(poller.registers());
        if !new_shards.is_empty() {
            println!("Host: newly collected shards {:?}", new_shards.indices().collect::<Vec<_>>());
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    println!("Host: shutting down after {} polls", poller.mailbox().heartbeat());
    drop(poller);
    SharedRegion::unlink(&name)?;
    Ok(())
}
