// In demos/deliver.rs
//
// Plays the randomizer client: attaches to the mailbox created by `host_loop`
// and hands over each item id given on the command line.
use ap_mailbox::Mailbox::MailboxBuilder;
use std::env;
use std::time::Duration;

fn main() -> std::io::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <item_id>... [--sender <id>]", args[0]);
        std::process::exit(1);
    }

    let mut sender = 0u32;
    let mut items = Vec::new();
    let mut rest = args[1..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--sender" {
            sender = rest
                .next()
                .and_then(|s| s.parse().ok())
                .expect("--sender needs a numeric id");
        } else {
            items.push(arg.parse::<u32>().expect("Invalid item id"));
        }
    }

    let mut courier = MailboxBuilder::new().attach_courier()?;
    for &item in &items {
        courier.enqueue(item, sender);
    }

    while courier.pending() > 0 {
        courier.deliver_blocking(Duration::from_secs(5))?;
        println!("Client: delivered {} of {}", courier.delivered(), items.len());
    }

    Ok(())
}
