// admin-client/examples/links_board.rs
// Lists the links table and optionally moves one link, then saves the order.

use std::sync::Arc;

use admin_client::{ClientConfig, LinkBoard, MoveTarget, SupabaseStore, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();
    logger::init_logger("admin_client=debug,info", false)?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() == 2 || args.len() > 3 {
        println!("Usage: {} [<id> <before_id|end>]", args[0]);
        println!("  Example: {} 12 4", args[0]);
        return Ok(());
    }

    let config = ClientConfig::from_env()?;
    let store = SupabaseStore::new(&config)?;
    let board = LinkBoard::new(Arc::new(store));

    let count = board.load().await?;
    tracing::info!(count, table = %config.links_table, "Board loaded");

    if let [_, id, target] = args.as_slice() {
        let id: i64 = id.parse()?;
        let target = match target.as_str() {
            "end" => MoveTarget::End,
            other => MoveTarget::Before(other.parse()?),
        };

        if board.move_item(id, target)? {
            let outcome = board.save_order().await?;
            tracing::info!(written = outcome.written, "Order saved");
        } else {
            tracing::info!("Nothing to move");
        }
    }

    for link in board.snapshot() {
        let status = if link.active { "on " } else { "off" };
        println!(
            "{status} {:>6} {:>5}  {}  {}",
            link.order.map_or_else(|| "-".to_string(), |o| o.to_string()),
            link.id,
            link.title,
            link.url
        );
    }

    Ok(())
}
