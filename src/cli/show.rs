use super::{board::render_board, ui};
use crate::core::{Board, RefreshScheduler};
use anyhow::{Context, Result};

/// Fetches rates once and prints the board.
pub async fn run(board: &mut Board, scheduler: &RefreshScheduler) -> Result<()> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    scheduler
        .refresh_now()
        .await
        .context("Rate refresh task failed")?;
    spinner.finish_and_clear();

    board.set_rates(scheduler.current());
    println!("{}", render_board(board));
    Ok(())
}
