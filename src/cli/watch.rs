//! Live board: refreshes on a timer and takes one-line commands on stdin.

use super::{board::render_board, ui};
use crate::core::Board;
use crate::core::RefreshScheduler;
use anyhow::{Result, anyhow, bail};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

const HELP: &str = "Enter: refresh · <CODE> <AMOUNT>: set base · add/remove <CODE> · \
lift <CODE>, up/down [N], drop, cancel: reorder · q: quit";

#[derive(Debug, Clone, PartialEq)]
pub enum WatchInput {
    Refresh,
    Quit,
    SetValue { code: String, amount: String },
    Add(String),
    Remove(String),
    Lift(String),
    Step(isize),
    Drop,
    Cancel,
}

fn steps(arg: Option<&str>) -> Result<isize> {
    arg.map_or(Ok(1), |n| {
        n.parse::<isize>()
            .map_err(|_| anyhow!("Not a row count: {n}"))
    })
}

pub fn parse_input(line: &str) -> Result<WatchInput> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let input = match words.as_slice() {
        [] | ["r"] | ["refresh"] => WatchInput::Refresh,
        ["q"] | ["quit"] => WatchInput::Quit,
        ["add", code] => WatchInput::Add(code.to_string()),
        ["remove", code] => WatchInput::Remove(code.to_string()),
        ["lift", code] => WatchInput::Lift(code.to_string()),
        ["up"] | ["up", _] => WatchInput::Step(steps(words.get(1).copied())?.saturating_neg()),
        ["down"] | ["down", _] => WatchInput::Step(steps(words.get(1).copied())?),
        ["drop"] => WatchInput::Drop,
        ["cancel"] => WatchInput::Cancel,
        [code, amount] => WatchInput::SetValue {
            code: code.to_uppercase(),
            amount: amount.to_string(),
        },
        _ => bail!("Unrecognized input: {}", line.trim()),
    };
    Ok(input)
}

fn apply(board: &mut Board, scheduler: &RefreshScheduler, input: WatchInput) -> Result<()> {
    match input {
        WatchInput::Refresh => {
            scheduler.refresh_now();
        }
        WatchInput::SetValue { code, amount } => board.set_value(&code, &amount)?,
        WatchInput::Add(code) => {
            board.add(&code)?;
        }
        WatchInput::Remove(code) => {
            board.remove(&code)?;
        }
        WatchInput::Lift(code) => {
            let code = code.to_uppercase();
            if !board.codes().contains(&code) {
                bail!("{code} is not tracked");
            }
            board.keyboard_lift(&code);
        }
        WatchInput::Step(n) => {
            if board.keyboard_step(n).is_none() {
                bail!("Nothing is lifted");
            }
        }
        WatchInput::Drop => {
            board.keyboard_drop();
        }
        WatchInput::Cancel => board.drag_cancel(),
        WatchInput::Quit => {}
    }
    Ok(())
}

fn redraw(board: &Board, notice: Option<&str>) {
    let _ = console::Term::stdout().clear_screen();
    println!("{}", render_board(board));
    ui::print_separator();
    println!("{}", ui::style_text(HELP, ui::StyleType::Subtle));
    if let Some(notice) = notice {
        println!("{}", ui::style_text(notice, ui::StyleType::Error));
    }
}

pub async fn run(board: &mut Board, scheduler: &mut RefreshScheduler, interval: Duration) -> Result<()> {
    let mut rates = scheduler.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    scheduler.start(interval);
    redraw(board, None);

    loop {
        tokio::select! {
            changed = rates.changed() => {
                if changed.is_err() {
                    break;
                }
                board.set_rates(rates.borrow_and_update().clone());
                redraw(board, None);
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                let notice = match parse_input(&line) {
                    Ok(WatchInput::Quit) => break,
                    Ok(input) => apply(board, scheduler, input).err().map(|e| e.to_string()),
                    Err(e) => Some(e.to_string()),
                };
                redraw(board, notice.as_deref());
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    scheduler.shutdown();
    info!("Stopped watching");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("").unwrap(), WatchInput::Refresh);
        assert_eq!(parse_input("  r ").unwrap(), WatchInput::Refresh);
        assert_eq!(parse_input("q").unwrap(), WatchInput::Quit);
        assert_eq!(
            parse_input("eur 12.5").unwrap(),
            WatchInput::SetValue {
                code: "EUR".to_string(),
                amount: "12.5".to_string()
            }
        );
        assert_eq!(
            parse_input("add THB").unwrap(),
            WatchInput::Add("THB".to_string())
        );
        assert_eq!(
            parse_input("remove THB").unwrap(),
            WatchInput::Remove("THB".to_string())
        );
        assert_eq!(
            parse_input("lift usd").unwrap(),
            WatchInput::Lift("usd".to_string())
        );
        assert_eq!(parse_input("up").unwrap(), WatchInput::Step(-1));
        assert_eq!(parse_input("down 3").unwrap(), WatchInput::Step(3));
        assert_eq!(parse_input("drop").unwrap(), WatchInput::Drop);
        assert_eq!(parse_input("cancel").unwrap(), WatchInput::Cancel);
    }

    #[test]
    fn test_parse_input_errors() {
        assert_eq!(
            parse_input("down many").unwrap_err().to_string(),
            "Not a row count: many"
        );
        assert_eq!(
            parse_input("a b c").unwrap_err().to_string(),
            "Unrecognized input: a b c"
        );
        assert!(parse_input("hello").is_err());
    }

    #[test]
    fn test_parse_input_extreme_row_counts() {
        assert_eq!(
            parse_input(&format!("up {}", isize::MIN)).unwrap(),
            WatchInput::Step(isize::MAX)
        );
        assert_eq!(
            parse_input(&format!("up {}", isize::MAX)).unwrap(),
            WatchInput::Step(-isize::MAX)
        );
        assert_eq!(
            parse_input(&format!("down {}", isize::MIN)).unwrap(),
            WatchInput::Step(isize::MIN)
        );
    }
}
