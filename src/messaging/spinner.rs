//! Busy indicator shown while a widget works or the assistant thinks.
//!
//! The REPL starts one around a slow `handle` call (when the widget reports a
//! busy label) and around every assistant request, then stops it before the
//! result is rendered on the same line.

use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    queue,
    style::{Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::renderer::RenderStyle;

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK: Duration = Duration::from_millis(80);

/// Text of the busy line at animation step `tick`.
fn busy_line(tick: usize, label: &str) -> String {
    format!("{} {}", FRAMES[tick % FRAMES.len()], label)
}

fn clear_line(out: &mut Stdout) {
    let _ = queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Show);
    let _ = out.flush();
}

/// A running busy indicator. Stop it (or drop it) before printing results.
pub struct Spinner {
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Animate `label` on the current line in the theme's accent colour.
    pub fn start(label: &'static str, dark_mode: bool) -> Self {
        let color = RenderStyle::for_mode(dark_mode).accent_color;
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut out = stdout();
            let _ = queue!(out, Hide);

            for tick in 0.. {
                if *stop_rx.borrow() {
                    break;
                }
                let _ = queue!(
                    out,
                    MoveToColumn(0),
                    Clear(ClearType::CurrentLine),
                    SetForegroundColor(color),
                    Print(busy_line(tick, label)),
                    ResetColor
                );
                let _ = out.flush();

                tokio::select! {
                    _ = tokio::time::sleep(TICK) => {}
                    _ = stop_rx.changed() => break,
                }
            }
        });

        Self {
            stop_tx,
            task: Some(task),
        }
    }

    /// Stop the animation and wipe its line.
    pub async fn stop(mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        clear_line(&mut stdout());
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.stop_tx.send(true);
            clear_line(&mut stdout());
        }
    }
}
