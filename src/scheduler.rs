//! Background refresh loop with an owned handle.
//!
//! The scheduler applies once at startup, then on a fixed interval, and again
//! whenever the presentation surface becomes visible after being hidden. Every
//! trigger is delivered to a single thread, so applies never overlap.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use color_eyre::eyre::{bail, eyre, Result, WrapErr};

use crate::clock::Clock;
use crate::palette::PaletteTable;
use crate::target::StyleTarget;
use crate::tint::{Tinter, Trigger};

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

enum Command {
    Visibility(Visibility),
    Refresh,
    Reload(PaletteTable),
    Stop,
}

/// Handle to a running scheduler. Dropping it stops the thread.
pub struct SchedulerHandle<C, T> {
    tx: mpsc::Sender<Command>,
    thread: Option<JoinHandle<Tinter<C, T>>>,
}

/// Start the refresh loop on its own thread.
pub fn spawn<C, T>(tinter: Tinter<C, T>, interval: Duration) -> Result<SchedulerHandle<C, T>>
where
    C: Clock + Send + 'static,
    T: StyleTarget + Send + 'static,
{
    if interval.is_zero() {
        bail!("refresh interval must be greater than zero");
    }

    let (tx, rx) = mpsc::channel();
    let thread = thread::Builder::new()
        .name("daytint-scheduler".to_string())
        .spawn(move || run(tinter, interval, rx))
        .wrap_err("Failed to spawn scheduler thread")?;

    Ok(SchedulerHandle {
        tx,
        thread: Some(thread),
    })
}

impl<C, T> SchedulerHandle<C, T> {
    /// Report a visibility change. Only a hidden → visible transition applies.
    pub fn set_visibility(&self, visibility: Visibility) -> Result<()> {
        self.send(Command::Visibility(visibility))
    }

    /// Apply now, outside the regular cadence.
    pub fn refresh(&self) -> Result<()> {
        self.send(Command::Refresh)
    }

    /// Swap the palette table and apply with it immediately.
    pub fn reload(&self, table: PaletteTable) -> Result<()> {
        self.send(Command::Reload(table))
    }

    /// Stop the loop and hand back the tinter once every queued command ran.
    pub fn stop(mut self) -> Result<Tinter<C, T>> {
        let thread = self
            .thread
            .take()
            .expect("thread is only taken by stop or drop");
        let _ = self.tx.send(Command::Stop);
        thread.join().map_err(|_| eyre!("scheduler thread panicked"))
    }

    fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| eyre!("scheduler is not running"))
    }
}

impl<C, T> Drop for SchedulerHandle<C, T> {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.tx.send(Command::Stop);
            let _ = thread.join();
        }
    }
}

fn run<C: Clock, T: StyleTarget>(
    mut tinter: Tinter<C, T>,
    interval: Duration,
    rx: mpsc::Receiver<Command>,
) -> Tinter<C, T> {
    let mut visibility = Visibility::Visible;
    apply(&mut tinter, Trigger::Startup);

    // Deadlines advance from the previous deadline so commands don't shift the cadence.
    // An interval too large to add to the clock never fires.
    let mut deadline = Instant::now().checked_add(interval);

    loop {
        let received = match deadline {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Err(RecvTimeoutError::Timeout) => {
                apply(&mut tinter, Trigger::Timer);
                let now = Instant::now();
                deadline = deadline.and_then(|d| d.checked_add(interval));
                if deadline.is_some_and(|d| d <= now) {
                    // Overslept (suspend, slow target): resume the cadence from now.
                    deadline = now.checked_add(interval);
                }
            }
            Ok(Command::Visibility(next)) => {
                let was = visibility;
                visibility = next;
                if was == Visibility::Hidden && next == Visibility::Visible {
                    apply(&mut tinter, Trigger::Visible);
                }
            }
            Ok(Command::Refresh) => apply(&mut tinter, Trigger::Manual),
            Ok(Command::Reload(table)) => {
                tinter.replace_table(table);
                apply(&mut tinter, Trigger::Reload);
            }
            Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    tracing::debug!(applied = tinter.applied(), "scheduler stopped");
    tinter
}

fn apply<C: Clock, T: StyleTarget>(tinter: &mut Tinter<C, T>, trigger: Trigger) {
    if let Err(e) = tinter.refresh(trigger) {
        tracing::warn!(%trigger, "failed to apply palette: {e:#}");
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;
