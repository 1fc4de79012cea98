//! The outer loop both roles share: N ticks, a pause between ticks,
//! then a trailing idle so the pod's logs can be inspected.

use std::fmt;
use std::io::{self, Write};
use std::thread;

use anyhow::Result;
use vshare_config::{log_runner_debug, Schedule};

/// Position of the current tick, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub iteration: u32,
    pub total: u32,
}

impl Tick {
    pub fn is_last(&self) -> bool {
        self.iteration >= self.total
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.iteration, self.total)
    }
}

/// Run `on_tick` once per iteration, sleeping `schedule.interval` between
/// iterations but not after the last one. An error from `on_tick` stops the loop.
pub fn drive<F>(schedule: &Schedule, mut on_tick: F) -> Result<()>
where
    F: FnMut(Tick) -> Result<()>,
{
    for iteration in 1..=schedule.iterations {
        let tick = Tick {
            iteration,
            total: schedule.iterations,
        };
        on_tick(tick)?;

        if !tick.is_last() && !schedule.interval.is_zero() {
            thread::sleep(schedule.interval);
        }
    }
    Ok(())
}

/// Report completion, then idle for `schedule.linger`.
pub fn linger<W: Write>(out: &mut W, label: &str, schedule: &Schedule) -> io::Result<()> {
    writeln!(
        out,
        "Completed all {} iterations. {} finished.",
        schedule.iterations, label
    )?;
    writeln!(out, "Keeping container alive for log inspection...")?;
    out.flush()?;

    log_runner_debug!("Lingering before exit", seconds = schedule.linger.as_secs());
    if !schedule.linger.is_zero() {
        thread::sleep(schedule.linger);
    }
    Ok(())
}
