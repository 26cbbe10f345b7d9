mod config;
mod grid;
mod screen;

#[cfg(target_arch = "arm")]
mod buttons;
#[cfg(target_arch = "arm")]
mod display;
#[cfg(not(target_arch = "arm"))]
mod mock_buttons;
#[cfg(not(target_arch = "arm"))]
mod mock_display;

#[cfg(target_arch = "arm")]
use crate::{buttons::Buttons, display::Display};
#[cfg(not(target_arch = "arm"))]
use crate::{mock_buttons::Buttons, mock_display::Display};

use crate::{
    config::Config,
    grid::{ShiftDirection, TimeGrid},
};
use anyhow::Context;
use chrono::{Local, Timelike};
use log::{debug, info, LevelFilter};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

/// How often we poll the buttons and the wall clock
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A physical input on the device
#[derive(Copy, Clone, Debug)]
pub enum Button {
    Up,
    Down,
    Select,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = Config::load()?;
    let mut grid = TimeGrid::new(&config, current_hour());
    let mut display = Display::new(&config)?;
    let mut buttons = Buttons::new()?;

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))
            .context("Error setting termination handler")?;
    }

    // Paint the grid before the first event comes in
    display.flush(&config, &grid)?;
    info!("Showing the grid, ctrl-c to exit");

    while running.load(Ordering::SeqCst) {
        if let Some(button) = buttons.poll()? {
            debug!("Button pressed: {button:?}");
            match button {
                Button::Up => grid.adjust_shift(ShiftDirection::Up),
                Button::Down => grid.adjust_shift(ShiftDirection::Down),
                Button::Select => grid.reset(),
            }
            display.flush(&config, &grid)?;
        }

        // The clock cache updates quietly; cells stay anchored to the last
        // synced hour until the select button resyncs them
        grid.clock_tick(current_hour());

        thread::sleep(POLL_INTERVAL);
    }

    info!("Shutting down");
    Ok(())
}

/// Hour of day from the ambient wall clock
fn current_hour() -> u32 {
    Local::now().hour()
}
