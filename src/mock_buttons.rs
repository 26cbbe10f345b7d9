//! Mock buttons driven from stdin, to allow exercising the grid on a dev
//! machine. A reader thread feeds presses into a channel; all state still
//! mutates on the main loop.

use crate::Button;
use log::{info, warn};
use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, TryRecvError},
    thread,
};

pub struct Buttons {
    receiver: Receiver<Button>,
}

impl Buttons {
    pub fn new() -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                let button = match line.trim() {
                    "u" => Button::Up,
                    "d" => Button::Down,
                    "s" => Button::Select,
                    "" => continue,
                    other => {
                        warn!("Unknown input `{other}` (want u/d/s)");
                        continue;
                    }
                };
                if sender.send(button).is_err() {
                    break;
                }
            }
        });
        info!("Buttons are stdin lines: u = up, d = down, s = select");
        Ok(Self { receiver })
    }

    pub fn poll(&mut self) -> anyhow::Result<Option<Button>> {
        match self.receiver.try_recv() {
            Ok(button) => Ok(Some(button)),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => Ok(None),
        }
    }
}
