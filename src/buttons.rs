//! Physical buttons on the Pi's GPIO header. Pins idle high through the
//! internal pull-ups; pressing a button pulls its pin to ground.

use crate::Button;
use anyhow::Context;
use linux_embedded_hal::{sysfs_gpio::Direction, SysfsPin};

const PIN_UP: u64 = 5; // GPIO/BCM 5, pin 29
const PIN_DOWN: u64 = 6; // GPIO/BCM 6, pin 31
const PIN_SELECT: u64 = 13; // GPIO/BCM 13, pin 33

pub struct Buttons {
    /// Each button's pin, plus the level it read on the previous poll
    pins: [(Button, SysfsPin, u8); 3],
}

impl Buttons {
    pub fn new() -> anyhow::Result<Self> {
        let up = init_pin(PIN_UP).context("Initializing pin Up")?;
        let down = init_pin(PIN_DOWN).context("Initializing pin Down")?;
        let select =
            init_pin(PIN_SELECT).context("Initializing pin Select")?;
        Ok(Self {
            pins: [
                (Button::Up, up, 1),
                (Button::Down, down, 1),
                (Button::Select, select, 1),
            ],
        })
    }

    /// Report at most one press per poll. A press is the falling edge
    /// between two polls, so holding a button yields a single event.
    pub fn poll(&mut self) -> anyhow::Result<Option<Button>> {
        for (button, pin, last) in &mut self.pins {
            let level = pin
                .get_value()
                .with_context(|| format!("Error reading pin for {button:?}"))?;
            let pressed = level == 0 && *last != 0;
            *last = level;
            if pressed {
                return Ok(Some(*button));
            }
        }
        Ok(None)
    }
}

/// Initialize a GPIO input pin
fn init_pin(pin_num: u64) -> anyhow::Result<SysfsPin> {
    let pin = SysfsPin::new(pin_num);
    pin.export().context("Error exporting pin")?;
    while !pin.is_exported() {}
    pin.set_direction(Direction::In)
        .context("Error setting pin direction")?;
    Ok(pin)
}
