//! Hardware display adapter for the WeAct Studio 2.13" black/white e-paper
//! panel, driven over SPI from the Pi.

use crate::{
    config::Config,
    grid::{Cell, TimeGrid, COL_COUNT, ROW_COUNT},
    screen,
};
use anyhow::{anyhow, Context};
use display_interface_spi::SPIInterface;
use embedded_graphics::{draw_target::DrawTargetExt, pixelcolor::BinaryColor};
use linux_embedded_hal::{
    spidev::{SpiModeFlags, SpidevOptions},
    sysfs_gpio::Direction,
    Delay, SpidevDevice, SysfsPin,
};
use log::{info, trace};
use weact_studio_epd::{
    graphics::{Display213BlackWhite, DisplayRotation},
    WeActStudio213BlackWhiteDriver,
};

const PIN_BUSY: u64 = 17; // GPIO/BCM 17, pin 11
const PIN_DC: u64 = 22; // GPIO/BCM 22, pin 15
const PIN_RESET: u64 = 27; // GPIO/BCM 27, pin 13

/// Manage frame rendering and hardware communication
pub struct Display {
    driver: WeActStudio213BlackWhiteDriver<
        SPIInterface<SpidevDevice, SysfsPin>,
        SysfsPin,
        SysfsPin,
        Delay,
    >,
    frame: Display213BlackWhite,
    /// Cells currently on screen, to skip refreshes that would change
    /// nothing. E-paper refreshes are slow and flashy, so don't waste them.
    cells: [[Cell; COL_COUNT]; ROW_COUNT],
}

impl Display {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut spi =
            SpidevDevice::open(&config.display_port).context("SPI device")?;
        let options = SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(1_000_000)
            .mode(SpiModeFlags::SPI_MODE_0)
            .build();
        spi.configure(&options).context("SPI configuration")?;

        let reset = init_pin(PIN_RESET, Direction::Out)
            .context("Initializing pin Reset")?;
        let dc =
            init_pin(PIN_DC, Direction::Out).context("Initializing pin D/C")?;
        let busy = init_pin(PIN_BUSY, Direction::In)
            .context("Initializing pin Busy")?;

        let mut driver = WeActStudio213BlackWhiteDriver::new(
            SPIInterface::new(spi, dc),
            busy,
            reset,
            Delay,
        );
        driver.init().map_err(map_error)?;
        info!("Display controller initialized");

        let mut frame = Display213BlackWhite::new();
        frame.set_rotation(DisplayRotation::Rotate90);

        Ok(Self {
            driver,
            frame,
            cells: [[Cell::default(); COL_COUNT]; ROW_COUNT],
        })
    }

    /// Recompute all cells and push a full frame, unless nothing changed
    pub fn flush(
        &mut self,
        config: &Config,
        grid: &TimeGrid,
    ) -> anyhow::Result<()> {
        let cells = grid.cells();
        if cells == self.cells {
            trace!("Cells unchanged, skipping refresh");
            return Ok(());
        }
        self.cells = cells;

        screen::draw_grid(
            &mut self.frame.color_converted::<BinaryColor>(),
            config,
            &cells,
        )
        .map_err(map_error)?;
        trace!("Refreshing display");
        self.driver.full_update(&self.frame).map_err(map_error)?;
        trace!("Done refreshing display");
        Ok(())
    }
}

/// Initialize a GPIO pin
fn init_pin(pin_num: u64, direction: Direction) -> anyhow::Result<SysfsPin> {
    let pin = SysfsPin::new(pin_num);
    pin.export().context("Error exporting pin")?;
    while !pin.is_exported() {}
    pin.set_direction(direction)
        .context("Error setting pin direction")?;
    if matches!(direction, Direction::Out) {
        pin.set_value(1).context("Error enabling pin")?;
    }
    Ok(pin)
}

/// The error types from the driver stack don't implement Error so we have
/// to map manually
fn map_error(error: impl std::fmt::Debug) -> anyhow::Error {
    anyhow!("{error:?}")
}
