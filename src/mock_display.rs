//! Mock display, to allow compiling/running on non-Pi machines. Renders
//! into an in-memory framebuffer and dumps the grid to the log instead of
//! pushing frames over SPI.

use crate::{
    config::Config,
    grid::{Cell, Shade, TimeGrid, COL_COUNT, ROW_COUNT},
    screen,
};
use anyhow::anyhow;
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::BinaryColor,
    Pixel,
};
use itertools::Itertools;
use log::{debug, trace};
use std::convert::Infallible;

pub struct Display {
    framebuffer: Framebuffer,
    /// Cells currently on "screen", to skip redraws that would change nothing
    cells: [[Cell; COL_COUNT]; ROW_COUNT],
}

impl Display {
    pub fn new(_: &Config) -> anyhow::Result<Self> {
        debug!("Using mock display");
        Ok(Self {
            framebuffer: Framebuffer::default(),
            cells: [[Cell::default(); COL_COUNT]; ROW_COUNT],
        })
    }

    /// Recompute all cells and redraw the frame, unless nothing changed
    pub fn flush(
        &mut self,
        config: &Config,
        grid: &TimeGrid,
    ) -> anyhow::Result<()> {
        let cells = grid.cells();
        if cells == self.cells {
            trace!("Cells unchanged, skipping redraw");
            return Ok(());
        }
        self.cells = cells;

        screen::draw_grid(&mut self.framebuffer, config, &cells)
            .map_err(|err| anyhow!("{err:?}"))?;
        trace!(
            "Rendered frame, {} dark pixels",
            self.framebuffer.pixels.iter().filter(|&&on| on).count()
        );

        // A readable stand-in for the panel: one line per row, dark cells
        // marked with an asterisk
        for (label, row) in config.row_labels().zip(&cells) {
            let line = row
                .iter()
                .map(|cell| match cell.shade {
                    Shade::Dark => format!("{:>2}*", cell.hour),
                    Shade::Light => format!("{:>2} ", cell.hour),
                })
                .join(" ");
            debug!("{label:>4} | {line}");
        }
        Ok(())
    }
}

/// In-memory pixel buffer standing in for the e-paper frame
struct Framebuffer {
    pixels: Vec<bool>,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self {
            pixels: vec![
                false;
                (screen::SCREEN_WIDTH * screen::SCREEN_HEIGHT) as usize
            ],
        }
    }
}

impl OriginDimensions for Framebuffer {
    fn size(&self) -> Size {
        Size::new(screen::SCREEN_WIDTH, screen::SCREEN_HEIGHT)
    }
}

impl DrawTarget for Framebuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            // Out-of-bounds pixels are clipped, same as the real panel
            if (0..screen::SCREEN_WIDTH as i32).contains(&point.x)
                && (0..screen::SCREEN_HEIGHT as i32).contains(&point.y)
            {
                let index = point.y as usize * screen::SCREEN_WIDTH as usize
                    + point.x as usize;
                self.pixels[index] = color.is_on();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn config() -> Config {
        Config {
            display_port: String::new(),
            rows: IndexMap::from([
                ("PT".into(), 0),
                ("Per".into(), 15),
                ("Syd".into(), 18),
                ("Bue".into(), 4),
                ("UTC".into(), 7),
            ]),
        }
    }

    #[test]
    fn test_flush_renders_frame() {
        let config = config();
        let grid = TimeGrid::new(&config, 10);
        let mut display = Display::new(&config).unwrap();
        display.flush(&config, &grid).unwrap();
        // Offsets 15 and 18 are night rows at hour 10, so their cell
        // rectangles come out filled
        let dark = display.framebuffer.pixels.iter().filter(|&&on| on).count();
        assert!(dark > 5_000, "only {dark} dark pixels");
    }

    #[test]
    fn test_flush_diffs_cells() {
        let config = config();
        let mut grid = TimeGrid::new(&config, 10);
        let mut display = Display::new(&config).unwrap();
        display.flush(&config, &grid).unwrap();
        assert_eq!(display.cells, grid.cells());

        // A tick alone changes nothing on screen
        grid.clock_tick(11);
        display.flush(&config, &grid).unwrap();
        assert_eq!(display.cells[0][1].hour, 10);

        grid.reset();
        display.flush(&config, &grid).unwrap();
        assert_eq!(display.cells[0][1].hour, 11);
    }
}
