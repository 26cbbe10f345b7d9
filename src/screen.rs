//! Pixel layout and drawing for the grid. Everything here is generic over
//! the draw target so the same code renders to the e-paper frame on the Pi
//! and to the in-memory framebuffer everywhere else.

use crate::{
    config::Config,
    grid::{Cell, Shade, COL_COUNT, ROW_COUNT},
};
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{Point, Size},
    pixelcolor::BinaryColor,
    primitives::{Primitive, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
    Drawable,
};
use itertools::Itertools;
use u8g2_fonts::{fonts, U8g2TextStyle};

/// Panel dimensions after rotating to landscape
pub const SCREEN_WIDTH: u32 = 250;
pub const SCREEN_HEIGHT: u32 = 122;

/// Width of the label column on the left edge
const LABEL_WIDTH: i32 = 40;
/// Width of each of the three hour columns
const CELL_WIDTH: i32 = 70;
const ROW_HEIGHT: i32 = 24;
/// Centers the five rows in the panel's height
const GRID_TOP: i32 = 1;

/// Draw the full grid: row labels down the left edge, then a shaded
/// rectangle and centered hour for each cell.
pub fn draw_grid<D>(
    target: &mut D,
    config: &Config,
    cells: &[[Cell; COL_COUNT]; ROW_COUNT],
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;

    let label_placement = TextStyleBuilder::new()
        .alignment(Alignment::Left)
        .baseline(Baseline::Middle)
        .build();
    let hour_placement = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();

    for (row, label) in config.row_labels().enumerate() {
        let y = GRID_TOP + row as i32 * ROW_HEIGHT + ROW_HEIGHT / 2;
        Text::with_text_style(
            label,
            Point::new(2, y),
            U8g2TextStyle::new(fonts::u8g2_font_ncenB08_tr, BinaryColor::On),
            label_placement,
        )
        .draw(target)?;
    }

    for (row, col) in (0..ROW_COUNT).cartesian_product(0..COL_COUNT) {
        let cell = cells[row][col];
        let bounds = cell_bounds(row, col);
        let (background, ink) = match cell.shade {
            Shade::Dark => (BinaryColor::On, BinaryColor::Off),
            Shade::Light => (BinaryColor::Off, BinaryColor::On),
        };
        bounds
            .into_styled(PrimitiveStyle::with_fill(background))
            .draw(target)?;
        Text::with_text_style(
            &cell.hour.to_string(),
            bounds.center(),
            U8g2TextStyle::new(fonts::u8g2_font_logisoso16_tf, ink),
            hour_placement,
        )
        .draw(target)?;
    }

    Ok(())
}

/// Screen rectangle of a single cell
fn cell_bounds(row: usize, col: usize) -> Rectangle {
    Rectangle::new(
        Point::new(
            LABEL_WIDTH + col as i32 * CELL_WIDTH,
            GRID_TOP + row as i32 * ROW_HEIGHT,
        ),
        Size::new(CELL_WIDTH as u32, ROW_HEIGHT as u32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_fit_on_screen() {
        let screen = Rectangle::new(
            Point::zero(),
            Size::new(SCREEN_WIDTH, SCREEN_HEIGHT),
        );
        for (row, col) in (0..ROW_COUNT).cartesian_product(0..COL_COUNT) {
            let bounds = cell_bounds(row, col);
            assert_eq!(
                bounds.intersection(&screen),
                bounds,
                "cell ({row}, {col}) sticks out of the screen"
            );
        }
    }

    #[test]
    fn test_cells_do_not_overlap() {
        let all: Vec<Rectangle> = (0..ROW_COUNT)
            .cartesian_product(0..COL_COUNT)
            .map(|(row, col)| cell_bounds(row, col))
            .collect();
        for (a, b) in all.iter().tuple_combinations::<(_, _)>() {
            assert!(
                a.intersection(b).is_zero_sized(),
                "{a:?} overlaps {b:?}"
            );
        }
    }

    #[test]
    fn test_cells_clear_label_column() {
        for (row, col) in (0..ROW_COUNT).cartesian_product(0..COL_COUNT) {
            assert!(cell_bounds(row, col).top_left.x >= LABEL_WIDTH);
        }
    }
}
