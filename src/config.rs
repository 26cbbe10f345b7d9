use crate::grid::ROW_COUNT;
use anyhow::{bail, Context};
use indexmap::IndexMap;
use log::info;
use serde::Deserialize;
use std::fs::File;

/// Widest label the label column can hold
const LABEL_MAX: usize = 4;
/// Row offsets past a full day are config typos
const OFFSET_MAX: i32 = 24;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// SPI device the display is attached to
    pub display_port: String,
    /// Timezone rows, top to bottom: label -> hour offset from local time.
    /// The map keeps its JSON order, so the file reads like the screen.
    pub rows: IndexMap<String, i32>,
}

impl Config {
    const PATH: &'static str = "./config.json";

    /// Load config from file, falling back to the built-in zone table if
    /// there's no file. A file that's present but invalid is a fatal error.
    pub fn load() -> anyhow::Result<Self> {
        let config = match File::open(Self::PATH) {
            Ok(file) => {
                info!("Loading config from `{}`", Self::PATH);
                serde_json::from_reader(file).context(format!(
                    "Error parsing config file {}",
                    Self::PATH
                ))?
            }
            Err(_) => {
                info!(
                    "No config file at `{}`, using built-in zone table",
                    Self::PATH
                );
                Self::default()
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject a bad zone table up front, before any of it reaches the screen
    fn validate(&self) -> anyhow::Result<()> {
        if self.rows.len() != ROW_COUNT {
            bail!(
                "Expected exactly {ROW_COUNT} timezone rows, got {}",
                self.rows.len()
            );
        }
        for (label, &offset) in &self.rows {
            if label.is_empty() || label.len() > LABEL_MAX {
                bail!(
                    "Row label `{label}` must be 1-{LABEL_MAX} characters"
                );
            }
            if offset.abs() > OFFSET_MAX {
                bail!(
                    "Row `{label}` offset {offset} outside \
                    ±{OFFSET_MAX} hours"
                );
            }
        }
        Ok(())
    }

    /// Row offsets in screen order
    pub fn row_offsets(&self) -> [i32; ROW_COUNT] {
        let mut offsets = [0; ROW_COUNT];
        for (slot, &offset) in offsets.iter_mut().zip(self.rows.values()) {
            *slot = offset;
        }
        offsets
    }

    /// Row labels in screen order
    pub fn row_labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_port: "/dev/spidev0.0".into(),
            rows: IndexMap::from([
                ("PT".into(), 0),
                ("Per".into(), 15),
                ("Syd".into(), 18),
                ("Bue".into(), 4),
                ("UTC".into(), 7),
            ]),
        }
    }
}
