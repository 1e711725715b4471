//! Rowfall — classic falling-block puzzle game in the terminal.

mod app;
mod board;
mod input;
mod piece;
mod session;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Board size bounds applied to --width/--height. The upper bounds keep the
/// playfield within what any terminal buffer can address.
pub const MIN_BOARD_SPAN: u16 = 4;
pub const MAX_BOARD_WIDTH: u16 = 60;
pub const MAX_BOARD_HEIGHT: u16 = 120;

/// Options derived from CLI that affect game behaviour.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub tick_interval: Duration,
    pub frame_rate: f64,
    pub seed: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let (width, height) = clamped_board(args.width, args.height);
    let config = GameConfig {
        width,
        height,
        tick_interval: Duration::from_secs_f64(args.tick_interval),
        frame_rate: args.frame_rate,
        seed: args.seed.unwrap_or_else(seed_from_clock),
    };
    let mut app = App::new(config, theme);
    app.run()?;
    Ok(())
}

fn clamped_board(width: u16, height: u16) -> (u16, u16) {
    (
        width.clamp(MIN_BOARD_SPAN, MAX_BOARD_WIDTH),
        height.clamp(MIN_BOARD_SPAN, MAX_BOARD_HEIGHT),
    )
}

fn seed_from_clock() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0x1234_5678, |d| d.subsec_nanos())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "rowfall",
    version,
    about = "Classic falling-block puzzle in the terminal. Stack the pieces; fill rows to clear them.",
    long_about = "Rowfall is a terminal falling-block puzzle game.\n\n\
        Pieces descend on a fixed beat. Completed rows disappear and everything above \
        slides down; a piece that comes to rest above the playfield ends the game.\n\n\
        CONTROLS:\n  Left/Right or h/l   Move    Up or k   Rotate\n  Down or j           Drop one row   P / Space   Pause   Q / Esc   Quit\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Playfield width in columns.
    #[arg(long, default_value = "10", value_name = "COLS")]
    pub width: u16,

    /// Playfield height in rows.
    #[arg(long, default_value = "20", value_name = "ROWS")]
    pub height: u16,

    /// Seconds between gravity ticks.
    #[arg(short, long, default_value = "0.6", value_name = "SECS")]
    pub tick_interval: f64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Seed for the piece generator. Random (clock-derived) if not set.
    #[arg(long, value_name = "N")]
    pub seed: Option<u32>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short = 'T', long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_size_is_clamped_to_the_supported_range() {
        assert_eq!(clamped_board(10, 20), (10, 20));
        assert_eq!(clamped_board(0, 1), (MIN_BOARD_SPAN, MIN_BOARD_SPAN));
        assert_eq!(
            clamped_board(u16::MAX, u16::MAX),
            (MAX_BOARD_WIDTH, MAX_BOARD_HEIGHT)
        );
    }
}
