use clap::Parser;

use crate::settings::Settings;

/// Falling-block puzzle game for the terminal
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Seed for the piece generator; random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Field width in cells
    #[arg(long)]
    pub width: Option<usize>,

    /// Field height in cells
    #[arg(long)]
    pub height: Option<usize>,

    /// Milliseconds between gravity ticks
    #[arg(long)]
    pub tick_ms: Option<u64>,

    /// Read commands from stdin and write JSON snapshots to stdout
    #[arg(long)]
    pub headless: bool,
}

impl Cli {
    /// Command line values take precedence over the settings file
    pub fn apply_to(&self, settings: &mut Settings) {
        let gameplay = &mut settings.gameplay;
        if let Some(seed) = self.seed {
            gameplay.seed = Some(seed);
        }
        if let Some(width) = self.width {
            gameplay.width = width;
        }
        if let Some(height) = self.height {
            gameplay.height = height;
        }
        if let Some(tick_ms) = self.tick_ms {
            gameplay.tick_ms = tick_ms;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from(["tetris", "--seed", "9", "--width", "6", "--headless"]);
        assert!(cli.headless);

        let mut settings = Settings::default();
        cli.apply_to(&mut settings);
        assert_eq!(settings.gameplay.seed, Some(9));
        assert_eq!(settings.gameplay.width, 6);
        assert_eq!(settings.gameplay.height, 20);
        assert_eq!(settings.gameplay.tick_ms, 500);
    }
}
