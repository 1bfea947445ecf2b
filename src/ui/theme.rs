//! Terminal styles for passenger and histogram output

use owo_colors::Style;
use std::sync::OnceLock;
use crate::histogram::PERCENTILES;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    /// Section titles ("Passenger 2", "Fare percentile histogram")
    pub title: Style,
    /// Labels in key/value lines
    pub label: Style,
    /// Empty-result and other non-fatal notices
    pub notice: Style,
    /// Completion summary
    pub done: Style,
    /// Bar colour per percentile band, lowest first
    pub bands: [Style; PERCENTILES.len()],
}

impl Theme {
    pub fn detect() -> Self {
        // Honors NO_COLOR / CLICOLOR and falls back to plain when piped
        if console::Term::stdout().is_term() && console::colors_enabled() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn colored() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            label: Style::new().bright_black(),
            notice: Style::new().yellow(),
            done: Style::new().green().bold(),
            bands: [
                Style::new().blue(),
                Style::new().cyan(),
                Style::new().yellow(),
                Style::new().red(),
            ],
        }
    }

    pub fn plain() -> Self {
        Self {
            title: Style::new(),
            label: Style::new(),
            notice: Style::new(),
            done: Style::new(),
            bands: std::array::from_fn(|_| Style::new()),
        }
    }

    /// Style for a percentile bound; unknown bounds use the top band's
    pub fn band(&self, bin: u32) -> Style {
        let idx = PERCENTILES
            .iter()
            .position(|&p| p == bin)
            .unwrap_or(PERCENTILES.len() - 1);
        self.bands[idx].clone()
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}
