use crate::histogram::Histogram;
use crate::passenger::StoreType;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;
use std::path::Path;

/// Widest bar drawn for the fullest band.
const BAR_WIDTH: usize = 40;

pub fn title(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().title.clone()));
}

/// "Store: csv (data/titanic.csv)"
pub fn store_line(store_type: StoreType, path: &Path) {
    println!(
        "{} {} {} ({})",
        Icons::DATABASE,
        "Store:".style(theme().label.clone()),
        store_type,
        path.display()
    );
}

pub fn notice(message: &str) {
    eprintln!("{} {}", Icons::WARN, message.style(theme().notice.clone()));
}

pub fn bucketed(total: usize) {
    println!(
        "{} {}",
        Icons::CHECK,
        format!("{} passengers bucketed", total).style(theme().done.clone())
    );
}

/// One bar per non-empty band, scaled against the fullest band.
pub fn band_bars(histogram: &Histogram) -> Vec<String> {
    let widest = histogram.entries.iter().map(|e| e.count).max().unwrap_or(0);
    histogram
        .entries
        .iter()
        .map(|e| {
            let len = if widest == 0 { 0 } else { (e.count * BAR_WIDTH).div_ceil(widest) };
            let bar = "█".repeat(len);
            format!("p{:<4} {} {}", e.bin, bar.style(theme().band(e.bin)), e.count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Entry;

    #[test]
    fn test_band_bars_scale_to_fullest_band() {
        let hist = Histogram { entries: vec![Entry { bin: 25, count: 4 }, Entry { bin: 100, count: 1 }] };
        let bars = band_bars(&hist);

        assert_eq!(bars.len(), 2);
        assert!(bars[0].starts_with("p25"));
        assert_eq!(bars[0].matches('█').count(), BAR_WIDTH);
        assert_eq!(bars[1].matches('█').count(), BAR_WIDTH / 4);
        assert!(bars[1].ends_with(" 1"));
    }
}
