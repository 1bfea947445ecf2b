pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{band_bars, bucketed, notice, store_line, title};
pub use table::{histogram_table, passenger_table, record_table};
pub use theme::{theme, Theme};
