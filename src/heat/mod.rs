pub mod aggregate;
pub mod exec;
pub mod output;

pub use aggregate::{
    build_grid, cap_grid, cap_value, extract_dates, ContributionGrid, WeekColumn, DEFAULT_CAP,
    WEEKDAYS,
};
pub use exec::exec;
pub use output::{band, band_color, output_preview, render, render_html, RenderOptions, COLOR_SCALE};
