use super::aggregate::{ContributionGrid, WeekColumn, DEFAULT_CAP};
use crate::error::Result;
use console::style;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

/// Yellow to dark green, one entry per band 0..=10. The last band means
/// "cap or more".
pub const COLOR_SCALE: [&str; 11] = [
    "#ffffcc", "#d9f0a3", "#addd8e", "#78c679", "#41ab5d", "#238443", "#006837", "#004529",
    "#003300", "#002200", "#001a00",
];

/// Terminal approximations of [`COLOR_SCALE`].
const ANSI_SCALE: [u8; 11] = [230, 193, 150, 114, 71, 29, 28, 22, 22, 234, 233];

const WEEKDAY_LABELS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const CELL: usize = 14;
const GAP: usize = 2;
const LEFT: usize = 90;
const TOP: usize = 20;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub cap: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: "GitHub Contributions Heatmap".to_string(),
            cap: DEFAULT_CAP,
        }
    }
}

/// Band index 0..=10 for an already-capped value. Only zero maps to band 0
/// and only the cap maps to band 10.
pub fn band(value: u32, cap: u32) -> usize {
    let value = value.min(cap);
    match (value, cap) {
        (0, _) => 0,
        (_, 1) => 10,
        _ => 1 + (u64::from(value - 1) * 9 / u64::from(cap - 1)) as usize,
    }
}

pub fn band_color(value: u32, cap: u32) -> &'static str {
    COLOR_SCALE[band(value, cap)]
}

/// Write the heatmap as a self-contained HTML page.
pub fn render(grid: &ContributionGrid, output_path: &Path, options: &RenderOptions) -> Result<()> {
    let html = render_html(grid, options);
    std::fs::write(output_path, html)?;
    info!(path = %output_path.display(), columns = grid.len(), "heatmap written");
    Ok(())
}

pub fn render_html(grid: &ContributionGrid, options: &RenderOptions) -> String {
    let mut out = String::new();
    let mut generator = HtmlGenerator {
        writer: &mut out,
        grid,
        options,
    };
    // writing into a String cannot fail
    let _ = generator.generate();
    out
}

struct HtmlGenerator<'a, W: Write> {
    writer: &'a mut W,
    grid: &'a ContributionGrid,
    options: &'a RenderOptions,
}

impl<W: Write> HtmlGenerator<'_, W> {
    fn generate(&mut self) -> std::fmt::Result {
        self.write_header()?;
        writeln!(self.writer, "<body>")?;
        writeln!(self.writer, "<h1>{}</h1>", html_escape(&self.options.title))?;
        if self.grid.is_empty() {
            writeln!(self.writer, "<p class=\"empty\">No weekday contributions in range.</p>")?;
        } else {
            self.write_svg()?;
            self.write_legend()?;
        }
        writeln!(self.writer, "</body>")?;
        writeln!(self.writer, "</html>")
    }

    fn write_header(&mut self) -> std::fmt::Result {
        writeln!(self.writer, "<!DOCTYPE html>")?;
        writeln!(self.writer, "<html lang=\"en\">")?;
        writeln!(self.writer, "<head>")?;
        writeln!(self.writer, "<meta charset=\"UTF-8\">")?;
        writeln!(self.writer, "<title>{}</title>", html_escape(&self.options.title))?;
        writeln!(self.writer, "<style>")?;
        writeln!(self.writer, "body {{ font-family: sans-serif; margin: 24px; color: #222; }}")?;
        writeln!(self.writer, "svg text {{ font-size: 11px; fill: #444; }}")?;
        writeln!(self.writer, "rect.cell:hover {{ stroke: #000; stroke-width: 1.5; }}")?;
        writeln!(self.writer, ".legend span {{ display: inline-block; width: 14px; height: 14px; margin-right: 2px; }}")?;
        writeln!(self.writer, ".legend {{ font-size: 12px; margin-top: 12px; }}")?;
        writeln!(self.writer, "</style>")?;
        writeln!(self.writer, "</head>")
    }

    fn write_svg(&mut self) -> std::fmt::Result {
        let columns = self.grid.columns();
        let width = LEFT + columns.len() * (CELL + GAP) + 20;
        let height = TOP + WEEKDAY_LABELS.len() * (CELL + GAP) + 60;

        writeln!(
            self.writer,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" role=\"img\">"
        )?;
        writeln!(self.writer, "<text x=\"{}\" y=\"12\">Weeks</text>", LEFT)?;

        for (row, label) in WEEKDAY_LABELS.iter().enumerate() {
            let y = TOP + row * (CELL + GAP) + CELL - 3;
            writeln!(
                self.writer,
                "<text x=\"{}\" y=\"{y}\" text-anchor=\"end\">{label}</text>",
                LEFT - 6
            )?;
        }

        for (idx, column) in columns.iter().enumerate() {
            self.write_column(idx, column)?;
        }

        let axis_y = TOP + WEEKDAY_LABELS.len() * (CELL + GAP) + 12;
        for (idx, year) in self.grid.year_ticks() {
            let x = LEFT + idx * (CELL + GAP);
            writeln!(
                self.writer,
                "<text x=\"{x}\" y=\"{axis_y}\" transform=\"rotate(45 {x} {axis_y})\">{year}</text>"
            )?;
        }

        writeln!(self.writer, "</svg>")
    }

    fn write_column(&mut self, idx: usize, column: &WeekColumn) -> std::fmt::Result {
        let x = LEFT + idx * (CELL + GAP);
        for (row, &count) in column.counts.iter().enumerate() {
            let y = TOP + row * (CELL + GAP);
            let label = if count >= self.options.cap {
                format!("{}+", self.options.cap)
            } else {
                count.to_string()
            };
            writeln!(
                self.writer,
                "<rect class=\"cell\" x=\"{x}\" y=\"{y}\" width=\"{CELL}\" height=\"{CELL}\" fill=\"{}\"><title>{} {}: {label}</title></rect>",
                band_color(count, self.options.cap),
                column.key(),
                WEEKDAY_LABELS[row],
            )?;
        }
        Ok(())
    }

    fn write_legend(&mut self) -> std::fmt::Result {
        write!(self.writer, "<div class=\"legend\">Less ")?;
        for color in COLOR_SCALE {
            write!(self.writer, "<span style=\"background: {color}\"></span>")?;
        }
        writeln!(self.writer, " {}+</div>", self.options.cap)
    }
}

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Print the most recent `max_weeks` columns as colored blocks.
pub fn output_preview(grid: &ContributionGrid, cap: u32, max_weeks: usize, event_count: usize) {
    println!("{}", style("Contribution Heatmap").bold());
    println!("{}", "─".repeat(50));

    if grid.is_empty() {
        println!("No data to display");
        return;
    }

    let columns = grid.columns();
    let shown = &columns[columns.len().saturating_sub(max_weeks)..];

    for (row, label) in WEEKDAY_LABELS.iter().enumerate() {
        let mut line = format!("{:<4}", &label[..3]);
        for column in shown {
            let count = column.counts[row];
            let glyph = if count == 0 { "·" } else { "■" };
            let _ = write!(line, "{}", style(glyph).color256(ANSI_SCALE[band(count, cap)]));
        }
        println!("{line}");
    }

    if let (Some(first), Some(last)) = (shown.first(), shown.last()) {
        println!("    {} .. {}", style(first.key()).dim(), style(last.key()).dim());
    }

    println!(
        "\n{} contributions fetched, {} on weekdays across {} weeks (peak day {})",
        style(event_count).cyan(),
        style(grid.total()).green(),
        style(grid.len()).yellow(),
        style(grid.max()).magenta(),
    );
}
