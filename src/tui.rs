use crossterm::{
    cursor::MoveToPreviousLine,
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io;

/// In-place status display for one sweep: one line per category, redrawn as
/// categories start, finish, or fail.
pub struct SweepTui {
    lines: Vec<CategoryLine>,
}

#[derive(Clone)]
struct CategoryLine {
    name: String,
    status: CategoryStatus,
}

#[derive(Clone, Copy, PartialEq)]
enum CategoryStatus {
    Pending,
    InProgress,
    Completed(usize),
    Failed,
}

impl SweepTui {
    /// Prints one pending line per category and remembers their order; all
    /// later updates redraw those lines in place.
    pub fn new(names: &[&str]) -> io::Result<Self> {
        let tui = Self {
            lines: names
                .iter()
                .map(|name| CategoryLine {
                    name: name.to_string(),
                    status: CategoryStatus::Pending,
                })
                .collect(),
        };
        for line in &tui.lines {
            tui.draw_line(line)?;
        }
        Ok(tui)
    }

    pub fn start_category(&mut self, name: &str) -> io::Result<()> {
        self.set_status(name, CategoryStatus::InProgress)
    }

    pub fn complete_category(&mut self, name: &str, product_count: usize) -> io::Result<()> {
        self.set_status(name, CategoryStatus::Completed(product_count))
    }

    pub fn fail_category(&mut self, name: &str) -> io::Result<()> {
        self.set_status(name, CategoryStatus::Failed)
    }

    /// Separator plus a one-line result count, below the category lines.
    pub fn show_final_summary(&self, total_products: usize) -> io::Result<()> {
        let completed = self
            .lines
            .iter()
            .filter(|l| matches!(l.status, CategoryStatus::Completed(_)))
            .count();
        let failed = self
            .lines
            .iter()
            .filter(|l| l.status == CategoryStatus::Failed)
            .count();

        execute!(
            io::stdout(),
            Print("─".repeat(60)),
            Print("\n"),
            SetForegroundColor(Color::Green),
            Print(format!("✅ Scraping completed: {} successful", completed)),
            ResetColor
        )?;

        if failed > 0 {
            execute!(
                io::stdout(),
                SetForegroundColor(Color::Red),
                Print(format!(", {} failed", failed)),
                ResetColor
            )?;
        }

        execute!(
            io::stdout(),
            SetForegroundColor(Color::DarkGrey),
            Print(format!(" | {} products total\n", total_products)),
            ResetColor
        )?;

        Ok(())
    }

    fn set_status(&mut self, name: &str, status: CategoryStatus) -> io::Result<()> {
        let Some(index) = self.lines.iter().position(|l| l.name == name) else {
            return Ok(());
        };
        self.lines[index].status = status;
        self.redraw_from(index)
    }

    /// Moves back to the changed line, then redraws it and everything below
    /// so the cursor ends up where it started.
    fn redraw_from(&self, index: usize) -> io::Result<()> {
        let lines_back = self.lines.len() - index;
        execute!(
            io::stdout(),
            MoveToPreviousLine(lines_back as u16),
            Clear(ClearType::FromCursorDown),
        )?;
        for line in &self.lines[index..] {
            self.draw_line(line)?;
        }
        Ok(())
    }

    fn draw_line(&self, line: &CategoryLine) -> io::Result<()> {
        let (color, icon) = match line.status {
            CategoryStatus::Pending => (Color::DarkGrey, "⏳"),
            CategoryStatus::InProgress => (Color::White, "🔄"),
            CategoryStatus::Completed(_) => (Color::Green, "✅"),
            CategoryStatus::Failed => (Color::Red, "❌"),
        };
        let label = match line.status {
            CategoryStatus::Completed(count) => format!("{} ({} products)", line.name, count),
            _ => line.name.clone(),
        };
        execute!(
            io::stdout(),
            SetForegroundColor(color),
            Print(format!("  {} {}\n", icon, label)),
            ResetColor
        )
    }
}
