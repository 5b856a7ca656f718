use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::PreConfigField;
use crate::generator::category::MathCategory;
use crate::session::state::DifficultyLevel;
use crate::ui::theme::Theme;

/// Level and question-count picker shown before a session starts.
pub struct PreConfig<'a> {
    pub category: MathCategory,
    pub level: DifficultyLevel,
    pub question_count: usize,
    pub focused: PreConfigField,
    pub theme: &'a Theme,
}

impl Widget for PreConfig<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.category.label()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", self.category.group().label()),
            Style::default().fg(colors.muted()),
        )))
        .render(layout[0], buf);

        let fields = [
            (
                PreConfigField::Level,
                "Difficulty",
                self.level.label().to_string(),
            ),
            (
                PreConfigField::Questions,
                "Questions",
                self.question_count.to_string(),
            ),
        ];
        for (i, (field, label, value)) in fields.iter().enumerate() {
            let is_selected = *field == self.focused;
            let indicator = if is_selected { " > " } else { "   " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let value_style = Style::default().fg(if is_selected {
                colors.highlight()
            } else {
                colors.muted()
            });
            Paragraph::new(vec![
                Line::from(Span::styled(format!("{indicator}{label}:"), label_style)),
                Line::from(Span::styled(format!("     < {value} >"), value_style)),
            ])
            .render(layout[i + 1], buf);
        }

        let timing = format!(
            "  Memorize {:.0}s, solve {:.0}s per question",
            self.level.memorize_ms() as f64 / 1000.0,
            self.level.solve_ms() as f64 / 1000.0
        );
        Paragraph::new(Line::from(Span::styled(
            timing,
            Style::default().fg(colors.muted()),
        )))
        .render(layout[3], buf);

        Paragraph::new(Line::from(Span::styled(
            "  [Enter] Start  [Up/Down] Field  [Left/Right] Change  [Esc] Back",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[5], buf);
    }
}
