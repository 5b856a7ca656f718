use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::report::SessionReport;
use crate::ui::theme::Theme;

pub struct Summary<'a> {
    pub report: &'a SessionReport,
    pub theme: &'a Theme,
}

impl<'a> Summary<'a> {
    pub fn new(report: &'a SessionReport, theme: &'a Theme) -> Self {
        Self { report, theme }
    }
}

impl Widget for Summary<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let report = self.report;

        let block = Block::bordered()
            .title(" Challenge Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        let category = report
            .category
            .map(|c| c.label())
            .unwrap_or_else(|| "Mixed".to_string());
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                category,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", report.level.label()),
                Style::default().fg(colors.muted()),
            ),
        ]))
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let score_line = Line::from(vec![
            Span::styled("  Score:    ", Style::default().fg(colors.fg())),
            Span::styled(
                report.score.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("   +{} coins", report.coins),
                Style::default().fg(colors.coins()),
            ),
        ]);
        Paragraph::new(score_line).render(layout[1], buf);

        let acc_color = if report.accuracy_percent >= 80 {
            colors.correct()
        } else if report.accuracy_percent >= 50 {
            colors.warning()
        } else {
            colors.incorrect()
        };
        let acc_line = Line::from(vec![
            Span::styled("  Accuracy: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}%", report.accuracy_percent),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}/{} answered correctly)", report.correct, report.answered()),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(acc_line).render(layout[2], buf);

        let counts_line = Line::from(vec![
            Span::styled("  Answers:  ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{} correct", report.correct),
                Style::default().fg(colors.correct()),
            ),
            Span::styled(
                format!("  {} wrong", report.incorrect),
                Style::default().fg(colors.incorrect()),
            ),
            Span::styled(
                format!("  {} skipped", report.skipped),
                Style::default().fg(colors.muted()),
            ),
        ]);
        Paragraph::new(counts_line).render(layout[3], buf);

        let time_line = Line::from(vec![
            Span::styled("  Avg time: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{:.1}s", report.average_time_secs),
                Style::default().fg(colors.fg()),
            ),
        ]);
        Paragraph::new(time_line).render(layout[4], buf);

        let difficulty_line = Line::from(vec![
            Span::styled("  Level:    ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}/10", report.final_difficulty),
                Style::default().fg(colors.highlight()),
            ),
        ]);
        Paragraph::new(difficulty_line).render(layout[5], buf);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [Enter] Play again  ", Style::default().fg(colors.accent())),
            Span::styled("[Esc] Categories  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Quit", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[7], buf);
    }
}
