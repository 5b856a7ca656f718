use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::state::{Feedback, Phase, SessionState};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

/// The play area for the memorize, solve and result phases.
pub struct ChallengeView<'a> {
    pub state: &'a SessionState,
    pub selected_option: usize,
    pub theme: &'a Theme,
}

impl<'a> ChallengeView<'a> {
    pub fn new(state: &'a SessionState, selected_option: usize, theme: &'a Theme) -> Self {
        Self {
            state,
            selected_option,
            theme,
        }
    }

    fn phase_title(&self) -> &'static str {
        match self.state.phase {
            Phase::Memorize => "Memorize",
            Phase::ReMemorize => "Look again",
            Phase::Solve => "Solve",
            Phase::Result => "Result",
            Phase::Config | Phase::PreConfig | Phase::Summary => "",
        }
    }

    fn feedback_color(&self) -> Color {
        let colors = &self.theme.colors;
        match self.state.feedback {
            Feedback::Correct => colors.correct(),
            Feedback::Shielded => colors.highlight(),
            Feedback::Incorrect | Feedback::TimeUp => colors.incorrect(),
            Feedback::None => colors.fg(),
        }
    }

    fn render_numbers(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(challenge) = &self.state.current_challenge else {
            return;
        };
        let glyph = challenge.operator.glyph();
        let mut spans = Vec::new();
        for (i, n) in challenge.numbers_text().into_iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    format!("  {glyph}  "),
                    Style::default().fg(colors.muted()),
                ));
            }
            spans.push(Span::styled(
                n,
                Style::default()
                    .fg(colors.highlight())
                    .add_modifier(Modifier::BOLD),
            ));
        }
        let lines = vec![
            Line::from(""),
            Line::from(spans),
            Line::from(""),
            Line::from(Span::styled(
                "Remember these numbers",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_options(&self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let Some(challenge) = &self.state.current_challenge else {
            return;
        };
        let show_result = self.state.phase == Phase::Result;

        let mut lines = vec![
            Line::from(Span::styled(
                challenge.question.clone(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for (i, option) in challenge.options.iter().enumerate() {
            let is_selected = i == self.selected_option;
            let is_answer = *option == challenge.answer;
            let style = if show_result && is_answer {
                Style::default()
                    .fg(colors.correct())
                    .add_modifier(Modifier::BOLD)
            } else if show_result && is_selected && self.state.feedback != Feedback::TimeUp {
                Style::default().fg(colors.incorrect())
            } else if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            let indicator = if is_selected { ">" } else { " " };
            lines.push(Line::from(Span::styled(
                format!("{indicator} [{}] {option}", i + 1),
                style,
            )));
        }

        if show_result {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                self.state.feedback.message(),
                Style::default()
                    .fg(self.feedback_color())
                    .add_modifier(Modifier::BOLD),
            )));
            if self.state.feedback != Feedback::Correct {
                lines.push(Line::from(Span::styled(
                    format!("The answer was {}", challenge.answer),
                    Style::default().fg(colors.muted()),
                )));
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

impl Widget for ChallengeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = format!(
            " {} | Question {}/{} ",
            self.phase_title(),
            self.state.current_question_index,
            self.state.total_questions
        );
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(3)])
            .split(inner);

        match self.state.phase {
            Phase::Memorize | Phase::ReMemorize => self.render_numbers(layout[0], buf),
            Phase::Solve | Phase::Result => self.render_options(layout[0], buf),
            Phase::Config | Phase::PreConfig | Phase::Summary => {}
        }

        let label = if self.state.shield_active {
            "Time (shield armed)"
        } else {
            "Time"
        };
        ProgressBar::new(
            label,
            self.state.remaining_fraction(),
            self.state.remaining_ms,
            self.theme,
        )
        .render(layout[1], buf);
    }
}
