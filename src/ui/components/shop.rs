use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::state::PowerUp;
use crate::store::schema::ProfileData;
use crate::ui::theme::Theme;

pub struct Shop<'a> {
    pub profile: &'a ProfileData,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Shop<'a> {
    pub fn new(profile: &'a ProfileData, selected: usize, theme: &'a Theme) -> Self {
        Self {
            profile,
            selected,
            theme,
        }
    }
}

impl Widget for Shop<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Power-Up Shop ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut constraints = vec![Constraint::Length(2)];
        constraints.extend(PowerUp::ALL.iter().map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Min(0));
        constraints.push(Constraint::Length(1));
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        let balance = Paragraph::new(Line::from(vec![
            Span::styled("Balance: ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{} coins", self.profile.coins),
                Style::default()
                    .fg(colors.coins())
                    .add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center);
        balance.render(layout[0], buf);

        for (i, power_up) in PowerUp::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let affordable = self.profile.coins >= power_up.price();
            let indicator = if is_selected { ">" } else { " " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let price_style = Style::default().fg(if affordable {
                colors.coins()
            } else {
                colors.muted()
            });

            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!(" {indicator} [{}] {}", power_up.hotkey(), power_up.label()),
                        label_style,
                    ),
                    Span::styled(format!("  {} coins", power_up.price()), price_style),
                    Span::styled(
                        format!("  (owned: {})", self.profile.inventory.count(*power_up)),
                        Style::default().fg(colors.muted()),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("     {}", power_up.description()),
                    Style::default().fg(colors.muted()),
                )),
            ];
            Paragraph::new(lines).render(layout[i + 1], buf);
        }

        let footer = Paragraph::new(Line::from(Span::styled(
            "  [Enter] Buy  [Up/Down] Select  [Esc] Back",
            Style::default().fg(colors.accent()),
        )));
        footer.render(layout[layout.len() - 1], buf);
    }
}
