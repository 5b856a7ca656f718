use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::generator::category::{ALL_GROUPS, MathCategory};
use crate::ui::theme::Theme;

/// Every category, ordered by group, with the highlighted row.
pub struct CategoryMenu {
    pub entries: Vec<MathCategory>,
    pub selected: usize,
}

impl Default for CategoryMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryMenu {
    pub fn new() -> Self {
        Self {
            entries: ALL_GROUPS.iter().flat_map(|g| g.categories()).collect(),
            selected: 0,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.entries.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.entries.len() - 1;
        }
    }

    /// Jump to the first category of the next (or previous) group.
    pub fn jump_group(&mut self, forward: bool) {
        let group = self.selected_category().group();
        let pos = ALL_GROUPS.iter().position(|&g| g == group).unwrap_or(0);
        let target = if forward {
            ALL_GROUPS[(pos + 1) % ALL_GROUPS.len()]
        } else {
            ALL_GROUPS[(pos + ALL_GROUPS.len() - 1) % ALL_GROUPS.len()]
        };
        if let Some(idx) = self.entries.iter().position(|c| c.group() == target) {
            self.selected = idx;
        }
    }

    pub fn selected_category(&self) -> MathCategory {
        self.entries[self.selected]
    }

    /// Rows to render: group headings interleaved with categories.
    fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut idx = 0;
        for &group in ALL_GROUPS {
            rows.push(Row::Heading(group.label()));
            for category in group.categories() {
                rows.push(Row::Entry(idx, category));
                idx += 1;
            }
        }
        rows
    }

    pub fn widget<'a>(&'a self, theme: &'a Theme) -> CategoryList<'a> {
        CategoryList { menu: self, theme }
    }
}

enum Row {
    Heading(&'static str),
    Entry(usize, MathCategory),
}

pub struct CategoryList<'a> {
    menu: &'a CategoryMenu,
    theme: &'a Theme,
}

impl Widget for CategoryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Choose a category ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(inner);

        let title = Paragraph::new(vec![
            Line::from(Span::styled(
                "mathdash",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Memorize. Solve. Level up.",
                Style::default().fg(colors.fg()),
            )),
        ])
        .alignment(Alignment::Center);
        title.render(layout[0], buf);

        let rows = self.menu.rows();
        let height = layout[1].height as usize;
        if height == 0 {
            return;
        }
        let selected_row = rows
            .iter()
            .position(|r| matches!(r, Row::Entry(i, _) if *i == self.menu.selected))
            .unwrap_or(0);
        // Keep the highlighted row roughly centered.
        let offset = selected_row
            .saturating_sub(height / 2)
            .min(rows.len().saturating_sub(height));

        let lines: Vec<Line> = rows
            .iter()
            .skip(offset)
            .take(height)
            .map(|row| match row {
                Row::Heading(label) => Line::from(Span::styled(
                    format!(" {label}"),
                    Style::default()
                        .fg(colors.highlight())
                        .add_modifier(Modifier::BOLD),
                )),
                Row::Entry(i, category) => {
                    let is_selected = *i == self.menu.selected;
                    let indicator = if is_selected { ">" } else { " " };
                    let style = if is_selected {
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(colors.fg())
                    };
                    Line::from(vec![
                        Span::styled(format!("   {indicator} "), style),
                        Span::styled(
                            format!("{:>2} ", category.operator().glyph()),
                            Style::default().fg(colors.muted()),
                        ),
                        Span::styled(category.label(), style),
                    ])
                }
            })
            .collect();
        Paragraph::new(lines).render(layout[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::category::ALL_CATEGORIES;

    #[test]
    fn test_menu_lists_every_category_once() {
        let menu = CategoryMenu::new();
        assert_eq!(menu.entries.len(), ALL_CATEGORIES.len());
        for category in ALL_CATEGORIES {
            assert_eq!(menu.entries.iter().filter(|c| *c == category).count(), 1);
        }
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = CategoryMenu::new();
        menu.prev();
        assert_eq!(menu.selected, menu.entries.len() - 1);
        menu.next();
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn test_jump_group() {
        let mut menu = CategoryMenu::new();
        let first = menu.selected_category().group();
        menu.jump_group(true);
        assert_ne!(menu.selected_category().group(), first);
        menu.jump_group(false);
        assert_eq!(menu.selected_category().group(), first);
        assert_eq!(menu.selected, 0);
    }
}
