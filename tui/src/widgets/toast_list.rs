//! ToastList Widget
//!
//! Draws the toast stack in the top-right corner, newest at the bottom, over
//! whatever is underneath.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

use crate::theme::{severity_color, SCREEN_TEXT};
use crate::toast::ToastStack;

/// Width of one toast including borders
const TOAST_WIDTH: u16 = 36;

pub struct ToastList<'a> {
    stack: &'a ToastStack,
}

impl<'a> ToastList<'a> {
    pub fn new(stack: &'a ToastStack) -> Self {
        Self { stack }
    }
}

impl Widget for ToastList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = TOAST_WIDTH.min(area.width);
        if width < 8 {
            return;
        }
        let inner_width = usize::from(width.saturating_sub(2));
        let x = area.right() - width;
        let mut y = area.y;
        let bottom = u32::from(area.bottom());

        for toast in self.stack.iter() {
            let note = &toast.notification;
            let color = severity_color(note.severity);

            let body: Vec<Line> = textwrap::wrap(&note.detail, inner_width)
                .into_iter()
                .map(|l| Line::from(Span::styled(l.into_owned(), Style::default().fg(SCREEN_TEXT))))
                .collect();

            let height = u16::try_from(body.len()).unwrap_or(u16::MAX).saturating_add(2);
            if u32::from(y) + u32::from(height) > bottom {
                break;
            }

            let rect = Rect::new(x, y, width, height);
            Clear.render(rect, buf);

            let title = format!(" {} · {} ", note.severity.label(), note.summary);
            Paragraph::new(body)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color))
                        .title(Span::styled(
                            title,
                            Style::default().fg(color).add_modifier(Modifier::BOLD),
                        )),
                )
                .render(rect, buf);

            y += height;
        }
    }
}
