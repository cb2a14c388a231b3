//! SpritePanel Widget
//!
//! The "screen" of the dex: creature name and number, which side of the
//! sprite is showing, and the URL of the current frame.

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use dex_core::LookupSnapshot;

use crate::theme::{DEX_RED, DIM_GRAY, NAME_YELLOW, SCREEN_TEXT};

/// Braille spinner shown while a lookup is in flight
pub const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Label for a frame index in a front/back sequence
fn side_label(cursor: usize) -> &'static str {
    if cursor % 2 == 0 {
        "front"
    } else {
        "back"
    }
}

pub struct SpritePanel<'a> {
    snapshot: &'a LookupSnapshot,
    spinner_frame: usize,
}

impl<'a> SpritePanel<'a> {
    pub fn new(snapshot: &'a LookupSnapshot) -> Self {
        Self {
            snapshot,
            spinner_frame: 0,
        }
    }

    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let snap = self.snapshot;
        let mut lines = Vec::new();

        if snap.loading {
            let spin = SPINNER[self.spinner_frame % SPINNER.len()];
            lines.push(Line::from(Span::styled(
                format!("{spin} Looking up '{}'...", snap.query),
                Style::default().fg(DIM_GRAY),
            )));
            lines.push(Line::default());
        }

        let Some(record) = &snap.record else {
            if !snap.loading {
                lines.push(Line::from(Span::styled(
                    "Type a name or number and press Enter",
                    Style::default().fg(DIM_GRAY),
                )));
            }
            return lines;
        };

        let number = record.id.map(|id| format!("#{id:03} ")).unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(number, Style::default().fg(DIM_GRAY)),
            Span::styled(
                record.display_name(),
                Style::default().fg(NAME_YELLOW).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::default());

        let showing = side_label(snap.cursor);
        let mut sides = Vec::new();
        for (i, _) in snap.frames.iter().enumerate() {
            let label = side_label(i);
            let style = if i == snap.cursor {
                Style::default().fg(DEX_RED).add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(DIM_GRAY)
            };
            sides.push(Span::styled(format!(" {label} "), style));
            sides.push(Span::raw(" "));
        }
        lines.push(Line::from(sides));
        lines.push(Line::default());

        lines.push(Line::from(Span::styled(
            format!("{showing}: {}", snap.current_frame),
            Style::default().fg(SCREEN_TEXT),
        )));

        if !snap.animating {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "(paused)",
                Style::default().fg(DIM_GRAY),
            )));
        }

        lines
    }
}

impl Widget for SpritePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(DEX_RED))
            .title(" dex ")
            .title_alignment(Alignment::Center);

        Paragraph::new(self.lines())
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
