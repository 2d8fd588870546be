//! Turns a [`GridBuffer`] into ratatui lines.
//!
//! The same painter serves the TUI (themed colors) and `show`/`embed`
//! (plain glyphs, so output survives a pipe).

use crate::config::DotPosition;
use crate::locale::Locale;
use crate::model::IntensityLevel;
use crate::render::{GridBuffer, GridCell, Label, RenderContext, SectionBuffer, TaskDots};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;

const DAY_LABEL_WIDTH: usize = 4;
const PLAIN_GLYPHS: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Parses `#rgb` or `#rrggbb`.
pub fn parse_hex(input: &str) -> Option<Color> {
    let hex = input.trim().strip_prefix('#')?;
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let value = u32::from_str_radix(&expanded, 16).ok()?;
    Some(Color::Rgb(
        (value >> 16) as u8,
        (value >> 8 & 0xff) as u8,
        (value & 0xff) as u8,
    ))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub levels: [Color; 5],
    pub text: [Option<Color>; 5],
    pub highlight: Color,
}

impl Palette {
    /// Colors of the active theme; unparsable entries fall back to gray.
    pub fn from_context(ctx: &RenderContext<'_>) -> Self {
        let scheme = ctx.settings.active_scheme();
        let mut levels = [Color::Gray; 5];
        let mut text = [None; 5];
        for level in IntensityLevel::ALL {
            levels[level.index()] = parse_hex(scheme.level(level)).unwrap_or(Color::Gray);
            text[level.index()] = scheme.text_level(level).and_then(parse_hex);
        }
        let highlight = parse_hex(ctx.highlight_color()).unwrap_or(Color::Magenta);
        Palette {
            levels,
            text,
            highlight,
        }
    }

    fn level(&self, level: IntensityLevel) -> Color {
        self.levels[level.index()]
    }

    fn text(&self, level: IntensityLevel) -> Color {
        self.text[level.index()].unwrap_or(Color::White)
    }
}

enum Ink {
    Themed(Palette),
    Plain,
}

pub struct Painter<'a> {
    ink: Ink,
    locale: &'static Locale,
    selected: Option<&'a str>,
}

impl<'a> Painter<'a> {
    pub fn themed(palette: Palette, locale: &'static Locale) -> Self {
        Painter {
            ink: Ink::Themed(palette),
            locale,
            selected: None,
        }
    }

    pub fn plain(locale: &'static Locale) -> Self {
        Painter {
            ink: Ink::Plain,
            locale,
            selected: None,
        }
    }

    /// Marks the cell for `date` as the cursor position.
    pub fn with_selection(mut self, date: Option<&'a str>) -> Self {
        self.selected = date;
        self
    }

    pub fn paint(&self, buffer: &GridBuffer) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for (idx, section) in buffer.sections.iter().enumerate() {
            if idx > 0 {
                lines.push(Line::default());
            }
            if let Some(title) = self.title_line(section) {
                lines.push(title);
            }
            let is_graph = section
                .labels
                .iter()
                .any(|l| matches!(l, Label::Month { .. } | Label::DayRow { .. }));
            if is_graph {
                self.paint_graph(section, &mut lines);
            } else {
                self.paint_month(section, &mut lines);
            }
        }
        lines
    }

    pub fn legend(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!("{} ", self.locale.legend_less),
            Style::default().fg(Color::Gray),
        )];
        for level in IntensityLevel::ALL {
            spans.push(match &self.ink {
                Ink::Themed(palette) => {
                    Span::styled("■ ", Style::default().fg(palette.level(level)))
                }
                Ink::Plain => Span::raw(format!("{} ", PLAIN_GLYPHS[level.index()])),
            });
        }
        spans.push(Span::styled(
            self.locale.legend_more.to_string(),
            Style::default().fg(Color::Gray),
        ));
        Line::from(spans)
    }

    fn title_line(&self, section: &SectionBuffer) -> Option<Line<'static>> {
        let title = section.section.title.clone()?;
        let title_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let Some(nav) = section.section.navigation else {
            return Some(Line::from(Span::styled(title, title_style)));
        };
        let arrow = |enabled: bool, glyph: &'static str| {
            let color = if enabled { Color::Cyan } else { Color::DarkGray };
            Span::styled(glyph, Style::default().fg(color))
        };
        Some(Line::from(vec![
            arrow(nav.can_prev, "‹ "),
            Span::styled(title, title_style),
            arrow(nav.can_next, " ›"),
        ]))
    }

    fn paint_graph(&self, section: &SectionBuffer, lines: &mut Vec<Line<'static>>) {
        let columns = section
            .cells
            .iter()
            .map(|c| c.slot.column + 1)
            .max()
            .unwrap_or(0);
        let width = DAY_LABEL_WIDTH + columns * 2;

        // A later month label wins over an earlier one it would overlap.
        let mut placed: Vec<(usize, &str)> = Vec::new();
        for label in &section.labels {
            if let Label::Month { text, week, .. } = label {
                let at = DAY_LABEL_WIDTH + week * 2;
                while let Some((prev_at, prev)) = placed.last() {
                    if prev_at + prev.chars().count() + 1 > at {
                        placed.pop();
                    } else {
                        break;
                    }
                }
                placed.push((at, text.as_str()));
            }
        }
        let mut header: Vec<char> = vec![' '; width];
        for (at, text) in placed {
            for (offset, ch) in text.chars().enumerate() {
                if let Some(slot) = header.get_mut(at + offset) {
                    *slot = ch;
                }
            }
        }
        let header: String = header.into_iter().collect();
        lines.push(Line::from(Span::styled(
            header.trim_end().to_string(),
            Style::default().fg(Color::Gray),
        )));

        let by_slot: HashMap<(usize, usize), &GridCell> = section
            .cells
            .iter()
            .map(|c| ((c.slot.column, c.slot.row), c))
            .collect();
        for row in 0..7 {
            let label = section
                .labels
                .iter()
                .find_map(|l| match l {
                    Label::DayRow { row: r, text } if *r == row => Some(text.clone()),
                    _ => None,
                })
                .unwrap_or_default();
            let mut spans = vec![Span::styled(
                format!("{:<width$}", truncate(&label, DAY_LABEL_WIDTH - 1), width = DAY_LABEL_WIDTH),
                Style::default().fg(Color::Gray),
            )];
            for column in 0..columns {
                match by_slot.get(&(column, row)) {
                    Some(cell) if !cell.padding => spans.push(self.graph_square(cell)),
                    _ => spans.push(Span::raw("  ")),
                }
            }
            lines.push(Line::from(spans));
        }
    }

    fn graph_square(&self, cell: &GridCell) -> Span<'static> {
        let mut span = match &self.ink {
            Ink::Themed(palette) => {
                let mut style = Style::default().fg(palette.level(cell.level));
                if cell.highlighted {
                    style = style.bg(palette.highlight);
                }
                Span::styled("■ ", style)
            }
            Ink::Plain => {
                let glyph = if cell.highlighted {
                    '◆'
                } else {
                    PLAIN_GLYPHS[cell.level.index()]
                };
                Span::raw(format!("{} ", glyph))
            }
        };
        if self.is_selected(cell) {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
        span
    }

    fn paint_month(&self, section: &SectionBuffer, lines: &mut Vec<Line<'static>>) {
        let sheet = section.cells.iter().any(|c| c.dot.is_some() || c.tasks != TaskDots::None);
        let cell_width = if sheet { 6 } else { 3 };

        let mut names: Vec<(usize, &str)> = section
            .labels
            .iter()
            .filter_map(|l| match l {
                Label::DayName { column, text } => Some((*column, text.as_str())),
                _ => None,
            })
            .collect();
        names.sort_by_key(|(column, _)| *column);
        let header: Vec<Span<'static>> = names
            .iter()
            .map(|(_, name)| {
                Span::styled(
                    format!("{:<width$}", truncate(name, cell_width - 1), width = cell_width),
                    Style::default().fg(Color::Gray),
                )
            })
            .collect();
        lines.push(Line::from(header));

        let rows = section.cells.iter().map(|c| c.slot.row + 1).max().unwrap_or(0);
        for row in 0..rows {
            let mut spans = Vec::new();
            for column in 0..7 {
                let cell = section
                    .cells
                    .iter()
                    .find(|c| c.slot.row == row && c.slot.column == column);
                match cell {
                    Some(cell) if !cell.padding => {
                        if sheet {
                            spans.extend(self.sheet_day(cell));
                        } else {
                            spans.extend(self.calendar_day(cell));
                        }
                    }
                    _ => spans.push(Span::raw(" ".repeat(cell_width))),
                }
            }
            lines.push(Line::from(spans));
        }
    }

    fn day_number(cell: &GridCell) -> String {
        format!("{:>2}", cell.day.unwrap_or_default())
    }

    fn calendar_day(&self, cell: &GridCell) -> Vec<Span<'static>> {
        let number = Self::day_number(cell);
        let mut spans = match &self.ink {
            Ink::Themed(palette) => {
                let style = if cell.in_range {
                    let mut style = Style::default()
                        .bg(palette.level(cell.level))
                        .fg(palette.text(cell.level));
                    if cell.highlighted {
                        style = style
                            .fg(palette.highlight)
                            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                    }
                    style
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                vec![Span::styled(number, style), Span::raw(" ")]
            }
            Ink::Plain => {
                let marker = if cell.highlighted {
                    '◆'
                } else if cell.in_range && cell.count > 0 {
                    PLAIN_GLYPHS[cell.level.index()]
                } else {
                    ' '
                };
                vec![Span::raw(format!("{}{}", number, marker))]
            }
        };
        if self.is_selected(cell) {
            spans[0].style = spans[0].style.add_modifier(Modifier::REVERSED);
        }
        spans
    }

    fn sheet_day(&self, cell: &GridCell) -> Vec<Span<'static>> {
        let number = Self::day_number(cell);
        let dot = cell.dot;
        let (left, right) = match dot {
            Some(DotPosition::TopLeft) | Some(DotPosition::BottomLeft) => (true, false),
            Some(DotPosition::TopRight) | Some(DotPosition::BottomRight) => (false, true),
            _ => (false, false),
        };
        let tasks = match cell.tasks {
            TaskDots::None => "  ",
            TaskDots::Completed => "● ",
            TaskDots::Open => "●○",
        };

        let (dot_span, mut number_style) = match &self.ink {
            Ink::Themed(palette) => {
                let dot_span = Span::styled("•", Style::default().fg(palette.level(cell.level)));
                let mut style = if cell.in_range {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                if dot == Some(DotPosition::Center) {
                    style = style.bg(palette.level(cell.level));
                    style = style.fg(if cell.dark_text {
                        palette.text[cell.level.index()].unwrap_or(Color::White)
                    } else {
                        Color::Black
                    });
                }
                if cell.highlighted {
                    style = style
                        .fg(palette.highlight)
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                (dot_span, style)
            }
            Ink::Plain => {
                let glyph = PLAIN_GLYPHS[cell.level.index()].to_string();
                (Span::raw(glyph), Style::default())
            }
        };
        if self.is_selected(cell) {
            number_style = number_style.add_modifier(Modifier::REVERSED);
        }

        let center_marker = matches!(self.ink, Ink::Plain) && dot == Some(DotPosition::Center);
        let blank = || Span::raw(" ");
        vec![
            if left { dot_span.clone() } else { blank() },
            Span::styled(number, number_style),
            if right || center_marker { dot_span } else { blank() },
            Span::styled(tasks, Style::default().fg(Color::Gray)),
            blank(),
        ]
    }

    fn is_selected(&self, cell: &GridCell) -> bool {
        self.selected.is_some() && cell.date.as_deref() == self.selected
    }
}

/// Hover text for a day cell; padding has none.
pub fn tooltip(locale: &Locale, cell: &GridCell) -> Option<String> {
    let date = cell.date.as_deref()?;
    Some(locale.tooltip(date, cell.count))
}

/// Concatenates span contents, one line per row, trailing blanks trimmed.
pub fn lines_to_string(lines: &[Line<'_>]) -> String {
    let mut out = String::new();
    for line in lines {
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        out.push_str(text.trim_end());
        out.push('\n');
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
