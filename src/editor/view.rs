//! Rendering for the checklist editor.

use super::app::{App, Input, InputTarget, Row};
use super::Tab;
use crate::form::{FollowUpField, HeaderField, Instance, Item, Status};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap};
use ratatui::Frame;

const SECTIONS_LEGEND: &str =
    "[o/x/n status] [u unset] [Enter note] [p photo] [v view] [d drop photo] [+/- instance] [S submit] [? help]";
const FIELDS_LEGEND: &str = "[Enter edit] [Tab switch tab] [S submit] [? help] [q quit]";

impl App {
    pub(super) fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(area);

        self.draw_header_bar(frame, layout[0]);
        self.draw_tabs(frame, layout[1]);
        self.draw_main(frame, layout[2]);
        self.draw_footer(frame, layout[3]);

        if self.show_help {
            self.draw_help(frame);
        }
    }

    fn draw_header_bar(&self, frame: &mut Frame, area: Rect) {
        let findings = self.validation.violations.len();
        let readiness = if self.validation.ready {
            Span::styled("ready", Style::default().fg(Color::Green))
        } else {
            Span::styled(
                format!("{findings} finding(s) open"),
                Style::default().fg(Color::Red),
            )
        };
        let instances: usize = self
            .tree
            .sections
            .iter()
            .flat_map(|section| &section.items)
            .map(|item| item.instances.len())
            .sum();

        let line1 = Line::from(vec![
            Span::styled("Site audit", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" | "),
            readiness,
        ]);
        let line2 = Line::from(vec![
            Span::raw(format!(
                "Sections: {} | Instances: {} | Report: ",
                self.tree.sections.len(),
                instances
            )),
            Span::raw(self.out_display()),
        ]);
        let paragraph = Paragraph::new(vec![line1, line2]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles = Tab::ALL
            .iter()
            .map(|tab| {
                Line::from(Span::styled(
                    tab.label(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            })
            .collect::<Vec<_>>();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_widget(tabs, area);
    }

    fn draw_main(&self, frame: &mut Frame, area: Rect) {
        match self.tab {
            Tab::Header => self.draw_fields(
                frame,
                area,
                "Header",
                HeaderField::ALL
                    .iter()
                    .map(|field| (field.label(), self.tree.header_field(*field))),
            ),
            Tab::Sections => self.draw_assessment(frame, area),
            Tab::FollowUp => self.draw_fields(
                frame,
                area,
                "Follow-up",
                FollowUpField::ALL
                    .iter()
                    .map(|field| (field.label(), self.tree.follow_up_field(*field))),
            ),
        }
    }

    fn draw_fields<'a>(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        fields: impl Iterator<Item = (&'a str, &'a str)>,
    ) {
        let items = fields
            .map(|(label, value)| {
                let shown = if value.is_empty() { "(empty)" } else { value };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{label:<20}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(shown.to_string()),
                ]))
            })
            .collect::<Vec<_>>();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        state.select(Some(self.selection[self.tab.index()]));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_assessment(&self, frame: &mut Frame, area: Rect) {
        let items = self
            .rows()
            .iter()
            .map(|row| self.assessment_row(row))
            .collect::<Vec<_>>();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Assessment"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default();
        state.select(Some(self.selection[Tab::Sections.index()]));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn assessment_row(&self, row: &Row) -> ListItem<'static> {
        match *row {
            Row::Section(section) => ListItem::new(Line::from(Span::styled(
                self.tree.sections[section].title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))),
            Row::EmptyItem { section, item } => {
                let item = &self.tree.sections[section].items[item];
                ListItem::new(Line::from(Span::styled(
                    format!("  {}  {} (no instances, press + to add)", item.id, item.label),
                    Style::default().add_modifier(Modifier::DIM),
                )))
            }
            Row::Instance {
                section,
                item,
                instance,
            } => {
                let item = &self.tree.sections[section].items[item];
                let inst = &item.instances[instance];
                ListItem::new(instance_line(item, inst, instance, self))
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(input) = &self.input {
            input_line(input)
        } else if let Some(message) = &self.message {
            Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Yellow),
            ))
        } else {
            let legend = match self.tab {
                Tab::Sections => SECTIONS_LEGEND,
                _ => FIELDS_LEGEND,
            };
            Line::from(Span::styled(legend, Style::default().add_modifier(Modifier::DIM)))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn draw_help(&self, frame: &mut Frame) {
        let area = centered_rect(frame.size(), 56, 16);
        let lines = vec![
            Line::from("Navigation: Up/Down or j/k, Tab/BackTab between tabs"),
            Line::from(""),
            Line::from("Assessment rows:"),
            Line::from("  o / x / n   mark OK / Not OK / N/A"),
            Line::from("  u           clear the status"),
            Line::from("  Enter       edit the note"),
            Line::from("  p           attach photo (path), empty input clears"),
            Line::from("  v           view the attached photo"),
            Line::from("  d           drop the attached photo"),
            Line::from("  + / -       add / remove a repeatable instance"),
            Line::from(""),
            Line::from("Anywhere: S submits once every finding is resolved;"),
            Line::from("q or Esc leaves without writing anything."),
        ];
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .wrap(Wrap { trim: false }),
            area,
        );
    }

    fn out_display(&self) -> String {
        self.out_path().display().to_string()
    }
}

fn instance_line(item: &Item, inst: &Instance, ordinal: usize, app: &App) -> Line<'static> {
    let (cell, cell_style) = status_cell(inst.status);
    let label = if item.repeatable && item.instances.len() > 1 {
        format!("{} #{}  {}", item.id, ordinal + 1, item.label)
    } else {
        format!("{}  {}", item.id, item.label)
    };

    let mut spans = vec![
        Span::raw("  "),
        Span::styled(cell, cell_style),
        Span::raw(" "),
        Span::raw(label),
    ];
    if !inst.description.trim().is_empty() {
        spans.push(Span::styled(
            format!("  \"{}\"", inst.description),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    if let Some(photo) = &inst.photo {
        spans.push(Span::styled(
            format!("  [{}]", photo.file_name()),
            Style::default().fg(Color::Blue),
        ));
    }
    if let Some(violation) = app
        .validation
        .violations
        .iter()
        .find(|violation| violation.instance_id == inst.id)
    {
        spans.push(Span::styled(
            format!("  ! {}", violation.kind.message()),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

fn status_cell(status: Option<Status>) -> (String, Style) {
    let style = match status {
        None => Style::default().add_modifier(Modifier::DIM),
        Some(Status::Ok) => Style::default().fg(Color::Green),
        Some(Status::NotOk) => Style::default().fg(Color::Red),
        Some(Status::Na) => Style::default().fg(Color::Gray),
    };
    let cell = match status {
        None => "[  --  ]".to_string(),
        Some(status) => format!("[{:^6}]", status.label()),
    };
    (cell, style)
}

fn input_line(input: &Input) -> Line<'static> {
    let prompt = match input.target {
        InputTarget::Description(_) => "note",
        InputTarget::PhotoPath(_) => "photo path",
        InputTarget::Header(_) | InputTarget::FollowUp(_) => "value",
    };
    Line::from(vec![
        Span::styled(
            format!("{prompt}> "),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(input.buffer.clone()),
        Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ])
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
