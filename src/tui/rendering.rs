use std::borrow::Cow;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{MessageType, StatusMessage};
use super::layout::{AppLayout, popup_area};
use crate::filters::colors::parse_hex;
use crate::filters::counting::{MatchListing, MatchedLine};
use crate::filters::{Colors, Definition, FilterFlags};
use crate::utils::sanitize_line;

/// Navigator popup size (width, height)
pub const NAVIGATOR_SIZE: (u16, u16) = (70, 20);

const MUTED: Color = Color::Rgb(113, 113, 122);
const EMERALD: Color = Color::Rgb(16, 185, 129);
const STATUS_BG: Color = Color::Rgb(24, 24, 27);
const RED: Color = Color::Rgb(239, 68, 68);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const AMBER: Color = Color::Rgb(245, 158, 11);

pub struct PanelHeader {
    pub title: String,
    pub desc: String,
    pub focused: bool,
    /// The grabbed entity can be put here
    pub drop_target: bool,
}

pub struct FilterRow {
    pub pattern: String,
    pub flags: FilterFlags,
    pub colors: Colors,
    pub active: bool,
    pub selected: bool,
    pub cursor: bool,
    pub editing: bool,
}

pub struct DisabledRow {
    pub name: String,
    pub icon: &'static str,
    pub selected: bool,
    pub cursor: bool,
}

pub struct DetailsView {
    pub title: String,
    pub desc: String,
    pub definition: Option<Definition>,
}

pub struct NavigatorRow {
    pub group: String,
    pub label: String,
    /// Matched character positions in `label`
    pub indices: Vec<u32>,
    pub selected: bool,
}

pub struct NavigatorView {
    pub query: String,
    /// Rows inside the viewport only
    pub rows: Vec<NavigatorRow>,
    pub visible: usize,
    pub total: usize,
}

pub struct PromptView<'a> {
    pub title: &'static str,
    pub text: &'a str,
    pub error: Option<&'a str>,
}

/// Everything one frame shows
pub struct RenderState<'a> {
    pub filters: PanelHeader,
    pub filter_rows: Vec<FilterRow>,
    /// Show the empty-list hint instead of rows
    pub placeholder: bool,
    pub disabled: PanelHeader,
    pub disabled_rows: Vec<DisabledRow>,
    pub details: Option<DetailsView>,
    pub matches: Option<&'a MatchListing>,
    pub navigator: Option<NavigatorView>,
    pub prompt: Option<PromptView<'a>>,
    pub status_message: Option<&'a StatusMessage>,
    /// Label of the grabbed entity
    pub dragging: Option<String>,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_filters(frame, layout.filters_area, state);
    render_disabled(frame, layout.disabled_area, state);
    match state.matches {
        Some(listing) => render_matches(frame, layout.details_area, listing),
        None => render_details(frame, layout.details_area, state.details.as_ref()),
    }
    render_status_bar(frame, layout.status_area, state);

    if let Some(navigator) = &state.navigator {
        render_navigator(frame, frame.area(), navigator);
    }
    if let Some(prompt) = &state.prompt {
        render_prompt(frame, frame.area(), prompt);
    }
}

fn panel_block(header: &PanelHeader) -> Block<'static> {
    let border = if header.drop_target {
        AMBER
    } else if header.focused {
        EMERALD
    } else {
        MUTED
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", header.title))
        .title_bottom(Line::from(format!(" {} ", header.desc)).right_aligned())
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(BRIGHT).bg(EMERALD).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(BRIGHT)
    }
}

fn hex_color(color: &str) -> Option<Color> {
    parse_hex(color).map(|(r, g, b)| Color::Rgb(r, g, b))
}

fn flag_letters(flags: &FilterFlags) -> String {
    [(flags.cases, 'c'), (flags.word, 'w'), (flags.reg, 'r')]
        .iter()
        .map(|&(on, letter)| if on { letter } else { '·' })
        .collect()
}

fn render_filters(frame: &mut Frame, area: Rect, state: &RenderState) {
    let block = panel_block(&state.filters);
    if state.placeholder {
        let hint = Paragraph::new("No filters yet. Press n to add one.")
            .style(Style::default().fg(MUTED))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = state
        .filter_rows
        .iter()
        .map(|row| {
            let marker = if row.cursor { "›" } else { " " };
            let state_icon = if row.active { "●" } else { "○" };
            let swatch = Style::default()
                .fg(hex_color(&row.colors.color).unwrap_or(BRIGHT))
                .bg(hex_color(&row.colors.background).unwrap_or(STATUS_BG));
            let mut pattern_style = row_style(row.selected);
            if !row.active {
                pattern_style = pattern_style.add_modifier(Modifier::DIM);
            }
            if row.editing {
                pattern_style = pattern_style.add_modifier(Modifier::UNDERLINED);
            }
            ListItem::new(Line::from(vec![
                Span::raw(format!("{marker} ")),
                Span::styled(format!("{state_icon} "), Style::default().fg(EMERALD)),
                Span::styled(" ", swatch),
                Span::raw(" "),
                Span::styled(row.pattern.clone(), pattern_style),
                Span::styled(format!("  {}", flag_letters(&row.flags)), Style::default().fg(MUTED)),
            ]))
        })
        .collect();

    let mut list_state = ListState::default().with_selected(state.filter_rows.iter().position(|row| row.cursor));
    frame.render_stateful_widget(List::new(items).block(block), area, &mut list_state);
}

fn render_disabled(frame: &mut Frame, area: Rect, state: &RenderState) {
    let items: Vec<ListItem> = state
        .disabled_rows
        .iter()
        .map(|row| {
            let marker = if row.cursor { "›" } else { " " };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{marker} ")),
                Span::styled(format!("[{}] ", row.icon), Style::default().fg(MUTED)),
                Span::styled(row.name.clone(), row_style(row.selected)),
            ]))
        })
        .collect();

    let mut list_state =
        ListState::default().with_selected(state.disabled_rows.iter().position(|row| row.cursor));
    let list = List::new(items).block(panel_block(&state.disabled));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_details(frame: &mut Frame, area: Rect, details: Option<&DetailsView>) {
    let title = details.map_or(" Details ".to_string(), |details| format!(" {} ", details.title));
    let content = match details.and_then(|details| details.definition.as_ref().map(|d| (details, d))) {
        Some((details, definition)) => {
            let label = |text: &'static str| Span::styled(text, Style::default().fg(MUTED));
            let flags = &definition.filter.flags;
            let on_off = |on: bool| if on { "on" } else { "off" };
            Text::from(vec![
                Line::from(vec![label("Pattern: "), Span::raw(details.desc.clone())]),
                Line::from(vec![label("Active: "), Span::raw(on_off(definition.active))]),
                Line::from(vec![label("Match case: "), Span::raw(on_off(flags.cases))]),
                Line::from(vec![label("Whole word: "), Span::raw(on_off(flags.word))]),
                Line::from(vec![label("Regex: "), Span::raw(on_off(flags.reg))]),
                Line::from(vec![
                    label("Colors: "),
                    Span::styled(
                        format!(" {} on {} ", definition.colors.color, definition.colors.background),
                        Style::default()
                            .fg(hex_color(&definition.colors.color).unwrap_or(BRIGHT))
                            .bg(hex_color(&definition.colors.background).unwrap_or(STATUS_BG)),
                    ),
                ]),
                Line::from(vec![label("Uuid: "), Span::raw(definition.uuid.clone())]),
            ])
        }
        None => Text::from("Select a single filter to see its details"),
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(MUTED))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// One matched log line, match ranges highlighted
fn match_line(line: &MatchedLine) -> Line<'_> {
    let number = Span::styled(format!("{:>6} ", line.number), Style::default().fg(MUTED));
    let text = match sanitize_line(&line.text) {
        Cow::Borrowed(text) => text,
        // Offsets no longer line up with the cleaned text
        Cow::Owned(clean) => return Line::from(vec![number, Span::raw(clean)]),
    };
    let mut spans = vec![number];
    let mut offset = 0;
    for range in &line.ranges {
        if range.start < offset || range.end > text.len() {
            continue;
        }
        spans.push(Span::raw(&text[offset..range.start]));
        spans.push(Span::styled(&text[range.clone()], Style::default().fg(STATUS_BG).bg(AMBER)));
        offset = range.end;
    }
    spans.push(Span::raw(&text[offset..]));
    Line::from(spans)
}

fn render_matches(frame: &mut Frame, area: Rect, listing: &MatchListing) {
    let lines: Vec<Line> = listing.lines.iter().map(match_line).collect();
    let title = format!(" Matches: {} ({}) ", listing.label, listing.total);
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(EMERALD))
            .title(title)
            .title_bottom(Line::from(" Esc: close ").right_aligned()),
    );
    frame.render_widget(paragraph, area);
}

fn highlighted(label: &str, indices: &[u32], base: Style) -> Vec<Span<'static>> {
    label
        .chars()
        .enumerate()
        .map(|(index, c)| {
            let matched = u32::try_from(index).is_ok_and(|index| indices.contains(&index));
            let style = if matched { base.fg(AMBER).add_modifier(Modifier::BOLD) } else { base };
            Span::styled(c.to_string(), style)
        })
        .collect()
}

fn render_navigator(frame: &mut Frame, area: Rect, navigator: &NavigatorView) {
    let popup = popup_area(area, NAVIGATOR_SIZE.0, NAVIGATOR_SIZE.1);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", Style::default().fg(EMERALD)),
        Span::raw(navigator.query.clone()),
    ])];
    for row in &navigator.rows {
        let base = if row.selected { Style::default().fg(BRIGHT).bg(EMERALD) } else { Style::default() };
        let mut spans = vec![Span::styled(format!("{:<10} ", row.group), base.fg(MUTED))];
        spans.extend(highlighted(&row.label, &row.indices, base));
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(EMERALD))
            .title(" Go to ")
            .title_bottom(Line::from(format!(" {}/{} ", navigator.visible, navigator.total)).right_aligned()),
    );
    frame.render_widget(paragraph, popup);
}

fn render_prompt(frame: &mut Frame, area: Rect, prompt: &PromptView) {
    let popup = popup_area(area, 60, 4);
    frame.render_widget(Clear, popup);

    let mut lines = vec![Line::from(vec![Span::raw(prompt.text), Span::styled("▏", Style::default().fg(EMERALD))])];
    if let Some(error) = prompt.error {
        lines.push(Line::from(Span::styled(error, Style::default().fg(RED))));
    }
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(EMERALD))
            .title(prompt.title),
    );
    frame.render_widget(paragraph, popup);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (text, style) = if let Some(msg) = state.status_message {
        let fg = match msg.message_type {
            MessageType::Success => EMERALD,
            MessageType::Error => RED,
        };
        (format!(" {} ", msg.text), Style::default().fg(fg).bg(STATUS_BG))
    } else if let Some(label) = &state.dragging {
        (
            format!(" Dragging '{label}' | Tab: switch list | p: put | Esc: cancel "),
            Style::default().fg(AMBER).bg(STATUS_BG),
        )
    } else {
        (
            " ↑↓: move | Shift: extend | Space: select | a: on/off | d: disable | g/p: drag | e: edit | n: new | /: go to | m: matches | q: quit "
                .to_string(),
            Style::default().fg(BRIGHT).bg(STATUS_BG),
        )
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}
