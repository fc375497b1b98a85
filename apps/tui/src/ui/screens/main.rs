use crate::app::{App, Focus};
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::tables::scroll_offset;
use crate::ui::widgets::wheel::{render_wheel, slice_color};
use places_wheel::domain::{MAX_RADIUS_KM, MIN_RADIUS_KM};
use places_wheel::location::LocationState;
use places_wheel::wheel::PALETTE;
use places_wheel::MinRating;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filters
            Constraint::Min(10),   // Candidates, wheel and map
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_filters(app, f, main_layout[0]);
    render_content_section(app, f, main_layout[1]);
    render_status_section(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);
}

fn focus_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn control_block(app: &App, focus: Focus) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", focus.label()))
        .borders(Borders::ALL)
        .border_style(focus_style(app, focus))
}

fn render_filters(app: &App, f: &mut Frame<'_>, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ])
        .split(area);

    f.render_widget(
        Paragraph::new(category_line(app)).block(control_block(app, Focus::Category)),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(distance_line(app, chunks[1].width.saturating_sub(12)))
            .block(control_block(app, Focus::Distance)),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(rating_line(app)).block(control_block(app, Focus::Rating)),
        chunks[2],
    );
}

fn category_line(app: &App) -> TextLine<'_> {
    let mut spans = vec![Span::styled(
        app.category_input.as_str(),
        Style::default().fg(Color::White),
    )];

    if app.focus == Focus::Category {
        let cursor = if app.animation_counter.sin() > 0.0 {
            "_"
        } else {
            " "
        };
        spans.push(Span::styled(cursor, Style::default().fg(Color::Yellow)));

        if let Some(suggestion) = app.category_suggestion() {
            spans.push(Span::styled(
                format!("  -> {suggestion}"),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
    } else if app.category_input.is_empty() {
        spans.push(Span::styled("(any)", Style::default().fg(Color::DarkGray)));
    }

    TextLine::from(spans)
}

fn distance_line(app: &App, bar_width: u16) -> TextLine<'static> {
    let steps = MAX_RADIUS_KM - MIN_RADIUS_KM;
    let filled = (u32::from(bar_width) * (app.radius_km - MIN_RADIUS_KM))
        .checked_div(steps)
        .unwrap_or(0);
    let bar_width = u32::from(bar_width);

    let pending = app.radius_km != app.committed_radius_km();
    let readout_style = if pending {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC)
    } else {
        Style::default().fg(Color::White)
    };

    TextLine::from(vec![
        Span::styled(format!("{:>3} km ", app.radius_km), readout_style),
        Span::styled(
            "=".repeat(filled as usize),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            "-".repeat(bar_width.saturating_sub(filled) as usize),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn rating_line(app: &App) -> TextLine<'static> {
    let spans = MinRating::ALL
        .iter()
        .flat_map(|option| {
            let style = if *option == app.min_rating {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(option.label(), style), Span::raw(" ")]
        })
        .collect::<Vec<_>>();
    TextLine::from(spans)
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let horizontal_split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left_split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(8)])
        .split(horizontal_split[0]);

    let right_split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(horizontal_split[1]);

    render_candidate_table(app, f, left_split[0]);
    render_selection_panel(app, f, left_split[1]);
    render_wheel(app, f, right_split[0]);
    render_map(app, f, right_split[1]);
}

fn render_candidate_table(app: &App, f: &mut Frame<'_>, area: Rect) {
    let candidates = app.candidates.candidates();
    let block = Block::default()
        .title(format!(" Candidates ({}) ", candidates.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    if candidates.is_empty() {
        let paragraph = Paragraph::new("No candidates yet. Type a category and press Enter.")
            .block(block)
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let selected = app.selection.as_ref().and(app.wheel.last_index());
    // Borders and header take three rows
    let visible_rows = usize::from(area.height.saturating_sub(3));
    let offset = scroll_offset(candidates.len(), visible_rows, selected.unwrap_or(0));

    let rows = candidates
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows)
        .map(|(index, candidate)| {
            let swatch = slice_color(PALETTE[index % PALETTE.len()]);
            let style = if selected == Some(index) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(Span::styled(
                    format!("{:>2}", index + 1),
                    Style::default().fg(swatch),
                )),
                Cell::from(candidate.name.clone()),
                Cell::from(candidate.rating.to_string()),
                Cell::from(candidate.address_label().to_string()),
            ])
            .style(style)
        })
        .collect::<Vec<_>>();

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Length(6),
            Constraint::Min(10),
        ],
    )
    .header(
        Row::new(vec!["#", "Name", "Rating", "Address"])
            .style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
    )
    .block(block);

    f.render_widget(table, area);
}

fn render_selection_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Result ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let label_style = Style::default().fg(Color::Gray);
    let lines = if let Some(selection) = &app.selection {
        vec![
            TextLine::from(Span::styled(
                selection.candidate.name.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            TextLine::from(vec![
                Span::styled("Rating: ", label_style),
                Span::raw(selection.candidate.rating.to_string()),
            ]),
            TextLine::from(vec![
                Span::styled("Address: ", label_style),
                Span::raw(selection.candidate.address_label()),
            ]),
            TextLine::from(vec![
                Span::styled("Reviews (r): ", label_style),
                Span::styled(selection.review_url.as_str(), Style::default().fg(Color::Blue)),
            ]),
            TextLine::from(vec![
                Span::styled("Directions (n): ", label_style),
                Span::styled(
                    selection.navigation_url.as_str(),
                    Style::default().fg(Color::Blue),
                ),
            ]),
        ]
    } else if app.wheel.is_spinning() {
        vec![TextLine::from(Span::styled(
            "The wheel is spinning...",
            Style::default().fg(Color::Magenta),
        ))]
    } else {
        vec![TextLine::from(Span::styled(
            "Spin the wheel (Enter on the wheel or F5) to pick a place.",
            label_style,
        ))]
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn location_span(app: &App) -> Span<'static> {
    match app.location.state() {
        LocationState::Pending => {
            Span::styled("Locating...", Style::default().fg(Color::Gray))
        }
        LocationState::Available(coordinate) => Span::styled(
            format!("@ {coordinate}"),
            Style::default().fg(Color::Cyan),
        ),
        LocationState::Unavailable => {
            Span::styled("Location unavailable", Style::default().fg(Color::Red))
        }
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    let inner = status_block.inner(area);
    f.render_widget(status_block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(28)])
        .split(inner);

    if app.searching {
        let throbber = Throbber::default()
            .label(app.status_message.as_str())
            .style(Style::default().fg(Color::Cyan))
            .throbber_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .throbber_set(throbber_widgets_tui::BRAILLE_SIX);
        let mut throbber_state = app.throbber_state.clone();
        f.render_stateful_widget(throbber, chunks[0], &mut throbber_state);
    } else {
        let status = Paragraph::new(Span::styled(
            app.status_message.as_str(),
            Style::default().fg(Color::Green),
        ));
        f.render_widget(status, chunks[0]);
    }

    f.render_widget(
        Paragraph::new(location_span(app)).alignment(Alignment::Right),
        chunks[1],
    );
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(Color::Gray);
    let shortcuts = TextLine::from(vec![
        Span::styled("Tab", key_style),
        Span::styled(" focus  ", text_style),
        Span::styled("Enter", key_style),
        Span::styled(" search/spin  ", text_style),
        Span::styled("F5", key_style),
        Span::styled(" spin  ", text_style),
        Span::styled("r/n", key_style),
        Span::styled(" reviews/directions  ", text_style),
        Span::styled("+/-", key_style),
        Span::styled(" zoom  ", text_style),
        Span::styled("F1", key_style),
        Span::styled(" help  ", text_style),
        Span::styled("q", key_style),
        Span::styled(" quit", text_style),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}
