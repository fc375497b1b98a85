use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press F1 or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(hint, hint_area);
}

fn shortcut(key: &'static str, description: &'static str) -> TextLine<'static> {
    TextLine::from(vec![
        Span::styled(
            format!("  {key:<10}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(description),
    ])
}

fn heading(text: &'static str) -> TextLine<'static> {
    TextLine::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    vec![
        TextLine::from(Span::styled(
            "Places Wheel",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(
            "Search open places around you, then let the wheel decide where to go.",
        ),
        TextLine::from(""),
        heading("Anywhere:"),
        shortcut("Tab", "Next control (leaving Distance applies it)"),
        shortcut("Shift+Tab", "Previous control"),
        shortcut("F5", "Spin the wheel"),
        shortcut("F1", "Toggle this help"),
        TextLine::from(""),
        heading("Category:"),
        shortcut("Type", "Edit the search keyword"),
        shortcut("Right", "Accept the suggested keyword"),
        shortcut("Enter", "Search"),
        shortcut("Esc", "Jump to the wheel"),
        TextLine::from(""),
        heading("Distance / Min rating:"),
        shortcut("Left/Right", "Adjust (rating searches immediately)"),
        shortcut("Enter", "Apply the distance"),
        TextLine::from(""),
        heading("Wheel:"),
        shortcut("Enter/Space", "Spin"),
        shortcut("r", "Open reviews of the pick"),
        shortcut("n", "Open directions to the pick"),
        shortcut("+/-", "Zoom the map"),
        shortcut("/", "Edit the category"),
        shortcut("q/Esc", "Quit"),
    ]
}
