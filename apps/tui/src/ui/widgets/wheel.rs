use places_wheel::wheel::{partition, slice_under_pointer, SliceColor, WheelPhase};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Circle, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use std::time::Instant;

use crate::app::{App, Focus};

const LABEL_WIDTH: usize = 10;

pub const fn slice_color(color: SliceColor) -> Color {
    Color::Rgb(color.0, color.1, color.2)
}

/// Point on the unit wheel at `degrees` clockwise from the top.
fn polar(degrees: f64, radius: f64) -> (f64, f64) {
    let radians = degrees.to_radians();
    (radians.sin() * radius, radians.cos() * radius)
}

fn short_label(name: &str) -> String {
    if name.chars().count() <= LABEL_WIDTH {
        return name.to_string();
    }
    let mut label: String = name.chars().take(LABEL_WIDTH - 1).collect();
    label.push('~');
    label
}

fn label_style(color: Color, revealed: bool, under_pointer: bool) -> Style {
    let style = Style::default().fg(color);
    if revealed {
        style.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if under_pointer {
        style.add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn render_wheel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let border_color = if app.focus == Focus::Wheel {
        Color::Yellow
    } else {
        Color::Magenta
    };
    let title = match app.wheel.phase() {
        WheelPhase::Spinning(_) => " Wheel (spinning) ",
        WheelPhase::Idle | WheelPhase::Revealed { .. } => " Wheel ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 8 || inner.height < 4 {
        return;
    }

    let candidates = app.candidates.candidates();
    if candidates.is_empty() {
        let paragraph = Paragraph::new("Search to fill the wheel")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    }

    // Terminal cells are about twice as tall as wide
    let height = inner.height.min(inner.width / 2).max(1);
    let width = height * 2;
    let square = Rect {
        x: inner.x + (inner.width - width) / 2,
        y: inner.y + (inner.height - height) / 2,
        width,
        height,
    };

    let rotation = app.wheel.displayed_rotation(Instant::now());
    let slices = partition(candidates.len());
    let revealed = match app.wheel.phase() {
        WheelPhase::Revealed { index } => Some(index),
        WheelPhase::Idle | WheelPhase::Spinning(_) => None,
    };
    let under_pointer = slice_under_pointer(rotation, candidates.len());

    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 1.0,
                    color: Color::Gray,
                });

                if slices.len() > 1 {
                    for slice in &slices {
                        let (start, _) = slice.degrees();
                        let (x2, y2) = polar(start + rotation, 1.0);
                        ctx.draw(&CanvasLine {
                            x1: 0.0,
                            y1: 0.0,
                            x2,
                            y2,
                            color: slice_color(slice.color),
                        });
                    }
                }

                ctx.layer();

                for (slice, candidate) in slices.iter().zip(candidates) {
                    let (start, end) = slice.degrees();
                    let (x, y) = polar((start + end) / 2.0 + rotation, 0.55);
                    let style = label_style(
                        slice_color(slice.color),
                        revealed == Some(slice.index),
                        under_pointer == Some(slice.index),
                    );
                    let label = short_label(&candidate.name);
                    // Center the label on its anchor
                    let offset = label.chars().count() as f64 / f64::from(width) * 1.1;
                    ctx.print(x - offset, y, TextLine::from(Span::styled(label, style)));
                }

                // Fixed pointer at the top of the wheel
                for (x1, x2) in [(-0.08, 0.0), (0.08, 0.0)] {
                    ctx.draw(&CanvasLine {
                        x1,
                        y1: 1.12,
                        x2,
                        y2: 0.92,
                        color: Color::Red,
                    });
                }
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: 0.05,
                    color: Color::White,
                });
            })
            .x_bounds([-1.15, 1.15])
            .y_bounds([-1.15, 1.15]),
        square,
    );
}
