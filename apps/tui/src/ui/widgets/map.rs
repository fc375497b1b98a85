use places_wheel::candidates::{Marker, MarkerKind};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::App;

const fn marker_color(kind: MarkerKind) -> Color {
    match kind {
        MarkerKind::Origin => Color::Cyan,
        MarkerKind::Place => Color::LightMagenta,
        MarkerKind::Highlight => Color::Yellow,
    }
}

fn marker_symbol(marker: &Marker, number: Option<usize>) -> String {
    match marker.kind {
        MarkerKind::Origin => "@".to_string(),
        MarkerKind::Place => number.map_or_else(|| "*".to_string(), |n| n.to_string()),
        MarkerKind::Highlight => format!("> {}", marker.title),
    }
}

pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect) {
    let view = app.candidates.view();
    let block = Block::default()
        .title(format!(" Map (zoom {}) ", view.zoom()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 4 || inner.height < 2 {
        return;
    }

    // Two terminal rows span roughly the width of one column pair
    let aspect_ratio = f64::from(inner.width) / (f64::from(inner.height) * 2.0);
    let Some((x_bounds, y_bounds)) = view.bounds(aspect_ratio) else {
        let paragraph = Paragraph::new("Waiting for your location...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, inner);
        return;
    };

    let markers = app.candidates.markers();
    f.render_widget(
        Canvas::default()
            .paint(|ctx| {
                let dots: Vec<(f64, f64)> = markers
                    .places()
                    .iter()
                    .map(|marker| (marker.position.lng, marker.position.lat))
                    .collect();
                ctx.draw(&Points {
                    coords: &dots,
                    color: marker_color(MarkerKind::Place),
                });
                ctx.layer();

                for (number, marker) in markers.places().iter().enumerate() {
                    ctx.print(
                        marker.position.lng,
                        marker.position.lat,
                        TextLine::from(Span::styled(
                            marker_symbol(marker, Some(number + 1)),
                            Style::default().fg(marker_color(marker.kind)),
                        )),
                    );
                }

                for marker in markers.origin().into_iter().chain(markers.highlight()) {
                    ctx.print(
                        marker.position.lng,
                        marker.position.lat,
                        TextLine::from(Span::styled(
                            marker_symbol(marker, None),
                            Style::default()
                                .fg(marker_color(marker.kind))
                                .add_modifier(Modifier::BOLD),
                        )),
                    );
                }
            })
            .x_bounds(x_bounds)
            .y_bounds(y_bounds),
        inner,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use places_wheel::Coordinate;

    fn marker(kind: MarkerKind) -> Marker {
        Marker {
            position: Coordinate::new(0.0, 0.0),
            title: "Dumpling Den".to_string(),
            kind,
        }
    }

    #[test]
    fn symbols_distinguish_marker_kinds() {
        assert_eq!(marker_symbol(&marker(MarkerKind::Origin), None), "@");
        assert_eq!(marker_symbol(&marker(MarkerKind::Place), Some(3)), "3");
        assert_eq!(
            marker_symbol(&marker(MarkerKind::Highlight), None),
            "> Dumpling Den"
        );
    }
}
