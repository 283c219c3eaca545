//! Terminal rendering of a best-fitness trace.
//!
//! The chart is drawn into an off-screen buffer and printed line by line, so
//! it works on any terminal (or redirected stderr) without entering raw mode.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{Axis, Block, Chart, Dataset, GraphType, Widget},
};
use survival_bag_stats::trace;

const WIDTH: u16 = 72;
const HEIGHT: u16 = 20;

struct TraceChart<'a> {
    title: &'a str,
    data: &'a [(f64, f64)],
    x_title: &'a str,
    x_bounds: [f64; 2],
    y_title: &'a str,
    y_bounds: [f64; 2],
}

impl Widget for TraceChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .data(self.data);
        let x_axis = Axis::default()
            .title(self.x_title)
            .bounds(self.x_bounds)
            .labels([
                format!("{:.0}", self.x_bounds[0]),
                format!("{:.0}", self.x_bounds[1]),
            ]);
        let y_axis = Axis::default()
            .title(self.y_title)
            .bounds(self.y_bounds)
            .labels([
                format!("{:.2}", self.y_bounds[0]),
                format!("{:.2}", f64::midpoint(self.y_bounds[0], self.y_bounds[1])),
                format!("{:.2}", self.y_bounds[1]),
            ]);
        let chart = Chart::new(vec![dataset])
            .block(Block::bordered().title(self.title))
            .x_axis(x_axis)
            .y_axis(y_axis);

        Widget::render(chart, area, buf);
    }
}

/// Renders `trace` as a line chart of best fitness against generation number.
fn render(trace: &[f64], area: Rect) -> Buffer {
    #[expect(clippy::cast_precision_loss)]
    let data = trace
        .iter()
        .enumerate()
        .map(|(i, best)| ((i + 1) as f64, *best))
        .collect::<Vec<_>>();
    #[expect(clippy::cast_precision_loss)]
    let x_bounds = [1.0, trace.len().max(2) as f64];

    let mut buf = Buffer::empty(area);
    TraceChart {
        title: "Best fitness per generation",
        data: &data,
        x_title: "Generations",
        x_bounds,
        y_title: "Best fitness",
        y_bounds: trace::bounds(trace),
    }
    .render(area, &mut buf);
    buf
}

fn lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            let line = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>();
            line.trim_end().to_owned()
        })
        .collect()
}

/// Prints the convergence chart of `trace` to stderr.
pub(crate) fn print_trace(trace: &[f64]) {
    let buf = render(trace, Rect::new(0, 0, WIDTH, HEIGHT));
    for line in lines(&buf) {
        eprintln!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(trace: &[f64]) -> Vec<String> {
        lines(&render(trace, Rect::new(0, 0, WIDTH, HEIGHT)))
    }

    #[test]
    fn test_chart_has_title_and_fixed_height() {
        let lines = rendered(&[3.0, 8.0, 8.0, 12.0]);
        assert_eq!(lines.len(), usize::from(HEIGHT));
        assert!(lines[0].contains("Best fitness per generation"));
        assert!(lines.iter().all(|l| l.chars().count() <= usize::from(WIDTH)));
    }

    #[test]
    fn test_chart_draws_points() {
        let lines = rendered(&[3.0, 8.0, 8.0, 12.0]);
        let braille = lines
            .iter()
            .flat_map(|l| l.chars())
            .filter(|c| ('\u{2801}'..='\u{28ff}').contains(c))
            .count();
        assert!(braille > 0);
    }

    #[test]
    fn test_flat_and_single_generation_traces_render() {
        assert_eq!(rendered(&[5.0]).len(), usize::from(HEIGHT));
        assert_eq!(rendered(&[0.0, 0.0, 0.0]).len(), usize::from(HEIGHT));
    }
}
