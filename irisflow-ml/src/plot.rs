//! SVG chart rendering for run reports.
//!
//! Hand-rolled SVG keeps the report free of native plotting stacks; a
//! single bar against a fixed [0, 1] axis is all the report needs, and
//! the fixed axis keeps charts from different runs visually comparable.

const WIDTH: u32 = 360;
const HEIGHT: u32 = 260;
const MARGIN_LEFT: f64 = 50.0;
const MARGIN_TOP: f64 = 40.0;
const PLOT_WIDTH: f64 = 290.0;
const PLOT_HEIGHT: f64 = 180.0;
const BAR_WIDTH: f64 = 80.0;

/// Render a one-bar chart of a metric on a fixed [0, 1] y-axis.
///
/// Values outside [0, 1] are clamped for the bar geometry; the printed
/// value keeps the raw number.
pub fn render_metric_chart(title: &str, metric_name: &str, value: f64) -> String {
    let clamped = value.clamp(0.0, 1.0);
    let baseline = MARGIN_TOP + PLOT_HEIGHT;
    let bar_height = PLOT_HEIGHT * clamped;
    let bar_top = baseline - bar_height;
    let bar_x = MARGIN_LEFT + (PLOT_WIDTH - BAR_WIDTH) / 2.0;
    let bar_center = bar_x + BAR_WIDTH / 2.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\" font-family=\"sans-serif\">\n"
    ));
    svg.push_str(&format!(
        "  <rect width=\"{WIDTH}\" height=\"{HEIGHT}\" fill=\"white\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"24\" text-anchor=\"middle\" font-size=\"16\">{}</text>\n",
        WIDTH / 2,
        escape(title)
    ));

    // Y axis with ticks every 0.25, bottom pinned to 0 and top to 1.
    for step in 0..=4 {
        let tick = step as f64 * 0.25;
        let y = baseline - PLOT_HEIGHT * tick;
        svg.push_str(&format!(
            "  <line x1=\"{MARGIN_LEFT}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" \
             stroke=\"#ddd\" stroke-width=\"1\"/>\n",
            MARGIN_LEFT + PLOT_WIDTH
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" text-anchor=\"end\" font-size=\"11\">{tick:.2}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 4.0
        ));
    }
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{MARGIN_TOP}\" x2=\"{MARGIN_LEFT}\" y2=\"{baseline}\" \
         stroke=\"black\" stroke-width=\"1\"/>\n"
    ));
    svg.push_str(&format!(
        "  <line x1=\"{MARGIN_LEFT}\" y1=\"{baseline}\" x2=\"{}\" y2=\"{baseline}\" \
         stroke=\"black\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT + PLOT_WIDTH
    ));

    svg.push_str(&format!(
        "  <rect x=\"{bar_x}\" y=\"{bar_top}\" width=\"{BAR_WIDTH}\" height=\"{bar_height}\" \
         fill=\"#4c78a8\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{bar_center}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\">{value:.3}</text>\n",
        bar_top - 6.0
    ));
    svg.push_str(&format!(
        "  <text x=\"{bar_center}\" y=\"{}\" text-anchor=\"middle\" font-size=\"12\">{}</text>\n",
        baseline + 18.0,
        escape(metric_name)
    ));
    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
