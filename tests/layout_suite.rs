use std::path::Path;

use widget_svg_renderer::config::Config;
use widget_svg_renderer::ir::Widget;
use widget_svg_renderer::layout::ChartArea;
use widget_svg_renderer::render::Extents;
use widget_svg_renderer::{RenderError, RenderedWidget, Theme, parse_widget, render_widget};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
    assert!(svg.contains("viewBox=\""), "{fixture}: missing viewBox");
    assert!(svg.contains("<defs>"), "{fixture}: missing <defs>");
    assert!(!svg.contains("NaN"), "{fixture}: NaN in output");
    assert!(!svg.contains("inf"), "{fixture}: infinity in output");
}

fn load(rel: &str) -> Widget {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_widget(&input).expect("parse failed")
}

fn render(widget: &Widget) -> RenderedWidget {
    render_widget(widget, &Config::default()).expect("render failed")
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new widget types must be added intentionally.
    let candidates = [
        "bar/quarterly.json",
        "conceptual/supply_demand.json5",
        "scatter/empty_with_line.json5",
        "scatter/height_arm_span.json",
        "scatter/labeled_quadratic.json5",
        "stick/empty.json",
        "stick/weekly.json5",
    ];

    for rel in candidates {
        let widget = load(rel);
        let rendered = render(&widget);
        assert_valid_svg(&rendered.svg, rel);

        // The output always covers the padded chart rectangle.
        let pad = Config::default().layout.finalize_padding;
        let (width, height) = widget.size();
        assert!(rendered.markup.width >= width + 2.0 * pad, "{rel}: too narrow");
        assert!(rendered.markup.height >= height + 2.0 * pad, "{rel}: too short");
        let chart = ChartArea::new(0.0, 0.0, width, height);
        let seed = Extents::from_rect(chart.left - pad, chart.top - pad, chart.width + 2.0 * pad, chart.height + 2.0 * pad);
        assert!(rendered.markup.view_extents().contains_rect(&seed, 1e-6), "{rel}: chart not inside view");
    }
}

#[test]
fn modern_theme_renders_every_fixture() {
    let mut config = Config::default();
    config.theme = Theme::modern();
    config.render.background = config.theme.background.clone();
    for rel in ["bar/quarterly.json", "conceptual/supply_demand.json5", "stick/weekly.json5"] {
        let svg = render_widget(&load(rel), &config).expect("render failed").svg;
        assert_valid_svg(&svg, rel);
        assert!(svg.contains(&config.theme.background), "{rel}: background not applied");
    }
}

#[test]
fn linear_best_fit_spans_the_axis_domain() {
    let widget = load("scatter/height_arm_span.json");
    let rendered = render(&widget);
    let plane = &rendered.plane;
    // y = x + 2 reaches y = 202 at x = 200, so the line is clipped.
    let start = (plane.to_svg_x(140.0), plane.to_svg_y(142.0));
    let end = (plane.to_svg_x(200.0), plane.to_svg_y(202.0));
    let needle = format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"",
        start.0, start.1, end.0, end.1
    );
    assert!(rendered.svg.contains(&needle), "missing {needle}");
    // Positive slope: y pixels decrease left to right.
    assert!(end.1 < start.1);
    assert!(rendered.svg.contains(">Line of best fit</text>"));
}

#[test]
fn empty_stick_plot_still_has_full_frame() {
    let rendered = render(&load("stick/empty.json"));
    for month in ["Jan", "Feb", "Mar", "Apr", "May", "Jun"] {
        assert!(rendered.svg.contains(&format!(">{month}</text>")), "missing {month}");
    }
    assert!(rendered.svg.contains(">Books Read per Month</tspan>"));
    assert!(rendered.svg.contains(">Month</tspan>"));
    assert!(rendered.svg.contains(">Books</tspan>"));
    assert!(!rendered.svg.contains("<circle"));
}

#[test]
fn two_point_line_renders_without_points() {
    let rendered = render(&load("scatter/empty_with_line.json5"));
    let plane = &rendered.plane;
    // y = 2x + 2 leaves the top of the domain at x = 9.
    let needle = format!(
        "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"",
        plane.to_svg_x(0.0),
        plane.to_svg_y(2.0),
        plane.to_svg_x(9.0),
        plane.to_svg_y(20.0)
    );
    assert!(rendered.svg.contains(&needle), "missing {needle}");
    assert!(rendered.svg.contains("stroke-dasharray=\"6 4\""));
}

#[test]
fn exponential_fit_on_zero_value_fails_before_rendering() {
    let input = r#"{
        type: "scatterPlot", width: 300, height: 300,
        xAxis: { min: 0, max: 10, tickInterval: 1 },
        yAxis: { min: 0, max: 10, tickInterval: 1 },
        points: [{ x: 1, y: 0 }, { x: 2, y: 3 }, { x: 3, y: 6 }],
        lines: [{ type: "bestFit", method: "exponential" }],
    }"#;
    let widget = parse_widget(input).unwrap();
    assert_eq!(
        render_widget(&widget, &Config::default()).unwrap_err(),
        RenderError::NonPositiveValue { x: 1.0, y: 0.0 }
    );
}

#[test]
fn conceptual_graph_clips_curves_and_labels_quadrants() {
    let rendered = render(&load("conceptual/supply_demand.json5"));
    assert!(rendered.svg.contains("<g clip-path=\"url(#clip-1)\">"));
    assert!(rendered.svg.contains("marker-start=\"url(#arrow-0)\""));
    for numeral in ["I", "II", "III", "IV"] {
        assert!(rendered.svg.contains(&format!(">{numeral}</text>")));
    }
    assert!(rendered.svg.contains(">Supply</text>"));
    assert!(rendered.svg.contains(">Demand</text>"));
}

#[test]
fn long_parenthetical_title_wraps_and_stays_above_chart() {
    let rendered = render(&load("scatter/labeled_quadratic.json5"));
    assert!(rendered.svg.contains(">Projectile Height Over Time</tspan>"));
    assert!(rendered.svg.contains(">(Measured Every Half Second)</tspan>"));
    assert!(rendered.plane.margins.top > 0.0);
    assert!(rendered.markup.vb_min_y <= -rendered.plane.margins.top);
}

#[test]
fn output_is_deterministic() {
    let widget = load("bar/quarterly.json");
    assert_eq!(render(&widget).svg, render(&widget).svg);
}

#[test]
fn stick_color_cannot_add_attributes() {
    let widget = parse_widget(
        r#"{
            type: "stickPlot",
            width: 400, height: 300,
            xAxis: { categories: ["A", "B"] },
            yAxis: { min: 0, max: 5, tickInterval: 1 },
            sticks: [ { category: "A", value: 3, color: "red\" onmouseover=\"alert(1)" } ],
        }"#,
    )
    .expect("parse failed");
    let svg = render(&widget).svg;
    assert_valid_svg(&svg, "inline stick plot");
    assert!(!svg.contains("onmouseover=\""));
    assert!(svg.contains("red&quot; onmouseover=&quot;alert(1)"));
}
