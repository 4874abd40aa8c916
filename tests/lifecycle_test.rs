//! Render lifecycle tests across chart types.
//!
//! Covers render/update/resize, transition frames, event draining, and
//! loading the documented JSON response shape into a line chart (the flow
//! the library's original host page drove).

use chartkit::prelude::*;
use chartkit::scene::Role;

const HOUR: f64 = 3_600_000.0;

fn two_series() -> Vec<Series> {
    vec![
        Series::new("api", &[(0.0, 10.0), (HOUR, 40.0), (2.0 * HOUR, 25.0)]),
        Series::new("db", &[(0.0, 5.0), (HOUR, 15.0), (2.0 * HOUR, 30.0)]),
    ]
}

#[test]
fn line_chart_from_json_response() {
    // The shape the data endpoint returns
    let payload = r#"[
        {"key": "clicks", "values": [[0, 120], [3600000, 90], [7200000, 160]]},
        {"key": "uniques", "values": [[0, 40], [3600000, 35], [7200000, 60]]}
    ]"#;
    let series = chartkit::series::from_json(payload).expect("payload parses");

    let mut chart = LineChart::new()
        .title("Traffic")
        .dimensions(800.0, 500.0)
        .data(series);
    let scene = chart.render().expect("render succeeds");

    let paths = scene
        .shapes
        .iter()
        .filter(|s| s.role == Role::LinePath)
        .count();
    assert_eq!(paths, 2);
    assert!(scene.shapes.iter().any(|s| s.role == Role::Title));
    assert!(scene.shapes.iter().any(|s| s.role == Role::Legend));
}

#[test]
fn update_with_new_data_keeps_previous_frame_for_transitions() {
    let mut chart = ScatterChart::new()
        .dimensions(600.0, 400.0)
        .data(two_series());
    chart.render().expect("render succeeds");

    let mut moved = two_series();
    moved[0].values[0].y = 35.0;
    chart.update_data(moved).expect("update succeeds");

    // A mid-transition frame differs from both endpoints
    let half = chart.scene_at(0.5).expect("transition frame");
    let done = chart.scene_at(1.0).expect("final frame");
    assert_ne!(half, done);
    assert_eq!(&done, chart.scene().expect("scene"));
}

#[test]
fn transitions_off_yields_final_frames() {
    let mut chart = BarChart::new()
        .transition(false)
        .dimensions(600.0, 400.0)
        .data(two_series());
    chart.render().expect("render succeeds");
    let t0 = chart.scene_at(0.0).expect("frame");
    assert_eq!(&t0, chart.scene().expect("scene"));
}

#[test]
fn resize_recomputes_layout() {
    let mut chart = AreaChart::new()
        .dimensions(600.0, 400.0)
        .data(two_series());
    let before = chart.render().expect("render succeeds").plot;
    let after = chart.resize(900.0, 500.0).expect("resize succeeds").plot;
    assert!(after.width > before.width);
    assert!(after.height > before.height);
}

#[test]
fn titles_and_legend_shrink_the_plot() {
    let mut bare = ScatterChart::new()
        .legend(false)
        .dimensions(600.0, 400.0)
        .data(two_series());
    let bare_plot = bare.render().expect("render succeeds").plot;

    let mut dressed = ScatterChart::new()
        .title("t")
        .description("d")
        .dimensions(600.0, 400.0)
        .data(two_series());
    let dressed_plot = dressed.render().expect("render succeeds").plot;

    assert!(dressed_plot.height < bare_plot.height);
    assert!(dressed_plot.y > bare_plot.y);
}

#[test]
fn axis_caption_margins() {
    let mut chart = ScatterChart::new()
        .legend(false)
        .x_label("time")
        .y_label("value")
        .dimensions(600.0, 400.0)
        .data(two_series());
    let scene = chart.render().expect("render succeeds");
    let captions = scene
        .shapes
        .iter()
        .filter(|s| s.role == Role::AxisLabel)
        .count();
    assert_eq!(captions, 2);
    // The left caption margin pushes the plot right
    assert!(scene.plot.x > 40.0);
}

#[test]
fn every_chart_type_renders() {
    let mut area = AreaChart::new().dimensions(600.0, 400.0).data(two_series());
    assert!(area.render().is_ok());

    let mut bar = BarChart::new().dimensions(600.0, 400.0).data(two_series());
    assert!(bar.render().is_ok());

    let mut discrete = DiscreteBarChart::new()
        .dimensions(600.0, 400.0)
        .data_points(&[(1.0, 5.0), (2.0, 8.0)]);
    assert!(discrete.render().is_ok());

    let mut line = LineChart::new().dimensions(600.0, 400.0).data(two_series());
    assert!(line.render().is_ok());

    let mut pie = PieChart::new()
        .dimensions(600.0, 400.0)
        .slices(&[("a", 1.0), ("b", 2.0)]);
    assert!(pie.render().is_ok());

    let mut scatter = ScatterChart::new()
        .dimensions(600.0, 400.0)
        .data(two_series());
    assert!(scatter.render().is_ok());

    let mut heatmap = HeatmapChart::new()
        .dimensions(600.0, 400.0)
        .data(two_series());
    assert!(heatmap.render().is_ok());

    let mut table = TableChart::new().dimensions(600.0, 400.0);
    table
        .set_rows_json(r#"[{"name": "api", "requests": 500}]"#)
        .expect("rows parse");
    assert!(table.render().is_ok());
}

#[test]
fn dark_theme_changes_background() {
    let mut light = ScatterChart::new()
        .dimensions(600.0, 400.0)
        .data(two_series());
    let light_bg = light.render().expect("render succeeds").background;

    let mut dark = ScatterChart::new()
        .theme("dark")
        .dimensions(600.0, 400.0)
        .data(two_series());
    let dark_bg = dark.render().expect("render succeeds").background;

    assert_ne!(light_bg, dark_bg);
}

#[test]
fn thresholds_drawn_at_seventy_percent_opacity() {
    let mut chart = ScatterChart::new()
        .dimensions(600.0, 400.0)
        .y_thresholds(vec![Threshold {
            value: 20.0,
            color: Rgba::RED,
        }])
        .data(two_series());
    let scene = chart.render().expect("render succeeds");
    let threshold = scene
        .shapes
        .iter()
        .find(|s| s.role == Role::Threshold)
        .expect("threshold line");
    assert!((threshold.opacity - 0.7).abs() < 1e-9);
}

#[test]
fn domain_overrides_pin_the_axis() {
    let mut chart = ScatterChart::new()
        .dimensions(600.0, 400.0)
        .y_domain(Domain {
            min: Some(0.0),
            max: Some(100.0),
        })
        .data(two_series());
    chart.render().expect("render succeeds");
    let scene = chart.scene().expect("scene");
    // A 100-value tick label exists even though the data tops out at 40
    let has_100 = scene.shapes.iter().any(|s| {
        matches!(&s.kind, chartkit::scene::ShapeKind::Text { text, .. } if text == "100")
    });
    assert!(has_100);
}

#[test]
fn events_drain_once() {
    let mut chart = ScatterChart::new()
        .dimensions(600.0, 400.0)
        .data(two_series());
    chart.render().expect("render succeeds");

    let target = chart
        .scene()
        .expect("scene")
        .shapes
        .iter()
        .find_map(|s| match &s.kind {
            chartkit::scene::ShapeKind::Circle { center, .. } if s.role == Role::Point => {
                Some(*center)
            }
            _ => None,
        })
        .expect("a point");
    chart.pointer_clicked(target).expect("click");

    assert!(!chart.take_events().is_empty());
    assert!(chart.take_events().is_empty());
}
