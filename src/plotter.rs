use egui::Color32;
use egui_plot::{Corner, Legend, Line, Plot, PlotBounds, PlotPoints, Points};

use crate::buffer::RollingSeriesBuffer;
use crate::config::{ChartConfig, SceneConfig};
use crate::pose::{SkeletonGeometry, ViewDescriptor};
use crate::types::AngleChannel;

/// Half-width of the square the projected skeleton cube is drawn in.
const SCENE_EXTENT: f64 = 0.9;

/// Fixed-width y labels so the chart does not jitter as values change.
fn format_fixed_width_y_label(value: f64) -> String {
    let abs_value = value.abs();
    if abs_value >= 1000.0 {
        format!("{:-6.1e}", value)
    } else if abs_value >= 100.0 {
        format!("{:-6.0}", value)
    } else if abs_value >= 10.0 {
        format!("{:-6.1}", value)
    } else {
        format!("{:-6.2}", value)
    }
}

fn rgb(color: [u8; 3]) -> Color32 {
    Color32::from_rgb(color[0], color[1], color[2])
}

fn channel_color(channel: AngleChannel, config: &ChartConfig) -> Color32 {
    match channel {
        AngleChannel::Joint1 => rgb(config.colors.joint1),
        AngleChannel::Joint2 => rgb(config.colors.joint2),
        AngleChannel::Joint3 => rgb(config.colors.joint3),
    }
}

/// Rolling line chart of the three joint channels.
pub fn plot_angle_chart(ui: &mut egui::Ui, buffer: &RollingSeriesBuffer, config: &ChartConfig) {
    let snapshot = buffer.snapshot();

    // fixed x span of one full window so the chart scrolls instead of stretching
    let bounds = snapshot.first().map(|first| {
        let (y_min, y_max) = snapshot
            .iter()
            .flat_map(|sample| AngleChannel::ALL.map(|channel| sample.value(channel)))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| (min.min(v), max.max(v)));

        // keep flat series visible
        let range = (y_max - y_min).max(1.0);
        let x_min = first.timestamp as f64;
        let x_max = x_min + (buffer.capacity().max(2) - 1) as f64;
        PlotBounds::from_min_max([x_min, y_min - range * 0.05], [x_max, y_max + range * 0.05])
    });

    Plot::new("angle_chart")
        .height(config.plot_height)
        .legend(Legend::default().position(Corner::LeftTop))
        .x_axis_label("times")
        .y_axis_label("angles")
        .y_axis_formatter(|v, _| format_fixed_width_y_label(v.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if let Some(bounds) = bounds {
                plot_ui.set_plot_bounds(bounds);
            }
            // one line per joint channel
            for channel in AngleChannel::ALL {
                let points = buffer.series(channel);
                plot_ui.line(
                    Line::new(channel.label(), PlotPoints::from(points))
                        .color(channel_color(channel, config))
                        .width(1.5),
                );
            }
        });
}

/// One projected 3D view: bones as separate strips, landmarks as markers.
pub fn plot_skeleton_view(
    ui: &mut egui::Ui,
    id: &str,
    geometry: Option<&SkeletonGeometry>,
    view: &ViewDescriptor,
    config: &SceneConfig,
) {
    Plot::new(id)
        .height(config.plot_height)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                [-SCENE_EXTENT, -SCENE_EXTENT],
                [SCENE_EXTENT, SCENE_EXTENT],
            ));

            // nothing to draw until the first pose arrives
            let Some(geometry) = geometry.filter(|g| !g.points.is_empty()) else {
                return;
            };

            // one line per bone so segments are never joined
            for strip in view.project_strips(&geometry.segments) {
                plot_ui.line(
                    Line::new("bones", PlotPoints::from(strip))
                        .color(rgb(config.line_color))
                        .width(config.line_width),
                );
            }

            // landmarks on top of the bones
            let markers: Vec<[f64; 2]> = (0..geometry.points.len())
                .map(|i| view.project([geometry.points.x[i], geometry.points.y[i], geometry.points.z[i]]))
                .collect();
            plot_ui.points(
                Points::new("landmarks", PlotPoints::from(markers))
                    .radius(config.marker_radius)
                    .color(rgb(config.marker_color)),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_labels_have_fixed_width() {
        for value in [0.5, 3.25, 42.0, 180.0, 12345.0] {
            assert!(format_fixed_width_y_label(value).len() >= 6, "{}", value);
        }
        assert_eq!(format_fixed_width_y_label(30.0), "  30.0");
    }
}
