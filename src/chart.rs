use crate::error::{GraphError, Result};
use crate::{min_and_max, SelectedSeries, CHECK_NAME};
use chrono::prelude::*;
use log::info;
use plotters::prelude::*;
use std::io::Write;
use std::path::PathBuf;

/// `Current_Usage` is divided by this before it is drawn against the capacity
pub const USAGE_DIVISOR: f64 = 1024.;

/// fractions of the capacity drawn as horizontal gridlines
pub const GRID_FRACTIONS: [f64; 5] = [0., 0.25, 0.5, 0.75, 1.];

pub const X_FORMAT: &str = "%m-%d %H:%M";

/// Where the rendered chart goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartSink {
    File(PathBuf),
    Stdout,
}

pub fn capacity_gridlines(capacity: f64) -> Vec<f64> {
    GRID_FRACTIONS.iter().map(|f| capacity * f).collect()
}

/// Renders the series as an SVG document.
pub fn render_svg(series: &SelectedSeries) -> Result<String> {
    let mut svg = String::new();
    draw_svg(series, &mut svg).map_err(|e| GraphError::Render(e.to_string()))?;
    Ok(svg)
}

/// Renders the series and hands it to `sink`.
pub fn write_chart(series: &SelectedSeries, sink: &ChartSink) -> Result<()> {
    let svg = render_svg(series)?;
    match sink {
        ChartSink::File(fout) => {
            std::fs::write(fout, svg)?;
            info!("graph written to {}", fout.display());
        }
        ChartSink::Stdout => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(svg.as_bytes())?;
            handle.flush()?;
        }
    }
    Ok(())
}

fn draw_svg(series: &SelectedSeries, svg: &mut String) -> std::result::Result<(), Box<dyn std::error::Error>> {
    if series.is_empty() {
        return Err("no data to graph".into());
    }
    let times: Vec<NaiveDateTime> = series.points.iter().map(|p| p.date_time).collect();
    let (xmindt, xmaxdt) = min_and_max(&times[..]).ok_or("no data to graph")?;
    let xspan: chrono::Duration = xmaxdt - xmindt;
    let xmargin = if xspan > chrono::Duration::zero() {
        xspan / 20
    } else {
        chrono::Duration::minutes(1)
    };
    let xminutc = TimeZone::from_utc_datetime(&Utc, &(xmindt - xmargin));
    let xmaxutc = TimeZone::from_utc_datetime(&Utc, &(xmaxdt + xmargin));

    let capacity = series.capacity().unwrap_or(0) as f64;
    let ymax = if capacity > 0. { capacity * 1.10 } else { 1. };
    let mnemonic = series.resource.mnemonic();

    let root = SVGBackend::with_string(svg, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{} {}/{}", CHECK_NAME, series.job_name, mnemonic),
            ("sans-serif", 28),
        )
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(120)
        .build_cartesian_2d(xminutc..xmaxutc, 0f64..ymax)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .set_all_tick_mark_size(2)
        .label_style(("sans-serif", 18))
        .x_labels(10)
        .x_label_formatter(&|x: &DateTime<Utc>| x.format(X_FORMAT).to_string())
        .y_label_formatter(&|y: &f64| format!("{}{}", *y as i64, mnemonic))
        .x_desc("Month-Day Time")
        .draw()?;

    for g in capacity_gridlines(capacity) {
        chart.draw_series(LineSeries::new(
            vec![(xminutc, g), (xmaxutc, g)],
            RGBColor(200, 200, 200).stroke_width(1),
        ))?;
    }

    let to_utc = |dt: &NaiveDateTime| TimeZone::from_utc_datetime(&Utc, dt);
    chart
        .draw_series(LineSeries::new(
            series
                .points
                .iter()
                .map(|p| (to_utc(&p.date_time), p.capacity as f64)),
            RED.stroke_width(2),
        ))?
        .label("Capacity")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));
    chart
        .draw_series(LineSeries::new(
            series
                .points
                .iter()
                .map(|p| (to_utc(&p.date_time), p.current_usage as f64 / USAGE_DIVISOR)),
            BLUE.stroke_width(2),
        ))?
        .label("Current Usage")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Resource, SeriesPoint};

    fn series(n: i64) -> SelectedSeries {
        let t0 = NaiveDate::from_ymd_opt(2021, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        SelectedSeries {
            job_name: "JOB1".to_string(),
            resource: Resource::Jqe,
            points: (0..n)
                .map(|i| SeriesPoint {
                    task_id: "T1".to_string(),
                    start_time: "200".to_string(),
                    stck_time: 1,
                    date_time: t0 + chrono::Duration::minutes(i),
                    current_usage: 1024 * 10 * i,
                    capacity: 1000,
                })
                .collect(),
        }
    }

    #[test]
    fn gridlines_are_quarters_of_capacity() {
        assert_eq!(capacity_gridlines(1000.), vec![0., 250., 500., 750., 1000.]);
    }

    #[test]
    fn renders_svg_document() {
        let svg = render_svg(&series(5)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Capacity"));
        assert!(svg.contains("Current Usage"));
        assert!(svg.contains("JOB1/JQE"));
    }

    #[test]
    fn single_point_series_still_renders() {
        assert!(render_svg(&series(1)).is_ok());
    }

    #[test]
    fn empty_series_is_a_render_error() {
        assert!(matches!(render_svg(&series(0)), Err(GraphError::Render(_))));
    }

    #[test]
    fn file_sink_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let fout = dir.path().join("JOB1_JQE_graph.svg");
        write_chart(&series(3), &ChartSink::File(fout.clone())).unwrap();
        let written = std::fs::read_to_string(fout).unwrap();
        assert!(written.contains("<svg"));
    }
}
