use super::ChartDescriptor;
use crate::error::PKResult;
use crate::models::ParameterSource;
use chrono::Local;
use log::info;
use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink for finished charts. Nothing flows back into the pipeline.
pub trait Renderer {
    fn render(&self, chart: &ChartDescriptor) -> PKResult<()>;
}

/// Prints a short textual summary of the curve.
pub struct ConsoleRenderer<W: Write> {
    out: RefCell<W>,
}

impl ConsoleRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&self, chart: &ChartDescriptor) -> PKResult<()> {
        let series = &chart.series;
        let mut out = self.out.borrow_mut();

        writeln!(out, "{}", chart.title)?;
        writeln!(out, "  Parameters: {}", chart.parameter_source)?;
        if chart.parameter_source == ParameterSource::Default {
            writeln!(
                out,
                "  Note: drug not recognised, curve uses generic parameters"
            )?;
        }
        writeln!(out, "  Cmax: {:.4} mg/L", series.max_concentration())?;
        if let Some(tmax) = series.time_to_max() {
            writeln!(out, "  Tmax: {:.2} h", tmax)?;
        }
        writeln!(out, "  AUC(0-t): {:.4} mg*h/L", series.auc())?;
        out.flush()?;
        Ok(())
    }
}

/// Writes the Plotly JSON figure and a CSV of the series into a directory.
pub struct FileRenderer {
    output_dir: PathBuf,
}

impl FileRenderer {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    fn file_stem(chart: &ChartDescriptor) -> String {
        let name: String = chart
            .style
            .trace_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        format!("{}_{}", name, Local::now().format("%Y%m%d_%H%M%S%.3f"))
    }
}

impl Renderer for FileRenderer {
    fn render(&self, chart: &ChartDescriptor) -> PKResult<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let stem = Self::file_stem(chart);

        let json_path = self.output_dir.join(format!("{}.json", stem));
        save_plotly_json(chart, &json_path)?;

        let csv_path = self.output_dir.join(format!("{}.csv", stem));
        save_series_csv(chart, &csv_path)?;

        info!("Chart saved to {:?} and {:?}", json_path, csv_path);
        Ok(())
    }
}

fn save_plotly_json<P: AsRef<Path>>(chart: &ChartDescriptor, path: P) -> PKResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &chart.to_plotly_json())?;
    Ok(())
}

fn save_series_csv<P: AsRef<Path>>(chart: &ChartDescriptor, path: P) -> PKResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["TIME", "CONCENTRATION"])?;
    for (time, concentration) in chart.series.points() {
        writer.write_record(&[time.to_string(), concentration.to_string()])?;
    }

    writer.flush()?;
    Ok(())
}

/// Fans a chart out to several renderers, stopping at the first failure.
#[derive(Default)]
pub struct CompositeRenderer {
    renderers: Vec<Box<dyn Renderer>>,
}

impl CompositeRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderers.push(renderer);
        self
    }
}

impl Renderer for CompositeRenderer {
    fn render(&self, chart: &ChartDescriptor) -> PKResult<()> {
        self.renderers.iter().try_for_each(|r| r.render(chart))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::package_curve;
    use crate::simulation::TimeSeries;

    fn chart(source: ParameterSource) -> ChartDescriptor {
        let series = TimeSeries::new(vec![0.0, 1.0, 2.0], vec![0.0, 2.5, 1.25]).unwrap();
        package_curve(series, "wellbutrin xl", 300.0, "mg", source)
    }

    #[test]
    fn test_console_summary() {
        let renderer = ConsoleRenderer::new(Vec::new());
        renderer.render(&chart(ParameterSource::Table)).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.starts_with("Pharmacokinetics of wellbutrin xl (Dose: 300 mg)"));
        assert!(text.contains("Parameters: parameter table"));
        assert!(text.contains("Cmax: 2.5000 mg/L"));
        assert!(text.contains("Tmax: 1.00 h"));
        assert!(!text.contains("generic parameters"));
    }

    #[test]
    fn test_console_flags_default_parameters() {
        let renderer = ConsoleRenderer::new(Vec::new());
        renderer.render(&chart(ParameterSource::Default)).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("generic parameters"));
    }

    #[test]
    fn test_file_renderer_writes_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("charts");
        FileRenderer::new(&target)
            .render(&chart(ParameterSource::Table))
            .unwrap();

        let mut entries: Vec<PathBuf> = std::fs::read_dir(&target)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        entries.sort();
        assert_eq!(entries.len(), 2);

        let csv_path = entries.iter().find(|p| p.extension().unwrap() == "csv").unwrap();
        let mut reader = csv::Reader::from_path(csv_path).unwrap();
        assert_eq!(reader.headers().unwrap(), vec!["TIME", "CONCENTRATION"]);
        let rows: Vec<(f64, f64)> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, vec![(0.0, 0.0), (1.0, 2.5), (2.0, 1.25)]);

        let json_path = entries.iter().find(|p| p.extension().unwrap() == "json").unwrap();
        let figure: serde_json::Value =
            serde_json::from_reader(File::open(json_path).unwrap()).unwrap();
        assert_eq!(figure["data"][0]["name"], "wellbutrin xl 300mg");
        assert!(json_path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("wellbutrin_xl_300mg_"));
    }

    #[test]
    fn test_composite_renders_all() {
        let dir = tempfile::tempdir().unwrap();
        let composite = CompositeRenderer::new()
            .with(Box::new(ConsoleRenderer::new(std::io::sink())))
            .with(Box::new(FileRenderer::new(dir.path())));
        composite.render(&chart(ParameterSource::Lookup)).unwrap();
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }
}
