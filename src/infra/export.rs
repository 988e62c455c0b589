// ============================================================
// Layer 6 — CSV Export
// ============================================================
// Writes series and trend curves as CSV files for plotting.
//
// Why CSV?
//   - Any plotting tool (matplotlib, gnuplot, a spreadsheet)
//     reads it without a custom loader
//   - One file per chart keeps runs easy to diff
//
// Files written for metric `polarity` into --out-dir:
//   polarity_series.csv   year,value
//   polarity_trend.csv    year,value      (dense resample)
//   polarity_sessions.csv year,session,mean,documents
//   corpus_stats.csv      year,documents,tokens
//
// Example CSV output:
//   year,value
//   1946,0.081234
//   1947,0.079911
//   ...
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::{Context, Result};
use std::{
    fs,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::domain::series::{SessionMean, SmoothedCurve, YearSeries, YearStats};

pub struct CsvExporter {
    /// Directory the CSV files are written to
    dir: PathBuf,
}

impl CsvExporter {
    /// Create the exporter, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_series(&self, name: &str, series: &YearSeries) -> Result<PathBuf> {
        self.write(&format!("{name}_series.csv"), "year,value", |f| {
            for (year, value) in series.iter() {
                writeln!(f, "{},{:.6}", year, value)?;
            }
            Ok(())
        })
    }

    pub fn write_trend(&self, name: &str, curve: &SmoothedCurve) -> Result<PathBuf> {
        self.write(&format!("{name}_trend.csv"), "year,value", |f| {
            for (x, y) in curve.xs.iter().zip(&curve.ys) {
                writeln!(f, "{:.4},{:.6}", x, y)?;
            }
            Ok(())
        })
    }

    pub fn write_sessions(&self, name: &str, rows: &[SessionMean]) -> Result<PathBuf> {
        self.write(&format!("{name}_sessions.csv"), "year,session,mean,documents", |f| {
            for r in rows {
                writeln!(f, "{},{},{:.6},{}", r.year, r.session_id, r.mean, r.documents)?;
            }
            Ok(())
        })
    }

    pub fn write_stats(&self, rows: &[YearStats]) -> Result<PathBuf> {
        self.write("corpus_stats.csv", "year,documents,tokens", |f| {
            for r in rows {
                writeln!(f, "{},{},{}", r.year, r.documents, r.tokens)?;
            }
            Ok(())
        })
    }

    /// Create (or truncate) one file, write the header and the rows.
    fn write(
        &self,
        file_name: &str,
        header:    &str,
        rows:      impl FnOnce(&mut BufWriter<fs::File>) -> std::io::Result<()>,
    ) -> Result<PathBuf> {
        let path = self.dir.join(file_name);
        let file = fs::File::create(&path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;

        let mut f = BufWriter::new(file);
        writeln!(f, "{header}")?;
        rows(&mut f).with_context(|| format!("Cannot write '{}'", path.display()))?;
        f.flush()?;

        tracing::info!("Wrote '{}'", path.display());
        Ok(path)
    }
}
