use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fiberpack::api::{
    pack_from_cfg, DetectorCfg, EventSummary, Layout, PackingWarning, PhotonTally,
};
use polars::prelude::*;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing_subscriber::fmt::SubscriberBuilder;

mod provenance;

use provenance::Sidecar;

/// Sidecar parameters of `pack`.
#[derive(Debug, Serialize)]
struct PackParams {
    config: DetectorCfg,
    fibers_per_edge: Vec<usize>,
    warnings: Vec<PackingWarning>,
}

/// Sidecar parameters of `tally`.
#[derive(Debug, Serialize)]
struct TallyParams {
    input: PathBuf,
    events: usize,
}

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Fiber layout and photon tally runner")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Pack the four chamfers of a module and write the fiber table (.csv or .parquet)
    Pack {
        /// Detector parameters as JSON
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Override the growth ceiling of the compact chamfer
        #[arg(long)]
        ceiling: Option<usize>,
    },
    /// Aggregate photon records (event,track_id,length,chamfer) per event
    Tally {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Pack {
            config,
            out,
            ceiling,
        } => pack(&config, &out, ceiling),
        Action::Tally { input, out } => tally(&input, &out),
        Action::Report => report(),
    }
}

fn ensure_parent(out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn load_cfg(path: &Path) -> Result<DetectorCfg> {
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: DetectorCfg =
        serde_json::from_slice(&raw).with_context(|| format!("parsing {}", path.display()))?;
    Ok(cfg)
}

fn pack(config: &Path, out: &Path, ceiling: Option<usize>) -> Result<()> {
    tracing::info!(config = %config.display(), out = %out.display(), "pack");
    let mut cfg = load_cfg(config)?;
    if ceiling.is_some() {
        cfg.growth_ceiling = ceiling;
    }
    let layout = pack_from_cfg(&cfg)
        .with_context(|| format!("packing module from {}", config.display()))?;
    for e in &layout.edges {
        tracing::info!(
            edge = e.edge,
            strategy = e.strategy.name(),
            fibers = e.fibers.len(),
            rows = e.rows_filled(),
            clad_radius = e.radii.clad,
            "chamfer packed"
        );
    }
    for w in &layout.warnings {
        tracing::warn!(%w, "packing incomplete");
    }

    let mut df = fiber_table(&layout)?;
    ensure_parent(out)?;
    write_table(&mut df, out)?;
    tracing::info!(rows = df.height(), "fiber_table_written");

    let params = PackParams {
        config: cfg,
        fibers_per_edge: layout.edges.iter().map(|e| e.fibers.len()).collect(),
        warnings: layout.warnings.clone(),
    };
    Sidecar::new(out, params).write()?;
    Ok(())
}

/// One row per fiber, in edge/row order.
fn fiber_table(layout: &Layout) -> Result<DataFrame> {
    let n = layout.fiber_count();
    let mut edge = Vec::with_capacity(n);
    let mut row = Vec::with_capacity(n);
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut clad = Vec::with_capacity(n);
    let mut core = Vec::with_capacity(n);
    for e in &layout.edges {
        for f in &e.fibers {
            edge.push(f.edge as i64);
            row.push(f.row as i64);
            x.push(f.center.x);
            y.push(f.center.y);
            clad.push(e.radii.clad);
            core.push(e.radii.core);
        }
    }
    let df = df!(
        "edge" => edge,
        "row" => row,
        "x" => x,
        "y" => y,
        "clad_radius" => clad,
        "core_radius" => core
    )?;
    Ok(df)
}

fn write_table(df: &mut DataFrame, out: &Path) -> Result<()> {
    let parquet = out.extension().and_then(|e| e.to_str()) == Some("parquet");
    write_atomically(out, |file| {
        if parquet {
            ParquetWriter::new(file).finish(df)?;
        } else {
            CsvWriter::new(file).include_header(true).finish(df)?;
        }
        Ok(())
    })
}

/// Write through a temporary file in the target directory and rename it over
/// `out` on success. On failure `out` is left untouched.
fn write_atomically<F>(out: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut fs::File) -> Result<()>,
{
    let dir = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    write(tmp.as_file_mut()).with_context(|| format!("writing {}", out.display()))?;
    tmp.as_file_mut().flush()?;
    tmp.persist(out)
        .with_context(|| format!("moving output into {}", out.display()))?;
    Ok(())
}

type PhotonRow = (Option<i64>, Option<i64>, Option<f64>, Option<i64>);

/// Fold photon rows into per-event summaries. A new event id closes the
/// previous event; rows of one event must be contiguous.
fn aggregate<I: IntoIterator<Item = PhotonRow>>(rows: I) -> Result<Vec<EventSummary>> {
    let mut tally = PhotonTally::new();
    let mut current: Option<u64> = None;
    for (i, (event, track, length, chamfer)) in rows.into_iter().enumerate() {
        let (Some(event), Some(track), Some(length), Some(chamfer)) =
            (event, track, length, chamfer)
        else {
            bail!("row {i}: missing value");
        };
        let event =
            u64::try_from(event).with_context(|| format!("row {i}: negative event id {event}"))?;
        let chamfer = usize::try_from(chamfer)
            .with_context(|| format!("row {i}: negative chamfer id {chamfer}"))?;
        if current != Some(event) {
            if current.is_some() {
                tally.fill();
                tally.clear();
            }
            tally.begin_event(event);
            current = Some(event);
        }
        tally
            .add_photon(track, length, chamfer)
            .with_context(|| format!("row {i}"))?;
    }
    if current.is_some() {
        tally.fill();
    }
    Ok(tally.finalize())
}

fn tally(input: &Path, out: &Path) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), "tally");
    let df = LazyCsvReader::new(input)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", input.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_csv_shape");

    let events = df.column("event")?.cast(&DataType::Int64)?;
    let tracks = df.column("track_id")?.cast(&DataType::Int64)?;
    let lengths = df.column("length")?.cast(&DataType::Float64)?;
    let chamfers = df.column("chamfer")?.cast(&DataType::Int64)?;
    let rows = events
        .i64()?
        .into_iter()
        .zip(tracks.i64()?)
        .zip(lengths.f64()?)
        .zip(chamfers.i64()?)
        .map(|(((e, t), l), c)| (e, t, l, c));
    let summaries = aggregate(rows)?;
    tracing::info!(events = summaries.len(), "tally_done");

    ensure_parent(out)?;
    let json = serde_json::to_vec_pretty(&summaries)?;
    write_atomically(out, |file| Ok(file.write_all(&json)?))?;
    let params = TallyParams {
        input: input.to_path_buf(),
        events: summaries.len(),
    };
    Sidecar::new(out, params).write()?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::code_rev(),
        "fiberpack_version": fiberpack::VERSION,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_cfg() -> DetectorCfg {
        DetectorCfg {
            module_xy: 40.0,
            chamfer: 10.5,
            fiber_core_radius: 0.5,
            fiber_clad_radius: 1.0,
            growth_ceiling: None,
        }
    }

    #[test]
    fn fiber_table_has_one_row_per_fiber() {
        let layout = pack_from_cfg(&sample_cfg()).unwrap();
        let df = fiber_table(&layout).unwrap();
        assert_eq!(df.height(), layout.fiber_count());
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            names,
            vec!["edge", "row", "x", "y", "clad_radius", "core_radius"]
        );
    }

    #[test]
    fn pack_writes_table_and_sidecar() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("module.json");
        fs::write(&cfg_path, serde_json::to_vec(&sample_cfg()).unwrap()).unwrap();
        let out = dir.path().join("out").join("fibers.csv");
        pack(&cfg_path, &out, Some(1)).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("edge,row,x,y,clad_radius,core_radius"));
        let prov = dir.path().join("out").join("fibers.provenance.json");
        let parsed: serde_json::Value = serde_json::from_slice(&fs::read(prov).unwrap()).unwrap();
        assert_eq!(parsed["params"]["config"]["growth_ceiling"], 1);
        assert_eq!(parsed["params"]["fibers_per_edge"], serde_json::json!([6, 4, 5, 1]));
        // ceiling 1 stops the compact chamfer early
        let warnings = parsed["params"]["warnings"].as_array().unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0]["kind"], "packing_incomplete");
        assert_eq!(warnings[0]["edge"], 2);
        assert_eq!(warnings[0]["placed"], 5);
    }

    #[test]
    fn failed_write_leaves_no_file_behind() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("fibers.csv");
        let err = write_atomically(&out, |file| {
            file.write_all(b"edge,row\n0,")?;
            bail!("writer failed midway")
        });
        assert!(err.is_err());
        assert!(!out.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn successful_write_replaces_existing_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("events.json");
        fs::write(&out, "stale").unwrap();
        write_atomically(&out, |file| Ok(file.write_all(b"[]")?)).unwrap();
        assert_eq!(fs::read_to_string(&out).unwrap(), "[]");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn pack_rejects_bad_config() {
        let dir = tempdir().unwrap();
        let cfg_path = dir.path().join("module.json");
        let mut cfg = sample_cfg();
        cfg.chamfer = 100.0;
        fs::write(&cfg_path, serde_json::to_vec(&cfg).unwrap()).unwrap();
        assert!(pack(&cfg_path, &dir.path().join("f.csv"), None).is_err());
    }

    #[test]
    fn aggregate_splits_events() {
        let rows = vec![
            (Some(0), Some(1), Some(1.0), Some(0)),
            (Some(0), Some(1), Some(2.0), Some(0)),
            (Some(0), Some(2), Some(0.5), Some(3)),
            (Some(1), Some(1), Some(4.0), Some(2)),
        ];
        let s = aggregate(rows).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].photons_per_chamfer, [1, 0, 0, 1]);
        assert_eq!(s[0].length_per_chamfer, [3.0, 0.0, 0.0, 0.5]);
        assert_eq!(s[1].event, 1);
        assert_eq!(s[1].photons_per_chamfer, [0, 0, 1, 0]);
    }

    #[test]
    fn aggregate_rejects_missing_and_bad_values() {
        assert!(aggregate(vec![(Some(0), None, Some(1.0), Some(0))]).is_err());
        assert!(aggregate(vec![(Some(-1), Some(1), Some(1.0), Some(0))]).is_err());
        assert!(aggregate(vec![(Some(0), Some(1), Some(1.0), Some(9))]).is_err());
        assert!(aggregate(Vec::<PhotonRow>::new()).unwrap().is_empty());
    }

    #[test]
    fn tally_reads_csv() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("photons.csv");
        fs::write(
            &input,
            "event,track_id,length,chamfer\n0,1,1.5,2\n0,2,2.5,2\n1,7,1.0,0\n",
        )
        .unwrap();
        let out = dir.path().join("events.json");
        tally(&input, &out).unwrap();
        let s: Vec<EventSummary> = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].photons_per_chamfer, [0, 0, 2, 0]);
        assert_eq!(s[1].length_per_chamfer, [1.0, 0.0, 0.0, 0.0]);
    }
}
