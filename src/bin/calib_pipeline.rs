//! End-to-end calibration of a stereo pair.
//!
//! 1. Load the source record and image, build the edge-likelihood field and
//!    refine the guide segments.
//! 2. Classify, solve vanishing points and pose, persist the record.
//! 3. Optionally derive the twin record, propagate the segments with the
//!    configured correspondences, refine and pose it, persist it.
//! 4. Write overlays and a JSON report with per-stage timings.

use log::info;
use std::env;
use std::path::{Path, PathBuf};
use vanishing_calib::config::{self, PipelineConfig};
use vanishing_calib::diagnostics::{
    timed, ImageReport, PipelineReport, PropagateSummary, RefineReport, TimingBreakdown,
};
use vanishing_calib::image::io::{
    load_grayscale_image, load_rgb_image, read_json_file, read_record, save_field_png,
    write_json_file, write_record,
};
use vanishing_calib::image::GrayImageU8;
use vanishing_calib::refine::refine_calibration;
use vanishing_calib::stereo::{
    propagate_calibration, CorrespondenceSet, KeypointMatcher, StaticMatcher, MAX_NEIGHBORS,
};
use vanishing_calib::viz::{OverlayRenderer, SegmentSink};
use vanishing_calib::{
    stereo_twin_name, CalibError, CalibrationRecord, CanvasMapping, EdgeLikelihoodField,
    PosedCalibration, RawCalibration, Result,
};

fn main() {
    let _ = env_logger::builder().try_init();
    let (result, elapsed_ms) = timed(run);
    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
    println!("Total execution time: {elapsed_ms:.2} ms");
}

fn usage() -> CalibError {
    CalibError::Config("Usage: calib_pipeline <config.json>".to_string())
}

fn run() -> Result<()> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = config::load_config(Path::new(&config_path))?;
    let mut timings = TimingBreakdown::default();
    let (report, total_ms) = timed(|| run_pair(&config, &mut timings));
    timings.total_ms = total_ms;
    let images = report?;
    info!(
        "refinement {:.2} ms, posing {:.2} ms",
        timings.stage_total_ms("refine"),
        timings.stage_total_ms("pose")
    );

    let report_path = config.output.dir.join("report.json");
    write_json_file(&report_path, &PipelineReport { images, timings })?;
    println!("Calibration report written to {}", report_path.display());
    Ok(())
}

/// Image of a record plus its canvas mapping.
struct LoadedImage {
    gray: GrayImageU8,
    path: PathBuf,
    mapping: CanvasMapping,
}

fn load_image(
    config: &PipelineConfig,
    record: &CalibrationRecord,
    timings: &mut TimingBreakdown,
) -> Result<LoadedImage> {
    let path = config.image_dir().join(record.image_file_name());
    let (gray, ms) = timed(|| load_grayscale_image(&path));
    let gray = gray?;
    timings.push(format!("{}:load", record.name), ms);
    let mapping = CanvasMapping::fit(gray.width() as u32, gray.height() as u32, config.canvas())?;
    Ok(LoadedImage {
        gray,
        path,
        mapping,
    })
}

/// Optional refinement followed by posing; persists the posed record.
fn calibrate(
    config: &PipelineConfig,
    raw: RawCalibration,
    image: &LoadedImage,
    refine: bool,
    timings: &mut TimingBreakdown,
) -> Result<(PosedCalibration, Option<RefineReport>)> {
    let name = raw.meta().name.clone();
    let (raw, refine_report) = if refine && config.refine.enabled {
        let (field, ms) = timed(|| {
            EdgeLikelihoodField::build(&image.gray.as_view(), &config.edge_field.resolve())
        });
        let field = field?;
        timings.push(format!("{name}:edge_field"), ms);
        if config.output.save_edge_fields {
            save_field_png(
                field.values(),
                &config.output.dir.join(format!("{name}_edges.png")),
            )?;
        }

        let cancel = config.refine.cancel_token();
        let (refined, ms) = timed(|| {
            refine_calibration(
                raw,
                &field,
                &image.mapping,
                &config.refine.resolve(),
                &cancel,
                config.refine.parallel_options(),
            )
        });
        let refined = refined?;
        timings.push(format!("{name}:refine"), ms);
        let report = refined.report().clone();
        (refined.into_raw(), Some(report))
    } else {
        (raw, None)
    };

    let (posed, ms) = timed(|| raw.classify()?.pose(config.canvas()));
    let posed = posed?;
    timings.push(format!("{name}:pose"), ms);

    let out_path = config.output.dir.join(format!("{name}.json"));
    write_record(&out_path, &posed.clone().into_record())?;
    info!("{name}: posed record written to {}", out_path.display());
    Ok((posed, refine_report))
}

fn overlay(config: &PipelineConfig, image: &LoadedImage, posed: &PosedCalibration) -> Result<()> {
    if !config.output.overlays {
        return Ok(());
    }
    let rgb = load_rgb_image(&image.path)?;
    let mut sink = OverlayRenderer::new(&config.output.dir, image.mapping).with_thickness(3);
    let label = format!("{}_overlay", posed.meta().name);
    sink.show(&label, &rgb, posed.segments())
}

fn run_pair(config: &PipelineConfig, timings: &mut TimingBreakdown) -> Result<Vec<ImageReport>> {
    let source_record = read_record(&config.record)?;
    let source_name = source_record.name.clone();
    let source_image = load_image(config, &source_record, timings)?;
    let raw = RawCalibration::from_record(source_record)?;
    let (posed, refine_report) = calibrate(config, raw, &source_image, true, timings)?;
    overlay(config, &source_image, &posed)?;

    let mut source_report = ImageReport::new(&source_name, source_image.mapping, &posed);
    source_report.refine = refine_report;
    let mut reports = vec![source_report];

    let Some(stereo) = &config.stereo else {
        return Ok(reports);
    };

    let twin = posed.clone().into_record().derive_twin(stereo_twin_name)?;
    let twin_image = load_image(config, &twin, timings)?;
    let correspondences: CorrespondenceSet = read_json_file(&stereo.correspondences)?;
    let matcher = StaticMatcher::new(correspondences);
    let set = matcher.match_images(&source_image.gray.as_view(), &twin_image.gray.as_view())?;

    let (proposed, ms) =
        timed(|| propagate_calibration(&twin, &set, &source_image.mapping, &twin_image.mapping));
    let proposed = proposed?;
    timings.push(format!("{}:propagate", twin.name), ms);

    let twin_raw = RawCalibration::from_record(proposed)?;
    let edges = twin_raw.segments().total_edges();
    let (twin_posed, twin_refine) =
        calibrate(config, twin_raw, &twin_image, stereo.refine_twin, timings)?;
    overlay(config, &twin_image, &twin_posed)?;

    let mut twin_report = ImageReport::new(&twin.name, twin_image.mapping, &twin_posed);
    twin_report.refine = twin_refine;
    twin_report.propagate = Some(PropagateSummary {
        correspondences: set.len(),
        neighbors: set.len().min(MAX_NEIGHBORS),
        edges,
    });
    reports.push(twin_report);
    Ok(reports)
}
