//! Plan command implementation - lay out every configured track and stack them

use anyhow::{anyhow, Context, Result};
use rayon::prelude::*;
use trackpack_core::{ImagePlanner, Item, LayoutRequest, Resolution, VisibilityResolver};

use crate::bed::{items_for_region, BedReader, BedRecord};
use crate::commands::report::{print_reports, TrackReport};
use crate::config::{Config, TrackConfig};
use crate::region::Region;
use crate::OutputFormat;

pub fn execute(config: &Config, region: Option<String>, format: Option<OutputFormat>) -> Result<()> {
    let region_text = region
        .or_else(|| config.general.region.clone())
        .ok_or_else(|| anyhow!("No region given; pass --region or set general.region in trackpack.toml"))?;
    let region = Region::parse(&region_text)?;
    let format = match format {
        Some(format) => format,
        None => OutputFormat::from_config(&config.general.format)?,
    };

    if config.tracks.is_empty() {
        log::warn!("No [[tracks]] configured; nothing to plan");
    }
    log::info!("Planning {} tracks over {}", config.tracks.len(), region);

    let reports = plan(config, &region)?;

    let hidden = reports.iter().filter(|r| r.height == 0).count();
    log::info!("{} of {} tracks visible", reports.len() - hidden, reports.len());

    let stdout = std::io::stdout();
    print_reports(&mut stdout.lock(), &reports, format)?;
    Ok(())
}

/// Resolve tracks in parallel, then stack them in configuration order
pub fn plan(config: &Config, region: &Region) -> Result<Vec<TrackReport>> {
    let resolver = VisibilityResolver::new(&config.layout).context("Invalid layout configuration")?;
    let registry = config.registry();

    let resolved: Vec<(Vec<Item<BedRecord>>, Resolution)> = config
        .tracks
        .par_iter()
        .map(|track| -> Result<(Vec<Item<BedRecord>>, Resolution)> {
            let items = load_track(config, track, region)?;
            let request = LayoutRequest::new(region.window, config.budget_for(track), track.visibility)
                .with_capabilities(registry.lookup(&track.r#type));
            let resolution = resolver
                .resolve(&items, &request)
                .with_context(|| format!("Failed to lay out track '{}'", track.name))?;
            log::debug!("track '{}' resolved to {}", track.name, resolution.level);
            Ok((items, resolution))
        })
        .collect::<Result<_>>()?;

    let mut planner = ImagePlanner::new(config.image.max_height).with_track_gap(config.image.track_gap);
    let region_text = region.to_string();
    let reports = config
        .tracks
        .iter()
        .zip(resolved)
        .map(|(track, (items, resolution))| {
            let placed = planner.place(track.name.clone(), resolution);
            TrackReport::new(&track.name, region_text.clone(), &items, &placed.resolution, placed.y_top)
        })
        .collect();

    let plan = planner.finish();
    if plan.hidden_by_cap > 0 {
        log::warn!(
            "{} tracks hidden to keep the image under {} px",
            plan.hidden_by_cap,
            config.image.max_height
        );
    }
    log::debug!("image height {} px", plan.total_height);
    Ok(reports)
}

fn load_track(config: &Config, track: &TrackConfig, region: &Region) -> Result<Vec<Item<BedRecord>>> {
    let records = BedReader::new(&track.bed)?
        .read_records()
        .with_context(|| format!("Failed to read track '{}'", track.name))?;
    Ok(items_for_region(records, region, config.general.label_char_width))
}
