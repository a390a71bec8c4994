//! Layout command implementation - resolve one BED track for a region

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use trackpack_core::{Item, LayoutRequest, Resolution, Visibility, VisibilityResolver};

use crate::bed::{items_for_region, BedReader, BedRecord};
use crate::commands::report::{print_reports, TrackReport};
use crate::config::Config;
use crate::region::Region;
use crate::OutputFormat;

/// Options for a single-track layout
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub budget: Option<u32>,
    pub visibility: Visibility,
    pub overflow: bool,
    pub track_type: String,
}

#[allow(clippy::too_many_arguments)]
pub fn execute(
    config: &Config,
    bed: PathBuf,
    region: String,
    budget: Option<u32>,
    visibility: Visibility,
    overflow: bool,
    track_type: String,
    format: Option<OutputFormat>,
) -> Result<()> {
    let region = Region::parse(&region)?;
    let format = match format {
        Some(format) => format,
        None => OutputFormat::from_config(&config.general.format)?,
    };
    let options = LayoutOptions {
        budget,
        visibility,
        overflow,
        track_type,
    };

    log::info!("Laying out {} over {}", bed.display(), region);
    let (items, resolution) = run(config, &bed, &region, &options)?;

    let name = bed
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| bed.display().to_string());
    let report = TrackReport::new(name, region.to_string(), &items, &resolution, 0);

    let stdout = std::io::stdout();
    print_reports(&mut stdout.lock(), &[report], format)?;
    Ok(())
}

/// Read, filter and resolve one track
pub fn run(
    config: &Config,
    bed: &Path,
    region: &Region,
    options: &LayoutOptions,
) -> Result<(Vec<Item<BedRecord>>, Resolution)> {
    let records = BedReader::new(bed)?
        .read_records()
        .with_context(|| format!("Failed to read BED file: {}", bed.display()))?;
    let items = items_for_region(records, region, config.general.label_char_width);
    log::info!("{} items overlap {}", items.len(), region);

    let mut layout_config = config.layout.clone();
    if options.overflow {
        layout_config.overflow_enabled = true;
    }

    let capabilities = config.registry().lookup(&options.track_type);
    let budget = options.budget.unwrap_or(config.image.default_budget);
    let request = LayoutRequest::new(region.window, budget, options.visibility).with_capabilities(capabilities);

    let resolver = VisibilityResolver::new(&layout_config).context("Invalid layout configuration")?;
    let resolution = resolver
        .resolve(&items, &request)
        .with_context(|| format!("Failed to lay out {}", bed.display()))?;

    if resolution.level != options.visibility {
        log::info!(
            "{}: {} did not fit in {} px, shown as {}",
            bed.display(),
            options.visibility,
            budget,
            resolution.level
        );
    }
    Ok((items, resolution))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn stacked_bed(count: usize) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        for i in 0..count {
            writeln!(f, "chr1\t{}\t{}\tf{}", 100 + i, 900, i).unwrap();
        }
        f
    }

    fn options(budget: u32, visibility: Visibility) -> LayoutOptions {
        LayoutOptions {
            budget: Some(budget),
            visibility,
            overflow: false,
            track_type: "bed".to_string(),
        }
    }

    #[test]
    fn test_track_demotes_to_fit_budget() -> Result<()> {
        let bed = stacked_bed(12);
        let region = Region::parse("chr1:1-1000")?;
        let (items, resolution) = run(&Config::default(), bed.path(), &region, &options(50, Visibility::Full))?;

        assert_eq!(items.len(), 12);
        // 12 stacked items: full and pack allow 5 rows, squish 10
        assert_eq!(resolution.level, Visibility::Dense);
        assert_eq!(resolution.attempts.len(), 4);
        Ok(())
    }

    #[test]
    fn test_overflow_flag_folds_extra_rows() -> Result<()> {
        let bed = stacked_bed(12);
        let region = Region::parse("chr1:1-1000")?;
        let mut opts = options(50, Visibility::Pack);
        opts.overflow = true;
        let (_, resolution) = run(&Config::default(), bed.path(), &region, &opts)?;

        assert_eq!(resolution.level, Visibility::Pack);
        assert_eq!(resolution.row_count(), 6);
        assert_eq!(resolution.layout.overflow_label().as_deref(), Some("Last Row: 7"));
        Ok(())
    }

    #[test]
    fn test_graph_tracks_use_one_row() -> Result<()> {
        let bed = stacked_bed(12);
        let region = Region::parse("chr1:1-1000")?;
        let mut opts = options(50, Visibility::Pack);
        opts.track_type = "bigWig".to_string();
        let (_, resolution) = run(&Config::default(), bed.path(), &region, &opts)?;

        assert_eq!(resolution.level, Visibility::Pack);
        assert_eq!(resolution.row_count(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_bed_is_reported() {
        let region = Region::parse("chr1:1-1000").unwrap();
        let err = run(
            &Config::default(),
            Path::new("/nonexistent/x.bed"),
            &region,
            &options(50, Visibility::Pack),
        )
        .unwrap_err();
        assert!(err.downcast_ref::<crate::error::CliError>().is_some());
    }
}
