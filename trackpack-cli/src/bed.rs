//! BED reader: the feature loader feeding the layout engine.

use crate::error::{CliError, CliResult};
use crate::region::Region;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use trackpack_core::{GenomicPos, Item, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct BedRecord {
    pub chrom: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub name: Option<String>,
    /// Block spans from BED12 columns, absolute coordinates
    pub blocks: Vec<Span>,
}

impl BedRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

pub struct BedReader {
    reader: BufReader<File>,
    path: PathBuf,
}

impl BedReader {
    pub fn new(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::file_not_found(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            path: path.to_path_buf(),
        })
    }

    pub fn read_records(self) -> CliResult<Vec<BedRecord>> {
        let file_name = self.path.display().to_string();
        let mut records = Vec::new();

        for (line_no, line) in self.reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            // Skip comments, headers and empty lines
            if line.is_empty()
                || line.starts_with('#')
                || line.starts_with("track")
                || line.starts_with("browser")
            {
                continue;
            }

            let record = parse_bed_line(line)
                .map_err(|message| CliError::parse(file_name.clone(), format!("line {}: {}", line_no + 1, message)))?;
            records.push(record);
        }

        log::debug!("read {} records from {}", records.len(), file_name);
        Ok(records)
    }
}

pub fn parse_bed_line(line: &str) -> Result<BedRecord, String> {
    let fields: Vec<&str> = if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split_whitespace().collect()
    };

    if fields.len() < 3 {
        return Err(format!("BED line must have at least 3 fields: {}", line));
    }

    let chrom = fields[0].to_string();
    let start: GenomicPos = fields[1]
        .trim()
        .parse()
        .map_err(|e| format!("bad start '{}': {}", fields[1], e))?;
    let end: GenomicPos = fields[2]
        .trim()
        .parse()
        .map_err(|e| format!("bad end '{}': {}", fields[2], e))?;
    let name = fields
        .get(3)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string);

    let blocks = if fields.len() >= 12 {
        parse_blocks(start, fields[10], fields[11])?
    } else {
        Vec::new()
    };

    Ok(BedRecord {
        chrom,
        start,
        end,
        name,
        blocks,
    })
}

fn parse_blocks(chrom_start: GenomicPos, sizes: &str, starts: &str) -> Result<Vec<Span>, String> {
    let parse_list = |text: &str| -> Result<Vec<GenomicPos>, String> {
        text.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<GenomicPos>().map_err(|e| format!("bad block value '{}': {}", s, e)))
            .collect()
    };
    let sizes = parse_list(sizes)?;
    let starts = parse_list(starts)?;
    if sizes.len() != starts.len() {
        return Err(format!(
            "blockSizes has {} entries but blockStarts has {}",
            sizes.len(),
            starts.len()
        ));
    }
    Ok(starts
        .iter()
        .zip(&sizes)
        .map(|(offset, size)| Span::new(chrom_start + offset, chrom_start + offset + size))
        .collect())
}

/// Turn records into layout items for one region: keep the ones on the
/// region's chromosome that overlap its window, attach label widths, and
/// order them by start. Equal starts keep file order.
pub fn items_for_region(records: Vec<BedRecord>, region: &Region, label_char_width: u32) -> Vec<Item<BedRecord>> {
    let mut items: Vec<Item<BedRecord>> = records
        .into_iter()
        .filter(|r| r.chrom == region.chrom && region.window.overlaps(r.start, r.end))
        .enumerate()
        .map(|(i, record)| {
            let label_pixels = match record.name.as_deref() {
                // one extra character keeps the label off the feature
                Some(name) => (name.chars().count() as u32 + 1) * label_char_width,
                None => 0,
            };
            // introns are drawn too, so blocks pack as the whole extent
            Item::new(i as u64, record.start, record.end)
                .with_label_pixels(label_pixels)
                .with_payload(record)
        })
        .collect();

    items.sort_by_key(|item| item.start);
    items
}
