//! Printable view of a resolved track, shared by `layout` and `plan`.

use crate::bed::BedRecord;
use crate::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use trackpack_core::{Attempt, Item, LayoutResult, Resolution, Visibility};

#[derive(Debug, Clone, Serialize)]
pub struct TrackReport {
    pub name: String,
    pub region: String,
    pub item_count: usize,
    pub level: Visibility,
    pub row_height: u32,
    pub row_count: u32,
    pub height: u32,
    /// Top pixel of the track inside the stacked image
    pub y_top: u32,
    pub attempts: Vec<Attempt>,
    pub rows: Vec<RowReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    pub index: u32,
    pub y: u32,
    pub items: Vec<String>,
}

impl TrackReport {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        items: &[Item<BedRecord>],
        resolution: &Resolution,
        y_top: u32,
    ) -> Self {
        let layout = &resolution.layout;
        let rows = layout
            .rows()
            .into_iter()
            .enumerate()
            .map(|(index, members)| {
                let index = index as u32;
                RowReport {
                    index,
                    y: LayoutResult::y_offset(index, y_top, resolution.row_height),
                    items: members.iter().map(|&i| item_label(items, i)).collect(),
                }
            })
            .collect();

        Self {
            name: name.into(),
            region: region.into(),
            item_count: items.len(),
            level: resolution.level,
            row_height: resolution.row_height,
            row_count: resolution.row_count(),
            height: resolution.height(),
            y_top,
            attempts: resolution.attempts.clone(),
            rows,
            overflow: layout.overflow_label(),
        }
    }

    pub fn write_text<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{}\t{}\t{} items\tlevel={}\trows={}\theight={}px\ty={}",
            self.name, self.region, self.item_count, self.level, self.row_count, self.height, self.y_top
        )?;
        if self.attempts.len() > 1 {
            let tried: Vec<String> = self
                .attempts
                .iter()
                .map(|a| format!("{}:{}rows/{}px{}", a.level, a.row_count, a.height, if a.fits { "" } else { "!" }))
                .collect();
            writeln!(out, "  tried {}", tried.join(" -> "))?;
        }
        for row in &self.rows {
            writeln!(out, "  row {:>3} y={:<6} {}", row.index, row.y, row.items.join(" "))?;
        }
        if let Some(overflow) = &self.overflow {
            writeln!(out, "  {}", overflow)?;
        }
        Ok(())
    }
}

fn item_label(items: &[Item<BedRecord>], index: usize) -> String {
    match items.get(index) {
        Some(item) if item.payload.name.is_some() => item.payload.display_name().to_string(),
        Some(item) => format!("{}-{}", item.start, item.end),
        None => format!("#{}", index),
    }
}

/// Print reports in the requested format
pub fn print_reports<W: Write>(out: &mut W, reports: &[TrackReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for report in reports {
                report.write_text(out)?;
            }
        }
        OutputFormat::Json => {
            let json = if reports.len() == 1 {
                serde_json::to_string_pretty(&reports[0])
            } else {
                serde_json::to_string_pretty(reports)
            }
            .context("Failed to serialize layout report")?;
            writeln!(out, "{}", json)?;
        }
    }
    Ok(())
}
