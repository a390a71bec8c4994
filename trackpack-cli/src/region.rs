//! Browser-style region strings: `chr1:10,000-20,000`, `chrX:1.5M-2M`.
//!
//! Positions are 1-based and inclusive, as typed into a browser position
//! box; the parsed window is 0-based half-open.

use crate::error::{CliError, CliResult};
use std::fmt;
use trackpack_core::{GenomicPos, Window};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chrom: String,
    pub window: Window,
}

impl Region {
    pub fn parse(text: &str) -> CliResult<Self> {
        let text = text.trim();
        let (chrom, range) = text
            .rsplit_once(':')
            .ok_or_else(|| CliError::region(text, "expected chrom:start-end"))?;
        if chrom.is_empty() {
            return Err(CliError::region(text, "missing chromosome name"));
        }
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| CliError::region(text, "expected start-end"))?;

        let start = parse_position(start).map_err(|m| CliError::region(text, m))?;
        let end = parse_position(end).map_err(|m| CliError::region(text, m))?;
        if start < 1 {
            return Err(CliError::region(text, "positions start at 1"));
        }

        let window = Window::new(start - 1, end)
            .map_err(|_| CliError::region(text, "end must not be before start"))?;
        Ok(Self {
            chrom: chrom.to_string(),
            window,
        })
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.window.start() + 1, self.window.end())
    }
}

fn parse_position(text: &str) -> Result<GenomicPos, String> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
    let (number, multiplier) = match cleaned.chars().last() {
        Some('k') | Some('K') => (&cleaned[..cleaned.len() - 1], 1_000.0),
        Some('m') | Some('M') => (&cleaned[..cleaned.len() - 1], 1_000_000.0),
        Some('g') | Some('G') => (&cleaned[..cleaned.len() - 1], 1_000_000_000.0),
        Some(_) => (cleaned.as_str(), 1.0),
        None => return Err("empty position".to_string()),
    };

    if multiplier == 1.0 {
        return number
            .parse::<GenomicPos>()
            .map_err(|e| format!("bad position '{}': {}", text.trim(), e));
    }
    let value: f64 = number
        .parse()
        .map_err(|e| format!("bad position '{}': {}", text.trim(), e))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("bad position '{}'", text.trim()));
    }
    Ok((value * multiplier).round() as GenomicPos)
}
