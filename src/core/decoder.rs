//! Coordinate-row parsing and grid rendering.
//!
//! Every source format is first turned into rows of string fields; from there
//! decoding is the same: pick a column layout, parse each row into a [`Glyph`],
//! and lay the glyphs out on a grid of spaces.

use crate::domain::model::{ColumnLayout, DecodedMessage, Glyph};
use crate::utils::error::{Result, SecretError};
use std::collections::BTreeMap;

pub const DEFAULT_MAX_DIMENSION: usize = 4096;

#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    pub layout: Option<ColumnLayout>,
    pub max_dimension: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            layout: None,
            max_dimension: DEFAULT_MAX_DIMENSION,
        }
    }
}

pub fn text_rows(text: &str) -> Vec<Vec<String>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .collect()
}

pub fn delimited_rows(body: &str, delimiter: u8) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        rows.push(row);
    }
    Ok(rows)
}

enum Role {
    Symbol,
    X,
    Y,
}

/// Role named by a header cell, ignoring case: `x…`, `y…`, or `char…`/`symbol…`/`glyph…`.
/// Numeric data cells never name a role.
fn header_role(cell: &str) -> Option<Role> {
    let name = cell.trim().to_lowercase();

    if name.starts_with('x') {
        Some(Role::X)
    } else if name.starts_with('y') {
        Some(Role::Y)
    } else if ["char", "symbol", "glyph"]
        .iter()
        .any(|prefix| name.starts_with(prefix))
    {
        Some(Role::Symbol)
    } else {
        None
    }
}

/// A row whose three cells name the columns, e.g. `x-coordinate | Character | y-coordinate`.
pub fn detect_header(row: &[String]) -> Option<ColumnLayout> {
    if row.len() != 3 {
        return None;
    }

    let (mut symbol, mut x, mut y) = (None, None, None);
    for (index, cell) in row.iter().enumerate() {
        let slot = match header_role(cell)? {
            Role::Symbol => &mut symbol,
            Role::X => &mut x,
            Role::Y => &mut y,
        };
        if slot.replace(index).is_some() {
            return None;
        }
    }

    Some(ColumnLayout {
        symbol: symbol?,
        x: x?,
        y: y?,
    })
}

pub fn parse_row(fields: &[String], layout: ColumnLayout) -> Option<Glyph> {
    if fields.len() != 3 {
        return None;
    }

    let symbol = &fields[layout.symbol];
    if symbol.is_empty() {
        return None;
    }
    let x = fields[layout.x].trim().parse::<usize>().ok()?;
    let y = fields[layout.y].trim().parse::<usize>().ok()?;

    Some(Glyph {
        symbol: symbol.clone(),
        x,
        y,
    })
}

pub fn decode_rows(rows: Vec<Vec<String>>, options: &DecodeOptions) -> Result<DecodedMessage> {
    let mut rows = rows.into_iter().peekable();

    let header = rows.peek().and_then(|first| detect_header(first));
    let layout = match header {
        Some(layout) => {
            tracing::debug!("Header row found, using column order {}", layout);
            rows.next();
            layout
        }
        None => options.layout.unwrap_or_default(),
    };

    let mut glyphs = Vec::new();
    let mut skipped_rows = 0;
    for row in rows {
        match parse_row(&row, layout) {
            Some(glyph) => glyphs.push(glyph),
            None => {
                tracing::debug!("Skipping row {:?}", row);
                skipped_rows += 1;
            }
        }
    }

    let (message, width, height) = render(&glyphs, options.max_dimension)?;

    Ok(DecodedMessage {
        glyphs,
        skipped_rows,
        width,
        height,
        message,
    })
}

/// Returns the rendered grid with its width and height.
pub fn render(glyphs: &[Glyph], max_dimension: usize) -> Result<(String, usize, usize)> {
    let (Some(max_x), Some(max_y)) = (
        glyphs.iter().map(|g| g.x).max(),
        glyphs.iter().map(|g| g.y).max(),
    ) else {
        return Ok((String::new(), 0, 0));
    };

    if max_x >= max_dimension || max_y >= max_dimension {
        return Err(SecretError::GridTooLarge {
            width: max_x.saturating_add(1),
            height: max_y.saturating_add(1),
            limit: max_dimension,
        });
    }
    let (width, height) = (max_x + 1, max_y + 1);

    // Later glyphs overwrite earlier ones at the same cell.
    let mut cells: BTreeMap<(usize, usize), &str> = BTreeMap::new();
    for glyph in glyphs {
        cells.insert((glyph.y, glyph.x), glyph.symbol.as_str());
    }

    let mut lines = Vec::with_capacity(height);
    let mut cells = cells.into_iter().peekable();
    for y in 0..height {
        let mut line = String::with_capacity(width);
        let mut column = 0;
        while let Some(((_, x), symbol)) = cells.next_if(|((row, _), _)| *row == y) {
            line.extend(std::iter::repeat(' ').take(x - column));
            line.push_str(symbol);
            column = x + 1;
        }
        line.extend(std::iter::repeat(' ').take(width - column));
        lines.push(line);
    }

    Ok((lines.join("\n"), width, height))
}

pub fn decode_text(text: &str) -> Result<DecodedMessage> {
    decode_rows(text_rows(text), &DecodeOptions::default())
}
