//! Spreadsheet codec for the project file
//!
//! The file holds a single worksheet with one project per row:
//!
//! ```text
//! | Proje Adı | Başlangıç Tarihi | Bitiş Tarihi |
//! |-----------|------------------|--------------|
//! | Alpha     | 01/01/2024       | 31/12/2024   |
//! ```
//!
//! Dates are written as `DD/MM/YYYY` text cells. Stages are not part of the
//! format: a project read back from the file always has an empty stage list.
//!
//! Writing goes through `rust_xlsxwriter`, reading through `calamine`.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;

use calamine::{Data, DataType, Range, Reader, Xlsx};
use chrono::NaiveDate;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, FormatBorder, Workbook};
use timeplan_core::{parse_date, Project};

use crate::StoreError;

/// Header row written at the top of the sheet
pub const HEADER: [&str; 3] = ["Proje Adı", "Başlangıç Tarihi", "Bitiş Tarihi"];

/// Name of the data worksheet
pub const SHEET_NAME: &str = "Projeler";

const COLUMN_WIDTHS: [f64; 3] = [32.0, 18.0, 18.0];

/// Creation date stamped into the document properties. Fixed so that saving
/// the same projects twice produces the same bytes.
const CREATED: (u16, u8, u8) = (2000, 1, 1);

/// Build the workbook bytes for `projects`
pub fn render_projects(projects: &[Project]) -> Result<Vec<u8>, StoreError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(CREATED.0, CREATED.1, CREATED.2)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let header = Format::new()
        .set_bold()
        .set_border_bottom(FormatBorder::Thin);

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    for (index, project) in projects.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, value) in project.to_row().iter().enumerate() {
            sheet.write_string(row, col as u16, value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Overwrite `path` with the given projects
pub fn write_projects(path: &Path, projects: &[Project]) -> Result<(), StoreError> {
    let bytes = render_projects(projects)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Read projects from `path`.
///
/// Returns `Ok(None)` when the file does not exist. Sheet row 1 is treated as
/// the header and skipped whatever it contains.
pub fn read_projects(path: &Path) -> Result<Option<Vec<Project>>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut workbook: Xlsx<_> = Xlsx::new(BufReader::new(file))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Ok(Some(Vec::new())),
    };

    parse_range(&range).map(Some)
}

fn parse_range(range: &Range<Data>) -> Result<Vec<Project>, StoreError> {
    let (Some((first_row, _)), Some((last_row, _))) = (range.start(), range.end()) else {
        return Ok(Vec::new());
    };

    let mut projects = Vec::new();
    for row in first_row.max(1)..=last_row {
        let cells: [Option<&Data>; 3] = [0, 1, 2].map(|col| {
            range
                .get_value((row, col))
                .filter(|cell| !matches!(cell, Data::Empty))
        });
        if cells.iter().all(Option::is_none) {
            continue;
        }

        // Sheet rows are 1-based for messages
        let sheet_row = row + 1;
        let name = match cells[0] {
            Some(Data::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return Err(StoreError::missing_cell(sheet_row, HEADER[0])),
        };
        let start_date = date_cell(cells[1], sheet_row, HEADER[1])?;
        let end_date = date_cell(cells[2], sheet_row, HEADER[2])?;

        projects.push(Project::new(name, start_date, end_date));
    }
    Ok(projects)
}

fn date_cell(cell: Option<&Data>, row: u32, column: &str) -> Result<NaiveDate, StoreError> {
    match cell {
        Some(Data::String(text)) => {
            parse_date(text).map_err(|source| StoreError::InvalidDate { row, source })
        }
        // Native date cells appear when the sheet was edited by hand
        Some(cell @ (Data::DateTime(_) | Data::DateTimeIso(_))) => {
            cell.as_date().ok_or_else(|| StoreError::InvalidRow {
                row,
                reason: format!("unreadable date in column '{}'", column),
            })
        }
        Some(other) => Err(StoreError::InvalidRow {
            row,
            reason: format!("expected DD/MM/YYYY text in column '{}', found '{}'", column, other),
        }),
        None => Err(StoreError::missing_cell(row, column)),
    }
}
