//! Input Normalizer and Catalog I/O: reads the semicolon-separated teacher-slot
//! table described in spec.md §6 into typed [`Slot`]/[`Week`] rows, and writes
//! a (possibly only partially filled) assignment back out in the same shape.
//!
//! The catalog format never sorts anything: week columns keep the order they
//! were declared in, because that order drives every cadence window computed
//! downstream (see [`crate::gen::window`]).


use std::collections::BTreeSet;
use std::io::{Read, Write};

use thiserror::Error;

use crate::time::{self, HourRange};

pub const COL_SUBJECT: &str = "Matière";
pub const COL_TEACHER: &str = "Prof";
pub const COL_DAY: &str = "Jour";
pub const COL_HOUR: &str = "Heure";
pub const COL_EVEN_GROUPS: &str = "Groupes possibles semaine paire";
pub const COL_ODD_GROUPS: &str = "Groupes possibles semaine impaire";
pub const COL_WORKS_EVEN: &str = "Travaille les semaines paires";
pub const COL_WORKS_ODD: &str = "Travaille les semaines impaires";

const REQUIRED_COLUMNS: [&str; 8] = [
    COL_SUBJECT,
    COL_TEACHER,
    COL_DAY,
    COL_HOUR,
    COL_EVEN_GROUPS,
    COL_ODD_GROUPS,
    COL_WORKS_EVEN,
    COL_WORKS_ODD,
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("missing required column '{0}'")]
    MissingColumn(String),
    #[error("invalid group expression '{0}'")]
    InvalidGroupExpression(String),
    #[error("invalid availability value '{0}', expected 'Oui' or 'Non'")]
    InvalidAvailability(String),
    #[error("invalid week column header '{0}', expected a decimal integer")]
    InvalidWeekHeader(String),
    #[error("invalid hour range: {0}")]
    Time(#[from] time::Error),
    #[error("catalog has no rows")]
    EmptyCatalog,
    #[error("catalog declares no week columns")]
    NoWeekColumns,
    #[error("catalog has no eligible groups in any slot")]
    NoGroups,
    #[error("malformed CSV input: {0}")]
    Csv(String),
    #[error("I/O error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Csv(e.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

/// A planning week, carrying only the declared number; parity is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Week {
    pub number: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
}

impl Week {
    pub fn parity(&self) -> Parity {
        if self.number % 2 == 0 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }
}

/// A recurring (teacher, subject, day, hour) offering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub subject: String,
    pub teacher: String,
    pub day: String,
    pub hour: HourRange,
    pub even_groups: BTreeSet<u32>,
    pub odd_groups: BTreeSet<u32>,
    pub works_even: bool,
    pub works_odd: bool,
}

impl Slot {
    /// The eligibility set for the given week's parity, or `None` if the
    /// teacher does not work that parity at all.
    pub fn eligible_groups(&self, parity: Parity) -> Option<&BTreeSet<u32>> {
        match parity {
            Parity::Even if self.works_even => Some(&self.even_groups),
            Parity::Odd if self.works_odd => Some(&self.odd_groups),
            _ => None,
        }
    }
}

/// What a week-column cell holds for one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Group(u32),
    /// Neither empty nor a positive integer. Only ever produced when reading
    /// a hand-edited assignment; the builder/materializer never emit one.
    Invalid(String),
}

impl Cell {
    pub fn group(&self) -> Option<u32> {
        match self {
            Cell::Group(g) => Some(*g),
            _ => None,
        }
    }

    fn parse(text: &str) -> Cell {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<u32>() {
            Ok(0) => Cell::Invalid(trimmed.to_string()),
            Ok(g) => Cell::Group(g),
            Err(_) => Cell::Invalid(trimmed.to_string()),
        }
    }

    fn to_field(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Group(g) => g.to_string(),
            Cell::Invalid(raw) => raw.clone(),
        }
    }
}

/// The typed, in-memory form of the semicolon-separated catalog table: a set
/// of slots, an ordered list of weeks, and the cell grid (`cells[slot][week]`)
/// that round-trips an assignment. Freshly-parsed catalogs destined for the
/// solver typically have every cell `Empty`; catalogs read back in for
/// `analyze`/`extend` carry a filled grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub slots: Vec<Slot>,
    pub weeks: Vec<Week>,
    cells: Vec<Vec<Cell>>,
}

/// Parses a `Groupes possibles...` cell: empty → ∅, `"a à b"` → the inclusive
/// range, otherwise a single integer.
pub fn parse_group_expression(text: &str) -> Result<BTreeSet<u32>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(BTreeSet::new());
    }

    if let Some((a_str, b_str)) = trimmed.split_once('à') {
        let a: u32 = a_str
            .trim()
            .parse()
            .map_err(|_| Error::InvalidGroupExpression(text.to_string()))?;
        let b: u32 = b_str
            .trim()
            .parse()
            .map_err(|_| Error::InvalidGroupExpression(text.to_string()))?;
        if a == 0 || a > b {
            return Err(Error::InvalidGroupExpression(text.to_string()));
        }
        return Ok((a..=b).collect());
    }

    let n: u32 = trimmed
        .parse()
        .map_err(|_| Error::InvalidGroupExpression(text.to_string()))?;
    if n == 0 {
        return Err(Error::InvalidGroupExpression(text.to_string()));
    }
    Ok(BTreeSet::from([n]))
}

fn parse_availability(text: &str) -> Result<bool> {
    match text.trim().to_lowercase().as_str() {
        "oui" => Ok(true),
        "non" => Ok(false),
        _ => Err(Error::InvalidAvailability(text.to_string())),
    }
}

/// Extracts the ordered list of week columns from a header row, preserving
/// source order. Never sorted.
pub fn extract_week_columns(header: &csv::StringRecord) -> Result<Vec<Week>> {
    let mut weeks = Vec::new();
    for field in header.iter() {
        if REQUIRED_COLUMNS.contains(&field) {
            continue;
        }
        let trimmed = field.trim();
        if trimmed.is_empty() {
            continue;
        }
        let number: u32 = trimmed
            .parse()
            .map_err(|_| Error::InvalidWeekHeader(field.to_string()))?;
        weeks.push(Week { number });
    }
    Ok(weeks)
}

/// The sorted-ascending union of every slot's eligible groups (either parity).
pub fn extract_groups(slots: &[Slot]) -> Vec<u32> {
    let mut groups: BTreeSet<u32> = BTreeSet::new();
    for slot in slots {
        groups.extend(&slot.even_groups);
        groups.extend(&slot.odd_groups);
    }
    groups.into_iter().collect()
}

impl Catalog {
    /// Builds a catalog directly from typed rows, with every cell empty.
    /// Mainly useful for tests that want to bypass the CSV format entirely.
    pub fn new(slots: Vec<Slot>, weeks: Vec<Week>) -> Catalog {
        let cells = slots.iter().map(|_| weeks.iter().map(|_| Cell::Empty).collect()).collect();
        Catalog { slots, weeks, cells }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Catalog> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .flexible(false)
            .from_reader(reader);

        let header = csv_reader.headers()?.clone();

        let mut col_index = |name: &str| -> Result<usize> {
            header
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        let subject_idx = col_index(COL_SUBJECT)?;
        let teacher_idx = col_index(COL_TEACHER)?;
        let day_idx = col_index(COL_DAY)?;
        let hour_idx = col_index(COL_HOUR)?;
        let even_groups_idx = col_index(COL_EVEN_GROUPS)?;
        let odd_groups_idx = col_index(COL_ODD_GROUPS)?;
        let works_even_idx = col_index(COL_WORKS_EVEN)?;
        let works_odd_idx = col_index(COL_WORKS_ODD)?;

        let weeks = extract_week_columns(&header)?;
        if weeks.is_empty() {
            return Err(Error::NoWeekColumns);
        }

        let week_indices: Vec<usize> = header
            .iter()
            .enumerate()
            .filter(|(_, field)| !REQUIRED_COLUMNS.contains(field) && !field.trim().is_empty())
            .map(|(i, _)| i)
            .collect();

        let mut slots = Vec::new();
        let mut cells = Vec::new();

        for record in csv_reader.records() {
            let record = record?;

            let day = record[day_idx].trim().to_string();
            let hour = time::parse_hour_range(&record[hour_idx])?;
            let even_groups = parse_group_expression(&record[even_groups_idx])?;
            let odd_groups = parse_group_expression(&record[odd_groups_idx])?;
            let works_even = parse_availability(&record[works_even_idx])?;
            let works_odd = parse_availability(&record[works_odd_idx])?;

            slots.push(Slot {
                subject: record[subject_idx].trim().to_string(),
                teacher: record[teacher_idx].trim().to_string(),
                day,
                hour,
                even_groups,
                odd_groups,
                works_even,
                works_odd,
            });

            let row_cells = week_indices
                .iter()
                .map(|&i| Cell::parse(&record[i]))
                .collect();
            cells.push(row_cells);
        }

        if slots.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        if extract_groups(&slots).is_empty() {
            return Err(Error::NoGroups);
        }

        Ok(Catalog {
            slots,
            weeks,
            cells,
        })
    }

    /// Builds an empty catalog (no rows) for tests that only exercise the
    /// pure functions (window/alternation).
    pub fn groups(&self) -> Vec<u32> {
        extract_groups(&self.slots)
    }

    pub fn cell(&self, slot: usize, week: usize) -> &Cell {
        &self.cells[slot][week]
    }

    pub fn set_cell(&mut self, slot: usize, week: usize, value: Option<u32>) {
        self.cells[slot][week] = match value {
            Some(g) => Cell::Group(g),
            None => Cell::Empty,
        };
    }

    /// A copy of this catalog's structure (slots, weeks) with every cell
    /// cleared, ready to be filled in by the solver/materializer.
    pub fn blank(&self) -> Catalog {
        let cells = self
            .slots
            .iter()
            .map(|_| self.weeks.iter().map(|_| Cell::Empty).collect())
            .collect();
        Catalog {
            slots: self.slots.clone(),
            weeks: self.weeks.clone(),
            cells,
        }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(writer);

        let mut header = vec![
            COL_SUBJECT,
            COL_TEACHER,
            COL_DAY,
            COL_HOUR,
            COL_EVEN_GROUPS,
            COL_ODD_GROUPS,
            COL_WORKS_EVEN,
            COL_WORKS_ODD,
        ]
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
        header.extend(self.weeks.iter().map(|w| w.number.to_string()));
        csv_writer.write_record(&header)?;

        for (slot_idx, slot) in self.slots.iter().enumerate() {
            let mut record = vec![
                slot.subject.clone(),
                slot.teacher.clone(),
                slot.day.clone(),
                format!(
                    "{}h{:02}-{}h{:02}",
                    slot.hour.start.get() / 60,
                    slot.hour.start.get() % 60,
                    slot.hour.end.get() / 60,
                    slot.hour.end.get() % 60
                ),
                groups_to_expression(&slot.even_groups),
                groups_to_expression(&slot.odd_groups),
                if slot.works_even { "Oui" } else { "Non" }.to_string(),
                if slot.works_odd { "Oui" } else { "Non" }.to_string(),
            ];
            record.extend(self.cells[slot_idx].iter().map(Cell::to_field));
            csv_writer.write_record(&record)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

fn groups_to_expression(groups: &BTreeSet<u32>) -> String {
    if groups.is_empty() {
        return String::new();
    }
    let min = *groups.iter().next().unwrap();
    let max = *groups.iter().next_back().unwrap();
    if groups.len() as u32 == max - min + 1 && (min..=max).all(|g| groups.contains(&g)) {
        if min == max {
            min.to_string()
        } else {
            format!("{} à {}", min, max)
        }
    } else {
        // Non-contiguous sets never arise from this crate's own output, but a
        // hand-edited catalog could have one; fall back to the first value so
        // round-tripping never panics.
        min.to_string()
    }
}
