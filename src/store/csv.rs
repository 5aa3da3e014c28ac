use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tempfile::NamedTempFile;

use super::BookingStore;
use crate::errors::AppError;
use crate::models::{Booking, CSV_COLUMNS};

/// Bookings mirrored to a single CSV file, rewritten in full on every change.
pub struct CsvBookingStore {
    path: PathBuf,
    bookings: Vec<Booking>,
}

impl CsvBookingStore {
    pub fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let bookings = load(&path)?;
        Ok(Self { path, bookings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn commit(&mut self, next: Vec<Booking>) -> Result<(), AppError> {
        save(&self.path, &next)?;
        self.bookings = next;
        Ok(())
    }
}

impl BookingStore for CsvBookingStore {
    fn all(&self) -> &[Booking] {
        &self.bookings
    }

    fn insert(&mut self, booking: Booking) -> Result<(), AppError> {
        let mut next = self.bookings.clone();
        next.push(booking);
        self.commit(next)
    }

    fn update(&mut self, booking: Booking) -> Result<bool, AppError> {
        let Some(idx) = self
            .bookings
            .iter()
            .position(|b| b.booking_id == booking.booking_id)
        else {
            return Ok(false);
        };

        let mut next = self.bookings.clone();
        next[idx] = booking;
        self.commit(next)?;
        Ok(true)
    }

    fn remove(&mut self, booking_id: i64) -> Result<Option<Booking>, AppError> {
        let Some(idx) = self
            .bookings
            .iter()
            .position(|b| b.booking_id == booking_id)
        else {
            return Ok(None);
        };

        let mut next = self.bookings.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        Ok(Some(removed))
    }
}

/// Reads every booking from `path`. A missing file is an empty store.
pub fn load(path: &Path) -> anyhow::Result<Vec<Booking>> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "bookings file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open {}", path.display()));
        }
    };

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let mut bookings = vec![];
    for (idx, row) in reader.deserialize::<Booking>().enumerate() {
        // +2: header row and 1-based line numbers
        let booking = row.with_context(|| {
            format!("invalid booking on line {} of {}", idx + 2, path.display())
        })?;
        bookings.push(booking);
    }

    Ok(bookings)
}

/// Rewrites `path` with the header and every booking in column order.
///
/// The rows are written to a sibling temp file which then replaces `path`,
/// so readers never observe a half-written file.
pub fn save(path: &Path, bookings: &[Booking]) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    // temp files are created 0600; the replaced file keeps its own mode
    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        writer.write_record(CSV_COLUMNS)?;
        for booking in bookings {
            writer.serialize(booking)?;
        }
        writer.flush()?;
    }
    tmp.persist(path)?;

    tracing::debug!(path = %path.display(), count = bookings.len(), "bookings saved");
    Ok(())
}
