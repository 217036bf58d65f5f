//! GPS fixes from an NMEA 0183 stream file.
//!
//! A GPS daemon (or `gpspipe -r > file`) appends sentences to a file. Each
//! read looks at the tail of that file and takes the most recent `RMC` or
//! `GGA` sentence. Reading a regular file never blocks, so this is safe to
//! call from the UI loop.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::debug;

use pasitos_types::Fix;

/// How much of the end of the file is scanned for sentences.
const TAIL_BYTES: u64 = 8 * 1024;

/// What a single sentence says about the fix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sentence {
    /// The receiver has a position.
    Fix(Fix),
    /// The receiver reports no usable position.
    NoFix,
}

/// Reads the current fix from an NMEA stream file.
#[derive(Debug, Clone)]
pub struct NmeaLocation {
    path: PathBuf,
    max_age: Duration,
}

impl NmeaLocation {
    /// Read fixes from `path`, ignoring a file older than `max_age`.
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    /// The file being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The latest fix, or `None` if the file is missing, stale or the
    /// receiver reports no fix.
    pub fn current_fix(&self) -> Option<Fix> {
        match self.read_tail() {
            Ok(Some(text)) => latest_fix(&text),
            Ok(None) => None,
            Err(e) => {
                debug!("Cannot read NMEA from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn read_tail(&self) -> std::io::Result<Option<String>> {
        let mut file = File::open(&self.path)?;
        let metadata = file.metadata()?;

        let age = SystemTime::now()
            .duration_since(metadata.modified()?)
            .unwrap_or(Duration::ZERO);
        if age > self.max_age {
            debug!("NMEA file is stale ({}s old)", age.as_secs());
            return Ok(None);
        }

        let start = metadata.len().saturating_sub(TAIL_BYTES);
        file.seek(SeekFrom::Start(start))?;
        let mut buf = Vec::with_capacity((metadata.len() - start) as usize);
        file.read_to_end(&mut buf)?;
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// The most recent fix decision in a block of NMEA text.
///
/// Walks the lines backwards and stops at the first `RMC` or `GGA`
/// sentence that parses. A trailing partial line is skipped by the
/// checksum or field count checks.
pub fn latest_fix(text: &str) -> Option<Fix> {
    text.lines()
        .rev()
        .find_map(parse_sentence)
        .and_then(|sentence| match sentence {
            Sentence::Fix(fix) => Some(fix),
            Sentence::NoFix => None,
        })
}

/// Parse one NMEA sentence.
///
/// Returns `None` for sentences that say nothing about the position
/// (other types, bad checksums, truncated lines).
pub fn parse_sentence(line: &str) -> Option<Sentence> {
    let line = line.trim();
    let body = line.strip_prefix('$')?;

    let body = match body.split_once('*') {
        Some((data, checksum)) => {
            let expected = u8::from_str_radix(checksum.get(..2)?, 16).ok()?;
            if nmea_checksum(data) != expected {
                return None;
            }
            data
        }
        None => body,
    };

    let fields: Vec<&str> = body.split(',').collect();
    let kind = fields.first()?;
    // Talker ID (GP, GN, GL, GA, ...) followed by the sentence type
    if kind.len() != 5 || !kind.is_ascii() {
        return None;
    }

    match kind.get(2..)? {
        "RMC" => parse_rmc(&fields),
        "GGA" => parse_gga(&fields),
        _ => None,
    }
}

/// `$xxRMC,time,status,lat,N/S,lon,E/W,...`
fn parse_rmc(fields: &[&str]) -> Option<Sentence> {
    if fields.len() < 7 {
        return None;
    }
    if fields[2] != "A" {
        return Some(Sentence::NoFix);
    }
    position(fields[3], fields[4], fields[5], fields[6]).map(Sentence::Fix)
}

/// `$xxGGA,time,lat,N/S,lon,E/W,quality,...`
fn parse_gga(fields: &[&str]) -> Option<Sentence> {
    if fields.len() < 7 {
        return None;
    }
    match fields[6].parse::<u8>() {
        Ok(0) | Err(_) => Some(Sentence::NoFix),
        Ok(_) => position(fields[2], fields[3], fields[4], fields[5]).map(Sentence::Fix),
    }
}

fn position(lat: &str, ns: &str, lon: &str, ew: &str) -> Option<Fix> {
    let mut latitude = degrees(lat, 2)?;
    let mut longitude = degrees(lon, 3)?;
    match ns {
        "N" => {}
        "S" => latitude = -latitude,
        _ => return None,
    }
    match ew {
        "E" => {}
        "W" => longitude = -longitude,
        _ => return None,
    }
    Fix::new(latitude, longitude).ok()
}

/// Convert `ddmm.mmmm` (or `dddmm.mmmm`) to decimal degrees.
fn degrees(value: &str, degree_digits: usize) -> Option<f64> {
    if value.len() <= degree_digits || !value.is_char_boundary(degree_digits) {
        return None;
    }
    let (deg, min) = value.split_at(degree_digits);
    let deg: f64 = deg.parse().ok()?;
    let min: f64 = min.parse().ok()?;
    if !(0.0..60.0).contains(&min) {
        return None;
    }
    Some(deg + min / 60.0)
}

fn nmea_checksum(data: &str) -> u8 {
    data.bytes().fold(0, |acc, b| acc ^ b)
}
