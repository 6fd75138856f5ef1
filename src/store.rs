//! Store Module
//!
//! Owns the three top-level sequences and persists them to a single file.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Header (6 bytes)                            │
//! │   Magic: "SQST" (4) | Version: u16 LE (2)   │
//! ├─────────────────────────────────────────────┤
//! │ Articles: Sequence<Article>                 │
//! │ Orders:   Sequence<Order>                   │
//! │ Users:    Sequence<User>                    │
//! ├─────────────────────────────────────────────┤
//! │ Footer (4 bytes)                            │
//! │   CRC32 of every byte between header/footer │
//! └─────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{Config, LoadPolicy};
use crate::error::{Result, SeqError};
use crate::model::{Article, Order, User};
use crate::sequence::Sequence;

/// Magic bytes identifying a store file
pub const MAGIC: &[u8; 4] = b"SQST";

/// Current store format version
pub const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2)
pub const HEADER_SIZE: usize = 6;

/// Footer size: CRC32 (4)
pub const FOOTER_SIZE: usize = 4;

// =============================================================================
// Sections
// =============================================================================

/// The top-level sequences, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Articles,
    Orders,
    Users,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Articles, Section::Orders, Section::Users];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Articles => "articles",
            Section::Orders => "orders",
            Section::Users => "users",
        };
        f.write_str(name)
    }
}

/// What a load managed to recover
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Section whose read failed; later sections were not read
    pub stopped_at: Option<Section>,

    /// Error that stopped the load, if any
    pub error: Option<String>,

    /// Whether the footer CRC matched (false when it was never checked)
    pub checksum_ok: bool,

    /// Bytes followed the footer
    pub trailing_data: bool,
}

impl LoadReport {
    fn clean() -> Self {
        Self {
            stopped_at: None,
            error: None,
            checksum_ok: true,
            trailing_data: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stopped_at.is_none() && self.checksum_ok && !self.trailing_data
    }

    fn note(&mut self, msg: String) {
        self.error = Some(match self.error.take() {
            Some(prev) => format!("{}; {}", prev, msg),
            None => msg,
        });
    }
}

// =============================================================================
// Store
// =============================================================================

/// Articles, orders and users owned together and saved as one file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Store {
    pub articles: Sequence<Article>,
    pub orders: Sequence<Order>,
    pub users: Sequence<User>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `config.data_file` if it exists, otherwise start empty
    pub fn open_or_create(config: &Config) -> Result<(Self, LoadReport)> {
        if !config.data_file.exists() {
            info!(path = %config.data_file.display(), "no store file, starting empty");
            return Ok((Self::new(), LoadReport::clean()));
        }
        Self::load(&config.data_file, config.load_policy)
    }

    /// Save to `config.data_file`
    pub fn save(&self, config: &Config) -> Result<()> {
        self.save_to(&config.data_file, config.sync_on_save)
    }

    /// Write the store to `path` through a temporary sibling file.
    ///
    /// The target is only replaced once the whole file has been written.
    pub fn save_to(&self, path: &Path, sync: bool) -> Result<()> {
        let tmp_path = temp_path(path);

        if let Err(err) = self.write_and_replace(&tmp_path, path, sync) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err);
        }

        info!(
            path = %path.display(),
            articles = self.articles.len(),
            orders = self.orders.len(),
            users = self.users.len(),
            "store saved"
        );
        Ok(())
    }

    fn write_and_replace(&self, tmp_path: &Path, path: &Path, sync: bool) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(tmp_path)?;
        let mut writer = BufWriter::new(file);

        self.write_to(&mut writer)?;
        writer.flush()?;

        let file = writer
            .into_inner()
            .map_err(|e| SeqError::Io(e.into_error()))?;
        if sync {
            file.sync_all()?;
        }
        drop(file);

        fs::rename(tmp_path, path)?;
        Ok(())
    }

    /// Disable the article at `index` instead of removing it.
    ///
    /// Purchases refer to articles by position, so the slot has to stay.
    /// Returns `None` when `index` is out of range.
    pub fn disable_article(&mut self, index: usize) -> Option<&Article> {
        let article = self.articles.get_mut(index)?;
        article.meta.set_disabled(true);
        Some(article)
    }

    /// Read a store file
    pub fn load(path: &Path, policy: LoadPolicy) -> Result<(Self, LoadReport)> {
        let file = File::open(path)?;
        let (store, report) = Self::read_from(&mut BufReader::new(file), policy)?;

        if report.is_complete() {
            info!(
                path = %path.display(),
                articles = store.articles.len(),
                orders = store.orders.len(),
                users = store.users.len(),
                "store loaded"
            );
        } else {
            warn!(path = %path.display(), ?report, "store loaded partially");
        }
        Ok((store, report))
    }

    /// Write header, the three sequences, and the CRC footer
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;

        let mut body = CrcWriter::new(writer);
        self.articles.write(&mut body)?;
        self.orders.write(&mut body)?;
        self.users.write(&mut body)?;
        let crc = body.finalize();

        writer.write_all(&crc.to_le_bytes())?;
        Ok(())
    }

    /// Read a store from `reader`.
    ///
    /// Header problems always fail. Past the header, `Strict` fails on the
    /// first error; `Partial` keeps whatever was decoded, including the
    /// elements of a section that failed mid-way, and records where it
    /// stopped in the report. A missing footer, trailing bytes and a CRC
    /// mismatch are likewise only reported under `Partial`.
    pub fn read_from<R: Read>(reader: &mut R, policy: LoadPolicy) -> Result<(Self, LoadReport)> {
        read_header(reader)?;

        let mut store = Self::new();
        let mut report = LoadReport::clean();
        let mut body = CrcReader::new(reader);

        for section in Section::ALL {
            let outcome = match section {
                Section::Articles => store.articles.read(&mut body),
                Section::Orders => store.orders.read(&mut body),
                Section::Users => store.users.read(&mut body),
            };

            if let Err(err) = outcome {
                if policy == LoadPolicy::Strict {
                    return Err(err);
                }
                warn!(%section, error = %err, "keeping partial store");
                report.stopped_at = Some(section);
                report.note(err.to_string());
                report.checksum_ok = false;
                return Ok((store, report));
            }
        }

        let computed = body.finalize();
        let mut footer = [0u8; FOOTER_SIZE];
        if let Err(err) = reader.read_exact(&mut footer) {
            if err.kind() != io::ErrorKind::UnexpectedEof {
                return Err(SeqError::Io(err));
            }
            let msg = "truncated footer".to_string();
            if policy == LoadPolicy::Strict {
                return Err(SeqError::Corrupt(msg));
            }
            warn!("{}, checksum not verified", msg);
            report.note(msg);
            report.checksum_ok = false;
            return Ok((store, report));
        }
        let stored = u32::from_le_bytes(footer);

        let mut trailing = [0u8; 1];
        if reader.read(&mut trailing)? != 0 {
            let msg = "trailing bytes after footer".to_string();
            if policy == LoadPolicy::Strict {
                return Err(SeqError::Corrupt(msg));
            }
            warn!("{}", msg);
            report.note(msg);
            report.trailing_data = true;
        }

        if stored != computed {
            let msg = format!(
                "checksum mismatch: stored {:08x}, computed {:08x}",
                stored, computed
            );
            if policy == LoadPolicy::Strict {
                return Err(SeqError::Corrupt(msg));
            }
            warn!("{}", msg);
            report.note(msg);
            report.checksum_ok = false;
        }

        Ok((store, report))
    }
}

fn read_header<R: Read>(reader: &mut R) -> Result<()> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            SeqError::Corrupt("truncated header".to_string())
        } else {
            SeqError::Io(e)
        }
    })?;

    if &header[0..4] != MAGIC {
        return Err(SeqError::Corrupt(format!(
            "invalid magic: expected SQST, got {:?}",
            &header[0..4]
        )));
    }

    let version = u16::from_le_bytes([header[4], header[5]]);
    if version != VERSION {
        return Err(SeqError::Corrupt(format!(
            "unsupported store version: {}",
            version
        )));
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

// =============================================================================
// Checksumming adapters
// =============================================================================

struct CrcWriter<'a, W: Write> {
    inner: &'a mut W,
    hasher: crc32fast::Hasher,
}

impl<'a, W: Write> CrcWriter<'a, W> {
    fn new(inner: &'a mut W) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
        }
    }

    fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

impl<W: Write> Write for CrcWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct CrcReader<'a, R: Read> {
    inner: &'a mut R,
    hasher: crc32fast::Hasher,
}

impl<'a, R: Read> CrcReader<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Self {
            inner,
            hasher: crc32fast::Hasher::new(),
        }
    }

    fn finalize(self) -> u32 {
        self.hasher.finalize()
    }
}

impl<R: Read> Read for CrcReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}
