//! Persisting the configuration words to NOR flash.
//!
//! Two erase sectors hold one record each. A record is
//!
//! | Offset | Size | Content                              |
//! |--------|------|--------------------------------------|
//! | 0      | 1    | format version, [`CONFIG_VERSION`]   |
//! | 1      | 4    | configuration words, category order  |
//! | 5      | 2    | sequence number, little endian       |
//! | 7      | 4    | CRC-32 of bytes 0..7, little endian  |
//!
//! padded with `0xFF` to the device's write granularity. A save always rewrites the
//! sector that does *not* hold the newest valid record, so an interrupted save
//! leaves the previous configuration loadable.

use embedded_storage::nor_flash::NorFlash;

use crate::Error;
use crate::settings::{Configuration, Snapshot};

/// Format version written with every record.
///
/// Records with a valid checksum but another version are not migrated.
pub const CONFIG_VERSION: u8 = 3;

const RECORD_LEN: usize = 11;
const CHECKSUM_OFFSET: usize = 7;
const MAX_RECORD_SPAN: usize = 64;
const SLOTS: usize = 2;

/// Result of trying to restore the configuration from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadOutcome {
    /// A record was read and copied into the configuration.
    Loaded,
    /// Storage works but holds no record of the current version.
    NoValidData,
    /// No usable storage device.
    Unavailable,
}

/// Non-volatile home of the configuration words.
pub trait ConfigStorage {
    /// Copy the newest stored record into `config`.
    ///
    /// `config` is untouched unless [`LoadOutcome::Loaded`] is returned. The
    /// reference copy is never touched; the caller marks it.
    fn load(&mut self, config: &mut Configuration) -> LoadOutcome;

    /// Store the live words of `config`.
    ///
    /// # Errors
    ///
    /// - [`Error::StorageUnavailable`] if there is no storage device or its slots
    ///   cannot be read.
    /// - [`Error::FlashError`] if the device failed to erase, write or read back.
    /// - [`Error::VerifyFailed`] if the record did not read back identically.
    ///
    /// On error the previously stored record is still the one that loads.
    fn save(&mut self, config: &Configuration) -> Result<(), Error>;
}

/// Absent storage: loads report unavailable and saves are refused.
impl<S: ConfigStorage> ConfigStorage for Option<S> {
    fn load(&mut self, config: &mut Configuration) -> LoadOutcome {
        match self {
            Some(storage) => storage.load(config),
            None => LoadOutcome::Unavailable,
        }
    }

    fn save(&mut self, config: &Configuration) -> Result<(), Error> {
        match self {
            Some(storage) => storage.save(config),
            None => Err(Error::StorageUnavailable),
        }
    }
}

/// A record found in one of the two slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StoredRecord {
    /// Format version the record was written with.
    pub version: u8,
    /// Sequence number, incremented (wrapping) with every save.
    pub sequence: u16,
    /// The stored configuration words.
    pub snapshot: Snapshot,
}

impl StoredRecord {
    fn encode(&self, buf: &mut [u8]) {
        buf.fill(0xFF);
        buf[0] = self.version;
        buf[1..5].copy_from_slice(&self.snapshot.words());
        buf[5..7].copy_from_slice(&self.sequence.to_le_bytes());
        let checksum = crc32(&buf[..CHECKSUM_OFFSET]);
        buf[CHECKSUM_OFFSET..RECORD_LEN].copy_from_slice(&checksum.to_le_bytes());
    }

    /// Parse a record, returning `None` for an erased slot or a bad checksum.
    fn decode(buf: &[u8]) -> Option<Self> {
        let stored = u32::from_le_bytes([buf[7], buf[8], buf[9], buf[10]]);
        if crc32(&buf[..CHECKSUM_OFFSET]) != stored {
            return None;
        }
        Some(Self {
            version: buf[0],
            snapshot: Snapshot::from_words([buf[1], buf[2], buf[3], buf[4]]),
            sequence: u16::from_le_bytes([buf[5], buf[6]]),
        })
    }

    /// Whether this record was written after `other`, allowing for wrap-around.
    pub fn is_newer_than(&self, other: &StoredRecord) -> bool {
        (self.sequence.wrapping_sub(other.sequence) as i16) > 0
    }
}

/// [`ConfigStorage`] on two erase sectors of a NOR flash device.
#[derive(Debug)]
pub struct FlashStorage<F> {
    flash: F,
    base: u32,
}

impl<F: NorFlash> FlashStorage<F> {
    /// Use the two erase sectors starting at `base`.
    ///
    /// # Errors
    ///
    /// [`Error::StorageUnavailable`] if `base` is not sector aligned, the device is
    /// too small or its write granularity cannot hold a record.
    pub fn new(flash: F, base: u32) -> Result<Self, Error> {
        let span = Self::record_span();
        let end = base as usize + SLOTS * F::ERASE_SIZE;
        if base as usize % F::ERASE_SIZE != 0
            || end > flash.capacity()
            || span > MAX_RECORD_SPAN
            || span > F::ERASE_SIZE
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("flash at {=u32:#x} cannot hold configuration slots", base);
            return Err(Error::StorageUnavailable);
        }
        Ok(Self { flash, base })
    }

    /// The wrapped flash device.
    pub fn flash(&self) -> &F {
        &self.flash
    }

    /// Mutable access to the wrapped flash device.
    pub fn flash_mut(&mut self) -> &mut F {
        &mut self.flash
    }

    /// Release the wrapped flash device.
    pub fn into_inner(self) -> F {
        self.flash
    }

    /// Bytes occupied by one record once padded for reading and writing.
    pub fn record_span() -> usize {
        let align = F::WRITE_SIZE.max(F::READ_SIZE).max(1);
        RECORD_LEN.div_ceil(align) * align
    }

    fn slot_offset(&self, slot: usize) -> u32 {
        self.base + (slot * F::ERASE_SIZE) as u32
    }

    /// Read both slots, returning the records with a valid checksum.
    ///
    /// # Errors
    ///
    /// [`Error::FlashError`] if the device fails to read.
    pub fn slots(&mut self) -> Result<[Option<StoredRecord>; SLOTS], Error> {
        let span = Self::record_span();
        let mut buf = [0xFF; MAX_RECORD_SPAN];
        let mut records = [None; SLOTS];
        for (slot, record) in records.iter_mut().enumerate() {
            let offset = self.slot_offset(slot);
            self.flash
                .read(offset, &mut buf[..span])
                .map_err(|_| Error::FlashError)?;
            *record = StoredRecord::decode(&buf[..span]);
        }
        Ok(records)
    }

    /// The slot index and record written last, if any slot is valid.
    ///
    /// # Errors
    ///
    /// [`Error::FlashError`] if the device fails to read.
    pub fn newest(&mut self) -> Result<Option<(usize, StoredRecord)>, Error> {
        let mut newest: Option<(usize, StoredRecord)> = None;
        for (slot, record) in self.slots()?.into_iter().enumerate() {
            let Some(record) = record else { continue };
            match newest {
                Some((_, ref best)) if !record.is_newer_than(best) => {}
                _ => newest = Some((slot, record)),
            }
        }
        Ok(newest)
    }

    fn write_record(&mut self, slot: usize, record: &StoredRecord) -> Result<(), Error> {
        let span = Self::record_span();
        let offset = self.slot_offset(slot);
        let mut buf = [0xFF; MAX_RECORD_SPAN];
        record.encode(&mut buf[..span]);

        self.flash
            .erase(offset, offset + F::ERASE_SIZE as u32)
            .map_err(|_| Error::FlashError)?;
        self.flash
            .write(offset, &buf[..span])
            .map_err(|_| Error::FlashError)?;

        let mut check = [0xFF; MAX_RECORD_SPAN];
        self.flash
            .read(offset, &mut check[..span])
            .map_err(|_| Error::FlashError)?;
        if check[..span] != buf[..span] {
            return Err(Error::VerifyFailed);
        }
        Ok(())
    }
}

impl<F: NorFlash> ConfigStorage for FlashStorage<F> {
    fn load(&mut self, config: &mut Configuration) -> LoadOutcome {
        match self.newest() {
            Ok(Some((_, record))) if record.version == CONFIG_VERSION => {
                config.load_snapshot(record.snapshot);
                LoadOutcome::Loaded
            }
            Ok(Some((_, _record))) => {
                #[cfg(feature = "defmt")]
                defmt::info!(
                    "stored configuration has version {}, expected {}",
                    _record.version,
                    CONFIG_VERSION
                );
                LoadOutcome::NoValidData
            }
            Ok(None) => LoadOutcome::NoValidData,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("reading configuration slots failed");
                LoadOutcome::Unavailable
            }
        }
    }

    fn save(&mut self, config: &Configuration) -> Result<(), Error> {
        // Slots that cannot be read are reported like missing storage, as on load.
        let newest = self.newest().map_err(|_| Error::StorageUnavailable)?;
        let (slot, sequence) = match newest {
            Some((slot, record)) => ((slot + 1) % SLOTS, record.sequence.wrapping_add(1)),
            None => (0, 0),
        };
        let record = StoredRecord {
            version: CONFIG_VERSION,
            sequence,
            snapshot: config.snapshot(),
        };
        let result = self.write_record(slot, &record);
        #[cfg(feature = "defmt")]
        match result {
            Ok(()) => defmt::info!("configuration saved to slot {} (#{})", slot, sequence),
            Err(e) => defmt::warn!("saving configuration to slot {} failed: {}", slot, e),
        }
        result
    }
}

/// CRC-32 with the IEEE 802.3 polynomial, as used by zlib.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xEDB8_8320;
            } else {
                crc >>= 1;
            }
        }
    }
    !crc
}
