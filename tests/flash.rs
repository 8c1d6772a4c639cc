mod common;

use common::{Flash, Operation, config_with, storage, storage_with};
use n64adv_controller::flash::{CONFIG_VERSION, FlashStorage};
use n64adv_controller::{ConfigStorage, Configuration, Error, LoadOutcome, Snapshot};

use pretty_assertions::assert_eq;

const WORDS: [u8; 4] = [0x0A, 0x21, 0x57, 0x53];
const OTHER_WORDS: [u8; 4] = [0x12, 0x30, 0x83, 0x80];

#[test]
fn save_then_load_is_bit_identical() {
    let mut storage = storage_with(WORDS);
    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::Loaded);
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
    // Loading never touches the reference.
    assert_eq!(config.reference(), Snapshot::zeroed());
}

#[test]
fn erased_flash_has_no_valid_data() {
    let mut storage = storage();
    let mut config = config_with(WORDS);
    assert_eq!(storage.load(&mut config), LoadOutcome::NoValidData);
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
}

#[test]
fn saves_alternate_between_slots() {
    let mut storage = storage();
    let config = config_with(WORDS);

    let mut expected = [None, None];
    for (sequence, slot) in [(0u16, 0usize), (1, 1), (2, 0), (3, 1)] {
        storage.save(&config).unwrap();
        let records = storage.slots().unwrap();
        expected[slot] = Some(sequence);
        assert_eq!(records.map(|r| r.map(|r| r.sequence)), expected);
        assert_eq!(storage.newest().unwrap().map(|(s, _)| s), Some(slot));
    }
    assert_eq!(storage.flash().erases(), 4);
}

#[test]
fn save_erases_then_writes_then_verifies() {
    let mut storage = storage();
    storage.save(&config_with(WORDS)).unwrap();
    assert_eq!(
        storage.flash().operations,
        vec![
            Operation::Read { offset: 0, len: 12 },
            Operation::Read {
                offset: 4096,
                len: 12
            },
            Operation::Erase {
                offset: 0,
                len: 4096
            },
            Operation::Write { offset: 0, len: 12 },
            Operation::Read { offset: 0, len: 12 },
        ]
    );
}

#[test]
fn interrupted_write_keeps_previous_record() {
    let mut storage = storage_with(WORDS);
    // Two slot reads and the erase succeed, the write fails.
    storage.flash_mut().fail_in(3);
    assert_eq!(
        storage.save(&config_with(OTHER_WORDS)),
        Err(Error::FlashError)
    );
    storage.flash_mut().disable_faults();

    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::Loaded);
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
}

#[test]
fn interrupted_erase_keeps_previous_record() {
    let mut storage = storage_with(WORDS);
    storage.save(&config_with(OTHER_WORDS)).unwrap();
    storage.flash_mut().fail_in(2);
    assert_eq!(storage.save(&config_with(WORDS)), Err(Error::FlashError));
    storage.flash_mut().disable_faults();

    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::Loaded);
    assert_eq!(config.snapshot(), Snapshot::from_words(OTHER_WORDS));
}

#[test]
fn stuck_bits_fail_verification() {
    let mut storage = storage_with(WORDS);
    storage.flash_mut().write_mask = 0xFE;
    assert_eq!(
        storage.save(&config_with(OTHER_WORDS)),
        Err(Error::VerifyFailed)
    );
    storage.flash_mut().write_mask = 0xFF;

    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::Loaded);
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
}

#[test]
fn other_version_is_not_loaded() {
    let mut flash = Flash::new(2);
    flash.put_record(0, CONFIG_VERSION + 1, 0, OTHER_WORDS);
    let mut storage = FlashStorage::new(flash, 0).unwrap();

    let mut config = config_with(WORDS);
    assert_eq!(storage.load(&mut config), LoadOutcome::NoValidData);
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
}

#[test]
fn stored_values_above_maximum_load_clamped() {
    let mut flash = Flash::new(2);
    // Deblur 3, both output format bits and gamma 15.
    flash.put_record(0, CONFIG_VERSION, 0, [0x06, 0x33, 0xF3, 0x50]);
    let mut storage = FlashStorage::new(flash, 0).unwrap();

    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::Loaded);
    assert_eq!(config.snapshot().words(), [0x04, 0x32, 0x83, 0x50]);
}

#[test]
fn newer_record_of_other_version_fails_closed() {
    let mut flash = Flash::new(2);
    flash.put_record(0, CONFIG_VERSION, 4, WORDS);
    flash.put_record(1, CONFIG_VERSION + 1, 5, OTHER_WORDS);
    let mut storage = FlashStorage::new(flash, 0).unwrap();

    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::NoValidData);
}

#[test]
fn newest_sequence_wins_across_wrap() {
    let mut flash = Flash::new(2);
    flash.put_record(0, CONFIG_VERSION, u16::MAX, WORDS);
    flash.put_record(1, CONFIG_VERSION, 0, OTHER_WORDS);
    let mut storage = FlashStorage::new(flash, 0).unwrap();

    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::Loaded);
    assert_eq!(config.snapshot(), Snapshot::from_words(OTHER_WORDS));

    // The next save replaces the older slot.
    storage.save(&config_with(WORDS)).unwrap();
    let records = storage.slots().unwrap();
    assert_eq!(records[0].map(|r| r.sequence), Some(1));
}

#[test]
fn corrupt_newest_record_falls_back_to_older() {
    let mut storage = storage_with(WORDS);
    storage.save(&config_with(OTHER_WORDS)).unwrap();
    storage.flash_mut().buf[4096 + 2] ^= 0x10;

    let mut config = Configuration::new();
    assert_eq!(storage.load(&mut config), LoadOutcome::Loaded);
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
}

#[test]
fn read_failure_is_unavailable() {
    let mut storage = FlashStorage::new(Flash::new_with_fault(2, 0), 0).unwrap();
    let mut config = config_with(WORDS);
    assert_eq!(storage.load(&mut config), LoadOutcome::Unavailable);
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
    assert_eq!(storage.save(&config), Err(Error::StorageUnavailable));
    assert_eq!(storage.flash().erases(), 0);
}

#[test]
fn unusable_geometry_is_rejected() {
    assert_eq!(
        FlashStorage::new(Flash::new(1), 0).err(),
        Some(Error::StorageUnavailable)
    );
    assert_eq!(
        FlashStorage::new(Flash::new(3), 0x100).err(),
        Some(Error::StorageUnavailable)
    );
    assert!(FlashStorage::new(Flash::new(3), 0x1000).is_ok());
}

#[test]
fn missing_storage_is_unavailable() {
    let mut storage: Option<FlashStorage<Flash>> = None;
    let mut config = config_with(WORDS);
    assert_eq!(storage.load(&mut config), LoadOutcome::Unavailable);
    assert_eq!(storage.save(&config), Err(Error::StorageUnavailable));
    assert_eq!(config.snapshot(), Snapshot::from_words(WORDS));
}
