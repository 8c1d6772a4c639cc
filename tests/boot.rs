mod common;

use common::{Flash, storage, storage_with};
use n64adv_controller::boot::resolve;
use n64adv_controller::flash::{CONFIG_VERSION, FlashStorage};
use n64adv_controller::info::VideoInfo;
use n64adv_controller::settings::Jumpers;
use n64adv_controller::{BootSource, Configuration, Snapshot};

use pretty_assertions::assert_eq;

const DEFAULTS: [u8; 4] = [0x02, 0x00, 0x50, 0x50];
/// RGsB, 100% scanlines, no bob, line doubling.
const JUMPERS: u8 = 0b10_1101;
/// Menu open, logo shown and muted at save time.
const STORED: [u8; 4] = [0xE9, 0x12, 0x76, 0x20];

fn boot_with(
    storage: &mut impl n64adv_controller::ConfigStorage,
    info: u8,
    forced_state: u32,
) -> (Configuration, BootSource) {
    let mut config = Configuration::new();
    let source = resolve(
        &mut config,
        storage,
        VideoInfo::from_register(info),
        forced_state,
        Jumpers::from_raw(JUMPERS),
    );
    (config, source)
}

#[test]
fn fallback_mode_uses_defaults_only() {
    let (config, source) = boot_with(&mut storage_with(STORED), 0b100, 0);
    assert_eq!(source, BootSource::Fallback);
    assert_eq!(config.snapshot(), Snapshot::from_words(DEFAULTS));
    assert_eq!(config.reference(), Snapshot::zeroed());
}

#[test]
fn forced_state_uses_defaults_only() {
    let (config, source) = boot_with(&mut storage_with(STORED), 0, 0x0000_0100);
    assert_eq!(source, BootSource::Fallback);
    assert_eq!(config.snapshot(), Snapshot::from_words(DEFAULTS));
}

#[test]
fn stored_configuration_with_jumpers() {
    let (config, source) = boot_with(&mut storage_with(STORED), 0, 0);
    assert_eq!(source, BootSource::Flash);
    // Menu flags cleared, then the jumpers replace the video flags and both
    // scanline strengths.
    assert_eq!(
        config.snapshot(),
        Snapshot::from_words([0x09, 0x21, 0x77, 0x23])
    );
    assert_eq!(
        config.reference(),
        Snapshot::from_words([0x09, 0x12, 0x76, 0x20])
    );
    assert!(config.has_changes());
}

#[test]
fn empty_storage_uses_defaults_with_jumpers() {
    let (config, source) = boot_with(&mut storage(), 0, 0);
    assert_eq!(source, BootSource::Defaults);
    assert_eq!(
        config.snapshot(),
        Snapshot::from_words([0x02, 0x21, 0x53, 0x53])
    );
    assert_eq!(config.reference(), Snapshot::zeroed());
}

#[test]
fn other_version_uses_defaults() {
    let mut flash = Flash::new(2);
    flash.put_record(0, CONFIG_VERSION - 1, 9, STORED);
    let mut storage = FlashStorage::new(flash, 0).unwrap();

    let (config, source) = boot_with(&mut storage, 0, 0);
    assert_eq!(source, BootSource::Defaults);
    assert_eq!(
        config.snapshot(),
        Snapshot::from_words([0x02, 0x21, 0x53, 0x53])
    );
}

#[test]
fn missing_storage_uses_defaults() {
    let mut storage: Option<FlashStorage<Flash>> = None;
    let (config, source) = boot_with(&mut storage, 0b010, 0);
    assert_eq!(source, BootSource::Defaults);
    assert_eq!(
        config.snapshot(),
        Snapshot::from_words([0x02, 0x21, 0x53, 0x53])
    );
}

#[test]
fn boot_never_writes_storage() {
    let mut storage = storage();
    boot_with(&mut storage, 0, 0);
    assert_eq!(storage.flash().erases(), 0);
    assert_eq!(storage.slots().unwrap(), [None, None]);
}
