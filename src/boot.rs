//! Choosing the configuration the converter starts with.

use crate::flash::{ConfigStorage, LoadOutcome};
use crate::info::VideoInfo;
use crate::settings::layout::{MUTE_LATCH, SHOW_LOGO, SHOW_OSD};
use crate::settings::{Configuration, Jumpers, apply_jumpers, load_defaults};

/// Where the boot configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootSource {
    /// Fallback mode or a forced state: defaults only, storage and jumpers ignored.
    Fallback,
    /// Stored configuration with the jumpers layered on top.
    Flash,
    /// Defaults with the jumpers layered on top, storage had nothing usable.
    Defaults,
}

/// Build the boot configuration.
///
/// 1. A fallback signal (info register or a non-zero forced state) selects the
///    compiled-in defaults and nothing else.
/// 2. Otherwise the stored configuration is loaded and becomes the reference.
///    If that fails, every word is cleared and the defaults are loaded.
/// 3. The jumpers are applied on top.
///
/// The menu always starts closed, unmuted and without logo.
pub fn resolve<S: ConfigStorage>(
    config: &mut Configuration,
    storage: &mut S,
    info: VideoInfo,
    forced_state: u32,
    jumpers: Jumpers,
) -> BootSource {
    config.clear_all();

    if info.fallback() || forced_state != 0 {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "fallback boot (info {=u8:#x}, forced {=u32:#x})",
            info.raw(),
            forced_state
        );
        load_defaults(config);
        clear_menu_flags(config);
        return BootSource::Fallback;
    }

    let source = match storage.load(config) {
        LoadOutcome::Loaded => {
            clear_menu_flags(config);
            config.mark_reference();
            BootSource::Flash
        }
        _outcome => {
            #[cfg(feature = "defmt")]
            defmt::info!("no stored configuration ({}), loading defaults", _outcome);
            config.clear_all();
            load_defaults(config);
            BootSource::Defaults
        }
    };

    apply_jumpers(config, jumpers);
    clear_menu_flags(config);

    #[cfg(feature = "defmt")]
    defmt::info!("boot configuration from {}: {}", source, config.snapshot());
    source
}

fn clear_menu_flags(config: &mut Configuration) {
    config.clear_flag(SHOW_OSD);
    config.clear_flag(SHOW_LOGO);
    config.clear_flag(MUTE_LATCH);
}
