//! Fuzz target for settings.json parsing.
//!
//! Parsing and range checks should only ever return errors.

#![no_main]

use ebscan_config::validate::validate_settings;
use ebscan_config::ScanSettings;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(settings) = serde_json::from_slice::<ScanSettings>(data) {
        for num_times in [0, 1, 7] {
            if validate_settings(&settings, num_times).is_ok() {
                let d = settings.effective_max_duration(num_times);
                assert!(d >= 1 && d <= num_times);
            }
        }
    }
});
