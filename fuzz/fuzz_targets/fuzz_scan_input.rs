//! Fuzz target for scan input parsing and validation.
//!
//! Anything that validates must scan without panicking; the only error left
//! is a scan whose scores all overflow.

#![no_main]

use ebscan_common::Error;
use ebscan_config::{ScanData, ScanInput, ScanSettings};
use ebscan_core::logging::LogContext;
use ebscan_core::pipeline::{run_pipeline, Provenance};
use libfuzzer_sys::fuzz_target;

const MAX_CELLS: usize = 4096;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = serde_json::from_slice::<ScanInput>(data) else {
        return;
    };
    let Ok(data) = ScanData::try_from(input) else {
        return;
    };
    if data.num_times() * data.num_locs() > MAX_CELLS || data.zones.ids().len() > MAX_CELLS {
        return;
    }

    let settings = ScanSettings {
        num_mcsim: 2,
        seed: Some(0),
        store_everything: true,
        ..Default::default()
    };
    let ctx = LogContext::new("run-fuzz");
    match run_pipeline(data, &settings, Provenance::default(), &ctx) {
        Ok(report) => assert_eq!(report.observed.len(), report.windows_per_pass()),
        Err(Error::Scan(_)) => {}
        Err(err) => panic!("validated input failed to scan: {err}"),
    }
});
