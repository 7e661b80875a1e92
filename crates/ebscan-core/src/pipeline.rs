//! End-to-end scan run: engine, replicates, calibration and report.

use std::path::PathBuf;

use chrono::Utc;
use ebscan_common::{Error, Result, SCHEMA_VERSION};
use ebscan_config::validate::validate_settings;
use ebscan_config::{ConfigError, ScanData, ScanSettings};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::calibrate::NullDistribution;
use crate::clusters::{most_likely_cluster, top_clusters, ClusterContext, ClusterOptions};
use crate::log_event;
use crate::logging::{event_names, LogContext, Stage};
use crate::report::{InputSummary, ScanReport};
use crate::scan::{EbNegBinModel, Retention, ScanEngine};

/// Where the input and settings came from.
#[derive(Debug, Clone, Default)]
pub struct Provenance {
    pub input_path: Option<PathBuf>,
    pub input_sha256: Option<String>,
    pub settings_source: String,
}

/// Run a complete scan over validated input.
///
/// Settings are checked against the input's dimensions before the engine is
/// built. A missing seed draws one from the OS. Fails with [`Error::Scan`]
/// when no observed window has a finite score.
pub fn run_pipeline(
    data: ScanData,
    settings: &ScanSettings,
    provenance: Provenance,
    ctx: &LogContext,
) -> Result<ScanReport> {
    validate_settings(settings, data.num_times())
        .map_err(|e| ConfigError::from(e).into_settings_error())?;

    let ScanData {
        counts,
        baselines,
        overdispersion,
        zones,
        location_names,
    } = data;

    let input = InputSummary {
        path: provenance.input_path.map(|p| p.display().to_string()),
        sha256: provenance.input_sha256,
        num_times: counts.rows(),
        num_locs: counts.cols(),
        num_zones: zones.len(),
    };
    let max_dur = settings.effective_max_duration(input.num_times);
    let retention = Retention::from_store_everything(settings.store_everything);

    let model = EbNegBinModel::new(baselines, overdispersion, settings.score);
    let mut engine = ScanEngine::new(counts, model, zones, max_dur, retention, settings.num_mcsim);

    let score_name = settings.score.to_string();
    log_event!(
        ctx,
        INFO,
        event_names::SCAN_STARTED,
        Stage::Scan,
        "scanning observed counts",
        zones = input.num_zones,
        max_duration = max_dur,
        score = score_name.as_str()
    );
    engine.run_scan();
    let observed = engine.observed_table();
    let best = observed.best().map_or(f64::NAN, |r| r.score);
    if !best.is_finite() {
        return Err(Error::Scan(format!(
            "no window of {} zones x {} durations produced a finite score",
            input.num_zones, max_dur
        )));
    }
    log_event!(
        ctx,
        INFO,
        event_names::SCAN_FINISHED,
        Stage::Scan,
        "observed scan finished",
        rows = observed.len(),
        best = best
    );

    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    log_event!(
        ctx,
        INFO,
        event_names::MCSIM_STARTED,
        Stage::Simulate,
        "simulating null replicates",
        replicates = settings.num_mcsim
    );
    engine.run_mcsim(&mut rng);
    let simulated = engine.simulated_table();
    log_event!(
        ctx,
        INFO,
        event_names::MCSIM_FINISHED,
        Stage::Simulate,
        "replicates finished",
        replicates = simulated.len()
    );

    let null = NullDistribution::new(&simulated.scores(), settings.gumbel);
    let cluster_ctx = ClusterContext {
        zones: engine.zones(),
        null: &null,
        location_names: location_names.as_deref(),
    };
    let mlc = most_likely_cluster(&observed, &cluster_ctx);
    let clusters = top_clusters(
        &observed,
        &cluster_ctx,
        ClusterOptions {
            limit: settings.top_clusters,
            overlapping: settings.overlapping,
        },
    );
    log_event!(
        ctx,
        INFO,
        event_names::CALIBRATE_FINISHED,
        Stage::Calibrate,
        "calibration finished",
        clusters = clusters.len(),
        mlc_pvalue = mlc
            .as_ref()
            .and_then(|c| c.significance.mc_pvalue)
            .unwrap_or(f64::NAN)
    );

    Ok(ScanReport {
        schema_version: SCHEMA_VERSION.to_string(),
        run_id: ctx.run_id.clone(),
        computed_at: Utc::now(),
        input,
        settings: settings.clone(),
        settings_source: provenance.settings_source,
        max_duration: max_dur,
        observed,
        simulated,
        mlc,
        clusters,
        gumbel: null.gumbel().map(Into::into),
    })
}
