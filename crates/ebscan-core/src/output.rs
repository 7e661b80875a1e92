//! Rendering a [`ScanReport`] in the CLI output formats.

use std::fmt::Write as _;

use ebscan_common::{OutputFormat, ScanRecord, ScanTable};
use serde::Serialize;

use crate::clusters::Cluster;
use crate::report::ScanReport;

/// One JSONL line: a table row tagged with its table.
#[derive(Serialize)]
struct TableRow<'a> {
    table: &'static str,
    #[serde(flatten)]
    record: &'a ScanRecord,
}

/// Render `report` in `format`.
pub fn render(report: &ScanReport, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Jsonl => render_jsonl(report),
        OutputFormat::Md => Ok(render_markdown(report)),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

fn render_jsonl(report: &ScanReport) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    let tables: [(&'static str, &ScanTable); 2] =
        [("observed", &report.observed), ("simulated", &report.simulated)];
    for (name, table) in tables {
        for record in table {
            out.push_str(&serde_json::to_string(&TableRow {
                table: name,
                record,
            })?);
            out.push('\n');
        }
    }
    Ok(out)
}

fn fmt_pvalue(p: Option<f64>) -> String {
    match p {
        Some(p) if p < 1e-4 => format!("{:.2e}", p),
        Some(p) => format!("{:.4}", p),
        None => "-".to_string(),
    }
}

fn fmt_locations(cluster: &Cluster) -> String {
    match cluster.location_names {
        Some(ref names) => names.join(", "),
        None => cluster
            .locations
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn render_markdown(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# ebscan report");
    let _ = writeln!(out);
    let _ = writeln!(out, "- Run: `{}`", report.run_id);
    let _ = writeln!(out, "- Computed: {}", report.computed_at.to_rfc3339());
    let _ = writeln!(
        out,
        "- Input: {} periods × {} locations, {} zones",
        report.input.num_times, report.input.num_locs, report.input.num_zones
    );
    let _ = writeln!(
        out,
        "- Score: {}, max duration {}, {} replicates",
        report.settings.score,
        report.max_duration,
        report.replicates()
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Most likely cluster");
    let _ = writeln!(out);
    match report.mlc {
        Some(ref mlc) => {
            let _ = writeln!(
                out,
                "Zone {} over the last {} period(s): score {:.4}, p = {}",
                mlc.zone,
                mlc.duration,
                mlc.score,
                fmt_pvalue(mlc.significance.mc_pvalue)
            );
            let _ = writeln!(out);
            let _ = writeln!(out, "Locations: {}", fmt_locations(mlc));
        }
        None => {
            let _ = writeln!(out, "No window was scored.");
        }
    }
    let _ = writeln!(out);

    if !report.clusters.is_empty() {
        let with_gumbel = report
            .clusters
            .iter()
            .any(|c| c.significance.gumbel_pvalue.is_some());
        let _ = writeln!(out, "## Clusters");
        let _ = writeln!(out);
        if with_gumbel {
            let _ = writeln!(out, "| Rank | Zone | Duration | Score | p (MC) | p (Gumbel) | Locations |");
            let _ = writeln!(out, "|---:|---:|---:|---:|---:|---:|---|");
        } else {
            let _ = writeln!(out, "| Rank | Zone | Duration | Score | p (MC) | Locations |");
            let _ = writeln!(out, "|---:|---:|---:|---:|---:|---|");
        }
        for c in &report.clusters {
            let gumbel = if with_gumbel {
                format!(" {} |", fmt_pvalue(c.significance.gumbel_pvalue))
            } else {
                String::new()
            };
            let _ = writeln!(
                out,
                "| {} | {} | {} | {:.4} | {} |{} {} |",
                c.rank,
                c.zone,
                c.duration,
                c.score,
                fmt_pvalue(c.significance.mc_pvalue),
                gumbel,
                fmt_locations(c)
            );
        }
    }

    out
}

fn render_summary(report: &ScanReport) -> String {
    match report.mlc {
        Some(ref mlc) => format!(
            "[{}] mlc zone={} duration={} score={:.4} p={} ({} windows, {} replicates)\n",
            report.run_id,
            mlc.zone,
            mlc.duration,
            mlc.score,
            fmt_pvalue(mlc.significance.mc_pvalue),
            report.windows_per_pass(),
            report.replicates()
        ),
        None => format!("[{}] no window scored\n", report.run_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibrate::Significance;
    use crate::report::InputSummary;
    use ebscan_config::ScanSettings;

    fn report() -> ScanReport {
        let mlc = Cluster {
            rank: 1,
            zone: 2,
            duration: 1,
            score: 3.5,
            locations: vec![1],
            location_names: Some(vec!["east".into()]),
            significance: Significance {
                mc_pvalue: Some(0.01),
                gumbel_pvalue: None,
            },
        };
        ScanReport {
            schema_version: "1.0.0".into(),
            run_id: "run-000000000000".into(),
            computed_at: chrono::Utc::now(),
            input: InputSummary {
                path: None,
                sha256: None,
                num_times: 2,
                num_locs: 2,
                num_zones: 2,
            },
            settings: ScanSettings::default(),
            settings_source: "builtin default".into(),
            max_duration: 2,
            observed: ScanTable::new(vec![ScanRecord::new(2, 1, 3.5)]),
            simulated: ScanTable::new(vec![
                ScanRecord::new(1, 1, 0.5),
                ScanRecord::new(2, 2, 4.0),
            ]),
            mlc: Some(mlc.clone()),
            clusters: vec![mlc],
            gumbel: None,
        }
    }

    #[test]
    fn jsonl_tags_each_row() {
        let out = render(&report(), OutputFormat::Jsonl).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            r#"{"table":"observed","zone":2,"duration":1,"score":3.5}"#
        );
        assert!(lines[2].starts_with(r#"{"table":"simulated""#));
    }

    #[test]
    fn json_is_parseable() {
        let out = render(&report(), OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["mlc"]["zone"], 2);
        assert_eq!(v["mlc"]["mc_pvalue"], 0.01);
        assert!(v.get("gumbel").is_none());
    }

    #[test]
    fn markdown_lists_clusters() {
        let out = render(&report(), OutputFormat::Md).unwrap();
        assert!(out.contains("## Most likely cluster"));
        assert!(out.contains("| 1 | 2 | 1 | 3.5000 | 0.0100 | east |"));
        assert!(!out.contains("Gumbel"));
    }

    #[test]
    fn summary_is_one_line() {
        let out = render(&report(), OutputFormat::Summary).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("zone=2 duration=1"));
        assert!(out.contains("2 replicates"));
    }
}
