// ==========================================
// 采购治理驾驶舱 - 命令行入口
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use procure_live::api::{GovernanceFilter, RecordDecisionRequest};
use procure_live::app::{get_default_db_path, AppState};
use procure_live::domain::action_log::ActionLog;
use procure_live::i18n::{deviation_label, set_locale, t, t_with_args};
use procure_live::logging;

#[derive(Parser, Debug)]
#[command(name = "procure-live")]
#[command(version, about = "Procurement vendor-selection governance")]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "PROCURE_LIVE_DB_PATH")]
    db: Option<PathBuf>,

    /// Display language (zh-CN | en)
    #[arg(long, global = true, default_value = "zh-CN")]
    lang: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create tables and seed demo data when empty
    Init {
        /// Only create tables
        #[arg(long)]
        no_seed: bool,
    },

    /// Open PRs, open RFQs, total quotes
    Kpi,

    /// Cheapest vs recommended vs selected per RFQ
    Governance {
        #[arg(long)]
        pr: Option<i64>,
        #[arg(long)]
        rfq: Option<i64>,
    },

    /// Quote details with cheapest / high-risk flags
    Quotes {
        #[arg(long)]
        rfq: Option<i64>,
    },

    /// RFQs with PR and raw material context
    Rfqs,

    /// Per-quote score breakdown and cheapest vs recommended per RFQ
    Scores {
        #[arg(long)]
        rfq: Option<i64>,
    },

    /// Recommendation for one RFQ without saving
    Preview {
        #[arg(long)]
        rfq: i64,
    },

    /// Record the final vendor selection for an RFQ
    Decide {
        #[arg(long)]
        rfq: i64,
        #[arg(long)]
        vendor: i64,
        /// Decision maker identity
        #[arg(long)]
        by: String,
        /// Required when the selection differs from the recommendation
        #[arg(long)]
        reason: Option<String>,
    },

    /// Saved decision and audit trail of an RFQ, or the latest entries overall
    Audit {
        #[arg(long)]
        rfq: Option<i64>,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Export the governance view as CSV
    Export {
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        pr: Option<i64>,
        #[arg(long)]
        rfq: Option<i64>,
    },
}

fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    set_locale(&cli.lang);

    let db_path = cli
        .db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);

    let state = AppState::new(db_path.clone())
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("无法初始化数据库: {}", db_path))?;

    match cli.command {
        Commands::Init { no_seed } => {
            println!("{}", t_with_args("cli.db_ready", &[("path", db_path.as_str())]));
            if !no_seed {
                match state.seed_if_empty()? {
                    Some(_) => println!("{}", t("cli.seeded")),
                    None => println!("{}", t("cli.already_seeded")),
                }
            }
        }

        Commands::Kpi => {
            let kpi = state.dashboard_api.get_kpis()?;
            println!("{}: {}", t("cli.kpi_open_prs"), kpi.open_prs);
            println!("{}: {}", t("cli.kpi_open_rfqs"), kpi.open_rfqs);
            println!("{}: {}", t("cli.kpi_total_quotes"), kpi.total_quotes);
        }

        Commands::Governance { pr, rfq } => {
            let rows = state
                .dashboard_api
                .list_governance_view(GovernanceFilter { pr_id: pr, rfq_id: rfq })?;
            if rows.is_empty() {
                println!("{}", t("cli.no_governance_rows"));
            }
            for row in rows {
                println!(
                    "RFQ {:<4} PR {:<4} {:<32} cheapest={:<28} recommended={:<28} selected={:<28} [{}] {}",
                    row.rfq_id,
                    row.pr_id,
                    row.rm_name,
                    row.cheapest_vendor.unwrap_or_default(),
                    row.recommended_vendor.unwrap_or_default(),
                    row.selected_vendor.unwrap_or_default(),
                    deviation_label(row.deviation),
                    row.override_reason.unwrap_or_default(),
                );
            }
        }

        Commands::Quotes { rfq } => {
            let rows = state.dashboard_api.list_quote_details(rfq)?;
            if rows.is_empty() {
                println!("{}", t("cli.no_quotes"));
            }
            for row in rows {
                let mut flags = Vec::new();
                if row.flag_low_price {
                    flags.push(t("flag.cheapest"));
                }
                if row.flag_high_risk {
                    flags.push(t("flag.high_risk"));
                }
                let d = &row.detail;
                println!(
                    "RFQ {:<4} {:<28} {:>10.2} {:>4}d {:<16} {:<6} {}",
                    d.rfq_id,
                    d.vendor_name,
                    d.price,
                    d.lead_time_days,
                    d.payment_terms.clone().unwrap_or_default(),
                    d.risk_rating,
                    flags.join(", "),
                );
            }
        }

        Commands::Rfqs => {
            let rfqs = state.procurement_api.list_rfqs()?;
            if rfqs.is_empty() {
                println!("{}", t("cli.no_rfqs"));
            }
            for r in rfqs {
                println!(
                    "RFQ {:<4} PR {:<4} {:<32} qty={:<10} need_by={} {}",
                    r.rfq_id,
                    r.pr_id,
                    r.rm_name,
                    r.qty,
                    r.need_by,
                    r.site.unwrap_or_default(),
                );
            }
        }

        Commands::Scores { rfq } => {
            for breakdown in state.dashboard_api.list_score_breakdown(rfq)? {
                println!("RFQ {} ({})", breakdown.rfq_id, breakdown.weights);
                for s in breakdown.scores {
                    println!(
                        "  {:<28} price={:>6.2} lead={:>6.2} penalty={:>6.1} final={:>7.3}",
                        s.vendor_name, s.price_score, s.lt_score, s.risk_penalty, s.final_score
                    );
                }
            }

            for summary in state.dashboard_api.list_recommendation_summary(rfq)? {
                let tag = if summary.is_same_vendor() {
                    t("cli.same_vendor")
                } else {
                    t("cli.different_vendor")
                };
                println!(
                    "RFQ {:<4} {}={} ({:.2}) {}={} ({:.3}) [{}]",
                    summary.rfq_id,
                    t("cli.system_cheapest"),
                    summary.cheapest_vendor,
                    summary.cheapest_price,
                    t("cli.system_recommended"),
                    summary.recommended_vendor,
                    summary.recommended_score,
                    tag,
                );
            }
        }

        Commands::Preview { rfq } => {
            let preview = state.decision_api.preview_recommendation(rfq)?;
            println!(
                "{}: {} (vendor_id={})",
                t("cli.system_cheapest"),
                preview.cheapest_vendor,
                preview.cheapest_vendor_id
            );
            println!(
                "{}: {} (vendor_id={})",
                t("cli.system_recommended"),
                preview.recommended_vendor,
                preview.recommended_vendor_id
            );
            for s in preview.ranked {
                println!("  {:<28} final={:>7.3}", s.vendor_name, s.final_score);
            }
        }

        Commands::Decide {
            rfq,
            vendor,
            by,
            reason,
        } => {
            let outcome = state.decision_api.record_decision(RecordDecisionRequest {
                rfq_id: rfq,
                selected_vendor_id: vendor,
                selected_by: by,
                override_reason: reason,
            })?;
            println!(
                "{}",
                t_with_args("cli.decision_saved", &[("rfq_id", rfq.to_string().as_str())])
            );
            println!(
                "{}",
                t_with_args(
                    "cli.decision_summary",
                    &[
                        ("recommended", outcome.recommended_vendor_id.to_string().as_str()),
                        ("cheapest", outcome.cheapest_vendor_id.to_string().as_str()),
                        ("deviation", deviation_label(outcome.deviation).as_str()),
                    ],
                )
            );
        }

        Commands::Audit { rfq: Some(rfq), .. } => {
            match state.decision_api.get_decision_record(rfq)? {
                Some(record) => {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    println!("[{}]", deviation_label(record.deviation()));
                }
                None => println!("{}", t("cli.no_decision")),
            }

            print_audit(&state.decision_api.list_audit_trail(rfq)?);
        }

        Commands::Audit { rfq: None, limit } => {
            print_audit(&state.decision_api.list_recent_audit(limit)?);
        }

        Commands::Export { out, pr, rfq } => {
            let file = std::fs::File::create(&out)
                .with_context(|| format!("无法创建导出文件: {}", out.display()))?;
            let count = state
                .dashboard_api
                .export_governance_csv(file, GovernanceFilter { pr_id: pr, rfq_id: rfq })?;
            println!(
                "{}",
                t_with_args(
                    "cli.exported",
                    &[
                        ("count", count.to_string().as_str()),
                        ("path", out.display().to_string().as_str())
                    ],
                )
            );
        }
    }

    Ok(())
}

fn print_audit(trail: &[ActionLog]) {
    if trail.is_empty() {
        println!("{}", t("cli.no_audit"));
    }
    for log in trail {
        println!(
            "{} {:<8} {} {} {}",
            log.action_ts.format("%Y-%m-%d %H:%M:%S"),
            log.rfq_id.map(|id| format!("RFQ {}", id)).unwrap_or_default(),
            log.actor,
            log.action_type,
            log.detail.as_deref().unwrap_or_default()
        );
    }
}
