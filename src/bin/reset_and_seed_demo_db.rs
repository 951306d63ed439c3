use chrono::Local;
use std::error::Error;
use std::fs;
use std::path::Path;

use procure_live::api::GovernanceFilter;
use procure_live::app::{get_default_db_path, AppState};
use procure_live::logging;

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone())?;
    let summary = state
        .seed_if_empty()?
        .ok_or("reset database unexpectedly already contains vendors")?;

    eprintln!(
        "Seeded {}: rfq_id={} vendors={:?} quotes={:?}",
        db_path, summary.rfq_id, summary.vendor_ids, summary.quote_ids
    );

    print_quick_counts(&state)?;
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

fn print_quick_counts(state: &AppState) -> Result<(), Box<dyn Error>> {
    let kpi = state.dashboard_api.get_kpis()?;
    let governance = state
        .dashboard_api
        .list_governance_view(GovernanceFilter::default())?;

    eprintln!(
        "open_prs={} open_rfqs={} quotes={} governance_rows={}",
        kpi.open_prs,
        kpi.open_rfqs,
        kpi.total_quotes,
        governance.len()
    );
    Ok(())
}
