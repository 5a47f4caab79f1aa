//! `attestr demo` — scripted walkthrough of the credential lifecycle.
//!
//! Issues, verifies, revokes, and re-verifies a credential against an
//! in-process registry, recording each check with the verifier. Useful
//! as a smoke test and as executable documentation.

use std::sync::Arc;

use clap::Args;

use attestr_core::AccountId;
use attestr_registry::{Registry, Role};
use attestr_verifier::Verifier;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of credentials to issue in the batch step.
    #[arg(long, default_value_t = 3)]
    pub batch_size: usize,
}

/// Run the demo scenario end to end.
pub fn run_demo(args: &DemoArgs) -> anyhow::Result<()> {
    let admin = AccountId::new("demo-admin")?;
    let university = AccountId::new("demo-university")?;
    let graduate = AccountId::new("demo-graduate")?;
    let employer = AccountId::new("demo-employer")?;

    let registry = Registry::shared(admin.clone());
    let verifier = Verifier::open(Arc::clone(&registry));

    registry.grant_role(&admin, Role::Issuer, university.clone())?;
    tracing::info!(%university, "granted issuer role");

    // Single issuance and a positive verification.
    let id = registry.issue(
        &university,
        graduate.clone(),
        "ar://diploma/2026".to_string(),
        None,
    )?;
    tracing::info!(%id, "issued diploma credential");

    let check = verifier.record(&employer, &id)?;
    let record = verifier.get(&check)?;
    tracing::info!(%check, is_valid = record.is_valid, "employer check recorded");

    // Batch issuance.
    let subjects = vec![graduate.clone(); args.batch_size];
    let uris = (0..args.batch_size)
        .map(|i| format!("ar://transcript/{i}"))
        .collect::<Vec<_>>();
    let expiries = vec![None; args.batch_size];
    let batch = registry.batch_issue(&university, &subjects, &uris, &expiries)?;
    tracing::info!(count = batch.len(), "issued transcript batch");

    // Revocation flips subsequent checks to invalid.
    registry.revoke(&university, &id)?;
    tracing::info!(%id, "revoked diploma credential");

    let recheck = verifier.record(&employer, &id)?;
    let record = verifier.get(&recheck)?;
    tracing::info!(%recheck, is_valid = record.is_valid, "post-revocation check recorded");
    anyhow::ensure!(!record.is_valid, "revoked credential must verify invalid");

    // The first check is untouched history.
    anyhow::ensure!(
        verifier.get(&check)?.is_valid,
        "earlier verification record must stay frozen"
    );

    let page = registry.credentials_for_subject(&graduate, 0, 50);
    tracing::info!(
        total = page.total,
        events = registry.event_log().len(),
        "demo complete"
    );
    Ok(())
}
