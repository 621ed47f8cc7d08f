use crate::infra::Adapters;
use chrono::{DateTime, Utc};
use clap::Args;
use launchpad::config::AppConfig;
use launchpad::dashboard::{DashboardService, ProfileDashboard};
use launchpad::directory::{DirectoryPage, DirectoryQuery, DirectoryService};
use launchpad::error::AppError;
use launchpad::profiles::{
    Attributes, EntityKind, FieldValue, Identity, ProfileRecord, ProfileRepository, UserId,
};
use launchpad::workflows::approval::{ApprovalService, ReviewAction};
use launchpad::workflows::registration::{DraftPatch, DraftStore, RegistrationService};
use serde::Serialize;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Startup listing filters as a query string, e.g. "sectors=agritech&sort=name_asc"
    #[arg(long, default_value = "")]
    pub(crate) filters: String,
    /// Print the summary on a single line instead of pretty-printed JSON.
    #[arg(long)]
    pub(crate) compact: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DemoSummary {
    pub(crate) generated_at: DateTime<Utc>,
    pub(crate) startups: DirectoryPage,
    pub(crate) incubators: DirectoryPage,
    pub(crate) dashboards: Vec<ProfileDashboard>,
    pub(crate) notices: Vec<String>,
    pub(crate) export_rows: usize,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let query = DirectoryQuery::from_query_string(&args.filters);
    let summary = walkthrough(&config, &query)?;

    let rendered = if args.compact {
        serde_json::to_string(&summary)
    } else {
        serde_json::to_string_pretty(&summary)
    }
    .map_err(|err| AppError::Io(err.into()))?;
    println!("{rendered}");
    Ok(())
}

/// An incubator and a mentor register, a startup is rejected once and approved on
/// resubmission, then the directory and dashboards are read back.
pub(crate) fn walkthrough(
    config: &AppConfig,
    query: &DirectoryQuery,
) -> Result<DemoSummary, AppError> {
    let adapters = Adapters::in_memory(&config.media.public_base_url);
    let registration =
        RegistrationService::new(adapters.profiles.clone(), adapters.drafts.clone());
    let approval = ApprovalService::new(adapters.profiles.clone(), adapters.notifier.clone());
    let directory = DirectoryService::new(adapters.profiles.clone(), config.directory.page_size);
    let dashboard = DashboardService::new(adapters.profiles.clone());

    let moderator = Identity::admin("moderator");
    let founder = UserId("asha".to_string());
    let programme_lead = UserId("nila".to_string());
    let mentor = UserId("ravi".to_string());

    let incubator = submit(
        &registration,
        &programme_lead,
        EntityKind::Incubator,
        incubator_values(),
    )?;
    approval.review(
        &moderator,
        &incubator.id,
        ReviewAction::Approve { rating: Some(5) },
    )?;

    let mut values = startup_values();
    values.insert("incubated".to_string(), text("yes"));
    values.insert("incubator_id".to_string(), text(&incubator.id.0));
    let startup = submit(&registration, &founder, EntityKind::Startup, values)?;
    approval.review(
        &moderator,
        &startup.id,
        ReviewAction::Reject {
            reason: "Add a website so investors can verify the product".to_string(),
        },
    )?;

    registration.edit(&founder, &startup.id)?;
    let mut fix = Attributes::new();
    fix.insert("website".to_string(), text("https://krishicold.example.org"));
    registration.update_draft(&founder, EntityKind::Startup, patch(fix))?;
    registration.submit(&founder, EntityKind::Startup)?;
    approval.review(&moderator, &startup.id, ReviewAction::Approve { rating: None })?;
    approval.review(&moderator, &startup.id, ReviewAction::Rate { rating: 4 })?;

    let mentor_profile = submit(&registration, &mentor, EntityKind::Mentor, mentor_values())?;
    approval.review(
        &moderator,
        &mentor_profile.id,
        ReviewAction::RequestUpdate {
            reason: "Add your LinkedIn profile".to_string(),
        },
    )?;

    let export = directory.export(EntityKind::Startup, query)?;
    let dashboards = [founder, programme_lead, mentor]
        .iter()
        .map(|owner| dashboard.for_owner(owner))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DemoSummary {
        generated_at: Utc::now(),
        startups: directory.startups(query)?,
        incubators: directory.incubators(&DirectoryQuery::default())?,
        dashboards,
        notices: adapters
            .notifier
            .sent()
            .into_iter()
            .map(|notice| format!("{} -> {}", notice.template, notice.owner))
            .collect(),
        export_rows: export.lines().count().saturating_sub(1),
    })
}

fn submit<R, D>(
    registration: &RegistrationService<R, D>,
    owner: &UserId,
    kind: EntityKind,
    values: Attributes,
) -> Result<ProfileRecord, AppError>
where
    R: ProfileRepository + 'static,
    D: DraftStore + 'static,
{
    registration.update_draft(owner, kind, patch(values))?;
    Ok(registration.submit(owner, kind)?)
}

fn patch(values: Attributes) -> DraftPatch {
    DraftPatch {
        values,
        ..DraftPatch::default()
    }
}

fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

fn list(values: &[&str]) -> FieldValue {
    FieldValue::List(values.iter().map(|value| value.to_string()).collect())
}

fn attributes(pairs: Vec<(&str, FieldValue)>) -> Attributes {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn startup_values() -> Attributes {
    attributes(vec![
        ("startup_name", text("Krishi Cold")),
        ("tagline", text("Cold-chain logistics for rural farms")),
        ("founded_year", text("2021")),
        ("location", text("Pune")),
        ("founder_name", text("Asha Rao")),
        ("founder_email", text("asha@krishicold.example.org")),
        ("founder_phone", text("+91 98765 43210")),
        ("team_size", text("6-10")),
        ("sectors", list(&["agritech", "logistics"])),
        ("stage", text("mvp")),
        ("description", text("Solar-powered cold rooms rented per crate.")),
        ("has_raised_funding", text("no")),
    ])
}

fn incubator_values() -> Attributes {
    attributes(vec![
        ("incubator_name", text("Agri Labs")),
        ("established_year", text("2015")),
        ("location", text("Bengaluru")),
        ("website", text("https://agrilabs.example.org")),
        ("sectors", list(&["agritech", "cleantech"])),
        ("program_duration", text("6_months")),
        ("takes_equity", text("no")),
        ("description", text("Hardware-first programme with lab access.")),
        ("startups_supported", text("40")),
        ("contact_email", text("hello@agrilabs.example.org")),
    ])
}

fn mentor_values() -> Attributes {
    attributes(vec![
        ("full_name", text("Ravi Menon")),
        ("headline", text("Former CFO, two exits")),
        ("location", text("Mumbai")),
        ("expertise_areas", list(&["finance", "fundraising"])),
        ("years_of_experience", text("18")),
        ("bio", text("Helps founders prepare for seed rounds.")),
        ("mentoring_mode", text("online")),
        ("paid_mentorship", text("no")),
        ("contact_email", text("ravi@example.org")),
    ])
}
