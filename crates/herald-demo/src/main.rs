//! Scripted herald session
//!
//! Wires the pipeline to in-memory adapters, runs a fixed sequence of
//! requests and prints every response as JSON.

use chrono::{Duration as ChronoDuration, Utc};
use clap::Parser;
use herald::logging;
use herald::prelude::*;
use herald::{
    DeliveryMode, Event, InMemoryRepository, LogNotifier, NotificationPort, OutboxNotifier,
    RegistrationError, RetryPolicy, Review, SideEffectRunner,
};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "herald-demo", version, about = "Run a scripted events and reviews session")]
struct Cli {
    /// Debug-level logging for the pipeline
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, env = "HERALD_JSON_LOGS")]
    json_logs: bool,

    /// Run notifications on a background task
    #[arg(long)]
    detached: bool,

    /// Send attempts per notification
    #[arg(long, default_value_t = 3, env = "HERALD_MAX_ATTEMPTS")]
    max_attempts: u32,

    /// Simulate a mail provider outage
    #[arg(long)]
    mail_outage: bool,

    /// How long to wait for detached notifications before exiting (ms)
    #[arg(long, default_value_t = 2_000)]
    drain_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.json_logs) {
        eprintln!("failed to initialise logging: {e}");
    }

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "demo session failed");
            eprintln!("error: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("wiring failed: {0}")]
    Wiring(#[from] RegistrationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

fn exit_code(error: &DemoError) -> u8 {
    match error {
        DemoError::Wiring(_) => 4,
        DemoError::Dispatch(DispatchError::ValidationFailed(_)) => 2,
        DemoError::Dispatch(DispatchError::Execution(e)) if e.is_retryable() => 3,
        DemoError::Dispatch(DispatchError::Execution(_)) => 1,
    }
}

async fn run(cli: &Cli) -> Result<(), DemoError> {
    let mail = OutboxNotifier::new(Channel::Mail);
    if cli.mail_outage {
        mail.fail_always("simulated outage");
    }
    let sms: Arc<dyn NotificationPort> = Arc::new(LogNotifier::new(Channel::Sms));

    let ports = Ports::new(
        Arc::new(InMemoryRepository::<Event>::new()),
        Arc::new(InMemoryRepository::<Review>::new()),
    )
    .with_notifier(Arc::new(mail.clone()))
    .with_notifier(sms);

    let mode = if cli.detached {
        DeliveryMode::Detached
    } else {
        DeliveryMode::Inline
    };
    let config = PipelineConfig::default()
        .with_delivery_mode(mode)
        .with_retry(RetryPolicy::default().with_max_attempts(cli.max_attempts));

    let (runner, mut reports) = SideEffectRunner::with_reports(&config.notifications);
    let dispatcher = ports
        .dispatcher_builder()
        .with_config(config)
        .with_side_effect_runner(runner)
        .build()?;

    let created = dispatcher
        .execute(CreateEventCommand {
            title: "Rust Meetup".to_string(),
            venue: "Community Hall".to_string(),
            starts_at: Utc::now() + ChronoDuration::days(14),
            capacity: 80,
            organizer: Contact::new("Olga")
                .with_email("olga@example.com")
                .with_phone("+15550001"),
        })
        .await?;
    print_json("create_event", &created);

    let list = dispatcher
        .execute(GetEventsListQuery {
            upcoming_only: true,
            ..GetEventsListQuery::default()
        })
        .await?;
    print_json("get_events_list", &list);

    let review = dispatcher
        .execute(CreateReviewCommand {
            event_id: created.event_id,
            reviewer: Contact::new("Rita").with_email("rita@example.com"),
            rating: 5,
            comment: "great".to_string(),
        })
        .await?;
    print_json("create_review", &review);

    let invalid = dispatcher
        .execute(CreateReviewCommand {
            event_id: created.event_id,
            reviewer: Contact::new("Sam"),
            rating: 7,
            comment: String::new(),
        })
        .await;
    match invalid {
        Err(DispatchError::ValidationFailed(errors)) => {
            print_json("create_review (invalid)", &errors);
        }
        other => {
            tracing::warn!(?other, "invalid review was not rejected by validation");
        }
    }

    let reviews = dispatcher
        .execute(GetEventReviewsQuery {
            event_id: created.event_id,
        })
        .await?;
    print_json("get_event_reviews", &reviews);

    if cli.detached {
        let grace = Duration::from_millis(cli.drain_ms);
        while let Ok(Some(report)) = tokio::time::timeout(grace, reports.recv()).await {
            tracing::info!(
                kind = %report.kind,
                delivered = report.delivered,
                dropped = report.dropped,
                "detached delivery finished"
            );
        }
    }

    tracing::info!(mail_sent = mail.sent_count(), "demo session finished");
    Ok(())
}

fn print_json<T: serde::Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("# {label}\n{json}"),
        Err(e) => tracing::warn!(error = %e, label, "response not serializable"),
    }
}
