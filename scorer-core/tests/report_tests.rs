// tests/report_tests.rs

use std::sync::Arc;

use scorer_common::constants::USERS_KEY;
use scorer_common::models::{AppSettings, Histogram, UserRecord, UserScore};
use scorer_common::traits::KvStore;
use scorer_core::services::report::{format_report, ReportService};
use scorer_core::storage::{InMemoryKv, UserScoreStore};
use scorer_core::test_utils::{CollectingMessenger, StaticSettings};
use scorer_core::Error;

struct Fixture {
    kv: Arc<InMemoryKv>,
    store: UserScoreStore<InMemoryKv>,
    messenger: Arc<CollectingMessenger>,
    service: ReportService<InMemoryKv>,
}

fn fixture(settings: AppSettings) -> Fixture {
    let kv = Arc::new(InMemoryKv::new());
    let store = UserScoreStore::new(kv.clone());
    let messenger = Arc::new(CollectingMessenger::new());
    let service = ReportService::new(
        store.clone(),
        messenger.clone(),
        Arc::new(StaticSettings::new(settings)),
    );
    Fixture { kv, store, messenger, service }
}

/// Register a user in the store with the given score and enough tracked
/// history for the score to be legitimate.
async fn seed_scored(
    store: &UserScoreStore<InMemoryKv>,
    username: &str,
    score: UserScore,
    window_used: usize,
) -> Result<(), Error> {
    store.init_user(username, "t2_abc").await?;
    let mut record = UserRecord::new(username, "t2_abc");
    record.tracked_ids = (0..10).map(|i| format!("t1_{username}_{i}")).collect();
    record.score = score;
    record.window_used = window_used;
    store.save_submission(&record).await?;
    Ok(())
}

#[tokio::test]
async fn histogram_buckets_and_statistics() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    f.store.init_user("u_unassigned", "t2_a").await?;
    seed_scored(&f.store, "u_zero", UserScore::Assigned(0.0), 10).await?;
    seed_scored(&f.store, "u_low", UserScore::Assigned(0.05), 10).await?;
    seed_scored(&f.store, "u_mid", UserScore::Assigned(0.5), 10).await?;
    seed_scored(&f.store, "u_one", UserScore::Assigned(1.0), 10).await?;

    let histogram = f.service.histogram().await?;
    assert_eq!(histogram.count, 5);
    assert_eq!(histogram.count_scored, 4);
    assert!(histogram.is_complete);

    assert_eq!(histogram.bins[0].count, 1); // unassigned
    assert_eq!(histogram.bins[1].count, 1); // x = 0.0
    assert_eq!(histogram.bins[2].count, 1); // (0.0, 0.1]
    assert_eq!(histogram.bins[6].count, 1); // (0.4, 0.5]
    assert_eq!(histogram.bins[12].count, 1); // x = 1.0
    for i in [3, 4, 5, 7, 8, 9, 10, 11] {
        assert_eq!(histogram.bins[i].count, 0, "bin {i} should be empty");
    }

    // Mean/median over the scored users {0, 0.05, 0.5, 1.0}
    assert!((histogram.mean - 0.3875).abs() < 1e-12);
    assert!((histogram.median - 0.275).abs() < 1e-12);
    Ok(())
}

#[tokio::test]
async fn histogram_of_empty_index() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    let histogram = f.service.histogram().await?;
    assert_eq!(histogram.count, 0);
    assert_eq!(histogram.count_scored, 0);
    assert!(histogram.is_complete);
    assert_eq!(histogram.mean, 0.0);
    assert_eq!(histogram.median, 0.0);
    Ok(())
}

#[tokio::test]
async fn cardinality_mismatch_clears_is_complete() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    seed_scored(&f.store, "u_mid", UserScore::Assigned(0.5), 10).await?;

    // An index entry outside every scanned range: processed count will
    // disagree with the cardinality
    f.kv.zadd(USERS_KEY, "ghost", 1.5).await?;

    let histogram = f.service.histogram().await?;
    assert_eq!(histogram.count, 1);
    assert!(!histogram.is_complete);
    Ok(())
}

#[tokio::test]
async fn median_of_odd_number_of_scored_users() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    seed_scored(&f.store, "u_a", UserScore::Assigned(0.1), 10).await?;
    seed_scored(&f.store, "u_b", UserScore::Assigned(0.3), 10).await?;
    seed_scored(&f.store, "u_c", UserScore::Assigned(0.8), 10).await?;

    let histogram = f.service.histogram().await?;
    assert!((histogram.median - 0.3).abs() < 1e-12);
    Ok(())
}

#[tokio::test]
async fn summary_for_unknown_user() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    let summary = f.service.user_score_summary("nobody").await?;
    assert_eq!(summary, "User Score not yet assigned (No tracked comments)");
    Ok(())
}

#[tokio::test]
async fn summary_with_insufficient_history() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    f.store.init_user("newish", "t2_abc").await?;
    let mut record = UserRecord::new("newish", "t2_abc");
    record.tracked_ids = vec!["t1_0".into(), "t1_1".into(), "t1_2".into()];
    f.store.save_submission(&record).await?;

    let summary = f.service.user_score_summary("newish").await?;
    assert_eq!(summary, "User Score not yet assigned (Only 3 tracked comments)");
    Ok(())
}

#[tokio::test]
async fn summary_for_scored_user() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    seed_scored(&f.store, "shiruken", UserScore::Assigned(0.4), 10).await?;

    let summary = f.service.user_score_summary("shiruken").await?;
    assert_eq!(summary, "User Score: 0.4 (4 of 10 recent comments removed)");
    Ok(())
}

#[tokio::test]
async fn summary_recomputes_and_persists_on_settings_drift() -> Result<(), Error> {
    let settings = AppSettings { num_comments: 5, ..AppSettings::default() };
    let f = fixture(settings);

    // Stored against window 10; 1 of the most recent 5 is removed
    f.store.init_user("drifter", "t2_abc").await?;
    let mut record = UserRecord::new("drifter", "t2_abc");
    record.tracked_ids = (0..10).map(|i| format!("t1_{i}")).collect();
    record.score = UserScore::Assigned(0.4);
    record.window_used = 10;
    f.store.save_submission(&record).await?;
    record.removed_ids = vec!["t1_9".to_string()];
    f.store.save_moderation(&record).await?;

    let summary = f.service.user_score_summary("drifter").await?;
    assert_eq!(summary, "User Score: 0.2 (1 of 5 recent comments removed)");

    // Recomputed score was persisted and mirrored
    let loaded = f.store.get_user("drifter").await?.unwrap();
    assert_eq!(loaded.score, UserScore::Assigned(0.2));
    assert_eq!(f.store.scores_in_range(0.2, 0.2).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn generate_report_delivers_formatted_summary() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    f.store.init_user("u_unassigned", "t2_a").await?;
    seed_scored(&f.store, "u_zero", UserScore::Assigned(0.0), 10).await?;
    seed_scored(&f.store, "u_mid", UserScore::Assigned(0.5), 10).await?;

    f.service.generate_report("admin").await?;

    let sent = f.messenger.sent();
    assert_eq!(sent.len(), 1);
    let (subject, body) = &sent[0];
    assert_eq!(subject, "User Scorer Report");
    assert!(body.contains("* Tracked Users: 3"));
    assert!(body.contains("* Scored Users: 2"));
    assert!(body.contains("* Unscored Users: 1"));
    assert!(body.contains("0.4 < x \u{2264} 0.5 |* (1)"));
    assert!(body.contains("* Mean Score: 0.250"));
    assert!(body.contains("* Comment Reporting: Enabled (0.4 threshold)"));
    assert!(body.contains("* Comment Removal: Disabled"));
    assert!(body.contains("*Report requested by u/admin.*"));
    Ok(())
}

#[tokio::test]
async fn generate_report_without_users_sends_nothing() -> Result<(), Error> {
    let f = fixture(AppSettings::default());
    let histogram = f.service.generate_report("admin").await?;
    assert_eq!(histogram.count, 0);
    assert!(f.messenger.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn bars_scale_proportionally_above_the_cap() {
    let mut histogram = Histogram::empty();
    histogram.count = 230;
    histogram.count_scored = 230;
    histogram.bins[2].count = 200;
    histogram.bins[6].count = 30;
    histogram.mean = 0.2;
    histogram.median = 0.1;

    let body = format_report(&histogram, &AppSettings::default(), "admin");
    assert!(body.contains(&format!("0.0 < x \u{2264} 0.1 |{} (200)", "*".repeat(50))));
    assert!(body.contains(&format!("0.4 < x \u{2264} 0.5 |{} (30)", "*".repeat(8))));
}
