// scorer-core/src/services/report.rs
//!
//! Aggregation over the global index: score distribution, summary
//! statistics, and the formatted report delivered via the messaging
//! collaborator. Reads only the sorted index, never per-user hashes.

use std::sync::Arc;

use tracing::{error, info};

use scorer_common::constants::{HISTOGRAM_MAX_BAR_LENGTH, MIN_TRACKED, SCORE_UNASSIGNED};
use scorer_common::models::{AppSettings, Histogram, UserScore};
use scorer_common::traits::{KvStore, SettingsProvider};

use crate::platform::Messenger;
use crate::scoring::{calculate_score, window_length};
use crate::services::format_score;
use crate::storage::UserScoreStore;
use crate::Error;

pub struct ReportService<K: KvStore> {
    store: UserScoreStore<K>,
    messenger: Arc<dyn Messenger>,
    settings: Arc<dyn SettingsProvider>,
}

impl<K: KvStore> ReportService<K> {
    pub fn new(
        store: UserScoreStore<K>,
        messenger: Arc<dyn Messenger>,
        settings: Arc<dyn SettingsProvider>,
    ) -> Self {
        Self { store, messenger, settings }
    }

    /// Bucket every tracked user's score into the thirteen histogram bins
    /// and compute mean/median over the scored users.
    ///
    /// The scan runs as several range queries against the index; the total
    /// processed is cross-checked against the index cardinality, and a
    /// mismatch is surfaced through `is_complete` rather than an error.
    pub async fn histogram(&self) -> Result<Histogram, Error> {
        let mut histogram = Histogram::empty();

        let unassigned = self
            .store
            .scores_in_range(SCORE_UNASSIGNED, SCORE_UNASSIGNED)
            .await?;
        histogram.bins[0].count = unassigned.len() as u64;

        let zeros = self.store.scores_in_range(0.0, 0.0).await?;
        histogram.bins[1].count = zeros.len() as u64;

        let ones = self.store.scores_in_range(1.0, 1.0).await?;
        histogram.bins[12].count = ones.len() as u64;

        // Everything strictly between 0 and 1. With the item limit of
        // 1000, the smallest and largest possible fractions are 0.001
        // and 0.999.
        let between = self.store.scores_in_range(0.00001, 0.99999).await?;
        for (_, score) in &between {
            let index = (score / 0.1).ceil() as usize + 1;
            histogram.bins[index].count += 1;
        }

        histogram.count = histogram.bins.iter().map(|bin| bin.count).sum();
        histogram.count_scored = histogram.count - histogram.bins[0].count;

        if histogram.count == 0 {
            return Ok(histogram);
        }

        let cardinality = self.store.user_count().await?;
        if cardinality != histogram.count {
            histogram.is_complete = false;
            error!(
                "Mismatch between sorted set cardinality ({}) and number of items processed ({})",
                cardinality, histogram.count
            );
        }

        // Bulk statistics over all scored users. The three scans are each
        // sorted ascending, so concatenating zeros, in-between, and ones
        // keeps the sequence sorted for the median.
        let mut scored: Vec<f64> = zeros.iter().map(|(_, s)| *s).collect();
        scored.extend(between.iter().map(|(_, s)| *s));
        scored.extend(ones.iter().map(|(_, s)| *s));

        if !scored.is_empty() {
            histogram.mean = scored.iter().sum::<f64>() / scored.len() as f64;
            let middle = scored.len() / 2;
            histogram.median = if scored.len() % 2 == 1 {
                scored[middle]
            } else {
                (scored[middle - 1] + scored[middle]) / 2.0
            };
        }

        Ok(histogram)
    }

    /// Current User Score for one user as a display string, recomputing
    /// and persisting first if the window setting changed since the score
    /// was stored.
    pub async fn user_score_summary(&self, username: &str) -> Result<String, Error> {
        let Some(mut record) = self.store.get_user(username).await? else {
            return Ok("User Score not yet assigned (No tracked comments)".to_string());
        };

        if record.tracked_ids.is_empty() {
            return Ok("User Score not yet assigned (No tracked comments)".to_string());
        }

        if record.tracked_ids.len() < MIN_TRACKED {
            let n = record.tracked_ids.len();
            return Ok(format!(
                "User Score not yet assigned (Only {} tracked comment{})",
                n,
                if n > 1 { "s" } else { "" }
            ));
        }

        let settings = self.settings.get_settings().await?;

        if settings.num_comments != record.window_used {
            record.score = calculate_score(&record, settings.num_comments);
            self.store.save_score(&record).await?;
            info!(
                "u/{}: Recalculated score on settings change (score={:?})",
                username, record.score
            );
        }

        let score = match record.score {
            UserScore::Assigned(score) => score,
            UserScore::Unassigned => {
                return Ok("User Score not yet assigned (No tracked comments)".to_string())
            }
        };

        let num_recent = window_length(&record, settings.num_comments);
        let num_removed = (num_recent as f64 * score).round() as usize;
        Ok(format!(
            "User Score: {} ({} of {} recent comments removed)",
            format_score(score),
            num_removed,
            num_recent
        ))
    }

    /// Generate the full text report and deliver it through the
    /// messaging collaborator. Returns the histogram it was built from.
    pub async fn generate_report(&self, requested_by: &str) -> Result<Histogram, Error> {
        info!("u/{} requested a report", requested_by);

        let settings = self.settings.get_settings().await?;
        let histogram = self.histogram().await?;

        if histogram.count == 0 {
            error!("No tracked users");
            return Ok(histogram);
        }

        let body = format_report(&histogram, &settings, requested_by);
        match self.messenger.send("User Scorer Report", &body).await {
            Ok(()) => info!("Sent report"),
            Err(e) => error!("Error sending report: {}", e),
        }
        Ok(histogram)
    }
}

/// Render the report body: overview counts, the distribution chart with
/// proportionally scaled bars, bulk statistics, and the active settings.
pub fn format_report(histogram: &Histogram, settings: &AppSettings, requested_by: &str) -> String {
    let bin_max = histogram.bins.iter().map(|bin| bin.count).max().unwrap_or(0);

    let mut chart = String::new();
    if bin_max > 0 {
        for bin in &histogram.bins[1..] {
            let bar_length = if bin_max as usize <= HISTOGRAM_MAX_BAR_LENGTH {
                bin.count as usize
            } else {
                ((bin.count as f64 / bin_max as f64) * HISTOGRAM_MAX_BAR_LENGTH as f64).round()
                    as usize
            };
            chart.push_str(&format!(
                "    {} |{} ({})\n",
                bin.label,
                "*".repeat(bar_length),
                bin.count
            ));
        }
    }

    let mut body = String::new();
    body.push_str("**Overview**\n\n");
    body.push_str(&format!(
        "* Tracked Users: {}{}\n",
        histogram.count,
        if histogram.is_complete { "" } else { " (**Warning! Failed to process all users**)" }
    ));
    body.push_str(&format!("* Scored Users: {}\n", histogram.count_scored));
    body.push_str(&format!("* Unscored Users: {}\n\n", histogram.bins[0].count));

    body.push_str("**User Score Distribution**\n\n");
    if chart.is_empty() {
        body.push_str("    No scored users\n");
    } else {
        body.push_str(&chart);
        body.push('\n');
        body.push_str(&format!("* Mean Score: {:.3}\n", histogram.mean));
        body.push_str(&format!("* Median Score: {:.3}\n\n", histogram.median));
    }

    body.push_str("**Settings**\n\n");
    body.push_str(&format!(
        "* Comment Reporting: {}\n",
        if settings.report_comments {
            format!("Enabled ({} threshold)", settings.report_threshold)
        } else {
            "Disabled".to_string()
        }
    ));
    body.push_str(&format!(
        "* Comment Removal: {}\n\n",
        if settings.remove_comments {
            format!("Enabled ({} threshold)", settings.remove_threshold)
        } else {
            "Disabled".to_string()
        }
    ));

    body.push_str(&format!("*Report requested by u/{}.*", requested_by));
    body
}
