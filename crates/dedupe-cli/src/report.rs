use std::time::SystemTime;

use chrono::{DateTime, Utc};
use dedupe_core::{ActivityScore, ActivityThresholds, DuplicateGroup, GateReport};
use dedupe_db::{MigrationPlan, MigrationSummary};

/// Rendering switches for the duplicate report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub detailed: bool,
    pub show_activity: bool,
    pub high_activity_only: bool,
}

/// Human-readable duplicate report: one summary line per group, optionally
/// expanded with per-member rows and activity columns.
pub fn render_groups(
    groups: &[DuplicateGroup],
    thresholds: ActivityThresholds,
    now: DateTime<Utc>,
    opts: &ReportOptions,
) -> String {
    let selected: Vec<&DuplicateGroup> = groups
        .iter()
        .filter(|group| !opts.high_activity_only || has_high_activity_doomed(group, thresholds, now))
        .collect();

    if selected.is_empty() {
        return if opts.high_activity_only {
            String::from("No duplicate groups contain a high-activity account marked for deletion.\n")
        } else {
            String::from("No duplicate email groups found.\n")
        };
    }

    let mut out = format!("{} duplicate email group(s):\n", selected.len());

    for group in selected {
        out.push_str(&format!(
            "{}: {} accounts, keeping #{}\n",
            group.email,
            group.member_count(),
            group.retained().id
        ));

        if opts.detailed {
            for member in group.members() {
                let decision = if member.id == group.retained().id {
                    "keep"
                } else {
                    "delete"
                };

                out.push_str(&format!("  #{} {} [{}]", member.id, member.username, decision));

                if opts.show_activity {
                    let score = ActivityScore::evaluate(member, thresholds, now);
                    out.push_str(&format!(
                        "  issues={} points={} last_login={}",
                        score.issues_reported,
                        score.points_total,
                        format_login(score.last_login)
                    ));
                    if score.is_high_activity() {
                        out.push_str(&format!("  HIGH ACTIVITY ({})", score.reasons_summary()));
                    }
                }

                out.push('\n');
            }
        }
    }

    out
}

/// Detailed rows as CSV, one line per group member.
pub fn render_csv(
    groups: &[DuplicateGroup],
    thresholds: ActivityThresholds,
    now: DateTime<Utc>,
) -> String {
    let mut out = String::from(
        "email,user_id,username,decision,issues_reported,points_total,last_login,high_activity,reasons\n",
    );

    for group in groups {
        for member in group.members() {
            let decision = if member.id == group.retained().id {
                "keep"
            } else {
                "delete"
            };
            let score = ActivityScore::evaluate(member, thresholds, now);

            out.push_str(&format!(
                "{},{},{},{},{},{},{},{},{}\n",
                csv_field(&group.email),
                member.id,
                csv_field(&member.username),
                decision,
                score.issues_reported,
                score.points_total,
                format_login(score.last_login),
                score.is_high_activity(),
                csv_field(&score.reasons_summary()),
            ));
        }
    }

    out
}

/// Gate-failure output: every blocking account plus the remediation
/// commands that clear it.
pub fn render_blocked(report: &GateReport) -> String {
    let mut out = format!(
        "Migration blocked: {} high-activity account(s) would be deleted:\n",
        report.blocked.len()
    );

    for blocked in &report.blocked {
        out.push_str(&format!(
            "  #{} {} in group {} (kept: #{}) - {}\n",
            blocked.score.user_id,
            blocked.score.username,
            blocked.group_email,
            blocked.retained_id,
            blocked.score.reasons_summary(),
        ));
    }

    out.push_str(
        "\nNo data was changed. Resolve each account above, then re-run `dedupe migrate`:\n\
         \x20 dedupe resolve update-email <ID> <NEW_EMAIL>   give the account its own address\n\
         \x20 dedupe resolve merge-users <SRC> <DST>         fold it into the kept account\n\
         \x20 dedupe resolve contact-users                   export a contact sheet first\n",
    );

    out
}

/// Dry-run output: the full deletion plan, nothing applied.
pub fn render_plan(plan: &MigrationPlan) -> String {
    if plan.groups.is_empty() {
        return String::from(
            "Dry run: no duplicate groups; migration would only install the unique email index.\n",
        );
    }

    let mut out = format!(
        "Dry run: would delete {} account(s) across {} group(s):\n",
        plan.accounts_to_delete(),
        plan.groups.len()
    );

    for group in &plan.groups {
        let doomed: Vec<String> = group.doomed_ids.iter().map(|id| format!("#{}", id)).collect();
        out.push_str(&format!(
            "  {}: delete {} / keep #{}\n",
            group.email,
            doomed.join(", "),
            group.retained_id
        ));
    }

    out.push_str("\nNo data was changed. Re-run without --dry-run to apply.\n");

    out
}

/// Post-migration summary with the explicit cascade counts.
pub fn render_summary(summary: &MigrationSummary) -> String {
    format!(
        "Migration applied: {} group(s) resolved, {} account(s) deleted\n\
         \x20 cascade: {} issue(s), {} comment(s), {} point award(s), {} profile(s)\n\
         Unique email index installed.\n",
        summary.groups_resolved,
        summary.accounts_deleted,
        summary.issues_deleted,
        summary.comments_deleted,
        summary.point_awards_deleted,
        summary.profiles_deleted,
    )
}

/// Contact sheet (CSV) for blocked accounts that need a human touch before
/// the migration can run.
pub fn render_contact_sheet(report: &GateReport) -> String {
    let mut out = String::from("email,user_id,username,reasons\n");

    for blocked in &report.blocked {
        out.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&blocked.group_email),
            blocked.score.user_id,
            csv_field(&blocked.score.username),
            csv_field(&blocked.score.reasons_summary()),
        ));
    }

    out
}

fn has_high_activity_doomed(
    group: &DuplicateGroup,
    thresholds: ActivityThresholds,
    now: DateTime<Utc>,
) -> bool {
    group
        .doomed()
        .iter()
        .any(|account| ActivityScore::evaluate(account, thresholds, now).is_high_activity())
}

fn format_login(last_login: Option<DateTime<Utc>>) -> String {
    match last_login {
        Some(dt) => humantime::format_rfc3339_seconds(SystemTime::from(dt)).to_string(),
        None => String::from("never"),
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
