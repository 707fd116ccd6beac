use std::{fmt::Display, path::PathBuf, sync::Arc};

use ansi_term::Style;
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use chrono_english::parse_date_string;
use clap::{CommandFactory, Parser, ValueEnum};
use now::DateTimeNow;
use tracing::warn;

use crate::{catalog::Task, utils::time::next_day_start};

use super::{open_default_store, Args};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct HistoryCommand {
    #[arg(
        long = "start",
        short,
        help = "Start of the range. Examples are \"yesterday\", \"3 days ago\", \"15/03/2025\""
    )]
    start_date: Option<String>,
    #[arg(
        long = "end",
        short,
        help = "End of the range. Examples are \"yesterday\", \"3 days ago\", \"15/03/2025\""
    )]
    end_date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Day range widened to whole days, so a bound like "yesterday 3 PM" still covers all
/// of yesterday.
struct HistoryRange {
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
}

impl HistoryRange {
    fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start.date_naive())
            && self.end.map_or(true, |end| date < end.date_naive())
    }
}

fn parse_range(
    start_date: Option<String>,
    end_date: Option<String>,
    date_style: DateStyle,
) -> Result<HistoryRange> {
    let now = Local::now();
    let dialect: chrono_english::Dialect = date_style.into();

    let start = match start_date.map(|s| parse_date_string(&s, now, dialect)) {
        Some(Ok(v)) => Some(v.with_timezone(&Local).beginning_of_day()),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate start date {e}"),
                )
                .into());
        }
        None => None,
    };
    let end = match end_date.map(|s| parse_date_string(&s, now, dialect)) {
        Some(Ok(v)) => Some(next_day_start(v.with_timezone(&Local))),
        Some(Err(e)) => {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Failed to validate end date {e}"),
                )
                .into());
        }
        None => None,
    };

    Ok(HistoryRange { start, end })
}

/// Completion statistics for one day.
#[derive(Debug, PartialEq, Eq)]
pub struct DayStats {
    pub date: NaiveDate,
    pub total: usize,
    pub categories: Vec<(Arc<str>, usize)>,
}

/// Aggregates one day's completed ids by category. Ids referencing tasks no longer in
/// the catalog are skipped.
pub fn day_stats(tasks: &[Task], date: NaiveDate, ids: &[Arc<str>]) -> DayStats {
    let mut categories = Vec::<(Arc<str>, usize)>::new();
    let mut total = 0;

    for id in ids {
        let Some(task) = tasks.iter().find(|task| task.id == *id) else {
            continue;
        };
        total += 1;
        match categories
            .iter_mut()
            .find(|(category, _)| *category == task.category)
        {
            Some((_, count)) => *count += 1,
            None => categories.push((task.category.clone(), 1)),
        }
    }

    DayStats {
        date,
        total,
        categories,
    }
}

/// Command to process `history`. Prints completed days newest first with per-category
/// counts and the tasks themselves.
pub async fn process_history_command(dir: PathBuf, command: HistoryCommand) -> Result<()> {
    let HistoryCommand {
        start_date,
        end_date,
        date_style,
    } = command;
    let range = parse_range(start_date, end_date, date_style)?;

    let store = open_default_store(dir).await?;
    let mut days = store
        .history()
        .iter()
        .filter_map(|(key, ids)| {
            let date = match NaiveDate::parse_from_str(key, "%Y-%m-%d") {
                Ok(date) => date,
                Err(e) => {
                    warn!("Skipping history entry with illegal date key {key}: {e}");
                    return None;
                }
            };
            range.contains(date).then_some((date, ids))
        })
        .collect::<Vec<_>>();
    days.sort_by(|a, b| b.0.cmp(&a.0));

    if days.is_empty() {
        println!("No completed tasks history yet.");
        return Ok(());
    }

    println!("{} days\n", days.len());
    for (date, ids) in days {
        let stats = day_stats(store.tasks(), date, ids);
        let heading = date.format("%A, %B %-d, %Y").to_string();
        let counts = stats
            .categories
            .iter()
            .map(|(category, count)| format!("{category}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{}  {} tasks  {counts}",
            Style::new().bold().paint(heading),
            stats.total
        );
        for id in ids {
            let Some(task) = store.get_task_by_id(id) else {
                continue;
            };
            println!("  {} {}", task.time, task.description);
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Local, NaiveDate, TimeZone};
    use now::DateTimeNow;

    use crate::catalog::routine_catalog;

    use super::{day_stats, HistoryRange};

    fn ids(ids: &[&str]) -> Vec<Arc<str>> {
        ids.iter().map(|id| Arc::from(*id)).collect()
    }

    #[test]
    fn test_day_stats_groups_by_category() {
        let catalog = routine_catalog();
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let stats = day_stats(
            &catalog,
            date,
            &ids(&["morning-prayer", "noon-prayer", "breakfast"]),
        );

        assert_eq!(stats.total, 3);
        assert_eq!(
            stats.categories,
            vec![(Arc::from("Prayer"), 2), (Arc::from("Meals"), 1)]
        );
    }

    #[test]
    fn test_day_stats_skips_unknown_ids() {
        let catalog = routine_catalog();
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let stats = day_stats(&catalog, date, &ids(&["removed-task", "breakfast"]));

        assert_eq!(stats.total, 1);
        assert_eq!(stats.categories, vec![(Arc::from("Meals"), 1)]);
    }

    #[test]
    fn test_range_is_whole_days_inclusive() {
        let middle = Local.with_ymd_and_hms(2025, 3, 7, 15, 30, 0).unwrap();
        let range = HistoryRange {
            start: Some(middle.beginning_of_day()),
            end: Some(crate::utils::time::next_day_start(middle)),
        };

        assert!(range.contains(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 3, 6).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2025, 3, 8).unwrap()));

        let open = HistoryRange {
            start: None,
            end: None,
        };
        assert!(open.contains(NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()));
    }
}
