use std::{collections::BTreeMap, fmt::Display, path::PathBuf};

use ansi_term::{Colour::Green, Style};
use anyhow::Result;
use chrono::{NaiveTime, Timelike};
use clap::CommandFactory;

use crate::{catalog::Task, utils::time::parse_display_start};

use super::{open_default_store, Args};

/// Named span of the day used to group the schedule view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DayPeriod {
    Morning,
    Noon,
    Afternoon,
    Evening,
    Night,
}

impl DayPeriod {
    pub const ORDERED: [DayPeriod; 5] = [
        DayPeriod::Morning,
        DayPeriod::Noon,
        DayPeriod::Afternoon,
        DayPeriod::Evening,
        DayPeriod::Night,
    ];

    /// Noon from 12:00 PM, Afternoon from 3:00 PM, Evening from 5:30 PM, Night from
    /// 7:00 PM or before 4:00 AM. Everything else is Morning.
    pub fn of(time: NaiveTime) -> DayPeriod {
        let minutes = time.hour() * 60 + time.minute();
        match minutes {
            720..900 => DayPeriod::Noon,
            900..1050 => DayPeriod::Afternoon,
            1050..1140 => DayPeriod::Evening,
            m if m >= 1140 || m < 240 => DayPeriod::Night,
            _ => DayPeriod::Morning,
        }
    }
}

impl Display for DayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayPeriod::Morning => write!(f, "Morning"),
            DayPeriod::Noon => write!(f, "Noon"),
            DayPeriod::Afternoon => write!(f, "Afternoon"),
            DayPeriod::Evening => write!(f, "Evening"),
            DayPeriod::Night => write!(f, "Night"),
        }
    }
}

fn icon_symbol(icon: &str) -> &'static str {
    match icon {
        "prayer" => "🕌",
        "meal" => "🍽️",
        "study" => "📚",
        "work" => "💼",
        "rest" => "😴",
        "exercise" => "🏃",
        "family" => "👨‍👩‍👧‍👦",
        "personal" => "🧘",
        _ => "📝",
    }
}

/// Groups tasks into periods of the day. A task whose display time doesn't parse lands
/// in Morning.
pub fn group_by_period<'t>(tasks: &[&'t Task]) -> BTreeMap<DayPeriod, Vec<&'t Task>> {
    let mut grouped = BTreeMap::<DayPeriod, Vec<&Task>>::new();
    for task in tasks {
        let period = parse_display_start(&task.time)
            .map(DayPeriod::of)
            .unwrap_or(DayPeriod::Morning);
        grouped.entry(period).or_default().push(task);
    }
    grouped
}

/// Command to process `today`. Prints the schedule with completion marks, grouped by
/// period of day, optionally narrowed to one category.
pub async fn process_today_command(dir: PathBuf, category: Option<String>) -> Result<()> {
    let store = open_default_store(dir).await?;

    if let Some(category) = category.as_deref() {
        if !store.categories().iter().any(|c| &**c == category) {
            return Err(Args::command()
                .error(
                    clap::error::ErrorKind::ValueValidation,
                    format!("Unknown category {category}"),
                )
                .into());
        }
    }

    let tasks = store.filter_by_category(category.as_deref());
    let completed = tasks
        .iter()
        .filter(|task| store.is_completed(&task.id))
        .count();
    let grouped = group_by_period(&tasks);

    for period in DayPeriod::ORDERED {
        let Some(tasks) = grouped.get(&period) else {
            continue;
        };
        println!("{}", Style::new().bold().paint(period.to_string()));
        for task in tasks {
            let mark = if store.is_completed(&task.id) {
                Green.paint("✓").to_string()
            } else {
                " ".to_string()
            };
            println!(
                "  [{mark}] {} {:<19}  {} ({})",
                icon_symbol(&task.icon),
                task.time,
                task.description,
                task.id
            );
        }
        println!();
    }

    println!("{completed} of {} tasks completed", tasks.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use crate::catalog::{routine_catalog, Task};

    use super::{group_by_period, DayPeriod};

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_period_boundaries() {
        assert_eq!(DayPeriod::of(at(11, 59)), DayPeriod::Morning);
        assert_eq!(DayPeriod::of(at(12, 0)), DayPeriod::Noon);
        assert_eq!(DayPeriod::of(at(14, 59)), DayPeriod::Noon);
        assert_eq!(DayPeriod::of(at(15, 0)), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::of(at(17, 29)), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::of(at(17, 30)), DayPeriod::Evening);
        assert_eq!(DayPeriod::of(at(18, 59)), DayPeriod::Evening);
        assert_eq!(DayPeriod::of(at(19, 0)), DayPeriod::Night);
        assert_eq!(DayPeriod::of(at(3, 59)), DayPeriod::Night);
        assert_eq!(DayPeriod::of(at(4, 0)), DayPeriod::Morning);
    }

    #[test]
    fn test_grouping_keeps_catalog_order_within_period() {
        let catalog = routine_catalog();
        let tasks = catalog.iter().collect::<Vec<_>>();
        let grouped = group_by_period(&tasks);

        let morning = grouped.get(&DayPeriod::Morning).unwrap();
        assert_eq!(&*morning[0].id, "morning-prayer");
        // the late-night sleep block wraps around into Night
        assert!(grouped
            .get(&DayPeriod::Night)
            .unwrap()
            .iter()
            .any(|task| &*task.id == "sleep"));
    }

    #[test]
    fn test_unparseable_time_lands_in_morning() {
        let task = Task {
            id: "odd".into(),
            time: "whenever".into(),
            description: "No particular time".into(),
            category: "Personal".into(),
            icon: "personal".into(),
        };
        let tasks = vec![&task];
        let grouped = group_by_period(&tasks);
        assert!(grouped.contains_key(&DayPeriod::Morning));
    }
}
