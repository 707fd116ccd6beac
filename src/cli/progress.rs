use std::{path::PathBuf, sync::Arc};

use ansi_term::{Colour::Green, Style};
use anyhow::Result;

use crate::{
    catalog::Task,
    utils::percentage::{completion_percentage, Percentage},
};

use super::open_default_store;

/// Per-category completion statistics.
#[derive(Debug, PartialEq, Eq)]
pub struct CategoryProgress {
    pub category: Arc<str>,
    pub completed: usize,
    pub total: usize,
}

impl CategoryProgress {
    pub fn percentage(&self) -> Percentage {
        completion_percentage(self.completed, self.total)
    }
}

/// Returns per-category statistics in catalog order, plus the overall share. Only ids
/// that exist in the catalog count towards either.
pub fn analyze_progress(
    tasks: &[Task],
    completed: &[Arc<str>],
) -> (Vec<CategoryProgress>, Percentage) {
    let mut by_category = Vec::<CategoryProgress>::new();
    let mut completed_total = 0;

    for task in tasks {
        let position = by_category
            .iter()
            .position(|entry| entry.category == task.category)
            .unwrap_or_else(|| {
                by_category.push(CategoryProgress {
                    category: task.category.clone(),
                    completed: 0,
                    total: 0,
                });
                by_category.len() - 1
            });
        let entry = &mut by_category[position];

        entry.total += 1;
        if completed.contains(&task.id) {
            entry.completed += 1;
            completed_total += 1;
        }
    }

    (by_category, completion_percentage(completed_total, tasks.len()))
}

const BAR_WIDTH: usize = 24;

fn render_bar(percentage: Percentage) -> String {
    let filled = ((*percentage / 100. * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "{}{}",
        Green.paint("█".repeat(filled)),
        "░".repeat(BAR_WIDTH - filled)
    )
}

/// Command to process `progress`. Prints the overall bar and one bar per category.
pub async fn process_progress_command(dir: PathBuf) -> Result<()> {
    let store = open_default_store(dir).await?;
    let (categories, overall) = analyze_progress(store.tasks(), store.completed());
    let completed_total = categories.iter().map(|entry| entry.completed).sum::<usize>();

    println!(
        "{:<10} {:>3}%  {}  {} of {} tasks completed",
        Style::new().bold().paint("Overall"),
        overall.rounded(),
        render_bar(overall),
        completed_total,
        store.tasks().len()
    );
    println!();
    for entry in categories {
        println!(
            "{:<10} {:>3}%  {}  {} of {}",
            entry.category,
            entry.percentage().rounded(),
            render_bar(entry.percentage()),
            entry.completed,
            entry.total
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::catalog::Task;

    use super::analyze_progress;

    fn task(id: &str, category: &str) -> Task {
        Task {
            id: id.into(),
            time: "6:00 AM - 6:30 AM".into(),
            description: id.into(),
            category: category.into(),
            icon: "personal".into(),
        }
    }

    fn ids(ids: &[&str]) -> Vec<Arc<str>> {
        ids.iter().map(|id| Arc::from(*id)).collect()
    }

    #[test]
    fn test_three_task_scenario() {
        let tasks = vec![task("a", "One"), task("b", "One"), task("c", "Two")];

        let (_, overall) = analyze_progress(&tasks, &ids(&["a", "b"]));
        assert_eq!(overall.rounded(), 67);

        let (_, overall) = analyze_progress(&tasks, &ids(&["a", "b", "c"]));
        assert_eq!(overall.rounded(), 100);
    }

    #[test]
    fn test_per_category_counts() {
        let tasks = vec![task("a", "One"), task("b", "One"), task("c", "Two")];
        let (categories, _) = analyze_progress(&tasks, &ids(&["a", "c"]));

        assert_eq!(categories.len(), 2);
        assert_eq!(&*categories[0].category, "One");
        assert_eq!((categories[0].completed, categories[0].total), (1, 2));
        assert_eq!(categories[0].percentage().rounded(), 50);
        assert_eq!((categories[1].completed, categories[1].total), (1, 1));
    }

    #[test]
    fn test_empty_catalog_is_zero_percent() {
        let (categories, overall) = analyze_progress(&[], &ids(&[]));
        assert!(categories.is_empty());
        assert_eq!(overall.rounded(), 0);
    }

    #[test]
    fn test_unknown_ids_do_not_count() {
        let tasks = vec![task("a", "One")];
        let (categories, overall) = analyze_progress(&tasks, &ids(&["ghost"]));
        assert_eq!(categories[0].completed, 0);
        assert_eq!(overall.rounded(), 0);
    }
}
