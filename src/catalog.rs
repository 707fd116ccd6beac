use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single entry of the daily routine. The catalog is fixed at startup; tasks are never
/// created or destroyed at runtime, only marked complete for a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Arc<str>,
    /// Display-formatted range, for example "6:00 AM - 6:30 AM".
    pub time: Arc<str>,
    pub description: Arc<str>,
    pub category: Arc<str>,
    /// Symbolic icon key, resolved by views. Unknown keys fall back to a generic symbol.
    pub icon: Arc<str>,
}

fn task(id: &str, time: &str, description: &str, category: &str, icon: &str) -> Task {
    Task {
        id: id.into(),
        time: time.into(),
        description: description.into(),
        category: category.into(),
        icon: icon.into(),
    }
}

/// The built-in routine, ordered by start time.
pub fn routine_catalog() -> Vec<Task> {
    vec![
        task(
            "morning-prayer",
            "5:30 AM - 5:45 AM",
            "Morning prayer and quiet reflection",
            "Prayer",
            "prayer",
        ),
        task(
            "morning-exercise",
            "6:00 AM - 6:30 AM",
            "Stretching and a short run",
            "Exercise",
            "exercise",
        ),
        task("breakfast", "6:30 AM - 7:00 AM", "Breakfast", "Meals", "meal"),
        task(
            "study-block",
            "7:00 AM - 8:30 AM",
            "Focused study block",
            "Study",
            "study",
        ),
        task(
            "work-morning",
            "9:00 AM - 12:00 PM",
            "Morning work block",
            "Work",
            "work",
        ),
        task("noon-prayer", "12:00 PM - 12:15 PM", "Noon prayer", "Prayer", "prayer"),
        task(
            "lunch",
            "12:30 PM - 1:15 PM",
            "Lunch away from the desk",
            "Meals",
            "meal",
        ),
        task(
            "midday-rest",
            "1:15 PM - 1:45 PM",
            "Short nap or quiet rest",
            "Rest",
            "rest",
        ),
        task(
            "work-afternoon",
            "2:00 PM - 5:00 PM",
            "Afternoon work block",
            "Work",
            "work",
        ),
        task(
            "afternoon-prayer",
            "3:30 PM - 3:45 PM",
            "Afternoon prayer",
            "Prayer",
            "prayer",
        ),
        task(
            "evening-walk",
            "5:30 PM - 6:00 PM",
            "Walk outside",
            "Exercise",
            "exercise",
        ),
        task(
            "family-dinner",
            "6:30 PM - 7:30 PM",
            "Dinner with the family",
            "Family",
            "family",
        ),
        task(
            "evening-prayer",
            "7:45 PM - 8:00 PM",
            "Evening prayer",
            "Prayer",
            "prayer",
        ),
        task(
            "evening-reading",
            "8:00 PM - 9:00 PM",
            "Reading, no screens",
            "Personal",
            "personal",
        ),
        task(
            "journal",
            "9:00 PM - 9:30 PM",
            "Journal and plan tomorrow",
            "Personal",
            "personal",
        ),
        task("sleep", "10:00 PM - 5:15 AM", "Lights out", "Rest", "rest"),
    ]
}
