use anyhow::Result;
use chrono::{Datelike, NaiveDate};

use crate::utils::clock::{Clock, DefaultClock};

pub struct Quote {
    pub text: &'static str,
    pub author: &'static str,
}

const QUOTES: [Quote; 10] = [
    Quote {
        text: "The future depends on what you do today.",
        author: "Mahatma Gandhi",
    },
    Quote {
        text: "It always seems impossible until it's done.",
        author: "Nelson Mandela",
    },
    Quote {
        text: "Don't watch the clock; do what it does. Keep going.",
        author: "Sam Levenson",
    },
    Quote {
        text: "The way to get started is to quit talking and begin doing.",
        author: "Walt Disney",
    },
    Quote {
        text: "Success is not final, failure is not fatal: It is the courage to continue that counts.",
        author: "Winston Churchill",
    },
    Quote {
        text: "Believe you can and you're halfway there.",
        author: "Theodore Roosevelt",
    },
    Quote {
        text: "Your time is limited, don't waste it living someone else's life.",
        author: "Steve Jobs",
    },
    Quote {
        text: "The only way to do great work is to love what you do.",
        author: "Steve Jobs",
    },
    Quote {
        text: "Quality is not an act, it is a habit.",
        author: "Aristotle",
    },
    Quote {
        text: "The secret of getting ahead is getting started.",
        author: "Mark Twain",
    },
];

/// Quote for a given date. Stable within a day, rotates daily.
pub fn quote_of_the_day(date: NaiveDate) -> &'static Quote {
    &QUOTES[date.num_days_from_ce() as usize % QUOTES.len()]
}

/// Command to process `quote`.
pub fn process_quote_command() -> Result<()> {
    let quote = quote_of_the_day(DefaultClock.today());
    println!("\"{}\"", quote.text);
    println!("    - {}", quote.author);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::quote_of_the_day;

    #[test]
    fn test_stable_within_a_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(quote_of_the_day(date).text, quote_of_the_day(date).text);
    }

    #[test]
    fn test_rotates_across_days() {
        let d1 = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 3, 8).unwrap();
        assert_ne!(quote_of_the_day(d1).text, quote_of_the_day(d2).text);
    }
}
