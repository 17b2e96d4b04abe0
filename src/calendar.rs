//! Calendar grid for the activity heatmap.
//!
//! The grid has `weeks_to_show` columns of seven days, Sunday in row 0. The
//! last column is the week containing `today`; days after `today` in that
//! column are flagged `future` and never carry activity.
//!
//! ```text
//!         week 0   week 1   ...   week N-1
//! Sun       ·        ·              ·
//! Mon       ·        ▪              ·
//! ...
//! Sat       ·        ·              ░  ← future
//! ```
//!
//! Every cell exists whether or not a record covers it, so a grid always has
//! exactly `weeks_to_show × 7` cells.

use crate::activity::{format_date, intensity};
use crate::config::{HeatmapColorScheme, HeatmapConfig};
use crate::types::{ActivityRecord, PostSummary};
use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CalendarError {
    #[error("calendar needs at least one week")]
    NoWeeks,
    #[error("calendar range before {0} is out of the supported date range")]
    OutOfRange(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    /// `YYYY-MM-DD`
    pub date: String,
    pub count: u32,
    pub posts: Vec<PostSummary>,
    /// Intensity level 0-4.
    pub level: u8,
    pub week: usize,
    /// 0 = Sunday.
    pub weekday: usize,
    pub future: bool,
}

impl CalendarCell {
    /// Hover text: count, long date, and the titles on that day.
    pub fn tooltip(&self) -> String {
        let day = NaiveDate::parse_from_str(&self.date, crate::activity::DATE_FORMAT)
            .map(|d| d.format("%b %d, %Y").to_string())
            .unwrap_or_else(|_| self.date.clone());
        if self.count == 0 {
            return format!("No posts on {day}");
        }
        let noun = if self.count == 1 { "post" } else { "posts" };
        let mut text = format!("{} {noun} on {day}", self.count);
        if !self.posts.is_empty() {
            text.push_str("\n\nPosts:");
            for post in &self.posts {
                text.push_str("\n• ");
                text.push_str(&post.title);
            }
        }
        text
    }
}

/// One column of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarWeek {
    /// ISO week of the column's Monday, `YYYY-Www`.
    pub label: String,
    pub days: Vec<CalendarCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarGrid {
    /// First cell (a Sunday).
    pub start: String,
    pub today: String,
    pub weeks: Vec<CalendarWeek>,
}

impl CalendarGrid {
    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flat_map(|w| w.days.iter())
    }

    pub fn total_count(&self) -> u32 {
        self.cells().map(|c| c.count).sum()
    }

    /// `(week index, "Jan")` for every column whose first day starts a new
    /// month, plus column 0.
    pub fn month_labels(&self) -> Vec<(usize, String)> {
        let mut labels = Vec::new();
        let mut last_month = None;
        for (i, week) in self.weeks.iter().enumerate() {
            let Some(first) = week
                .days
                .first()
                .and_then(|c| NaiveDate::parse_from_str(&c.date, crate::activity::DATE_FORMAT).ok())
            else {
                continue;
            };
            if last_month != Some(first.month()) {
                labels.push((i, first.format("%b").to_string()));
                last_month = Some(first.month());
            }
        }
        labels
    }
}

/// Lay out `records` on a grid ending in the week that contains `today`.
pub fn build_calendar(
    records: &[ActivityRecord],
    today: NaiveDate,
    weeks_to_show: u32,
) -> Result<CalendarGrid, CalendarError> {
    if weeks_to_show == 0 {
        return Err(CalendarError::NoWeeks);
    }

    let back = u64::from(today.weekday().num_days_from_sunday())
        + u64::from(weeks_to_show - 1) * 7;
    let start = today
        .checked_sub_days(Days::new(back))
        .ok_or(CalendarError::OutOfRange(today))?;

    let by_date: HashMap<&str, &ActivityRecord> =
        records.iter().map(|r| (r.date.as_str(), r)).collect();

    let mut weeks = Vec::with_capacity(weeks_to_show as usize);
    let mut day = start;
    for week in 0..weeks_to_show as usize {
        let monday = day.checked_add_days(Days::new(1)).unwrap_or(day);
        let iso = monday.iso_week();
        let mut days = Vec::with_capacity(7);
        for weekday in 0..7 {
            let date = format_date(day);
            let future = day > today;
            let (count, posts) = match by_date.get(date.as_str()) {
                Some(r) if !future => (r.count, r.posts.clone()),
                _ => (0, Vec::new()),
            };
            days.push(CalendarCell {
                date,
                count,
                posts,
                level: intensity(count),
                week,
                weekday,
                future,
            });
            day = day
                .checked_add_days(Days::new(1))
                .ok_or(CalendarError::OutOfRange(today))?;
        }
        weeks.push(CalendarWeek {
            label: format!("{}-W{:02}", iso.year(), iso.week()),
            days,
        });
    }

    Ok(CalendarGrid {
        start: format_date(start),
        today: format_date(today),
        weeks,
    })
}

/// Post count per column, labelled by ISO week.
pub fn weekly_activity(grid: &CalendarGrid) -> Vec<(String, u32)> {
    grid.weeks
        .iter()
        .map(|w| (w.label.clone(), w.days.iter().map(|d| d.count).sum()))
        .collect()
}

const GITHUB_LIGHT: [&str; 5] = ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"];
const GITHUB_DARK: [&str; 5] = ["#0d1117", "#0e4429", "#006d32", "#26a641", "#39d353"];

/// Colors for intensity levels 0-4.
///
/// A custom palette shorter than five entries repeats its last color.
pub fn heatmap_palette(config: &HeatmapConfig, dark: bool) -> Vec<String> {
    let stock = if dark { GITHUB_DARK } else { GITHUB_LIGHT };
    match (&config.color_scheme, &config.custom_colors) {
        (HeatmapColorScheme::Custom, Some(custom)) if !custom.is_empty() => (0..5)
            .map(|i| custom[i.min(custom.len() - 1)].clone())
            .collect(),
        _ => stock.iter().map(|c| c.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::bucket_posts;
    use crate::test_helpers::post;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // 2024-01-20 is a Saturday, 2024-01-17 a Wednesday.
    const SATURDAY: &str = "2024-01-20";
    const WEDNESDAY: &str = "2024-01-17";

    #[test]
    fn cell_count_is_weeks_times_seven() {
        for weeks in [1, 4, 52, 104] {
            let grid = build_calendar(&[], date(WEDNESDAY), weeks).unwrap();
            assert_eq!(grid.cells().count(), weeks as usize * 7);
            assert!(grid.weeks.iter().all(|w| w.days.len() == 7));
        }
    }

    #[test]
    fn zero_weeks_is_an_error() {
        assert_eq!(
            build_calendar(&[], date(WEDNESDAY), 0),
            Err(CalendarError::NoWeeks)
        );
    }

    #[test]
    fn last_column_contains_today() {
        let grid = build_calendar(&[], date(WEDNESDAY), 2).unwrap();
        assert_eq!(grid.start, "2024-01-07");
        let last = &grid.weeks[1];
        assert_eq!(last.days[0].date, "2024-01-14");
        assert_eq!(last.days[3].date, WEDNESDAY);
        assert!(!last.days[3].future);
        assert!(last.days[4].future);
        assert!(last.days[6].future);
    }

    #[test]
    fn saturday_today_fills_the_grid() {
        let grid = build_calendar(&[], date(SATURDAY), 52).unwrap();
        assert!(grid.cells().all(|c| !c.future));
        assert_eq!(grid.cells().last().unwrap().date, SATURDAY);
    }

    #[test]
    fn rows_are_weekdays_from_sunday() {
        let grid = build_calendar(&[], date(WEDNESDAY), 3).unwrap();
        for cell in grid.cells() {
            let d = date(&cell.date);
            assert_eq!(cell.weekday, d.weekday().num_days_from_sunday() as usize);
        }
    }

    #[test]
    fn records_land_on_their_cells() {
        let records = bucket_posts(&[
            post("A", Some("2024-01-15"), &[]),
            post("B", Some("2024-01-15"), &[]),
            post("C", Some("2024-01-09"), &[]),
            post("Old", Some("2020-01-01"), &[]),
        ]);
        let grid = build_calendar(&records, date(WEDNESDAY), 2).unwrap();
        let monday = &grid.weeks[1].days[1];
        assert_eq!(monday.date, "2024-01-15");
        assert_eq!(monday.count, 2);
        assert_eq!(monday.level, 2);
        assert_eq!(grid.weeks[0].days[2].count, 1);
        assert_eq!(grid.total_count(), 3);
    }

    #[test]
    fn future_cells_carry_no_activity() {
        let records = bucket_posts(&[post("Scheduled", Some("2024-01-19"), &[])]);
        let grid = build_calendar(&records, date(WEDNESDAY), 1).unwrap();
        let friday = &grid.weeks[0].days[5];
        assert!(friday.future);
        assert_eq!(friday.count, 0);
        assert!(friday.posts.is_empty());
    }

    #[test]
    fn empty_days_are_present_with_zero() {
        let grid = build_calendar(&[], date(SATURDAY), 1).unwrap();
        assert!(grid.cells().all(|c| c.count == 0 && c.level == 0 && c.posts.is_empty()));
    }

    #[test]
    fn iso_week_labels() {
        let grid = build_calendar(&[], date(SATURDAY), 3).unwrap();
        let labels: Vec<_> = grid.weeks.iter().map(|w| w.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-W01", "2024-W02", "2024-W03"]);
    }

    #[test]
    fn month_labels_mark_new_months() {
        let grid = build_calendar(&[], date("2024-03-09"), 6).unwrap();
        let labels = grid.month_labels();
        assert_eq!(labels[0], (0, "Jan".to_string()));
        assert!(labels.iter().any(|(_, m)| m == "Feb"));
        assert!(labels.iter().any(|(_, m)| m == "Mar"));
    }

    #[test]
    fn tooltip_text() {
        let records = bucket_posts(&[
            post("One", Some("2024-01-15"), &[]),
            post("Two", Some("2024-01-15"), &[]),
        ]);
        let grid = build_calendar(&records, date(WEDNESDAY), 1).unwrap();
        assert_eq!(
            grid.weeks[0].days[1].tooltip(),
            "2 posts on Jan 15, 2024\n\nPosts:\n• One\n• Two"
        );
        assert_eq!(grid.weeks[0].days[0].tooltip(), "No posts on Jan 14, 2024");
    }

    #[test]
    fn weekly_totals() {
        let records = bucket_posts(&[
            post("A", Some("2024-01-08"), &[]),
            post("B", Some("2024-01-15"), &[]),
            post("C", Some("2024-01-16"), &[]),
        ]);
        let grid = build_calendar(&records, date(SATURDAY), 3).unwrap();
        assert_eq!(
            weekly_activity(&grid),
            vec![
                ("2024-W01".to_string(), 0),
                ("2024-W02".to_string(), 1),
                ("2024-W03".to_string(), 2),
            ]
        );
    }

    #[test]
    fn custom_palette_is_padded() {
        let config = HeatmapConfig {
            color_scheme: HeatmapColorScheme::Custom,
            custom_colors: Some(vec!["#000".into(), "#111".into()]),
            ..HeatmapConfig::default()
        };
        assert_eq!(
            heatmap_palette(&config, false),
            vec!["#000", "#111", "#111", "#111", "#111"]
        );
        assert_eq!(heatmap_palette(&HeatmapConfig::default(), true)[0], "#0d1117");
    }
}
