//! Read-only progress summaries for the classroom dashboard.

use serde::Serialize;

use crate::api::types::LevelId;
use crate::assets::catalog::Catalog;
use crate::core::profile::{accuracy_percent, Profile, WordRecord};

/// One pupil's report card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PupilReport {
    pub name: String,
    pub avatar: &'static str,
    pub total_points: u32,
    pub correct_word_count: u32,
    pub accuracy_percent: u32,
    pub completed_level_ids: Vec<LevelId>,
    pub earned_badge_ids: Vec<String>,
    /// History grouped by level, levels with no attempts omitted.
    pub levels: Vec<LevelHistory>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelHistory {
    pub level_id: LevelId,
    pub level_name: String,
    pub words: Vec<WordRecord>,
}

/// How many pupils finished one level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelProgress {
    pub level_id: LevelId,
    pub level_name: String,
    pub completed_by: usize,
    pub completion_percent: u32,
}

/// Class-wide totals shown across the top of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub pupil_count: usize,
    pub average_points: u32,
    pub average_accuracy_percent: u32,
    pub levels_completed: usize,
    pub levels: Vec<LevelProgress>,
}

impl PupilReport {
    pub fn new(profile: &Profile, catalog: &Catalog) -> Self {
        let levels = catalog
            .levels
            .iter()
            .filter_map(|level| {
                let words: Vec<WordRecord> = profile
                    .word_history
                    .iter()
                    .filter(|r| r.level_id == level.id)
                    .cloned()
                    .collect();
                if words.is_empty() {
                    None
                } else {
                    Some(LevelHistory {
                        level_id: level.id,
                        level_name: level.name.clone(),
                        words,
                    })
                }
            })
            .collect();

        Self {
            name: profile.name.clone(),
            avatar: profile.avatar.id(),
            total_points: profile.total_points,
            correct_word_count: profile.correct_word_count,
            accuracy_percent: accuracy_percent(&profile.word_history),
            completed_level_ids: profile.completed_level_ids.iter().copied().collect(),
            earned_badge_ids: profile.earned_badge_ids.clone(),
            levels,
        }
    }

    /// Pretty JSON for the dashboard's export button.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn rounded_mean(total: u64, count: usize) -> u32 {
    if count == 0 {
        0
    } else {
        (total as f64 / count as f64).round() as u32
    }
}

impl ClassSummary {
    pub fn new(profiles: &[Profile], catalog: &Catalog) -> Self {
        let pupil_count = profiles.len();
        let points: u64 = profiles.iter().map(|p| p.total_points as u64).sum();
        let accuracy: u64 = profiles
            .iter()
            .map(|p| accuracy_percent(&p.word_history) as u64)
            .sum();
        let levels_completed = profiles.iter().map(|p| p.completed_level_ids.len()).sum();

        let levels = catalog
            .levels
            .iter()
            .map(|level| {
                let completed_by = profiles
                    .iter()
                    .filter(|p| p.completed_level_ids.contains(&level.id))
                    .count();
                LevelProgress {
                    level_id: level.id,
                    level_name: level.name.clone(),
                    completed_by,
                    completion_percent: rounded_mean(completed_by as u64 * 100, pupil_count),
                }
            })
            .collect();

        Self {
            pupil_count,
            average_points: rounded_mean(points, pupil_count),
            average_accuracy_percent: rounded_mean(accuracy, pupil_count),
            levels_completed,
            levels,
        }
    }
}

/// Everything the dashboard screen needs in one document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub summary: ClassSummary,
    pub pupils: Vec<PupilReport>,
}

impl Dashboard {
    pub fn new(profiles: &[Profile], catalog: &Catalog) -> Self {
        Self {
            summary: ClassSummary::new(profiles, catalog),
            pupils: profiles.iter().map(|p| PupilReport::new(p, catalog)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::Avatar;

    fn record(word: &str, correct: bool, level: u32) -> WordRecord {
        WordRecord {
            word: word.to_string(),
            was_correct: correct,
            attempt_count: 1,
            level_id: LevelId(level),
        }
    }

    fn pupil(name: &str, points: u32, levels: &[u32], history: Vec<WordRecord>) -> Profile {
        let mut p = Profile::new(name, Avatar::Cat);
        p.total_points = points;
        p.completed_level_ids = levels.iter().map(|&l| LevelId(l)).collect();
        p.word_history = history;
        p
    }

    #[test]
    fn pupil_report_groups_history_by_level() {
        let catalog = Catalog::builtin().unwrap();
        let p = pupil(
            "Alice",
            87,
            &[1, 2],
            vec![
                record("cat", true, 1),
                record("sun", true, 1),
                record("fish", false, 2),
                record("tree", true, 2),
            ],
        );
        let report = PupilReport::new(&p, &catalog);
        assert_eq!(report.accuracy_percent, 75);
        assert_eq!(report.levels.len(), 2);
        assert_eq!(report.levels[0].level_name, "Enchanted Forest");
        assert_eq!(report.levels[1].words.len(), 2);
        assert!(report.to_json().unwrap().contains("\"Alice\""));
    }

    #[test]
    fn class_summary_averages() {
        let catalog = Catalog::builtin().unwrap();
        let pupils = vec![
            pupil("Alice", 87, &[1, 2], vec![record("cat", true, 1), record("dog", false, 1)]),
            pupil("Ben", 42, &[1], vec![record("cat", true, 1)]),
            pupil("Chloe", 130, &[1, 2, 3], vec![]),
        ];
        let summary = ClassSummary::new(&pupils, &catalog);
        assert_eq!(summary.pupil_count, 3);
        assert_eq!(summary.average_points, 86);
        // (50 + 100 + 0) / 3
        assert_eq!(summary.average_accuracy_percent, 50);
        assert_eq!(summary.levels_completed, 6);
        assert_eq!(summary.levels[0].completion_percent, 100);
        assert_eq!(summary.levels[1].completion_percent, 67);
        assert_eq!(summary.levels[3].completed_by, 0);
    }

    #[test]
    fn empty_class_is_all_zero() {
        let catalog = Catalog::builtin().unwrap();
        let dashboard = Dashboard::new(&[], &catalog);
        assert_eq!(dashboard.summary.pupil_count, 0);
        assert_eq!(dashboard.summary.average_points, 0);
        assert!(dashboard.summary.levels.iter().all(|l| l.completion_percent == 0));
        assert!(dashboard.pupils.is_empty());
    }
}
