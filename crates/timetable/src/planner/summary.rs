/// Per-course session counts over a catalog
use super::types::SessionRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub subject: String,
    pub teacher: String,
    #[serde(rename = "class")]
    pub class_name: String,
    /// Number of catalog sessions for this course.
    pub sessions: usize,
}

/// Groups the catalog by (subject, teacher, class), in first-seen order.
///
/// Records missing any of the three fields are skipped.
pub fn summarize(catalog: &[SessionRecord]) -> Vec<CourseSummary> {
    let mut index: HashMap<(&str, &str, &str), usize> = HashMap::new();
    let mut summaries: Vec<CourseSummary> = Vec::new();

    for record in catalog {
        let (Some(subject), Some(teacher), Some(class_name)) = (
            record.subject.as_deref(),
            record.teacher.as_deref(),
            record.class_name.as_deref(),
        ) else {
            continue;
        };

        match index.get(&(subject, teacher, class_name)) {
            Some(&i) => summaries[i].sessions += 1,
            None => {
                index.insert((subject, teacher, class_name), summaries.len());
                summaries.push(CourseSummary {
                    subject: subject.to_string(),
                    teacher: teacher.to_string(),
                    class_name: class_name.to_string(),
                    sessions: 1,
                });
            }
        }
    }

    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sessions_per_course() {
        let catalog = vec![
            SessionRecord::new("Phy", "B", "C2", "Monday", "09:00 to 10:30"),
            SessionRecord::new("Math", "A", "C1", "Monday", "10:40 to 12:10"),
            SessionRecord::new("Phy", "B", "C2", "Wednesday", "10:40 to 12:10"),
            SessionRecord::new("Phy", "B", "C3", "Thursday", "10:40 to 12:10"),
        ];

        let summaries = summarize(&catalog);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].subject, "Phy");
        assert_eq!(summaries[0].sessions, 2);
        assert_eq!(summaries[1].subject, "Math");
        assert_eq!(summaries[2].class_name, "C3");
    }

    #[test]
    fn test_incomplete_records_are_skipped() {
        let catalog = vec![SessionRecord {
            subject: Some("Phy".to_string()),
            ..Default::default()
        }];

        assert!(summarize(&catalog).is_empty());
    }
}
