//! Journal d'activité des commandes opérateur (page Logs du dashboard).
//! Plus récent en tête, borné à `capacity`, recherche + pagination.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: String,
    pub user_name: String,
    pub action: String,
    pub machine_id: Option<String>,
    pub machine_name: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub details: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<usize>, // 1-based
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPage {
    pub items: Vec<ActivityEntry>,
    pub page: usize,
    pub total_pages: usize,
    pub total_matches: usize,
}

pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    page_size: usize,
}

impl ActivityLog {
    pub fn new(capacity: usize, page_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn record(
        &mut self,
        user_name: &str,
        action: &str,
        machine: Option<(&str, &str)>,
        details: String,
    ) -> ActivityEntry {
        let entry = ActivityEntry {
            id: Uuid::new_v4().to_string(),
            user_name: user_name.to_string(),
            action: action.to_string(),
            machine_id: machine.map(|(id, _)| id.to_string()),
            machine_name: machine.map(|(_, name)| name.to_string()),
            timestamp: OffsetDateTime::now_utc(),
            details,
        };
        self.entries.push_front(entry.clone());
        self.entries.truncate(self.capacity);
        entry
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn query(&self, query: &ActivityQuery) -> ActivityPage {
        let needle = query.q.as_deref().map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());
        let matches: Vec<&ActivityEntry> = self
            .entries
            .iter()
            .filter(|e| match &needle {
                None => true,
                Some(q) => {
                    e.action.to_lowercase().contains(q)
                        || e.user_name.to_lowercase().contains(q)
                        || e.details.to_lowercase().contains(q)
                        || e.machine_name.as_deref().is_some_and(|n| n.to_lowercase().contains(q))
                }
            })
            .collect();

        let total_matches = matches.len();
        let total_pages = total_matches.div_ceil(self.page_size);
        let page = query.page.unwrap_or(1).max(1);
        let items = matches
            .into_iter()
            .skip((page - 1) * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();

        ActivityPage { items, page, total_pages, total_matches }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> ActivityLog {
        let mut log = ActivityLog::new(200, 10);
        for i in 0..n {
            let user = if i % 2 == 0 { "John Smith" } else { "Sarah Chen" };
            log.record(user, "Machine Start", Some(("m1", "Robot Arm A1")), format!("command #{i}"));
        }
        log
    }

    #[test]
    fn test_pagination() {
        let log = filled(25);
        let first = log.query(&ActivityQuery::default());
        assert_eq!(first.total_matches, 25);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].details, "command #24");

        let last = log.query(&ActivityQuery { q: None, page: Some(3) });
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[4].details, "command #0");

        let beyond = log.query(&ActivityQuery { q: None, page: Some(9) });
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn test_search() {
        let mut log = filled(4);
        log.record("Admin", "Emergency Shutdown", Some(("m5", "Drive Motor M1")), "operator request".into());

        let hits = log.query(&ActivityQuery { q: Some("sarah".into()), page: None });
        assert_eq!(hits.total_matches, 2);

        let hits = log.query(&ActivityQuery { q: Some("drive motor".into()), page: None });
        assert_eq!(hits.total_matches, 1);
        assert_eq!(hits.items[0].action, "Emergency Shutdown");
    }

    #[test]
    fn test_capacity() {
        let mut log = ActivityLog::new(3, 10);
        for i in 0..5 {
            log.record("u", "Mode Change", None, format!("{i}"));
        }
        assert_eq!(log.len(), 3);
        let page = log.query(&ActivityQuery::default());
        assert_eq!(page.items[0].details, "4");
        assert_eq!(page.items[0].machine_id, None);
        assert_ne!(page.items[0].id, page.items[1].id);
    }
}
