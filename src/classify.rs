//! Worksheet classification by name.

use crate::types::EntityKind;

/// Substring rules, checked in order; the first hit wins.
const RULES: [(&str, EntityKind); 3] = [
    ("client", EntityKind::Client),
    ("worker", EntityKind::Worker),
    ("tasks", EntityKind::Task),
];

/// Map a worksheet name (or the file name for single-sheet formats) to an entity kind.
///
/// Matching is case-insensitive substring containment in priority order: `client`, then
/// `worker`, then `tasks`. A name containing both `client` and `worker` is a client sheet.
/// Returns `None` for names that match nothing; such sheets are skipped.
pub fn classify(name: &str) -> Option<EntityKind> {
    let name = name.to_lowercase();
    RULES
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|&(_, kind)| kind)
}

#[cfg(test)]
mod tests {
    use super::classify;
    use crate::types::EntityKind;

    #[test]
    fn matches_each_kind() {
        assert_eq!(classify("Clients"), Some(EntityKind::Client));
        assert_eq!(classify("workers.csv"), Some(EntityKind::Worker));
        assert_eq!(classify("Tasks"), Some(EntityKind::Task));
    }

    #[test]
    fn client_wins_over_worker() {
        assert_eq!(classify("ClientWorkerList"), Some(EntityKind::Client));
        assert_eq!(classify("worker_client"), Some(EntityKind::Client));
    }

    #[test]
    fn worker_wins_over_tasks() {
        assert_eq!(classify("WorkerTasks"), Some(EntityKind::Worker));
    }

    #[test]
    fn singular_task_is_not_classified() {
        assert_eq!(classify("Task"), None);
        assert_eq!(classify("Sheet1"), None);
        assert_eq!(classify(""), None);
    }
}
