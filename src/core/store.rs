// src/core/store.rs

//! Where finished reports live once the analysis returns.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::core::models::AnalysisReport;

/// Store-by-id / retrieve-by-id. Reports are never updated or removed by the engine.
pub trait ReportStore: Send + Sync {
    fn save(&self, report: &AnalysisReport);

    fn load(&self, id: &str) -> Option<AnalysisReport>;
}

/// Process-lifetime store backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: RwLock<HashMap<String, AnalysisReport>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.read().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportStore for InMemoryReportStore {
    fn save(&self, report: &AnalysisReport) {
        // A poisoned lock only means another writer panicked mid-insert; the map is still usable.
        let mut reports = self.reports.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        reports.insert(report.id.clone(), report.clone());
    }

    fn load(&self, id: &str) -> Option<AnalysisReport> {
        let reports = self.reports.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        reports.get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{impact, knowledge_base};
    use crate::core::models::{PortOutcome, PortStatus, ProbeResult};
    use chrono::Utc;

    fn report(id: &str) -> AnalysisReport {
        let result = ProbeResult::unreachable("example.com", 443, "https", PortStatus::closed(PortOutcome::Error, None));
        AnalysisReport {
            id: id.to_string(),
            url: "https://example.com".to_string(),
            ssl_grade: result.ssl_grade,
            security_score: 0,
            issues: knowledge_base::extract_issues(&result),
            business_impact: impact::estimate(result.ssl_grade),
            recommendations: knowledge_base::recommendations(&result, result.ssl_grade),
            created_at: Utc::now(),
            ssl_result: result,
        }
    }

    #[test]
    fn saves_and_loads_by_id() {
        let store = InMemoryReportStore::new();
        assert!(store.is_empty());
        store.save(&report("a"));
        store.save(&report("b"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.load("a").map(|r| r.id), Some("a".to_string()));
        assert!(store.load("missing").is_none());
    }

    #[test]
    fn shared_across_threads() {
        let store = std::sync::Arc::new(InMemoryReportStore::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.save(&report(&i.to_string())))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn counts_survive_a_poisoned_lock() {
        let store = std::sync::Arc::new(InMemoryReportStore::new());
        store.save(&report("kept"));

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.reports.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(store.reports.is_poisoned());
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        assert!(store.load("kept").is_some());
        store.save(&report("after"));
        assert_eq!(store.len(), 2);
    }
}
