//! Application state: the month store, its persistence and the active month.

use crate::budget::{schema, BudgetRecord, BudgetStore, DefaultTablesConfig, MonthKey};
use crate::storage::{StorageBackend, STORAGE_KEY};

use super::intent::{reduce, Intent, RenderScope};
use super::services::{MonthSummary, ServiceResult, SummaryService};

/// Outcome of reading the persisted store at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadMetadata {
    /// Schema version of the document read, `None` when nothing was stored
    /// or it could not be read.
    pub schema_version: Option<u32>,
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
    /// Set when an unreadable document was discarded in favour of an empty store.
    pub reset: bool,
}

impl LoadMetadata {
    pub fn has_migrations(&self) -> bool {
        !self.migrations.is_empty()
    }
}

pub struct AppContext {
    store: BudgetStore,
    storage: Box<dyn StorageBackend>,
    defaults: DefaultTablesConfig,
    active_month: MonthKey,
}

impl AppContext {
    /// Empty context; call [`AppContext::load`] to read persisted data.
    pub fn new(
        storage: Box<dyn StorageBackend>,
        defaults: DefaultTablesConfig,
        active_month: MonthKey,
    ) -> Self {
        Self {
            store: BudgetStore::new(),
            storage,
            defaults,
            active_month,
        }
    }

    /// Loads persisted data and makes sure the active month has a record.
    pub fn bootstrap(
        storage: Box<dyn StorageBackend>,
        defaults: DefaultTablesConfig,
        active_month: MonthKey,
    ) -> (Self, LoadMetadata) {
        let mut context = Self::new(storage, defaults, active_month);
        let metadata = context.load();
        context.active_record();
        (context, metadata)
    }

    /// Replaces the in-memory store with the persisted one. Unreadable data is
    /// quarantined and replaced by an empty store; nothing is written back
    /// until the next change.
    pub fn load(&mut self) -> LoadMetadata {
        let raw = match self.storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::info!("no saved budget state, starting empty");
                self.store = BudgetStore::new();
                return LoadMetadata::default();
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to read budget state, starting empty");
                self.store = BudgetStore::new();
                return LoadMetadata {
                    reset: true,
                    ..LoadMetadata::default()
                };
            }
        };

        match schema::decode(&raw) {
            Ok(report) => {
                tracing::info!(
                    months = report.store.len(),
                    schema_version = report.schema_version,
                    migrated = report.migrations.len(),
                    "budget state loaded"
                );
                for warning in &report.warnings {
                    tracing::warn!("{warning}");
                }
                self.store = report.store;
                LoadMetadata {
                    schema_version: Some(report.schema_version),
                    migrations: report.migrations,
                    warnings: report.warnings,
                    reset: false,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "saved budget state is unreadable, starting empty");
                if let Err(quarantine_err) = self.storage.quarantine(STORAGE_KEY, &raw) {
                    tracing::warn!(error = %quarantine_err, "could not keep a copy of the unreadable state");
                }
                self.store = BudgetStore::new();
                LoadMetadata {
                    reset: true,
                    ..LoadMetadata::default()
                }
            }
        }
    }

    /// Writes the whole store. Failures are logged and reported as `false`;
    /// the in-memory state stays authoritative.
    pub fn persist(&self) -> bool {
        let result = schema::encode(&self.store)
            .and_then(|document| self.storage.set_item(STORAGE_KEY, &document));
        match result {
            Ok(()) => {
                tracing::debug!(months = self.store.len(), "budget state saved");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save budget state");
                false
            }
        }
    }

    /// Applies `intent` and persists when it changed stored data.
    pub fn dispatch(&mut self, intent: Intent) -> ServiceResult<RenderScope> {
        let persists = intent.mutates_store();
        let scope = reduce(
            &mut self.store,
            &self.defaults,
            &mut self.active_month,
            intent,
        )?;
        if persists && scope != RenderScope::Unchanged {
            self.persist();
        }
        Ok(scope)
    }

    pub fn active_month(&self) -> MonthKey {
        self.active_month
    }

    /// Record of the active month, created from defaults on first access.
    pub fn active_record(&mut self) -> &BudgetRecord {
        self.store.get_or_create(self.active_month, &self.defaults)
    }

    pub fn record(&self, month: MonthKey) -> Option<&BudgetRecord> {
        self.store.get(month)
    }

    pub fn summary(&mut self) -> MonthSummary {
        let month = self.active_month;
        SummaryService::summarize(month, self.active_record())
    }

    pub fn store(&self) -> &BudgetStore {
        &self.store
    }

    pub fn set_defaults(&mut self, defaults: DefaultTablesConfig) {
        self.defaults = defaults;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::{LineItem, Table};
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    struct Shared(Arc<MemoryStorage>);

    impl StorageBackend for Shared {
        fn get_item(&self, key: &str) -> crate::core::errors::Result<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> crate::core::errors::Result<()> {
            self.0.set_item(key, value)
        }

        fn quarantine(&self, key: &str, value: &str) -> crate::core::errors::Result<()> {
            self.0.quarantine(key, value)
        }
    }

    fn month(raw: &str) -> MonthKey {
        raw.parse().unwrap()
    }

    fn context_over(storage: Arc<MemoryStorage>) -> (AppContext, LoadMetadata) {
        AppContext::bootstrap(
            Box::new(Shared(storage)),
            DefaultTablesConfig::default(),
            month("2024-09"),
        )
    }

    #[test]
    fn empty_storage_starts_with_the_active_month_only() {
        let (context, metadata) = context_over(Arc::new(MemoryStorage::new()));
        assert_eq!(metadata, LoadMetadata::default());
        assert_eq!(context.store().len(), 1);
        assert!(context.record(month("2024-09")).is_some());
    }

    #[test]
    fn mutations_are_persisted_and_reloaded() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut context, _) = context_over(storage.clone());
        context.dispatch(Intent::SetSalary(2000.0)).unwrap();
        context
            .dispatch(Intent::AddRow {
                table: Table::Charges,
                item: LineItem::new("Internet", 30.0),
            })
            .unwrap();

        let (reloaded, metadata) = context_over(storage);
        assert_eq!(metadata.schema_version, Some(3));
        let record = reloaded.record(month("2024-09")).unwrap();
        assert_eq!(record.salary, 2000.0);
        assert_eq!(record.charges, vec![LineItem::new("Internet", 30.0)]);
    }

    #[test]
    fn selecting_a_month_does_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut context, _) = context_over(storage.clone());
        context
            .dispatch(Intent::SelectMonth(month("2024-10")))
            .unwrap();
        assert!(storage.get_item(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn corrupt_state_is_quarantined_and_replaced() {
        let storage = Arc::new(MemoryStorage::with_item(STORAGE_KEY, "{ broken"));
        let (context, metadata) = context_over(storage.clone());
        assert!(metadata.reset);
        assert_eq!(context.store().len(), 1);
        assert_eq!(storage.quarantined(STORAGE_KEY).as_deref(), Some("{ broken"));
    }

    #[test]
    fn legacy_state_reports_migrations() {
        let legacy = r#"{"2024-08": {"salary": "1500", "rent": 500, "charges": [{"label": "Gym", "amount": 20}]}}"#;
        let storage = Arc::new(MemoryStorage::with_item(STORAGE_KEY, legacy));
        let (context, metadata) = context_over(storage);
        assert_eq!(metadata.schema_version, Some(1));
        assert!(metadata.has_migrations());
        let record = context.record(month("2024-08")).unwrap();
        assert_eq!(record.salary, 1500.0);
    }

    #[test]
    fn write_failures_keep_memory_state() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut context, _) = context_over(storage.clone());
        storage.fail_writes(true);
        let scope = context.dispatch(Intent::SetSalary(1200.0)).unwrap();
        assert_eq!(scope, RenderScope::Summary);
        assert!(!context.persist());
        assert_eq!(context.summary().totals.salary, 1200.0);
    }
}
