//! Integration tests for the full audit/clearance/stats pipeline.
//!
//! Tests: domain mutation → audit trail → aggregation/report.
//!
//! Verifies:
//! - every clearance mutation leaves exactly the expected trail entries
//! - idempotent membership changes do not audit
//! - batch function creation degrades instead of propagating failure
//! - the stats report is a pure function of the recorded window

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use opsledger_audit::{
        ActivityLogEntry, AuditEvent, AuditStore, AuditTrail, LogFilter, ResourceType,
    };
    use opsledger_clearance::{
        BatchCreate, ClearanceService, FunctionStore, LevelId, NewClearanceLevel,
        NewFunctionPermission,
    };
    use opsledger_core::{
        ActorEmail, DomainError, DomainResult, FunctionId, ProductId, TimeRange,
    };
    use opsledger_stats::{order_placed, OrderItem, StatsService};

    use crate::audit_store::InMemoryAuditStore;
    use crate::clearance_store::{InMemoryClearanceStore, InMemoryFunctionStore};

    fn admin() -> ActorEmail {
        ActorEmail::new("admin@example.com")
    }

    fn new_level(level: i64, name: &str) -> NewClearanceLevel {
        NewClearanceLevel {
            level: LevelId::new(level),
            name: name.to_string(),
            description: None,
            allowed_functions: vec![],
        }
    }

    fn new_function(id: &str, name: &str) -> NewFunctionPermission {
        NewFunctionPermission {
            id: FunctionId::new(id),
            name: name.to_string(),
            description: None,
            category: None,
        }
    }

    fn setup() -> (
        Arc<InMemoryAuditStore>,
        ClearanceService<InMemoryClearanceStore, InMemoryFunctionStore>,
    ) {
        opsledger_observability::init();

        let audit = InMemoryAuditStore::arc();
        let service = ClearanceService::new(
            InMemoryClearanceStore::arc(),
            InMemoryFunctionStore::arc(),
            AuditTrail::new(audit.clone()),
        );
        (audit, service)
    }

    async fn admin_entries(audit: &Arc<InMemoryAuditStore>) -> Vec<ActivityLogEntry> {
        audit.list_by_actor(&admin()).await.unwrap()
    }

    #[tokio::test]
    async fn create_level_audits_the_creation() {
        let (audit, service) = setup();

        let created = service
            .create_level(new_level(1, "warehouse"), &admin())
            .await
            .unwrap();
        assert_eq!(created.name, "warehouse");

        let entries = admin_entries(&audit).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "Created clearance level warehouse");
        assert_eq!(entries[0].resource_type, ResourceType::ClearanceLevel);
        assert_eq!(entries[0].resource_id.as_str(), "1");
        assert!(entries[0].payload.as_deref().unwrap().contains("warehouse"));
    }

    #[tokio::test]
    async fn duplicate_level_is_a_conflict_and_does_not_audit() {
        let (audit, service) = setup();
        service
            .create_level(new_level(1, "warehouse"), &admin())
            .await
            .unwrap();

        let err = service
            .create_level(new_level(1, "warehouse again"), &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(admin_entries(&audit).await.len(), 1);
    }

    #[tokio::test]
    async fn update_level_patches_partially_and_audits() {
        let (audit, service) = setup();
        service
            .create_level(
                NewClearanceLevel {
                    description: Some("floor staff".to_string()),
                    ..new_level(2, "clerk")
                },
                &admin(),
            )
            .await
            .unwrap();

        let updated = service
            .update_level(
                LevelId::new(2),
                opsledger_clearance::ClearanceLevelPatch {
                    name: Some("senior clerk".to_string()),
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "senior clerk");
        assert_eq!(updated.description.as_deref(), Some("floor staff"));

        let entries = admin_entries(&audit).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "Updated clearance level senior clerk");
    }

    #[tokio::test]
    async fn updating_absent_level_is_not_found() {
        let (audit, service) = setup();
        let err = service
            .update_level(LevelId::new(7), Default::default(), &admin())
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
        assert!(admin_entries(&audit).await.is_empty());
    }

    #[tokio::test]
    async fn delete_level_audits_with_the_captured_name() {
        let (audit, service) = setup();
        service
            .create_level(new_level(3, "supervisor"), &admin())
            .await
            .unwrap();

        service.delete_level(LevelId::new(3), &admin()).await.unwrap();

        let entries = admin_entries(&audit).await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "Deleted clearance level supervisor");
        assert_eq!(entries[0].payload, None);
        assert_eq!(
            service.get_level(LevelId::new(3)).await.unwrap_err(),
            DomainError::NotFound
        );
    }

    #[tokio::test]
    async fn deleting_absent_level_fails_not_found_with_no_audit_entry() {
        let (audit, service) = setup();

        let err = service.delete_level(LevelId::new(42), &admin()).await.unwrap_err();
        assert_eq!(err, DomainError::NotFound);
        assert!(audit.is_empty());
    }

    #[tokio::test]
    async fn adding_a_function_twice_keeps_one_membership_and_one_audit_entry() {
        let (audit, service) = setup();
        service
            .create_level(new_level(1, "warehouse"), &admin())
            .await
            .unwrap();
        let function = FunctionId::new("delete-product");

        let first = service
            .add_function_to_level(LevelId::new(1), function.clone(), &admin())
            .await
            .unwrap();
        let second = service
            .add_function_to_level(LevelId::new(1), function.clone(), &admin())
            .await
            .unwrap();

        assert_eq!(first.allowed_functions, vec![function.clone()]);
        assert_eq!(second.allowed_functions, vec![function.clone()]);

        let adds: Vec<_> = admin_entries(&audit)
            .await
            .into_iter()
            .filter(|e| e.action.starts_with("Added function"))
            .collect();
        assert_eq!(adds.len(), 1);
        assert_eq!(
            adds[0].payload.as_deref(),
            Some(r#"{"functionId":"delete-product"}"#)
        );
        assert!(service
            .has_permission(LevelId::new(1), &function)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn membership_order_is_preserved_and_new_ids_append() {
        let (_, service) = setup();
        service
            .create_level(
                NewClearanceLevel {
                    allowed_functions: vec![FunctionId::new("a"), FunctionId::new("b")],
                    ..new_level(1, "warehouse")
                },
                &admin(),
            )
            .await
            .unwrap();

        let updated = service
            .add_function_to_level(LevelId::new(1), FunctionId::new("c"), &admin())
            .await
            .unwrap();
        assert_eq!(
            updated.allowed_functions,
            vec![FunctionId::new("a"), FunctionId::new("b"), FunctionId::new("c")]
        );

        let updated = service
            .remove_function_from_level(LevelId::new(1), FunctionId::new("a"), &admin())
            .await
            .unwrap();
        assert_eq!(
            updated.allowed_functions,
            vec![FunctionId::new("b"), FunctionId::new("c")]
        );
    }

    #[tokio::test]
    async fn removing_an_absent_function_is_a_silent_noop() {
        let (audit, service) = setup();
        service
            .create_level(new_level(1, "warehouse"), &admin())
            .await
            .unwrap();

        let level = service
            .remove_function_from_level(LevelId::new(1), FunctionId::new("ghost"), &admin())
            .await
            .unwrap();

        assert!(level.allowed_functions.is_empty());
        // Only the creation was audited.
        assert_eq!(admin_entries(&audit).await.len(), 1);
    }

    #[tokio::test]
    async fn has_permission_surfaces_not_found_for_absent_level() {
        let (_, service) = setup();
        let err = service
            .has_permission(LevelId::new(99), &FunctionId::new("delete-product"))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[tokio::test]
    async fn batch_create_with_empty_input_performs_no_writes() {
        let (audit, service) = setup();

        let outcome = service.create_functions_if_not_exist(vec![], &admin()).await;

        assert_eq!(outcome, BatchCreate::NothingToDo);
        assert!(outcome.created().is_empty());
        assert!(audit.is_empty());
        assert!(service.list_functions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn batch_create_creates_only_on_the_first_call() {
        let (audit, service) = setup();
        let batch = vec![
            new_function("delete-product", "Delete product"),
            new_function("close-register", "Close register"),
        ];

        let first = service
            .create_functions_if_not_exist(batch.clone(), &admin())
            .await;
        assert_eq!(first.created().len(), 2);
        assert_eq!(admin_entries(&audit).await.len(), 2);

        let second = service.create_functions_if_not_exist(batch, &admin()).await;
        assert_eq!(second, BatchCreate::NothingToDo);
        assert_eq!(admin_entries(&audit).await.len(), 2);
        assert_eq!(service.list_functions().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn batch_create_returns_only_the_missing_subset() {
        let (_, service) = setup();
        service
            .create_function(new_function("delete-product", "Delete product"), &admin())
            .await
            .unwrap();

        let outcome = service
            .create_functions_if_not_exist(
                vec![
                    new_function("delete-product", "Delete product"),
                    new_function("close-register", "Close register"),
                ],
                &admin(),
            )
            .await;

        let created = outcome.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].id, FunctionId::new("close-register"));
    }

    /// Function store whose reads always fail, for the degraded-batch path.
    struct FailingFunctionStore;

    #[async_trait::async_trait]
    impl FunctionStore for FailingFunctionStore {
        async fn insert(
            &self,
            _function: opsledger_clearance::FunctionPermission,
        ) -> DomainResult<opsledger_clearance::FunctionPermission> {
            Err(DomainError::storage("write refused"))
        }

        async fn find(
            &self,
            _id: &FunctionId,
        ) -> DomainResult<Option<opsledger_clearance::FunctionPermission>> {
            Err(DomainError::storage("read refused"))
        }

        async fn list(&self) -> DomainResult<Vec<opsledger_clearance::FunctionPermission>> {
            Err(DomainError::storage("read refused"))
        }
    }

    #[tokio::test]
    async fn batch_create_suppresses_internal_failures() {
        let audit = InMemoryAuditStore::arc();
        let service = ClearanceService::new(
            InMemoryClearanceStore::arc(),
            Arc::new(FailingFunctionStore),
            AuditTrail::new(audit.clone()),
        );

        let outcome = service
            .create_functions_if_not_exist(
                vec![new_function("delete-product", "Delete product")],
                &admin(),
            )
            .await;

        assert_eq!(outcome, BatchCreate::Suppressed);
        assert!(outcome.created().is_empty());
        assert!(audit.is_empty());
    }

    /// Audit store that rejects every write, for the best-effort contract.
    struct FailingAuditStore;

    #[async_trait::async_trait]
    impl AuditStore for FailingAuditStore {
        async fn append(&self, _event: AuditEvent) -> DomainResult<ActivityLogEntry> {
            Err(DomainError::storage("audit backend down"))
        }

        async fn list_by_actor(
            &self,
            _actor: &ActorEmail,
        ) -> DomainResult<Vec<ActivityLogEntry>> {
            Err(DomainError::storage("audit backend down"))
        }

        async fn list_by_filter(
            &self,
            _filter: &LogFilter,
        ) -> DomainResult<Vec<ActivityLogEntry>> {
            Err(DomainError::storage("audit backend down"))
        }
    }

    #[tokio::test]
    async fn failed_audit_write_leaves_the_mutation_standing() {
        let levels = InMemoryClearanceStore::arc();
        let service = ClearanceService::new(
            levels.clone(),
            InMemoryFunctionStore::arc(),
            AuditTrail::new(Arc::new(FailingAuditStore)),
        );

        let err = service
            .create_level(new_level(1, "warehouse"), &admin())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));

        // The level was inserted before the audit step failed.
        let stored = service.get_level(LevelId::new(1)).await.unwrap();
        assert_eq!(stored.name, "warehouse");
    }

    #[tokio::test]
    async fn order_stats_reflect_the_recorded_window() {
        let audit = InMemoryAuditStore::arc();
        let trail = AuditTrail::new(audit.clone());
        let stats = StatsService::new(trail.clone());

        let clerk = ActorEmail::new("clerk@example.com");
        let other = ActorEmail::new("other@example.com");
        let placed_at = Utc::now();

        trail
            .record(order_placed(clerk.clone(), &[OrderItem::new("A", 3)], placed_at).unwrap())
            .await
            .unwrap();
        trail
            .record(order_placed(clerk.clone(), &[OrderItem::new("B", 1)], placed_at).unwrap())
            .await
            .unwrap();
        // Malformed order payload: counted, never attributed.
        trail
            .record(
                AuditEvent::new(
                    clerk.clone(),
                    "Placed order with 1 items",
                    ResourceType::Order,
                    Default::default(),
                )
                .with_payload("{broken"),
            )
            .await
            .unwrap();
        // Different resource type: invisible to the report.
        trail
            .record(AuditEvent::new(
                clerk.clone(),
                "Created product widget",
                ResourceType::Product,
                Default::default(),
            ))
            .await
            .unwrap();
        trail
            .record(order_placed(other.clone(), &[OrderItem::new("C", 5)], placed_at).unwrap())
            .await
            .unwrap();

        let range = TimeRange::new(
            Utc::now() - Duration::hours(1),
            Utc::now() + Duration::hours(1),
        );

        let rows = stats.order_stats(range, None).await.unwrap();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.order_count, 4);
        }
        let products: Vec<_> = rows.iter().map(|r| r.product_id.clone()).collect();
        assert_eq!(
            products,
            vec![
                Some(ProductId::new("A")),
                Some(ProductId::new("B")),
                Some(ProductId::new("C")),
            ]
        );

        // Actor scoping drops the other clerk's order from both maps.
        let scoped = stats.order_stats(range, Some(clerk)).await.unwrap();
        assert_eq!(scoped.len(), 2);
        for row in &scoped {
            assert_eq!(row.order_count, 3);
        }

        // Same immutable window, same report.
        let again = stats.order_stats(range, None).await.unwrap();
        assert_eq!(again, rows);
    }
}
