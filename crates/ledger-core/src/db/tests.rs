//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::MonthToken;
    use crate::test_utils::TestDb;
    use chrono::NaiveDate;

    fn month(s: &str) -> MonthToken {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_db() {
        let db = TestDb::new().unwrap();
        assert!(db.list_transactions().unwrap().is_empty());
        assert!(db.list_budgets(None).unwrap().is_empty());
    }

    #[test]
    fn test_schema_has_unique_budget_pair() {
        let db = TestDb::new().unwrap();
        let conn = db.conn().unwrap();

        let columns: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('budgets') WHERE name IN ('id', 'month', 'category', 'amount', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(columns, 5, "budgets table should have 5 expected columns");

        conn.execute(
            "INSERT INTO budgets (month, category, amount) VALUES ('2025-04', 'Food', 1)",
            [],
        )
        .unwrap();
        let duplicate = conn.execute(
            "INSERT INTO budgets (month, category, amount) VALUES ('2025-04', 'Food', 2)",
            [],
        );
        assert!(duplicate.is_err(), "UNIQUE(month, category) should reject duplicates");
    }

    #[test]
    fn test_insert_transaction_assigns_id_and_created_at() {
        let db = TestDb::new().unwrap();
        let tx = db
            .add_transaction("2025-04-05", Category::Food, "Groceries", 40.0)
            .unwrap();

        assert!(tx.id > 0);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2025, 4, 5).unwrap());
        assert_eq!(tx.category, Category::Food);
        assert_eq!(tx.description, "Groceries");
        assert_eq!(tx.amount, 40.0);

        let fetched = db.get_transaction(tx.id).unwrap().unwrap();
        assert_eq!(fetched, tx);
    }

    #[test]
    fn test_list_transactions_newest_first() {
        let db = TestDb::new().unwrap();
        let first = db
            .add_transaction("2025-04-10", Category::Food, "First", 1.0)
            .unwrap();
        let second = db
            .add_transaction("2025-04-01", Category::Bills, "Second", 2.0)
            .unwrap();
        let third = db
            .add_transaction("2025-03-15", Category::Other, "Third", 3.0)
            .unwrap();

        let ids: Vec<i64> = db.list_transactions().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[test]
    fn test_month_scope_excludes_next_month() {
        let db = TestDb::new().unwrap();
        let start = db
            .add_transaction("2025-02-01", Category::Food, "Start", 1.0)
            .unwrap();
        let end = db
            .add_transaction("2025-02-28", Category::Food, "End", 2.0)
            .unwrap();
        db.add_transaction("2025-03-01", Category::Food, "March", 3.0)
            .unwrap();
        db.add_transaction("2025-01-31", Category::Food, "January", 4.0)
            .unwrap();

        let feb = db.list_transactions_for_month(&month("2025-02")).unwrap();
        let ids: Vec<i64> = feb.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![end.id, start.id]);
    }

    #[test]
    fn test_leap_day_is_in_month() {
        let db = TestDb::new().unwrap();
        let leap = db
            .add_transaction("2024-02-29", Category::Bills, "Leap rent", 900.0)
            .unwrap();

        let feb = db.list_transactions_for_month(&month("2024-02")).unwrap();
        assert_eq!(feb.len(), 1);
        assert_eq!(feb[0].id, leap.id);
    }

    #[test]
    fn test_insert_then_delete_round_trip() {
        let db = TestDb::new().unwrap();
        let tx = db
            .add_transaction("2025-04-05", Category::Transport, "Bus pass", 25.0)
            .unwrap();

        let april = db.list_transactions_for_month(&month("2025-04")).unwrap();
        assert_eq!(april.iter().filter(|t| t.id == tx.id).count(), 1);

        assert_eq!(db.delete_transaction(tx.id).unwrap(), tx.id);

        let april = db.list_transactions_for_month(&month("2025-04")).unwrap();
        assert!(april.iter().all(|t| t.id != tx.id));
        assert!(db.get_transaction(tx.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_transaction_is_not_found() {
        let db = TestDb::new().unwrap();
        let kept = db
            .add_transaction("2025-04-05", Category::Food, "Lunch", 12.0)
            .unwrap();

        let err = db.delete_transaction(kept.id + 1000).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let all = db.list_transactions().unwrap();
        assert_eq!(all, vec![kept]);
    }

    #[test]
    fn test_upsert_creates_then_updates_in_place() {
        let db = TestDb::new().unwrap();
        let new_budget = |amount| NewBudget {
            month: month("2025-04"),
            category: Category::Food,
            amount,
        };

        let first = db.upsert_budget(&new_budget(100.0)).unwrap();
        assert!(first.is_created());

        let second = db.upsert_budget(&new_budget(150.0)).unwrap();
        assert!(!second.is_created());

        let third = db.upsert_budget(&new_budget(80.0)).unwrap();
        assert!(matches!(third, BudgetUpsert::Updated(_)));

        let budgets = db.list_budgets(Some(&month("2025-04"))).unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].amount, 80.0);
        assert_eq!(budgets[0].id, first.budget().id);
        assert_eq!(budgets[0].created_at, first.budget().created_at);
    }

    #[test]
    fn test_upsert_distinct_pairs_are_separate_rows() {
        let db = TestDb::new().unwrap();
        db.set_budget("2025-04", Category::Food, 100.0).unwrap();
        db.set_budget("2025-04", Category::Bills, 300.0).unwrap();
        db.set_budget("2025-05", Category::Food, 120.0).unwrap();

        assert_eq!(db.list_budgets(Some(&month("2025-04"))).unwrap().len(), 2);
        assert_eq!(db.list_budgets(Some(&month("2025-05"))).unwrap().len(), 1);
        assert_eq!(db.list_budgets(None).unwrap().len(), 3);
        assert!(db.list_budgets(Some(&month("2025-06"))).unwrap().is_empty());
    }

    #[test]
    fn test_list_budgets_newest_first() {
        let db = TestDb::new().unwrap();
        let food = db.set_budget("2025-04", Category::Food, 100.0).unwrap();
        let bills = db.set_budget("2025-04", Category::Bills, 300.0).unwrap();

        let ids: Vec<i64> = db
            .list_budgets(Some(&month("2025-04")))
            .unwrap()
            .iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec![bills.id, food.id]);
    }

    #[test]
    fn test_find_insert_update_budget() {
        let db = TestDb::new().unwrap();
        assert!(db
            .find_budget(&month("2025-04"), Category::Entertainment)
            .unwrap()
            .is_none());

        let inserted = db
            .insert_budget(&NewBudget {
                month: month("2025-04"),
                category: Category::Entertainment,
                amount: 60.0,
            })
            .unwrap();

        let found = db
            .find_budget(&month("2025-04"), Category::Entertainment)
            .unwrap()
            .unwrap();
        assert_eq!(found, inserted);

        let updated = db.update_budget_amount(&found, 75.5).unwrap();
        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.created_at, inserted.created_at);
        assert_eq!(updated.amount, 75.5);
    }

    #[test]
    fn test_insert_budget_rejects_existing_pair() {
        let db = TestDb::new().unwrap();
        db.set_budget("2025-04", Category::Food, 100.0).unwrap();

        let result = db.insert_budget(&NewBudget {
            month: month("2025-04"),
            category: Category::Food,
            amount: 5.0,
        });
        assert!(matches!(result, Err(Error::Database(_))));
        assert_eq!(db.list_budgets(None).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_budget() {
        let db = TestDb::new().unwrap();
        let budget = db.set_budget("2025-04", Category::Food, 100.0).unwrap();

        assert_eq!(db.delete_budget(budget.id).unwrap(), budget.id);
        assert!(db.list_budgets(None).unwrap().is_empty());

        let err = db.delete_budget(budget.id).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_deleting_transactions_leaves_budgets() {
        let db = TestDb::new().unwrap();
        let budget = db.set_budget("2025-04", Category::Food, 100.0).unwrap();
        let tx = db
            .add_transaction("2025-04-05", Category::Food, "Lunch", 10.0)
            .unwrap();

        db.delete_transaction(tx.id).unwrap();
        assert_eq!(db.list_budgets(None).unwrap(), vec![budget]);
    }

    #[test]
    fn test_concurrent_upserts_keep_one_row() {
        let db = TestDb::new().unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let db = db.database();
                std::thread::spawn(move || {
                    db.upsert_budget(&NewBudget {
                        month: "2025-04".parse().unwrap(),
                        category: Category::Bills,
                        amount: 100.0 + i as f64,
                    })
                    .unwrap()
                })
            })
            .collect();

        let results: Vec<BudgetUpsert> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|r| r.is_created()).count(), 1);

        let budgets = db.list_budgets(Some(&month("2025-04"))).unwrap();
        assert_eq!(budgets.len(), 1);
        assert!(results.iter().all(|r| r.budget().id == budgets[0].id));
    }

    #[test]
    fn test_parse_datetime_formats() {
        let with_millis = parse_datetime("2025-04-05 10:11:12.345").unwrap();
        assert_eq!(with_millis.to_rfc3339(), "2025-04-05T10:11:12.345+00:00");

        let without_millis = parse_datetime("2025-04-05 10:11:12").unwrap();
        assert_eq!(without_millis.to_rfc3339(), "2025-04-05T10:11:12+00:00");

        assert!(matches!(parse_datetime("yesterday"), Err(Error::Validation(_))));
    }

    #[test]
    fn test_corrupt_created_at_is_reported() {
        let db = TestDb::new().unwrap();
        let conn = db.conn().unwrap();
        conn.execute(
            "INSERT INTO transactions (date, category, description, amount, created_at) VALUES ('2025-04-05', 'Food', 'Lunch', 5, 'not a time')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO budgets (month, category, amount, created_at) VALUES ('2025-04', 'Food', 100, 'not a time')",
            [],
        )
        .unwrap();

        assert!(matches!(db.list_transactions(), Err(Error::Database(_))));
        assert!(matches!(db.list_budgets(None), Err(Error::Database(_))));
    }

    #[test]
    fn test_encrypted_database_requires_matching_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encrypted.db");
        let path = path.to_string_lossy();

        {
            let db = Database::new_with_key(&path, Some("correct horse")).unwrap();
            db.insert_transaction(&NewTransaction {
                date: NaiveDate::from_ymd_opt(2025, 4, 5).unwrap(),
                category: Category::Food,
                description: "Secret snack".to_string(),
                amount: 3.0,
            })
            .unwrap();
        }

        let reopened = Database::new_with_key(&path, Some("correct horse")).unwrap();
        assert_eq!(reopened.list_transactions().unwrap().len(), 1);

        assert!(Database::new_with_key(&path, Some("wrong key")).is_err());
        assert!(Database::new_unencrypted(&path).is_err());
    }
}
