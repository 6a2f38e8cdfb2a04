//! Integration tests for the review persistence workflow.
//! These tests drive the public API end to end against real SQLite files.

use std::sync::Arc;

use revstore::infra::db::{Database, EmployeeRepository, ReviewRepository};

fn open_repositories(db: &Database) -> anyhow::Result<(Arc<EmployeeRepository>, ReviewRepository)> {
    let _ = env_logger::builder().is_test(true).try_init();
    let conn = db.connection();
    let employees = Arc::new(EmployeeRepository::new(conn.clone()));
    employees.create_table()?;
    let reviews = ReviewRepository::new(conn.clone(), employees.clone());
    reviews.create_table()?;
    Ok((employees, reviews))
}

#[test]
fn test_full_review_lifecycle() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let (employees, reviews) = open_repositories(&db)?;

    let emp = employees.create("Ada Lovelace", "Engineer")?;

    // Fresh table: the first insert gets rowid 1.
    let review = reviews.create(2021, "Good performance", emp.clone())?;
    assert_eq!(review.lock().unwrap().id(), Some(1));

    let found = reviews.find_by_id(1)?.expect("review should exist");
    assert!(Arc::ptr_eq(&review, &found));

    reviews.delete(&review)?;
    assert_eq!(review.lock().unwrap().id(), None);
    assert!(reviews.find_by_id(1)?.is_none());
    Ok(())
}

#[test]
fn test_mutate_and_resave_updates_same_row() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let (employees, reviews) = open_repositories(&db)?;

    let ada = employees.create("Ada Lovelace", "Engineer")?;
    let grace = employees.create("Grace Hopper", "Admiral")?;

    let review = reviews.create(2021, "Good performance", ada)?;
    let id = review.lock().unwrap().id().unwrap();

    {
        let mut rev = review.lock().unwrap();
        rev.set_year(2022)?;
        rev.set_summary("Promoted")?;
        rev.set_employee(grace.clone())?;
    }
    reviews.save(&review)?;

    assert_eq!(reviews.get_all()?.len(), 1);
    let reloaded = reviews.find_by_id(id)?.unwrap();
    let rev = reloaded.lock().unwrap();
    assert_eq!(rev.year(), 2022);
    assert_eq!(rev.summary(), "Promoted");
    assert!(Arc::ptr_eq(rev.employee(), &grace));
    Ok(())
}

#[test]
fn test_reviews_survive_reopen_on_disk() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("db.sqlite");

    {
        let db = Database::open_at(path.clone())?;
        let (employees, reviews) = open_repositories(&db)?;
        let emp = employees.create("Ada Lovelace", "Engineer")?;
        reviews.create(2023, "Shipped the parser", emp)?;
    }

    // A fresh process sees the rows but has an empty identity map.
    let db = Database::open_at(path)?;
    let (_employees, reviews) = open_repositories(&db)?;
    let all = reviews.get_all()?;
    assert_eq!(all.len(), 1);

    let rev = all[0].lock().unwrap();
    assert_eq!(rev.year(), 2023);
    assert_eq!(rev.summary(), "Shipped the parser");
    assert_eq!(rev.employee().name, "Ada Lovelace");
    Ok(())
}
