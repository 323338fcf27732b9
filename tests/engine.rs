//! Running rendered filters against an in-memory SQLite database.

use pretty_assertions::assert_eq;
use queryfilter::engine::FilterDB;
use queryfilter::{FilterError, Options, Placeholder, Reflect, Value};
use sqlx::any::AnyPoolOptions;

#[derive(Reflect, Default)]
struct TaskFilter {
    #[tag(filter = "status,op=in")]
    status: Option<Vec<String>>,
    #[tag(filter = "points,op=gte")]
    min_points: Option<i64>,
    #[tag(filter = "points,op=between")]
    points: Option<[i64; 2]>,
    #[tag(filter = "title")]
    title: Option<String>,
}

async fn setup() -> FilterDB {
    sqlx::any::install_default_drivers();

    // One connection, or every pooled connection gets its own empty database.
    let pool = AnyPoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let db = FilterDB::from_pool(pool, Placeholder::Anonymous);

    db.execute(
        "CREATE TABLE tasks (id INTEGER PRIMARY KEY, title TEXT NOT NULL, status TEXT NOT NULL, points INTEGER NOT NULL)",
        &[],
    )
    .await
    .unwrap();

    for (title, status, points) in [
        ("write docs", "todo", 1),
        ("fix login", "doing", 5),
        ("ship it", "done", 8),
        ("review", "todo", 3),
    ] {
        db.execute(
            "INSERT INTO tasks (title, status, points) VALUES (?, ?, ?)",
            &[Value::from(title), Value::from(status), Value::Int(points)],
        )
        .await
        .unwrap();
    }

    db
}

fn titles(rows: &[std::collections::HashMap<String, serde_json::Value>]) -> Vec<String> {
    let mut titles: Vec<String> = rows
        .iter()
        .filter_map(|r| r.get("title").and_then(|t| t.as_str()).map(str::to_string))
        .collect();
    titles.sort();
    titles
}

#[tokio::test]
async fn test_select_sql_without_filters() {
    let db = setup().await;

    let q = db.select_sql("tasks", &TaskFilter::default(), &Options::default()).unwrap();
    assert_eq!(q.sql, "SELECT * FROM tasks");
    assert!(q.args.is_empty());
}

#[tokio::test]
async fn test_select_all() {
    let db = setup().await;

    let rows = db.select("tasks", &TaskFilter::default(), &Options::default()).await.unwrap();
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn test_select_in_and_gte() {
    let db = setup().await;

    let filter = TaskFilter {
        status: Some(vec!["todo".into(), "doing".into()]),
        min_points: Some(3),
        ..Default::default()
    };

    let q = db.select_sql("tasks", &filter, &Options::default()).unwrap();
    assert_eq!(q.sql, "SELECT * FROM tasks WHERE status IN(?,?) AND points >= ?");

    let rows = db.select("tasks", &filter, &Options::default()).await.unwrap();
    assert_eq!(titles(&rows), vec!["fix login", "review"]);
}

#[tokio::test]
async fn test_select_between() {
    let db = setup().await;

    let filter = TaskFilter {
        points: Some([2, 6]),
        ..Default::default()
    };

    let rows = db.select("tasks", &filter, &Options::default()).await.unwrap();
    assert_eq!(titles(&rows), vec!["fix login", "review"]);
}

#[tokio::test]
async fn test_select_eq_returns_columns() {
    let db = setup().await;

    let filter = TaskFilter {
        title: Some("ship it".into()),
        ..Default::default()
    };

    let rows = db.select("tasks", &filter, &Options::default()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("status"), Some(&serde_json::json!("done")));
    assert_eq!(rows[0].get("points"), Some(&serde_json::json!(8)));
}

#[tokio::test]
async fn test_select_propagates_filter_errors() {
    let db = setup().await;

    let err = db.select("tasks", &42i32, &Options::default()).await.unwrap_err();
    assert!(matches!(err, FilterError::NotARecord(_)));
}

#[tokio::test]
async fn test_execute_reports_bad_sql() {
    let db = setup().await;

    let err = db.execute("SELECT * FROM missing", &[]).await.unwrap_err();
    assert!(matches!(err, FilterError::Execution(_)));
}
