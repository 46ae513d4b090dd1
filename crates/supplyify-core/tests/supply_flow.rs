use chrono::{Duration, TimeZone, Utc};
use supplyify_core::{
    AffiliateLinks, Error, MemoryBackend, SqliteBackend, StorageBackend, Supplyify,
};
use tempfile::TempDir;

const PASSWORD: &str = "Password1";

fn links() -> AffiliateLinks {
    AffiliateLinks::new("https://www.amazon.com/s", "tag-20")
}

fn memory_app() -> Supplyify<MemoryBackend> {
    Supplyify::new(MemoryBackend::new(), links())
}

fn sqlite_app(dir: &TempDir) -> Supplyify<SqliteBackend> {
    let path = dir.path().join("supplyify.db");
    let backend = SqliteBackend::open(path.to_str().unwrap()).unwrap();
    Supplyify::new(backend, links())
}

/// Same scenario against any backend: sign up, add from search, edit, check status
fn full_round<B: StorageBackend>(app: &mut Supplyify<B>) {
    app.register("a@example.com", PASSWORD, PASSWORD).unwrap();
    let token = app.login("a@example.com", PASSWORD).unwrap();

    let mut registry = app.registry(&token).unwrap();
    let item = registry.add_from_query("laundry detergent").unwrap();
    assert_eq!(
        item.link,
        "https://www.amazon.com/s?k=laundry%20detergent&tag=tag-20"
    );

    registry.update(item.id, Some(10.0), Some(2.0)).unwrap();

    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    let statuses = registry.statuses(now).unwrap();
    assert_eq!(statuses.len(), 1);

    let estimate = statuses[0].estimate.unwrap();
    assert_eq!(estimate.days_left, 5.0);
    assert_eq!(estimate.reorder_at, now + Duration::days(5));
    assert!(!estimate.low_stock);
}

#[test]
fn test_full_round_memory() {
    full_round(&mut memory_app());
}

#[test]
fn test_full_round_sqlite() {
    let dir = TempDir::new().unwrap();
    full_round(&mut sqlite_app(&dir));
}

#[test]
fn test_register_valid_password_exactly_once() {
    let mut app = memory_app();

    app.register("a@example.com", PASSWORD, PASSWORD).unwrap();
    assert!(matches!(
        app.register("a@example.com", PASSWORD, PASSWORD),
        Err(Error::DuplicateAccount)
    ));
    // A different email is a different account
    app.register("b@example.com", PASSWORD, PASSWORD).unwrap();
}

#[test]
fn test_login_requires_exact_pair() {
    let mut app = memory_app();
    app.register("a@example.com", PASSWORD, PASSWORD).unwrap();
    app.register("b@example.com", "OtherPass9", "OtherPass9").unwrap();

    assert!(app.login("a@example.com", PASSWORD).is_ok());
    assert!(app.login("b@example.com", "OtherPass9").is_ok());
    assert!(matches!(
        app.login("a@example.com", "OtherPass9"),
        Err(Error::InvalidCredentials)
    ));
    assert!(matches!(
        app.login("c@example.com", PASSWORD),
        Err(Error::InvalidCredentials)
    ));
}

#[test]
fn test_accounts_do_not_share_items() {
    let mut app = memory_app();
    app.register("a@example.com", PASSWORD, PASSWORD).unwrap();
    app.register("b@example.com", PASSWORD, PASSWORD).unwrap();
    let alice = app.login("a@example.com", PASSWORD).unwrap();
    let bob = app.login("b@example.com", PASSWORD).unwrap();

    let id = app.registry(&alice).unwrap().add("soap", "https://x").unwrap();

    let mut bobs = app.registry(&bob).unwrap();
    assert!(bobs.list().unwrap().is_empty());
    assert!(matches!(bobs.get(id), Err(Error::NotFound(_))));
    assert!(matches!(
        bobs.update(id, Some(100.0), None),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(bobs.remove(id), Err(Error::NotFound(_))));

    assert_eq!(app.registry(&alice).unwrap().list().unwrap().len(), 1);
}

#[test]
fn test_add_then_list_returns_new_item_last() {
    let dir = TempDir::new().unwrap();
    let mut app = sqlite_app(&dir);
    app.register("a@example.com", PASSWORD, PASSWORD).unwrap();
    let token = app.login("a@example.com", PASSWORD).unwrap();

    let mut registry = app.registry(&token).unwrap();
    registry.add("paper towels", "https://x/1").unwrap();
    let id = registry.add("coffee", "https://x/2").unwrap();

    let items = registry.list().unwrap();
    let last = items.last().unwrap();
    assert_eq!(last.id, id);
    assert_eq!(last.name, "coffee");
    assert_eq!(last.amount_left, 1.0);
    assert_eq!(last.usage_per_day, 1.0);
}

#[test]
fn test_remove_while_iterating_sqlite() {
    let dir = TempDir::new().unwrap();
    let mut app = sqlite_app(&dir);
    app.register("a@example.com", PASSWORD, PASSWORD).unwrap();
    let token = app.login("a@example.com", PASSWORD).unwrap();

    let mut registry = app.registry(&token).unwrap();
    for name in ["one", "two", "three"] {
        registry.add(name, "https://x").unwrap();
    }

    let mut seen = Vec::new();
    for item in registry.list().unwrap() {
        seen.push(item.name.clone());
        if item.name == "one" {
            registry.remove(item.id).unwrap();
        }
    }

    assert_eq!(seen, vec!["one", "two", "three"]);
    let remaining: Vec<String> = registry
        .list()
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(remaining, vec!["two", "three"]);
}

#[test]
fn test_sqlite_data_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let mut app = sqlite_app(&dir);
        app.register("a@example.com", PASSWORD, PASSWORD).unwrap();
        let token = app.login("a@example.com", PASSWORD).unwrap();
        let mut registry = app.registry(&token).unwrap();
        let id = registry.add("soap", "https://x").unwrap();
        registry.update(id, Some(2.0), Some(1.0)).unwrap();
    }

    let mut app = sqlite_app(&dir);
    let token = app.login("a@example.com", PASSWORD).unwrap();
    let statuses = app.registry(&token).unwrap().statuses(Utc::now()).unwrap();

    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].item.amount_left, 2.0);
    assert!(statuses[0].is_low_stock());
}
