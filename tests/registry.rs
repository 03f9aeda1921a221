use std::{
    collections::{HashSet, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use tinyapp::{
    domain::{ShortCode, TargetUrl, UserId},
    services::{CodeGenerator, MAX_CREATE_ATTEMPTS, ServiceError, UrlRecord, UrlRegistry},
};

fn code(s: &str) -> ShortCode {
    ShortCode::parse(s).unwrap()
}

fn url(s: &str) -> TargetUrl {
    TargetUrl::parse(s).unwrap()
}

fn record(target: &str, owner: &UserId) -> UrlRecord {
    UrlRecord {
        target_url: url(target),
        owner_id: owner.clone(),
    }
}

/// Demo fixture: two codes for A, one for B
fn fixture() -> (UrlRegistry, UserId, UserId) {
    let a = UserId::new("userRandomID");
    let b = UserId::new("user2RandomID");
    let registry = UrlRegistry::new();

    assert!(registry.seed(code("b2xVn2"), record("http://www.lighthouselabs.ca", &a)));
    assert!(registry.seed(code("9sm5xK"), record("http://www.google.com", &b)));
    assert!(registry.seed(code("abc123"), record("http://www.example.com", &a)));

    (registry, a, b)
}

/// Hands out queued codes, then repeats the last one forever
struct Scripted {
    queue: Mutex<VecDeque<ShortCode>>,
    last: ShortCode,
    calls: Arc<AtomicUsize>,
}

impl Scripted {
    fn new(codes: &[&str], calls: Arc<AtomicUsize>) -> Self {
        let queue: VecDeque<_> = codes.iter().map(|c| code(c)).collect();
        let last = queue.back().cloned().unwrap();
        Self {
            queue: Mutex::new(queue),
            last,
            calls,
        }
    }
}

impl CodeGenerator for Scripted {
    fn generate(&self) -> ShortCode {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.last.clone())
    }
}

#[test]
fn create_then_get_round_trips() {
    let registry = UrlRegistry::new();
    let owner = UserId::new("owner");

    let code = registry.create(&owner, url("http://example.com")).unwrap();

    assert_eq!(code.as_str().len(), 6);
    assert!(code.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(
        registry.get(&code),
        Some(record("http://example.com", &owner))
    );
}

#[test]
fn get_unknown_code() {
    let (registry, _, _) = fixture();
    assert_eq!(registry.get(&code("zzzzzz")), None);
}

#[test]
fn list_by_owner_returns_exactly_the_owned_records() {
    let (registry, a, b) = fixture();

    let owned = registry.list_by_owner(&a);
    let codes: Vec<_> = owned.keys().map(ShortCode::as_str).collect();
    assert_eq!(codes.len(), 2);
    assert!(codes.contains(&"b2xVn2"));
    assert!(codes.contains(&"abc123"));
    assert_eq!(
        owned[&code("b2xVn2")],
        record("http://www.lighthouselabs.ca", &a)
    );

    let owned = registry.list_by_owner(&b);
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[&code("9sm5xK")], record("http://www.google.com", &b));
}

#[test]
fn list_by_owner_without_matches_is_empty() {
    let (registry, _, _) = fixture();
    assert!(registry.list_by_owner(&UserId::new("nobody")).is_empty());

    let empty = UrlRegistry::new();
    assert!(empty.list_by_owner(&UserId::new("userRandomID")).is_empty());
}

#[test]
fn list_by_owner_is_a_snapshot() {
    let (registry, a, _) = fixture();

    let snapshot = registry.list_by_owner(&a);
    assert_eq!(registry.len(), 3, "listing must not mutate the registry");

    registry
        .update(&code("b2xVn2"), &a, url("https://changed.example.com"))
        .unwrap();
    registry.delete(&code("abc123"), &a).unwrap();

    assert_eq!(snapshot.len(), 2);
    assert_eq!(
        snapshot[&code("b2xVn2")].target_url.as_str(),
        "http://www.lighthouselabs.ca"
    );
}

#[test]
fn owner_can_update() {
    let (registry, a, _) = fixture();

    registry
        .update(&code("b2xVn2"), &a, url("https://www.rust-lang.org"))
        .unwrap();

    let updated = registry.get(&code("b2xVn2")).unwrap();
    assert_eq!(updated.target_url.as_str(), "https://www.rust-lang.org");
    assert_eq!(updated.owner_id, a, "ownership never transfers");
}

#[test]
fn non_owner_update_is_forbidden_and_harmless() {
    let (registry, _, b) = fixture();

    let result = registry.update(&code("b2xVn2"), &b, url("https://evil.example.com"));
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    assert_eq!(
        registry.get(&code("b2xVn2")).unwrap().target_url.as_str(),
        "http://www.lighthouselabs.ca"
    );
}

#[test]
fn update_unknown_code_is_not_found() {
    let (registry, a, _) = fixture();
    let result = registry.update(&code("zzzzzz"), &a, url("https://example.com"));
    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[test]
fn owner_can_delete() {
    let (registry, a, _) = fixture();

    registry.delete(&code("abc123"), &a).unwrap();

    assert_eq!(registry.get(&code("abc123")), None);
    assert_eq!(registry.len(), 2);
    assert!(matches!(
        registry.delete(&code("abc123"), &a),
        Err(ServiceError::NotFound)
    ));
}

#[test]
fn non_owner_delete_is_forbidden_and_harmless() {
    let (registry, a, b) = fixture();

    let result = registry.delete(&code("abc123"), &b);
    assert!(matches!(result, Err(ServiceError::Forbidden)));

    assert_eq!(
        registry.get(&code("abc123")),
        Some(record("http://www.example.com", &a))
    );
    assert_eq!(registry.len(), 3);
}

#[test]
fn seed_refuses_taken_codes() {
    let (registry, _, b) = fixture();
    assert!(!registry.seed(code("b2xVn2"), record("https://other.example.com", &b)));
    assert_eq!(
        registry.get(&code("b2xVn2")).unwrap().target_url.as_str(),
        "http://www.lighthouselabs.ca"
    );
}

#[test]
fn create_regenerates_on_collision() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = UrlRegistry::with_generator(Scripted::new(
        &["b2xVn2", "b2xVn2", "newOne"],
        calls.clone(),
    ));
    let owner = UserId::new("owner");
    registry.seed(code("b2xVn2"), record("http://www.lighthouselabs.ca", &owner));

    let created = registry.create(&owner, url("http://example.com")).unwrap();

    assert_eq!(created, code("newOne"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        registry.get(&code("b2xVn2")).unwrap().target_url.as_str(),
        "http://www.lighthouselabs.ca",
        "a collision must not overwrite the live record"
    );
}

#[test]
fn create_gives_up_after_bounded_attempts() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = UrlRegistry::with_generator(Scripted::new(&["taken1"], calls.clone()));
    let owner = UserId::new("owner");
    registry.seed(code("taken1"), record("http://www.example.com", &owner));

    let result = registry.create(&owner, url("http://example.com"));

    assert!(matches!(result, Err(ServiceError::GenerationExhausted)));
    assert_eq!(calls.load(Ordering::SeqCst), MAX_CREATE_ATTEMPTS);
    assert_eq!(registry.len(), 1);
}

#[test]
fn repeated_creates_never_share_a_code() {
    let registry = UrlRegistry::new();
    let owner = UserId::new("owner");

    let codes: HashSet<_> = (0..2000)
        .map(|i| {
            registry
                .create(&owner, url(&format!("https://example{i}.com")))
                .unwrap()
        })
        .collect();

    assert_eq!(codes.len(), 2000);
    assert_eq!(registry.len(), 2000);
    assert_eq!(registry.list_by_owner(&owner).len(), 2000);
}

#[test]
fn concurrent_creates_never_share_a_code() {
    let registry = Arc::new(UrlRegistry::new());

    let codes: Vec<ShortCode> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let registry = Arc::clone(&registry);
                scope.spawn(move || {
                    let owner = UserId::new(format!("owner-{t}"));
                    (0..200)
                        .map(|i| {
                            registry
                                .create(&owner, url(&format!("https://example{t}-{i}.com")))
                                .unwrap()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: HashSet<_> = codes.iter().collect();
    assert_eq!(unique.len(), 1600);
    assert_eq!(registry.len(), 1600);
    assert_eq!(registry.list_by_owner(&UserId::new("owner-3")).len(), 200);
}
