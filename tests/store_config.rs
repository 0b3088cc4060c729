use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use postino::config::ConfigStore;
use postino::transport::stub::StubTransport;
use postino::{ConfigSource, Error, Mailer};
use pretty_assertions::assert_eq;

/// A host configuration store the test can keep mutating after the mailer
/// took ownership of its clone.
#[derive(Clone, Default)]
struct SharedStore(Arc<Mutex<HashMap<String, String>>>);

impl SharedStore {
    fn set(&self, key: &str, value: &str) {
        self.0
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl ConfigStore for SharedStore {
    fn item(&self, key: &str) -> Option<String> {
        self.0.lock().unwrap().get(key).cloned()
    }
}

fn seeded() -> SharedStore {
    let store = SharedStore::default();
    store.set("smtp_host", "smtp.example.com");
    store.set("smtp_user", "user");
    store.set("smtp_pass", "secret");
    store
}

#[test]
fn construction_requires_resolvable_keys() {
    let err =
        Mailer::with_store(StubTransport::new_positive(), HashMap::new()).unwrap_err();
    assert!(matches!(err, Error::MissingConfiguration("smtp_host")));

    let mut store = HashMap::new();
    store.insert("smtp_host".to_string(), "smtp.example.com".to_string());
    let err = Mailer::with_store(StubTransport::new_positive(), store).unwrap_err();
    assert!(matches!(err, Error::MissingConfiguration("smtp_user")));
}

#[test]
fn store_backed_mailer_reports_its_source() {
    let mailer = Mailer::with_store(StubTransport::new_positive(), seeded()).unwrap();
    assert_eq!(mailer.config_source(), ConfigSource::Store);
    // the host initializes its own transport in this mode
    assert!(mailer.transport().initialized().is_none());
}

#[test]
fn from_and_prefix_are_resolved_at_send_time() {
    let store = seeded();
    let mut mailer =
        Mailer::with_store(StubTransport::new_positive(), store.clone()).unwrap();

    // set after construction: a store-backed mailer must still pick these up
    store.set("from_email", " NoReply@Example.COM ");
    store.set("from_name", "My App");
    store.set("prefix_subject", "MyApp - ");

    mailer.to("user@example.com").unwrap();
    mailer.subject("First activation");
    mailer.send().unwrap();

    let delivered = mailer.transport().last_message().unwrap();
    assert_eq!(
        delivered.from,
        Some(("noreply@example.com".to_string(), "My App".to_string()))
    );
    assert_eq!(delivered.subject, "MyApp - First activation");
}

#[test]
fn unresolved_from_email_skips_from() {
    let mut mailer = Mailer::with_store(StubTransport::new_positive(), seeded()).unwrap();
    mailer.to("user@example.com").unwrap();
    mailer.subject("Hello");
    mailer.send().unwrap();

    let delivered = mailer.transport().last_message().unwrap();
    assert_eq!(delivered.from, None);
    assert_eq!(delivered.subject, "Hello");
}

#[test]
fn blank_from_name_sends_empty_display_name() {
    let store = seeded();
    store.set("from_email", "noreply@example.com");
    store.set("from_name", "   ");

    let mut mailer = Mailer::with_store(StubTransport::new_positive(), store).unwrap();
    mailer.to("user@example.com").unwrap();
    mailer.send().unwrap();

    assert_eq!(
        mailer.transport().last_message().unwrap().from,
        Some(("noreply@example.com".to_string(), String::new()))
    );
}
