//! Tests for the session registry, including concurrent append/remove.

mod common;

use common::Mock;
use narwhal_core::{Config, Dispatcher, Request, Session, SessionId, Sessions, Status};
use parking_lot::Mutex;
use rand::Rng;
use serde::Deserialize;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};
use tokio::sync::mpsc;

struct Fake {
    id: SessionId,
}

impl Fake {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            id: SessionId::next(),
        })
    }
}

impl Session for Fake {
    fn id(&self) -> SessionId {
        self.id
    }

    fn status(&self) -> Status {
        Status::Running
    }
}

#[test]
fn append_and_remove_by_identity() {
    let sessions = Sessions::new();
    let a = Fake::new();
    let b = Fake::new();
    assert!(sessions.append(a.clone()));
    assert!(sessions.append(b.clone()));
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions.ids(), [a.id, b.id]);

    assert!(sessions.remove(a.id).is_some());
    assert!(sessions.remove(a.id).is_none());
    assert!(!sessions.contains(a.id));
    assert!(sessions.contains(b.id));
    assert_eq!(sessions.get(b.id).unwrap().id(), b.id);
}

#[test]
fn duplicate_append_keeps_the_first() {
    let sessions = Sessions::new();
    let a = Fake::new();
    assert!(sessions.append(a.clone()));
    assert!(!sessions.append(a.clone()));
    assert_eq!(sessions.len(), 1);
}

#[test]
fn remove_all_visits_each_session_once() {
    let sessions = Sessions::new();
    let fakes: Vec<_> = (0..10).map(|_| Fake::new()).collect();
    for fake in &fakes {
        sessions.append(fake.clone());
    }

    let mut visited = 0;
    let keep = fakes[3].id;
    let removed = sessions.remove_all(|session| {
        visited += 1;
        session.id() != keep
    });
    assert_eq!(visited, 10);
    assert_eq!(removed, 9);
    assert_eq!(sessions.ids(), [keep]);
}

#[test]
fn session_ids_are_unique() {
    let ids: Vec<SessionId> = (0..100).map(|_| SessionId::next()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), ids.len());
    assert!(ids[0].to_string().starts_with("session-"));
}

#[test]
fn concurrent_threads_never_lose_updates() {
    let sessions = Arc::new(Sessions::new());
    let removed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..100)
        .map(|_| {
            let sessions = sessions.clone();
            let removed = removed.clone();
            thread::spawn(move || {
                let fake = Fake::new();
                let id = fake.id;
                assert!(sessions.append(fake));
                let micros = rand::rng().random_range(0..500);
                thread::sleep(Duration::from_micros(micros));
                let count = sessions.remove_all(|session| session.id() == id);
                assert_eq!(count, 1);
                removed.fetch_add(count, Ordering::SeqCst);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(sessions.is_empty());
    assert_eq!(removed.load(Ordering::SeqCst), 100);
}

#[derive(Debug, Deserialize)]
struct Chunk {
    #[allow(dead_code)]
    n: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Log {
    Content,
    Removed,
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn hundred_streaming_sessions_release_themselves() {
    let mock = Mock::chunks([
        "data: {\"n\":1}\n\n",
        "data: {\"n\":2}\n\n",
        "data: {\"n\":3}\n\ndata: [DONE]\n\n",
    ])
    .jitter();
    let dispatcher = Dispatcher::new(Arc::new(Config::new("sk-test")), mock);
    let sessions = Arc::new(Sessions::new());
    let log = Arc::new(Mutex::new(Vec::<(SessionId, Log)>::new()));
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();

    for _ in 0..100 {
        let request = Request::json(
            dispatcher.config().url("/v1/completions").unwrap(),
            serde_json::json!({"stream": true}),
        );
        let content_log = log.clone();
        let complete_log = log.clone();
        let registry = sessions.clone();
        let done_tx = done_tx.clone();
        let session = dispatcher.session::<Chunk, _>(&request);
        let id = session.id();
        let session = Arc::new(
            session
                .on_receive_content(move |_| content_log.lock().push((id, Log::Content)))
                .on_complete(move |id, err| {
                    assert!(err.is_none());
                    let released = registry.remove(id).is_some();
                    complete_log.lock().push((id, Log::Removed));
                    done_tx.send(released).unwrap();
                }),
        );

        assert!(sessions.append(session.clone()));
        assert!(dispatcher.perform(&session));
    }
    drop(done_tx);

    let mut released = 0;
    while let Some(ok) = done_rx.recv().await {
        assert!(ok, "a session was removed twice or never registered");
        released += 1;
    }
    assert_eq!(released, 100);
    assert!(sessions.is_empty());

    let log = log.lock();
    assert_eq!(log.iter().filter(|(_, l)| *l == Log::Content).count(), 300);
    for (index, (id, entry)) in log.iter().enumerate() {
        if *entry == Log::Removed {
            assert!(
                !log[index + 1..]
                    .iter()
                    .any(|(other, l)| other == id && *l == Log::Content),
                "{id} received content after removal"
            );
        }
    }
}
