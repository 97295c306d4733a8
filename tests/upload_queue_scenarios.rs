//! End-to-end behavior of the simulated upload queue under virtual time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storage_uploader::upload::{
    CollectingNotifier, DriverSettings, FileRef, FixedIncrements, NotificationKind,
    ProgressSource, RandomIncrements, UploadId, UploadQueue, UploadStatus,
};
use tokio::runtime::Handle;
use tokio::time::{sleep, Instant};

fn build_queue(increments: Box<dyn ProgressSource>) -> (UploadQueue, CollectingNotifier) {
    let notifier = CollectingNotifier::new();
    let queue = UploadQueue::new(
        DriverSettings::default(),
        increments,
        Arc::new(notifier.clone()),
        Handle::current(),
    );
    (queue, notifier)
}

fn bytes(name: &str, size: usize) -> FileRef {
    FileRef::from_bytes(name, vec![b'x'; size])
}

#[tokio::test(start_paused = true)]
async fn two_files_complete_in_enqueue_order() {
    let (queue, notifier) = build_queue(Box::new(FixedIncrements::constant(25.0)));
    let ids = queue.enqueue([bytes("a.txt", 100), bytes("b.txt", 200)]);
    assert_eq!(queue.get(ids[0]).unwrap().size(), 100);
    assert_eq!(queue.get(ids[1]).unwrap().size(), 200);

    queue.start_all();

    // a.txt ticks at 200..800, b.txt starts at 500 and ticks at 700..1300
    sleep(Duration::from_millis(850)).await;
    assert_eq!(queue.get(ids[0]).unwrap().status, UploadStatus::Complete);
    let b = queue.get(ids[1]).unwrap();
    assert_eq!(b.status, UploadStatus::Uploading);
    assert_eq!(b.progress, 25.0);

    sleep(Duration::from_millis(500)).await;
    for upload in queue.snapshot() {
        assert_eq!(upload.status, UploadStatus::Complete);
        assert_eq!(upload.progress, 100.0);
    }

    let received = notifier.notifications();
    assert_eq!(received.len(), 2);
    assert!(received.iter().all(|n| n.kind == NotificationKind::Success));
    assert_eq!(
        notifier.messages(),
        vec!["a.txt uploaded successfully", "b.txt uploaded successfully"]
    );
}

#[tokio::test(start_paused = true)]
async fn removing_a_pending_record_empties_the_queue() {
    let (queue, notifier) = build_queue(Box::new(FixedIncrements::constant(50.0)));
    let id = queue.enqueue([bytes("a.txt", 10)])[0];
    assert!(queue.remove(id));
    assert!(queue.is_empty());

    queue.start_all();
    sleep(Duration::from_secs(5)).await;
    assert!(queue.is_empty());
    assert!(notifier.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn removing_while_waiting_on_stagger_never_starts_it() {
    let (queue, notifier) = build_queue(Box::new(FixedIncrements::constant(50.0)));
    let ids = queue.enqueue([bytes("a.txt", 1), bytes("b.txt", 1)]);
    queue.start_all();

    sleep(Duration::from_millis(100)).await;
    assert_eq!(queue.get(ids[1]).unwrap().status, UploadStatus::Pending);
    queue.remove(ids[1]);

    sleep(Duration::from_secs(5)).await;
    assert!(queue.get(ids[1]).is_none());
    assert_eq!(notifier.messages(), vec!["a.txt uploaded successfully"]);
}

#[tokio::test]
async fn enqueue_of_nothing_is_harmless() {
    let (queue, _) = build_queue(Box::new(FixedIncrements::constant(50.0)));
    queue.enqueue([bytes("a.txt", 1)]);
    let before = queue.snapshot();

    let added = queue.enqueue(Vec::<FileRef>::new());
    assert!(added.is_empty());
    let after = queue.snapshot();
    assert_eq!(before.len(), after.len());
    assert_eq!(before[0].id, after[0].id);
}

#[tokio::test]
async fn start_all_on_empty_queue_is_a_no_op() {
    let (queue, notifier) = build_queue(Box::new(FixedIncrements::constant(50.0)));
    queue.start_all();
    assert!(queue.is_empty());
    assert!(notifier.notifications().is_empty());
}

#[tokio::test(start_paused = true)]
async fn starts_are_staggered_in_queue_order() {
    let (queue, _) = build_queue(Box::new(FixedIncrements::constant(5.0)));
    let ids = queue.enqueue([bytes("a", 1), bytes("b", 1), bytes("c", 1), bytes("d", 1)]);

    let mut rx = queue.subscribe();
    let origin = Instant::now();
    let observer = tokio::spawn(async move {
        let mut started: HashMap<UploadId, Duration> = HashMap::new();
        while rx.changed().await.is_ok() {
            let now = origin.elapsed();
            let snapshot = rx.borrow_and_update().clone();
            for upload in &snapshot {
                if upload.status != UploadStatus::Pending {
                    started.entry(upload.id).or_insert(now);
                }
            }
            if started.len() == 4 {
                break;
            }
        }
        started
    });

    queue.start_all();
    let started = observer.await.unwrap();

    let times: Vec<Duration> = ids.iter().map(|id| started[id]).collect();
    for pair in times.windows(2) {
        assert!(pair[0] <= pair[1], "out of order: {:?}", times);
    }
    assert!(times[3] >= Duration::from_millis(1500));
    assert!(times[3] < Duration::from_millis(1600));
}

#[tokio::test(start_paused = true)]
async fn random_progress_is_monotonic_and_bounded() {
    let (queue, notifier) = build_queue(Box::new(RandomIncrements::seeded(30.0, 1234)));
    queue.enqueue((0..5).map(|i| bytes(&format!("file-{i}.bin"), i * 10)));

    let mut rx = queue.subscribe();
    let watcher = tokio::spawn(async move {
        let mut last: HashMap<UploadId, f32> = HashMap::new();
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            for upload in &snapshot {
                assert!((0.0..=100.0).contains(&upload.progress));
                if upload.status == UploadStatus::Pending {
                    assert_eq!(upload.progress, 0.0);
                }
                if upload.status == UploadStatus::Complete {
                    assert_eq!(upload.progress, 100.0);
                }
                let previous = last.insert(upload.id, upload.progress).unwrap_or(0.0);
                assert!(upload.progress >= previous);
            }
            if snapshot.iter().all(|u| u.status.is_terminal()) {
                break;
            }
        }
    });

    queue.start_all();
    queue.settled().await;
    watcher.await.unwrap();
    assert_eq!(notifier.notifications().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_queue_stops_its_drivers() {
    let notifier = CollectingNotifier::new();
    {
        let queue = UploadQueue::new(
            DriverSettings::default(),
            Box::new(FixedIncrements::constant(10.0)),
            Arc::new(notifier.clone()),
            Handle::current(),
        );
        queue.enqueue([bytes("a.txt", 1)]);
        queue.start_all();
        sleep(Duration::from_millis(300)).await;
    }

    sleep(Duration::from_secs(10)).await;
    assert!(notifier.notifications().is_empty());
}
