use super::*;
use std::sync::{Arc, Mutex};

const PERIOD: Duration = Duration::from_secs(10);

#[test]
fn twenty_three_rows_make_three_pages_with_short_tail() {
    let rows: Vec<u32> = (0..23).collect();
    let pages = paginate(rows, 10);

    assert_eq!(pages.len(), 3);
    assert_eq!(page_count(23, 10), 3);
    let sizes: Vec<usize> = pages.iter().map(|p| p.rows.len()).collect();
    assert_eq!(sizes, vec![10, 10, 3]);
    assert_eq!(pages[2].index, 2);
    assert_eq!(pages[2].rows, vec![20, 21, 22]);
}

#[test]
fn empty_input_has_no_pages_and_zero_rows_per_page_acts_as_one() {
    assert!(paginate(Vec::<u8>::new(), 10).is_empty());
    assert_eq!(paginate(vec![1, 2], 0).len(), 2);
}

#[test]
fn three_ticks_return_to_the_first_page() {
    let mut rotator = SlideRotator::new(3);
    assert!(rotator.is_visible(0));

    assert_eq!(rotator.tick(), 1);
    assert_eq!(rotator.tick(), 2);
    assert_eq!(rotator.tick(), 0);

    let visible = (0..3).filter(|i| rotator.is_visible(*i)).count();
    assert_eq!(visible, 1);
}

#[tokio::test]
async fn single_page_never_starts_a_timer() {
    assert!(RotationHandle::spawn(SlideRotator::new(1), PERIOD, |_| {}).is_none());
    assert!(RotationHandle::spawn(SlideRotator::new(0), PERIOD, |_| {}).is_none());
}

#[tokio::test(start_paused = true)]
async fn timer_advances_once_per_period_and_wraps() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handle = RotationHandle::spawn(SlideRotator::new(3), PERIOD, move |index| {
        sink.lock().expect("lock").push(index);
    })
    .expect("timer for three pages");

    tokio::time::sleep(PERIOD / 2).await;
    assert!(seen.lock().expect("lock").is_empty());

    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(*seen.lock().expect("lock"), vec![1, 2, 0]);
    assert!(handle.is_running());
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn stopping_the_handle_cancels_further_advances() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let handle = RotationHandle::spawn(SlideRotator::new(2), PERIOD, move |index| {
        sink.lock().expect("lock").push(index);
    })
    .expect("timer");

    tokio::time::sleep(PERIOD + Duration::from_millis(1)).await;
    handle.stop();
    tokio::time::sleep(PERIOD * 5).await;

    assert_eq!(*seen.lock().expect("lock"), vec![1]);
}
