use super::*;
use chrono::{FixedOffset, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn arriving(customer: &str, arrival: &str) -> ShipmentRecord {
    ShipmentRecord {
        customer: customer.to_string(),
        arrival: Some(arrival.to_string()),
        ..Default::default()
    }
}

fn departing(customer: &str, departure: &str) -> ShipmentRecord {
    ShipmentRecord {
        customer: customer.to_string(),
        departure: Some(departure.to_string()),
        ..Default::default()
    }
}

fn customers(bucket: &Bucket) -> Vec<&str> {
    bucket.members.iter().map(|r| r.customer.as_str()).collect()
}

#[test]
fn sample_week_lands_in_expected_buckets() {
    let today = date(2024, 6, 10);
    let records = vec![
        arriving("overdue", "2024-06-09"),
        arriving("today", "2024-06-10"),
        arriving("d6", "2024-06-16"),
        arriving("future", "2024-06-20"),
        ShipmentRecord {
            customer: "unscheduled".to_string(),
            ..Default::default()
        },
    ];

    let result = classify_with_tz(today, &Utc, &records);

    assert_eq!(result.buckets.len(), BUCKET_COUNT);
    assert_eq!(customers(result.bucket(BucketKind::Overdue)), vec!["overdue"]);
    assert_eq!(customers(result.bucket(BucketKind::Today)), vec!["today"]);
    assert_eq!(customers(result.bucket(BucketKind::DaysAhead(6))), vec!["d6"]);
    assert_eq!(customers(result.bucket(BucketKind::Future)), vec!["future"]);
    assert_eq!(result.excluded, 1);
    assert_eq!(result.scheduled_count(), 4);
}

#[test]
fn six_and_seven_days_ahead_split_between_last_day_and_future() {
    let today = date(2024, 6, 10);
    let records = vec![
        arriving("six", "2024-06-16"),
        arriving("seven", "2024-06-17"),
        arriving("yesterday", "2024-06-09"),
    ];

    let result = classify_with_tz(today, &Utc, &records);

    assert_eq!(result.buckets[7].members[0].customer, "six");
    assert_eq!(result.buckets[8].members[0].customer, "seven");
    assert_eq!(result.buckets[0].members[0].customer, "yesterday");
}

#[test]
fn time_of_day_never_moves_a_record_off_today() {
    let today = date(2024, 6, 10);
    let records = vec![
        arriving("early", "2024-06-10T00:00:00"),
        arriving("late", "2024-06-10T23:59:59"),
        arriving("minutes", "2024-06-10 12:05"),
    ];

    let result = classify_with_tz(today, &Utc, &records);

    assert_eq!(
        customers(result.bucket(BucketKind::Today)),
        vec!["early", "late", "minutes"]
    );
    assert!(result.bucket(BucketKind::Overdue).members.is_empty());
    assert!(result.bucket(BucketKind::DaysAhead(1)).members.is_empty());
}

#[test]
fn reference_instant_is_normalized_to_its_calendar_day() {
    let tz = FixedOffset::east_opt(9 * 3600).expect("offset");
    let late_evening = tz
        .with_ymd_and_hms(2024, 6, 10, 23, 30, 0)
        .single()
        .expect("instant");

    let result = classify_at(&late_evening, &[arriving("today", "2024-06-10")]);

    assert_eq!(result.today, date(2024, 6, 10));
    assert_eq!(customers(result.bucket(BucketKind::Today)), vec!["today"]);
}

#[test]
fn offset_instants_are_converted_into_the_reference_zone() {
    let tz = FixedOffset::east_opt(9 * 3600).expect("offset");
    // 2024-06-09T20:00Z is already the 10th in UTC+9.
    let parsed = parse_calendar_date("2024-06-09T20:00:00Z", &tz);
    assert_eq!(parsed, Some(date(2024, 6, 10)));
}

#[test]
fn membership_preserves_input_order_within_each_bucket() {
    let today = date(2024, 6, 10);
    let records = vec![
        arriving("a", "2024-06-11"),
        arriving("b", "2024-06-01"),
        arriving("c", "2024-06-11"),
        departing("d", "2024-06-11"),
        arriving("e", "2024-05-30"),
    ];

    let result = classify_with_tz(today, &Utc, &records);

    assert_eq!(customers(result.bucket(BucketKind::DaysAhead(1))), vec!["a", "c", "d"]);
    assert_eq!(customers(result.bucket(BucketKind::Overdue)), vec!["b", "e"]);
}

#[test]
fn every_dated_record_lands_in_exactly_one_bucket() {
    let today = date(2024, 6, 10);
    let records: Vec<ShipmentRecord> = (-10..20)
        .map(|offset| {
            let day = today + chrono::Duration::days(offset);
            arriving(&format!("r{offset}"), &day.format("%Y-%m-%d").to_string())
        })
        .collect();

    let result = classify_with_tz(today, &Utc, &records);

    assert_eq!(result.scheduled_count(), records.len());
    for record in &records {
        let hits = result
            .buckets
            .iter()
            .filter(|b| b.members.contains(record))
            .count();
        assert_eq!(hits, 1, "{} should be in exactly one bucket", record.customer);
    }
}

#[test]
fn unparseable_arrival_excludes_without_falling_back_to_departure() {
    let today = date(2024, 6, 10);
    let record = ShipmentRecord {
        customer: "tbd".to_string(),
        arrival: Some("TBD".to_string()),
        departure: Some("2024-06-10".to_string()),
        ..Default::default()
    };

    let result = classify_with_tz(today, &Utc, &[record, departing("dep", "garbage")]);

    assert_eq!(result.scheduled_count(), 0);
    assert_eq!(result.excluded, 2);
}

#[test]
fn departure_is_used_when_arrival_is_absent() {
    let today = date(2024, 6, 10);
    let result = classify_with_tz(today, &Utc, &[departing("dep", "6/12/2024")]);
    assert_eq!(customers(result.bucket(BucketKind::DaysAhead(2))), vec!["dep"]);
}

#[test]
fn sheet_style_slash_dates_parse() {
    assert_eq!(parse_calendar_date("8/21/2025", &Utc), Some(date(2025, 8, 21)));
    assert_eq!(parse_calendar_date("2025/08/21", &Utc), Some(date(2025, 8, 21)));
    assert_eq!(parse_calendar_date("TBD", &Utc), None);
    assert_eq!(parse_calendar_date("", &Utc), None);
    assert_eq!(parse_calendar_date("2025-02-30", &Utc), None);
}

#[test]
fn titles_carry_anchor_dates_and_range_markers() {
    // 2024-06-10 is a Monday.
    let result = classify_with_tz(date(2024, 6, 10), &Utc, &[]);
    let titles: Vec<&str> = result.buckets.iter().map(|b| b.title.as_str()).collect();

    assert_eq!(
        titles,
        vec![
            "~06/09(Sun)",
            "Today 06/10(Mon)",
            "06/11(Tue)",
            "06/12(Wed)",
            "06/13(Thu)",
            "06/14(Fri)",
            "06/15(Sat)",
            "06/16(Sun)",
            "06/17(Mon)~",
        ]
    );
    assert_eq!(result.buckets[0].anchor, date(2024, 6, 9));
    assert_eq!(result.buckets[8].anchor, date(2024, 6, 17));
}

#[test]
fn ordinals_round_trip_through_bucket_kind() {
    for ordinal in 0..BUCKET_COUNT {
        let kind = BucketKind::from_ordinal(ordinal).expect("kind");
        assert_eq!(kind.ordinal(), ordinal);
    }
    assert_eq!(BucketKind::from_ordinal(9), None);
    assert_eq!(BucketKind::from_day_offset(-400), BucketKind::Overdue);
    assert_eq!(BucketKind::from_day_offset(400), BucketKind::Future);
}

#[test]
fn out_of_range_days_ahead_fold_into_neighbouring_buckets() {
    let result = classify_with_tz(date(2024, 6, 10), &Utc, &[arriving("late", "2024-06-30")]);

    assert_eq!(BucketKind::DaysAhead(9).ordinal(), 8);
    assert_eq!(BucketKind::DaysAhead(0).ordinal(), 1);
    assert_eq!(customers(result.bucket(BucketKind::DaysAhead(200))), vec!["late"]);
    assert_eq!(result.bucket(BucketKind::DaysAhead(0)).kind, BucketKind::Today);
}
