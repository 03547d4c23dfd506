use chrono::{DateTime, Duration, TimeZone, Utc};
use meetsync_shared::{Client, ClientStatus, MeetingStatus};
use serial_test::serial;
use uuid::Uuid;

use crate::store::{
    ClientFilter, ClientSort, ClientStore, MeetingStore, NewClient, NewMeeting, PgStore,
    StoreError,
};
use crate::tests::PgTestContext;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
}

async fn insert_client(store: &PgStore, status: ClientStatus) -> Client {
    store
        .create_client(NewClient {
            name: format!("Client {}", Uuid::new_v4().simple()),
            company: Some("TechCorp Inc.".to_string()),
            email: format!("client-{}@meetsync.test", Uuid::new_v4().simple()),
            phone: None,
            status,
            notes: None,
        })
        .await
        .expect("Failed to insert client")
}

fn new_meeting(client_id: Uuid, title: &str, start: DateTime<Utc>) -> NewMeeting {
    NewMeeting {
        title: title.to_string(),
        description: None,
        client_id,
        start_time: start,
        end_time: start + Duration::hours(1),
        status: MeetingStatus::Scheduled,
        meeting_type: None,
        location: None,
    }
}

#[tokio::test]
#[serial]
async fn test_equal_start_times_return_first_inserted() {
    let Some(ctx) = PgTestContext::new().await else {
        return;
    };
    let client = insert_client(&ctx.store, ClientStatus::Active).await;
    let start = now() + Duration::days(2);

    ctx.store.create_meeting(new_meeting(client.id, "First", start)).await.unwrap();
    ctx.store.create_meeting(new_meeting(client.id, "Second", start)).await.unwrap();
    ctx.store
        .create_meeting(new_meeting(client.id, "Later", start + Duration::minutes(1)))
        .await
        .unwrap();

    let next = ctx
        .store
        .next_meeting_for_client(client.id, now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.title, "First");

    let upcoming = ctx
        .store
        .upcoming_meetings_for_client(client.id, now(), 10)
        .await
        .unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Later"]);
}

#[tokio::test]
#[serial]
async fn test_past_meeting_excluded_and_meeting_at_now_included() {
    let Some(ctx) = PgTestContext::new().await else {
        return;
    };
    let client = insert_client(&ctx.store, ClientStatus::Active).await;

    ctx.store
        .create_meeting(new_meeting(client.id, "Earlier today", now() - Duration::hours(1)))
        .await
        .unwrap();
    ctx.store
        .create_meeting(new_meeting(client.id, "Standup", now()))
        .await
        .unwrap();

    let next = ctx
        .store
        .next_meeting_for_client(client.id, now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(next.title, "Standup");
    assert_eq!(next.start_time, now());

    let upcoming = ctx
        .store
        .upcoming_meetings_for_client(client.id, now(), 10)
        .await
        .unwrap();
    assert_eq!(upcoming.len(), 1);

    let later = ctx
        .store
        .next_meeting_for_client(client.id, now() + Duration::seconds(1))
        .await
        .unwrap();
    assert!(later.is_none());
}

#[tokio::test]
#[serial]
async fn test_upcoming_meetings_respect_limit() {
    let Some(ctx) = PgTestContext::new().await else {
        return;
    };
    let client = insert_client(&ctx.store, ClientStatus::Active).await;
    for day in 1..=3 {
        ctx.store
            .create_meeting(new_meeting(client.id, &format!("Day {}", day), now() + Duration::days(day)))
            .await
            .unwrap();
    }

    let upcoming = ctx
        .store
        .upcoming_meetings_for_client(client.id, now(), 2)
        .await
        .unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Day 1", "Day 2"]);
}

#[tokio::test]
#[serial]
async fn test_statuses_round_trip_through_enum_types() {
    let Some(ctx) = PgTestContext::new().await else {
        return;
    };
    let client = insert_client(&ctx.store, ClientStatus::Inactive).await;
    assert_eq!(client.status, ClientStatus::Inactive);

    let mut confirmed = new_meeting(client.id, "Contract Review", now() + Duration::days(1));
    confirmed.status = MeetingStatus::Confirmed;
    let meeting = ctx.store.create_meeting(confirmed).await.unwrap();
    assert_eq!(meeting.status, MeetingStatus::Confirmed);

    let fetched = ctx.store.get_client(client.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, ClientStatus::Inactive);

    let inactive = ctx
        .store
        .list_clients(ClientFilter {
            status: Some(ClientStatus::Inactive),
            sort: ClientSort::Name,
        })
        .await
        .unwrap();
    assert!(inactive.iter().any(|c| c.id == client.id));
    assert!(inactive.iter().all(|c| c.status == ClientStatus::Inactive));

    let active = ctx
        .store
        .list_clients(ClientFilter {
            status: Some(ClientStatus::Active),
            sort: ClientSort::Newest,
        })
        .await
        .unwrap();
    assert!(active.iter().all(|c| c.id != client.id));
}

#[tokio::test]
#[serial]
async fn test_end_before_start_violates_check_constraint() {
    let Some(ctx) = PgTestContext::new().await else {
        return;
    };
    let client = insert_client(&ctx.store, ClientStatus::Active).await;

    // bypass NewMeeting::check_times to reach the table constraint
    let err = sqlx::query(
        "INSERT INTO meetings (id, title, client_id, start_time, end_time)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind("Backwards")
    .bind(client.id)
    .bind(now())
    .bind(now() - Duration::minutes(30))
    .execute(&ctx.db_pool)
    .await
    .unwrap_err();

    assert!(matches!(StoreError::from(err), StoreError::Constraint(_)));
}

#[tokio::test]
#[serial]
async fn test_duplicate_email_is_a_constraint_error() {
    let Some(ctx) = PgTestContext::new().await else {
        return;
    };
    let client = insert_client(&ctx.store, ClientStatus::Active).await;

    let result = ctx
        .store
        .create_client(NewClient {
            name: "Someone Else".to_string(),
            company: None,
            email: client.email.to_uppercase(),
            phone: None,
            status: ClientStatus::Active,
            notes: None,
        })
        .await;

    assert!(matches!(result, Err(StoreError::Constraint(_))));
    assert!(ctx.store.ping().await.is_ok());
}
