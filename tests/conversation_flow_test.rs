//! End-to-end checks of the conversation machinery without a database or a
//! bot: the scenario definitions, the draft session map, and the reminder
//! choice mapping driven the way the handlers drive them.

use assert_matches::assert_matches;
use chrono::{DateTime, Duration, Utc};

use remindbuddy::config::StateConfig;
use remindbuddy::models::{ReminderChoice, ReminderThreshold};
use remindbuddy::state::{ConversationContext, ScenarioManager, StateStorage, EVENT_CREATION, REGISTRATION};
use remindbuddy::utils::helpers;
use remindbuddy::RemindBuddyError;

fn storage() -> StateStorage {
    StateStorage::new(&StateConfig {
        draft_ttl_minutes: 30,
    })
}

#[tokio::test]
async fn registration_rejects_short_names_without_advancing() {
    let manager = ScenarioManager::new();
    let storage = storage();

    let mut context = ConversationContext::new(555);
    manager.start_scenario(&mut context, REGISTRATION).unwrap();
    storage.save_context(&context).await;

    let context = storage.load_context(555).await.unwrap();
    assert_matches!(
        manager.validate_input(&context, "R"),
        Err(RemindBuddyError::InvalidInput(_))
    );

    // Rejection leaves the step unchanged; nothing was persisted anywhere
    let context = storage.load_context(555).await.unwrap();
    assert!(context.is_at(REGISTRATION, "name_input"));

    assert!(manager.validate_input(&context, "Rina").is_ok());
}

#[tokio::test]
async fn event_creation_accumulates_a_complete_draft() {
    let manager = ScenarioManager::new();
    let storage = storage();

    // /add
    let mut context = ConversationContext::new(555);
    manager.start_scenario(&mut context, EVENT_CREATION).unwrap();
    storage.save_context(&context).await;

    // event name
    let mut context = storage.load_context(555).await.unwrap();
    assert!(manager.validate_input(&context, "Ujian").is_ok());
    context.set_data("event_name", "Ujian").unwrap();
    manager.next_step(&mut context, "event_date").unwrap();
    storage.save_context(&context).await;

    // date: bad input re-prompts, good input advances
    let mut context = storage.load_context(555).await.unwrap();
    assert!(manager.validate_input(&context, "someday").is_err());
    assert!(manager.validate_input(&context, "25-12-2030").is_ok());
    let date = helpers::parse_event_date("25-12-2030").unwrap();
    context.set_data("event_date", date).unwrap();
    manager.next_step(&mut context, "event_time").unwrap();
    storage.save_context(&context).await;

    // time: combined timestamp lands in the draft
    let mut context = storage.load_context(555).await.unwrap();
    assert!(manager.validate_input(&context, "99:99").is_err());
    assert!(manager.validate_input(&context, "14:30").is_ok());
    let time = helpers::parse_event_time("14:30").unwrap();
    let due_at = helpers::combine_date_time(date, time);
    assert!(due_at > Utc::now());
    context.set_data("event_datetime", due_at).unwrap();
    manager.next_step(&mut context, "reminder_choice").unwrap();
    storage.save_context(&context).await;

    // choice step only takes the fixed codes
    let context = storage.load_context(555).await.unwrap();
    assert!(context.is_at(EVENT_CREATION, "reminder_choice"));
    assert!(manager.validate_input(&context, "all").is_ok());
    assert!(manager.validate_input(&context, "weekly").is_err());

    let choice = ReminderChoice::from_callback_code("all").unwrap();
    assert_eq!(choice.flags(), (true, true, true));

    let stored: DateTime<Utc> = context.get_data("event_datetime").unwrap().unwrap();
    assert_eq!(stored, due_at);
    assert_eq!(context.get_string("event_name"), Some("Ujian".to_string()));

    // Completion evicts the draft
    storage.delete_context(555).await;
    assert!(storage.load_context(555).await.is_none());
}

#[tokio::test]
async fn cancel_discards_the_draft_midway() {
    let manager = ScenarioManager::new();
    let storage = storage();

    let mut context = ConversationContext::new(777);
    manager
        .start_scenario(&mut context, EVENT_CREATION)
        .unwrap();
    context.set_data("event_name", "Dentist").unwrap();
    storage.save_context(&context).await;

    // /cancel
    storage.delete_context(777).await;
    assert!(storage.load_context(777).await.is_none());
}

#[tokio::test]
async fn reentering_a_flow_restarts_it() {
    let manager = ScenarioManager::new();
    let storage = storage();

    let mut context = ConversationContext::new(555);
    manager.start_scenario(&mut context, EVENT_CREATION).unwrap();
    context.set_data("event_name", "Old draft").unwrap();
    manager.next_step(&mut context, "event_date").unwrap();
    storage.save_context(&context).await;

    // /add again: a fresh context replaces the old draft
    let mut context = ConversationContext::new(555);
    manager.start_scenario(&mut context, EVENT_CREATION).unwrap();
    storage.save_context(&context).await;

    let context = storage.load_context(555).await.unwrap();
    assert!(context.is_at(EVENT_CREATION, "event_name"));
    assert_eq!(context.get_string("event_name"), None);
}

#[test]
fn every_choice_has_a_distinct_triple_and_stable_code() {
    let mut seen_triples = std::collections::HashSet::new();
    let mut seen_codes = std::collections::HashSet::new();

    for choice in ReminderChoice::ALL_CHOICES {
        assert!(seen_triples.insert(choice.flags()));
        assert!(seen_codes.insert(choice.callback_code()));
        assert_eq!(ReminderChoice::from_callback_code(choice.callback_code()), Some(choice));
    }

    assert_eq!(seen_triples.len(), 8);
}

#[test]
fn dispatch_windows_cover_their_nominal_offsets_inclusively() {
    let now = Utc::now();

    let cases = [
        (ReminderThreshold::TwelveHours, Duration::hours(12), Duration::hours(11), Duration::hours(13)),
        (ReminderThreshold::FourHours, Duration::hours(4), Duration::hours(3), Duration::hours(5)),
        (ReminderThreshold::OneHour, Duration::minutes(60), Duration::minutes(45), Duration::minutes(75)),
    ];

    for (threshold, nominal, lower, upper) in cases {
        let (from, to) = threshold.window(now);
        assert_eq!(from, now + lower);
        assert_eq!(to, now + upper);

        let at_nominal = now + nominal;
        assert!(at_nominal >= from && at_nominal <= to);

        // One minute outside either edge is excluded
        assert!(now + lower - Duration::minutes(1) < from);
        assert!(now + upper + Duration::minutes(1) > to);
    }
}
