//! Session lifecycle against an in-memory story service

mod common;

use std::sync::Arc;

use common::{config, Broken, FakeStory, Identity, OneWay, Shouting};
use storyvoice_agent::{Actors, SessionError, SessionState, StorySession};
use storyvoice_config::SessionConfig;
use storyvoice_core::{StoryError, Translator};

const DIALOGUE: &str = "User: Hi\nAgent: Hello, how can I help?";

fn session(
    story: &Arc<FakeStory>,
    translator: Arc<dyn Translator>,
    seed_chars: usize,
) -> StorySession {
    StorySession::new(
        story.clone(),
        translator,
        SessionConfig {
            seed_chars,
            ..config()
        },
    )
}

async fn started(story: &Arc<FakeStory>, scene: &str, seed_chars: usize) -> StorySession {
    let mut session = session(story, Arc::new(Identity), seed_chars);
    session.start(scene).await.unwrap();
    session
}

#[tokio::test]
async fn test_once_upon_a_time() {
    let story = FakeStory::with_generations([" there was"]);
    let mut session = session(&story, Arc::new(Identity), 10);

    session.create("Once upon ").await.unwrap();
    assert_eq!(session.state(), SessionState::Created);
    assert_eq!(session.adventure_id().map(|id| id.as_str()), Some("A1"));
    assert_eq!(session.history().len(), 1);

    session.await_first_generation().await.unwrap();
    assert_eq!(session.history().len(), 2);

    session.prime("a time.").await.unwrap();
    assert_eq!(session.state(), SessionState::Primed);
    assert_eq!(session.transcript().canonical, "Once upon a time.");
    assert_eq!(session.history().turns(), story.turns().as_slice());
}

#[tokio::test]
async fn test_start_runs_whole_lifecycle() {
    let story = FakeStory::with_generations([" there was"]);
    let session = started(&story, "Once upon a time.", 10).await;

    assert_eq!(session.state(), SessionState::Interactive);
    assert_eq!(session.transcript().canonical, "Once upon a time.");
    assert_eq!(story.turns()[0].text, "Once upon ");
    assert!(session.actors().is_none());
    assert!(story.calls().contains(&"configure 1 dragon".to_string()));
}

#[tokio::test]
async fn test_seed_split_counts_characters() {
    let story = FakeStory::with_generations(["..."]);
    let session = started(&story, "안녕하세요 여러분", 4).await;

    assert_eq!(story.turns()[0].text, "안녕하세");
    assert_eq!(session.transcript().canonical, "안녕하세요 여러분");
}

#[tokio::test]
async fn test_first_generation_is_bounded() {
    let story = FakeStory::new();
    let mut session = session(&story, Arc::new(Identity), 4);

    let err = session.start("Once upon a time.").await.unwrap_err();
    assert!(matches!(err, SessionError::FirstGenerationTimeout { attempts: 5 }));
    assert!(err.is_fatal());
    assert_eq!(story.count_calls("send"), 5);
}

#[tokio::test]
async fn test_polling_failure_is_fatal() {
    let story = FakeStory::new();
    story.fail_next_send(StoryError::Timeout);
    let mut session = session(&story, Arc::new(Identity), 4);

    let err = session.start("Once upon a time.").await.unwrap_err();
    assert!(matches!(err, SessionError::Fatal(StoryError::Timeout)));
    assert_eq!(session.state(), SessionState::Created);
}

#[tokio::test]
async fn test_operations_check_state() {
    let story = FakeStory::new();
    let mut session = session(&story, Arc::new(Identity), 4);

    let err = session.continue_story("hello").await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidState {
            actual: SessionState::Uninitialized,
            ..
        }
    ));
    assert!(session.await_first_generation().await.is_err());
    assert!(session.rollback(1).await.is_err());
    assert!(story.calls().is_empty());
}

#[tokio::test]
async fn test_history_always_equals_server_list() {
    let story = FakeStory::with_generations([" there was", "\nA knight.\nA dragon."]);
    let mut session = started(&story, "Once upon a time.", 10).await;
    session.continue_story("look around").await.unwrap();

    for (id, text) in [("t1", "Long ago "), ("t4", "\nA bard."), ("t3", "")] {
        session.alter(id, text).await.unwrap();
        assert_eq!(session.history().turns(), story.turns().as_slice());
    }
    assert_eq!(session.transcript().canonical, "Long ago a time.\nA bard.");
}

#[tokio::test]
async fn test_rollback_non_positive_is_noop() {
    let story = FakeStory::with_generations([" there was"]);
    let mut session = started(&story, "Once upon a time.", 10).await;
    let before = session.transcript().clone();
    let alters = story.count_calls("alter");

    session.rollback(0).await.unwrap();
    session.rollback(-3).await.unwrap();

    assert_eq!(session.transcript(), &before);
    assert_eq!(story.count_calls("alter"), alters);
}

#[tokio::test]
async fn test_rollback_by_lines() {
    let story =
        FakeStory::with_generations([" there was", "\nThe door creaks.\nA bat flies out."]);
    let mut session = started(&story, "Once upon a time.", 10).await;
    session.continue_story("open the door").await.unwrap();
    assert_eq!(
        session.transcript().canonical,
        "Once upon a time.\nopen the door\nThe door creaks.\nA bat flies out."
    );

    session.rollback(1).await.unwrap();
    assert_eq!(
        session.transcript().canonical,
        "Once upon a time.\nopen the door\nThe door creaks."
    );

    session.rollback(2).await.unwrap();
    assert_eq!(session.transcript().canonical, "Once upon a time.\nopen the door");
    assert_eq!(session.history().turns(), story.turns().as_slice());
}

#[tokio::test]
async fn test_rollback_past_start_empties_everything() {
    let story = FakeStory::with_generations([" there was", "\nThe end."]);
    let mut session = started(&story, "Once upon a time.", 10).await;
    session.continue_story("wait").await.unwrap();

    session.rollback(100).await.unwrap();
    assert!(session.history().turns().iter().all(|t| t.text.is_empty()));
    assert_eq!(session.transcript().canonical, "");

    let emptied = session.history().clone();
    session.rollback(100).await.unwrap();
    assert_eq!(session.history(), &emptied);
}

#[tokio::test]
async fn test_continue_timeout_keeps_history() {
    let story = FakeStory::with_generations([" there was", "\nA bat flies out."]);
    let mut session = started(&story, "Once upon a time.", 10).await;
    let history = session.history().clone();
    let transcript = session.transcript().clone();

    story.fail_next_send(StoryError::Timeout);
    let err = session.continue_story("open the door").await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(session.history(), &history);
    assert_eq!(session.transcript(), &transcript);

    story.fail_next_fetch(StoryError::Rejected("Action in progress".into()));
    let err = session.continue_story("open the door").await.unwrap_err();
    assert!(matches!(err, SessionError::Transient(StoryError::Rejected(_))));
    assert_eq!(session.history(), &history);

    // The session stays usable
    session.continue_story("").await.unwrap();
    assert_eq!(session.state(), SessionState::Interactive);
}

#[tokio::test]
async fn test_continue_connection_lost_is_fatal() {
    let story = FakeStory::with_generations([" there was"]);
    let mut session = started(&story, "Once upon a time.", 10).await;

    story.fail_next_send(StoryError::ConnectionLost("reset by peer".into()));
    let err = session.continue_story("hello").await.unwrap_err();
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_alter_failure_is_fatal() {
    let story = FakeStory::with_generations([" there was", "\nMore."]);
    let mut session = started(&story, "Once upon a time.", 10).await;
    session.continue_story("go").await.unwrap();

    story.fail_next_alter(StoryError::Malformed("no actions".into()));
    let err = session.rollback(1).await.unwrap_err();
    assert!(matches!(err, SessionError::Fatal(StoryError::Malformed(_))));
}

#[tokio::test]
async fn test_transcripts_follow_translation() {
    let story = FakeStory::with_generations([" there was", "\nThe door opens."]);
    let mut session = session(&story, Arc::new(Shouting), 10);
    session.start("Once upon a time.").await.unwrap();
    assert_eq!(session.transcript().local, "ONCE UPON A TIME.");

    session.continue_story("OPEN THE DOOR").await.unwrap();
    assert!(story.calls().contains(&"send open the door".to_string()));
    assert_eq!(session.local_tail(1), "THE DOOR OPENS.");
    assert_eq!(
        session.transcript().local_lines().len(),
        session.transcript().canonical_lines().len()
    );
}

#[tokio::test]
async fn test_translation_failure() {
    let story = FakeStory::with_generations([" there was"]);
    let mut session = session(&story, Arc::new(Broken), 10);
    session.start("Once upon a time.").await.unwrap();

    // Local view falls back to the canonical text
    assert_eq!(session.transcript().local, "Once upon a time.");

    let sends = story.count_calls("send");
    let err = session.continue_story("문을 연다").await.unwrap_err();
    assert!(matches!(err, SessionError::Translation(_)));
    assert_eq!(story.count_calls("send"), sends);
}

#[tokio::test]
async fn test_identity_round_trip() {
    let translator = Identity;
    let sentence = "The knight draws her sword.";
    let local = translator.to_local(sentence).await.unwrap();
    assert_eq!(translator.from_local(&local).await.unwrap(), sentence);
    assert!(translator.is_identity());
}

#[tokio::test]
async fn test_actors_from_dialogue_scene() {
    let story = FakeStory::with_generations([" whatever"]);
    let session = started(&story, DIALOGUE, 4).await;

    assert_eq!(story.turns()[0].text, "User");
    assert_eq!(session.transcript().canonical, DIALOGUE);
    assert_eq!(
        session.actors(),
        Some(&Actors {
            user: "User".into(),
            agent: "Agent".into()
        })
    );
}

#[tokio::test]
async fn test_ask_trims_after_answer() {
    let story = FakeStory::with_generations([
        " whatever",
        "\nAgent: It is north of here.\nUser: Thanks",
    ]);
    let mut session = started(&story, DIALOGUE, 4).await;

    let answer = session.ask("Where is the inn?").await.unwrap().unwrap();
    assert_eq!(answer.pivot, "It is north of here.");
    assert_eq!(answer.local, "It is north of here.");
    assert!(answer.complete);
    assert_eq!(
        session.transcript().canonical,
        format!("{DIALOGUE}\nUser: Where is the inn?\nAgent: It is north of here.")
    );
    assert_eq!(session.history().turns(), story.turns().as_slice());
}

#[tokio::test]
async fn test_ask_nudges_until_answer_is_finished() {
    let story = FakeStory::with_generations([" whatever", "\nAgent: It is", " north.\nUser: ok"]);
    let mut session = started(&story, DIALOGUE, 4).await;

    let answer = session.ask("Where is the inn?").await.unwrap().unwrap();
    assert_eq!(answer.pivot, "It is north.");
    assert!(story.calls().contains(&"send ".to_string()));
    assert!(session.transcript().canonical.ends_with("Agent: It is north."));
}

#[tokio::test]
async fn test_ask_exhaustion() {
    let story = FakeStory::with_generations([" whatever"]);
    let mut session = started(&story, DIALOGUE, 4).await;
    let sends = story.count_calls("send");

    assert_eq!(session.ask("Anyone there?").await.unwrap(), None);
    // The question plus one nudge per attempt
    assert_eq!(story.count_calls("send"), sends + 1 + 5);

    story.script("\nAgent: Maybe");
    let partial = session.ask("Hello?").await.unwrap().unwrap();
    assert_eq!(partial.pivot, "Maybe");
    assert!(!partial.complete);
}

#[tokio::test]
async fn test_ask_translates_both_ways() {
    let story = FakeStory::with_generations([
        " whatever",
        "\nAgent: the inn is north\nUser: thanks",
    ]);
    let mut session = session(&story, Arc::new(Shouting), 4);
    session.start(DIALOGUE).await.unwrap();

    let answer = session.ask("WHERE IS THE INN?").await.unwrap().unwrap();
    assert!(story.calls().contains(&"send User: where is the inn?".to_string()));
    assert_eq!(answer.pivot, "the inn is north");
    assert_eq!(answer.local, "THE INN IS NORTH");
}

#[tokio::test]
async fn test_ask_keeps_answer_when_translation_fails() {
    let story = FakeStory::with_generations([
        " whatever",
        "\nAgent: the inn is north\nUser: thanks",
    ]);
    let mut session = session(&story, Arc::new(OneWay), 4);
    session.start(DIALOGUE).await.unwrap();

    let answer = session.ask("Where is the inn?").await.unwrap().unwrap();
    assert_eq!(answer.pivot, "the inn is north");
    assert_eq!(answer.local, "the inn is north");
    assert!(answer.complete);
    assert!(session
        .transcript()
        .canonical
        .ends_with("User: Where is the inn?\nAgent: the inn is north"));
}

#[tokio::test]
async fn test_ask_requires_actors() {
    let story = FakeStory::with_generations([" there was"]);
    let mut session = started(&story, "Once upon a time.", 10).await;

    let err = session.ask("Who are you?").await.unwrap_err();
    assert!(matches!(err, SessionError::ActorsUnavailable));
    assert_eq!(story.count_calls("send"), 1);
}

#[tokio::test]
async fn test_ask_question_timeout_is_transient() {
    let story = FakeStory::with_generations([" whatever"]);
    let mut session = started(&story, DIALOGUE, 4).await;
    let history = session.history().clone();

    story.fail_next_send(StoryError::Timeout);
    let err = session.ask("Where?").await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(session.history(), &history);
}
