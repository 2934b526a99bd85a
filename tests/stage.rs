mod common;

use common::{cast, category_script, screen, Recorder};
use stagecraft::{
    ActorOutcome, ConditionFlag, Narratable, PerformanceOutcome, Scene, Stage, StageConfig, Story,
    TransitionOperator,
};
use std::sync::Arc;
use std::time::Duration;

fn stage(recorder: &Arc<Recorder>) -> Stage {
    Stage::new(cast(recorder), StageConfig::default())
}

/// Test that queued performances run one after another, each plotted
/// from where the previous one left the stage.
#[tokio::test]
async fn test_performances_are_serialized() {
    let recorder = Recorder::delayed(Duration::from_millis(10));
    let stage = stage(&recorder);
    let list = Story::new().root(screen("main")).push(screen("list"));
    let detail = list.clone().push(screen("detail"));

    let first = stage.perform(list.clone());
    let second = stage.perform(detail.clone());

    let first = first.finished().await.unwrap();
    let second = second.finished().await.unwrap();

    assert!(matches!(first.outcome, PerformanceOutcome::Completed));
    assert!(matches!(second.outcome, PerformanceOutcome::Completed));
    assert_eq!(first.story, list);
    assert_eq!(second.story, detail);
    assert_eq!(second.actors.len(), 1);
    assert_eq!(recorder.log(), vec!["root main", "push list", "push detail"]);
    assert_eq!(stage.story(), detail);
}

/// Test that subscribers see the story grow one actor at a time.
#[tokio::test]
async fn test_subscribers_observe_progress() {
    let recorder = Recorder::delayed(Duration::from_millis(20));
    let stage = stage(&recorder);
    let mut updates = stage.subscribe();
    let ending = Story::new()
        .root(screen("main"))
        .push(screen("a"))
        .push(screen("b"));

    let collector = tokio::spawn(async move {
        let mut lengths = Vec::new();
        while updates.changed().await.is_ok() {
            let len = updates.borrow_and_update().len();
            lengths.push(len);
            if len == 3 {
                break;
            }
        }
        lengths
    });

    let report = stage.perform(ending.clone()).finished().await.unwrap();
    let lengths = collector.await.unwrap();

    assert_eq!(report.story, ending);
    assert_eq!(lengths.last(), Some(&3));
    assert!(lengths.windows(2).all(|pair| pair[0] < pair[1]));
}

/// Test that an insert jumps ahead of queued performances and is not animated.
#[tokio::test]
async fn test_insert_runs_ahead_of_queue() {
    let recorder = Recorder::new();
    let stage = stage(&recorder);
    let main = Story::new().root(screen("main"));
    let list = main.clone().push(screen("list"));
    let detail = list.clone().push(screen("detail"));

    let first = stage.perform(list);
    let second = stage.perform(detail.clone());
    let inserted = stage.insert(main.clone()).await.unwrap();
    first.finished().await.unwrap();
    second.finished().await.unwrap();

    assert_eq!(inserted, main);
    let calls = recorder.calls();
    assert_eq!(recorder.log(), vec!["root main", "push list", "push detail"]);
    assert!(!calls[0].animated);
    assert!(calls[1].animated && calls[2].animated);
    assert_eq!(stage.story(), detail);
}

/// Test that cancelling a performance stops it after the running transition.
#[tokio::test]
async fn test_cancel_performance() {
    let recorder = Recorder::delayed(Duration::from_millis(30));
    let stage = stage(&recorder);
    let ending = Story::new()
        .root(screen("main"))
        .push(screen("a"))
        .push(screen("b"));

    let performance = stage.perform(ending);
    while !recorder.operators().contains(&TransitionOperator::Root) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    let cancel = performance.cancel_handle();
    performance.cancel();
    assert!(cancel.is_cancelled());
    let report = performance.finished().await.unwrap();

    assert!(matches!(report.outcome, PerformanceOutcome::Cancelled));
    assert_eq!(report.story.shorthand(), "/(main)");
    assert_eq!(report.actors[0].outcome, ActorOutcome::Completed);
    assert_eq!(report.actors[2].outcome, ActorOutcome::Cancelled);
    assert_eq!(recorder.calls().len(), 1);
}

/// Test that a routed path is performed.
#[tokio::test]
async fn test_perform_path() {
    let recorder = Recorder::new();
    let stage = stage(&recorder);
    stage.register(category_script());
    assert_eq!(stage.registry().len(), 1);
    let matched = stage.story_matching(&["/", "categories", "books"]).unwrap();
    assert!(matched.is_some());

    let performance = stage.perform_path("/categories/books").unwrap().unwrap();
    let report = performance.finished().await.unwrap();

    assert_eq!(report.story.shorthand(), "/(main), >(categories), >(books)");
    assert_eq!(common::name_of(&report.destination).as_deref(), Some("books"));
    assert!(stage.perform_path("/nowhere").unwrap().is_none());
}

/// Test that the stage follows its config when animating.
#[tokio::test]
async fn test_unanimated_config() {
    let recorder = Recorder::new();
    let config = StageConfig {
        animated: false,
        strict_routes: false,
    };
    let stage = Stage::new(cast(&recorder), config);
    assert!(!stage.config().animated);

    stage
        .perform(Story::new().root(screen("main")))
        .finished()
        .await
        .unwrap();

    assert!(recorder.calls().iter().all(|call| !call.animated));
    assert_eq!(stage.registered_scripts().len(), 0);
}

/// Test that a login gate is skipped when the user signs in while the
/// previous transition is still animating.
#[tokio::test]
async fn test_gate_satisfied_during_earlier_transition_is_skipped() {
    let recorder = Recorder::delayed(Duration::from_millis(50));
    let stage = stage(&recorder);
    let signed_in = ConditionFlag::new(false);
    let ending = Story::new()
        .root(screen("main"))
        .segue(Scene::present(screen("login")).unless(Arc::new(signed_in.clone())));

    let performance = stage.perform(ending);
    while !recorder.operators().contains(&TransitionOperator::Root) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    signed_in.set(true);
    let report = performance.finished().await.unwrap();

    assert_eq!(recorder.log(), vec!["root main"]);
    assert_eq!(report.actors[1].outcome, ActorOutcome::Skipped);
    assert_eq!(report.story.shorthand(), "/(main)");
}
