mod common;

use common::screen;
use stagecraft::{plot, relative, Narratable, PlotError, Story, TransitionOperator};

fn main_story() -> Story {
    Story::new().root(screen("main"))
}

/// Shorthand of the story's own scenes, without its base.
fn delta(story: &Story) -> String {
    story
        .scenes()
        .iter()
        .map(|scene| scene.shorthand())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Test that plotting a story onto itself yields nothing to perform.
#[test]
fn test_plot_to_equal_story_is_empty() {
    let from = main_story().push(screen("a"));
    let plotted = plot(&from, &from.clone()).unwrap();

    assert!(plotted.is_empty());
    assert_eq!(plotted.proofed(), from);
}

/// Test that going deeper only performs the new scenes.
#[test]
fn test_plot_deeper_performs_suffix() {
    let from = main_story();
    let to = main_story().push(screen("a")).present(screen("b"));

    let plotted = plot(&from, &to).unwrap();

    assert_eq!(delta(&plotted), ">(a), ^(b)");
    assert_eq!(plotted.base(), Some(&from));
    assert_eq!(plotted.proofed(), to);
}

/// Test that going back out performs inverses, innermost first.
#[test]
fn test_plot_shallower_unwinds_in_reverse() {
    let from = main_story().push(screen("a")).present(screen("b"));
    let to = main_story();

    let plotted = plot(&from, &to).unwrap();
    let operators: Vec<TransitionOperator> =
        plotted.scenes().iter().map(|scene| scene.operator()).collect();

    assert_eq!(
        operators,
        vec![TransitionOperator::Dismiss, TransitionOperator::Pop]
    );
    assert_eq!(plotted.proofed(), to);
}

/// Test that a story already relative to the receiver is taken as-is.
#[test]
fn test_plot_relative_target_is_kept() {
    let from = main_story().push(screen("a"));
    let to = Story::new()
        .pop()
        .push(screen("b"))
        .based_on(from.clone());

    let plotted = plot(&from, &to).unwrap();

    assert_eq!(delta(&plotted), "<(???), >(b)");
    assert_eq!(plotted.proofed(), main_story().push(screen("b")));
}

/// Test that a receiver based on the target cannot be plotted.
#[test]
fn test_plot_receiver_relative_to_target_fails() {
    let to = main_story().push(screen("a"));
    let from = Story::new()
        .pop()
        .push(screen("b"))
        .based_on(to.clone());

    let err = plot(&from, &to).unwrap_err();
    assert!(matches!(err, PlotError::ReceiverRelativeToTarget));
}

/// Test that unrelated stories are performed from scratch.
#[test]
fn test_plot_unrelated_story_restarts() {
    let from = main_story().push(screen("a"));
    let to = Story::new().root(screen("onboarding")).push(screen("welcome"));

    let plotted = plot(&from, &to).unwrap();

    assert_eq!(plotted.shorthand(), "/(onboarding), >(welcome)");
    assert!(plotted.base().is_none());
}

/// Test that plotting there and back again lands on the start.
#[test]
fn test_plot_round_trip() {
    let start = main_story();
    let detail = main_story().push(screen("list")).push(screen("detail"));

    let there = plot(&start, &detail).unwrap().proofed();
    let back = plot(&there, &start).unwrap().proofed();

    assert_eq!(there, detail);
    assert_eq!(back, start);
}

/// Test that a delta based on the other story is resolved to an absolute one.
#[test]
fn test_relative_resolves_delta_against_base() {
    let base = main_story().push(screen("a"));
    let delta = Story::new()
        .pop()
        .push(screen("b"))
        .based_on(base.clone());

    let resolved = relative(&delta, &base);

    assert!(resolved.base().is_none());
    assert_eq!(resolved.shorthand(), "/(main), >(b)");
}

/// Test that containment keeps the receiver unchanged.
#[test]
fn test_relative_keeps_contained_story() {
    let short = main_story();
    let long = main_story().push(screen("a"));

    assert_eq!(relative(&long, &short).shorthand(), long.shorthand());
    assert_eq!(relative(&short, &long).shorthand(), short.shorthand());
}
