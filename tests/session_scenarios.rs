//! End-to-end session tests with scripted and random players.

mod common;

use common::{Script, calls_by, log_lines, play, rules, table};
use spyfall::{
    ActionKind, Ballot, EventSink, GameEvent, GameRules, GameSession, LocationPack,
    REASON_CAUGHT_BUT_GUESSED, REASON_CONVICTED_INNOCENT, REASON_CONVICTED_SPY,
    REASON_SPY_CAUGHT, REASON_TOTAL_DECEPTION, REASON_VOLUNTARY_RIGHT, REASON_VOLUNTARY_WRONG,
    Seat, SeatSpec, SimpleAi, TargetLegality, Winner, check_invariant,
};

const TABLE: &[&str] = &["Ann", "Bob", "Cat", "Dan"];
const SPY: usize = 3;

fn accuser(target: &str) -> Script {
    Script {
        actions: vec![ActionKind::Vote],
        accuse_target: target.to_string(),
        ..Script::voting("Dan")
    }
}

fn juror(ballot: Ballot) -> Script {
    Script {
        ballot,
        ..Script::voting("Dan")
    }
}

#[tokio::test]
async fn test_unanimous_vote_catches_spy() {
    let scripts = vec![
        Script::voting("Dan"),
        Script::voting("Dan"),
        Script::voting("dan"),
        Script {
            guess: Some("Beach".to_string()),
            ..Script::voting("Ann")
        },
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(6, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.winner(), Winner::Civilians);
    assert_eq!(outcome.reason(), REASON_SPY_CAUGHT);
    assert_eq!(outcome.accused_name().as_deref(), Some("Dan"));
    assert!(!outcome.is_tie());
    assert!(!outcome.ended_early());
    assert_eq!(outcome.turns().len(), 6);
    assert_eq!(outcome.rounds_played(), 6);
    assert!(check_invariant::<[spyfall::Turn], TargetLegality>(outcome.turns()).is_ok());
}

#[tokio::test]
async fn test_split_jury_does_not_convict() {
    let scripts = vec![
        accuser("Bob"),
        Script::voting("Dan"),
        juror(Ballot::Yes),
        Script {
            ballot: Ballot::No,
            ..Script::voting("Ann")
        },
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(1, "Ann"));
    let (result, events) = play(session, rx).await;
    let outcome = result.unwrap();

    assert!(!outcome.ended_early());
    assert_eq!(outcome.rounds_played(), 1);
    assert!(outcome.turns().is_empty());
    assert!(log_lines(&events).iter().any(|l| l.contains("acquitted")));
    assert!(log_lines(&events).iter().any(|l| l.contains("2 of 4")));
}

#[tokio::test]
async fn test_jury_excludes_accuser_and_accused() {
    let scripts = vec![
        accuser("Bob"),
        Script::voting("Dan"),
        juror(Ballot::Yes),
        juror(Ballot::No),
    ];
    let (session, calls, rx) = table(TABLE, SPY, scripts, rules(1, "Ann"));
    let (result, _) = play(session, rx).await;
    result.unwrap();

    assert!(!calls_by(&calls, "Ann").contains(&"vote_on_accusation".to_string()));
    assert!(!calls_by(&calls, "Bob").contains(&"vote_on_accusation".to_string()));
    assert!(calls_by(&calls, "Bob").contains(&"defend".to_string()));

    let all = calls.lock().unwrap().clone();
    let cat = all.iter().position(|c| c == "Cat:vote_on_accusation").unwrap();
    let dan = all.iter().position(|c| c == "Dan:vote_on_accusation").unwrap();
    assert!(cat < dan, "jurors are polled in roster order");
}

#[tokio::test]
async fn test_spy_guesses_early_and_wins() {
    let scripts = vec![
        Script::voting("Dan"),
        Script::voting("Dan"),
        Script::voting("Dan"),
        Script {
            actions: vec![ActionKind::Guess],
            guess: Some("Airplane".to_string()),
            ..Script::voting("Ann")
        },
    ];
    let (session, calls, rx) = table(TABLE, SPY, scripts, rules(5, "Dan"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.winner(), Winner::Spy);
    assert_eq!(outcome.reason(), REASON_VOLUNTARY_RIGHT);
    assert!(outcome.ended_early());
    assert_eq!(outcome.rounds_played(), 1);
    assert!(outcome.turns().is_empty());
    assert_eq!(outcome.spy_guess().as_deref(), Some("Airplane"));
    assert!(!calls_by(&calls, "Ann").contains(&"vote".to_string()));
}

#[tokio::test]
async fn test_wrong_voluntary_guess_loses() {
    let scripts = vec![
        Script::default(),
        Script::default(),
        Script::default(),
        Script {
            actions: vec![ActionKind::Guess],
            guess: Some("Casino".to_string()),
            ..Script::default()
        },
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(5, "Dan"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.winner(), Winner::Civilians);
    assert_eq!(outcome.reason(), REASON_VOLUNTARY_WRONG);
    assert!(outcome.ended_early());
}

#[tokio::test]
async fn test_tied_vote_and_wrong_guess_is_total_deception() {
    let scripts = vec![
        Script::voting("Bob"),
        Script::voting("Ann"),
        Script::voting("Bob"),
        Script {
            guess: Some("Beach".to_string()),
            ..Script::voting("Ann")
        },
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(2, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert!(outcome.is_tie());
    assert_eq!(outcome.accused_name(), &None);
    assert_eq!(outcome.winner(), Winner::Spy);
    assert_eq!(outcome.reason(), REASON_TOTAL_DECEPTION);
}

#[tokio::test]
async fn test_malformed_votes_fall_back_and_still_sum() {
    let scripts = (0..4)
        .map(|_| Script {
            vote: "I really cannot decide".to_string(),
            ..Script::default()
        })
        .collect();
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(0, "Ann"));
    let (result, events) = play(session, rx).await;
    let outcome = result.unwrap();
    assert!(outcome.turns().is_empty());

    let lines = log_lines(&events);
    assert_eq!(lines.iter().filter(|l| l.contains("unreadable")).count(), 4);
    let tally = lines
        .iter()
        .find_map(|l| l.strip_prefix("Tally: "))
        .unwrap();
    let total: usize = tally
        .split(", ")
        .map(|entry| entry.rsplit(": ").next().unwrap().parse::<usize>().unwrap())
        .sum();
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_convicting_an_innocent_hands_spy_the_win() {
    let scripts = vec![
        accuser("Bob"),
        Script::default(),
        juror(Ballot::Yes),
        juror(Ballot::Yes),
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(3, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.winner(), Winner::Spy);
    assert_eq!(outcome.reason(), REASON_CONVICTED_INNOCENT);
    assert!(outcome.ended_early());
    assert_eq!(outcome.rounds_played(), 1);
}

#[tokio::test]
async fn test_convicted_spy_can_steal_the_win() {
    let scripts = vec![
        accuser("dan"),
        juror(Ballot::Yes),
        juror(Ballot::Yes),
        Script {
            guess: Some("the airplane ".to_string()),
            ..Script::default()
        },
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(3, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.winner(), Winner::Spy);
    assert_eq!(outcome.reason(), REASON_CAUGHT_BUT_GUESSED);
    assert_eq!(outcome.spy_guess().as_deref(), Some("the airplane"));
}

#[tokio::test]
async fn test_convicted_spy_without_guess_loses() {
    let scripts = vec![
        accuser("Dan"),
        juror(Ballot::Yes),
        juror(Ballot::No),
        Script::default(),
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(3, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    // Ann, Bob: yes. Cat, Dan: no. Three of four are needed.
    assert!(!outcome.ended_early());

    let scripts = vec![
        accuser("Dan"),
        juror(Ballot::Yes),
        juror(Ballot::Yes),
        Script::default(),
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(3, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();
    assert_eq!(outcome.winner(), Winner::Civilians);
    assert_eq!(outcome.reason(), REASON_CONVICTED_SPY);
}

#[tokio::test]
async fn test_void_accusation_skips_jury() {
    for target in ["Zed", "Ann", ""] {
        let scripts = vec![
            accuser(target),
            juror(Ballot::Yes),
            juror(Ballot::Yes),
            juror(Ballot::Yes),
        ];
        let (session, calls, rx) = table(TABLE, SPY, scripts, rules(2, "Ann"));
        let (result, events) = play(session, rx).await;
        let outcome = result.unwrap();

        let all = calls.lock().unwrap().clone();
        assert!(!all.iter().any(|c| c.ends_with(":defend")));
        assert!(!all.iter().any(|c| c.ends_with(":vote_on_accusation")));
        assert!(log_lines(&events).iter().any(|l| l.contains("void")));
        assert_eq!(outcome.rounds_played(), 2);
        assert_eq!(outcome.turns().len(), 1);
        // The void round did not move initiative.
        assert_eq!(outcome.turns()[0].asker_id().index(), 0);
    }
}

#[tokio::test]
async fn test_punctuated_name_can_be_accused_and_voted_out() {
    let names = ["Ann", "Bob", "Cat", "Dr. No."];
    let scripts = vec![
        Script {
            actions: vec![ActionKind::Vote],
            accuse_target: "Dr. No.".to_string(),
            ..Script::voting("Dr. No.")
        },
        Script {
            ballot: Ballot::No,
            ..Script::voting("Dr. No.")
        },
        Script {
            ballot: Ballot::No,
            ..Script::voting("dr. no")
        },
        Script::voting("Ann"),
    ];
    let (session, calls, rx) = table(&names, SPY, scripts, rules(1, "Ann"));
    let (result, events) = play(session, rx).await;
    let outcome = result.unwrap();
    let lines = log_lines(&events);

    assert!(calls_by(&calls, "Dr. No.").contains(&"defend".to_string()));
    assert!(!lines.iter().any(|l| l.contains("void")));
    assert!(!lines.iter().any(|l| l.contains("unreadable")));
    assert_eq!(outcome.winner(), Winner::Civilians);
    assert_eq!(outcome.reason(), REASON_SPY_CAUGHT);
    assert_eq!(outcome.accused_name().as_deref(), Some("Dr. No."));
}

#[tokio::test]
async fn test_illegal_actions_are_downgraded() {
    let scripts = vec![
        Script {
            actions: vec![ActionKind::Guess, ActionKind::Guess, ActionKind::Guess],
            ask_target: "Bob".to_string(),
            ..Script::default()
        },
        Script {
            actions: vec![ActionKind::Guess, ActionKind::Guess],
            ..Script::default()
        },
        Script::default(),
        Script::default(),
    ];
    let (session, calls, rx) = table(TABLE, SPY, scripts, rules(3, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.turns().len(), 3);
    assert!(!calls_by(&calls, "Ann").contains(&"guess_location".to_string()));
    assert!(!calls_by(&calls, "Bob").contains(&"guess_location".to_string()));
}

#[tokio::test]
async fn test_vote_action_ignored_when_accusations_disabled() {
    let scripts = vec![
        accuser("Dan"),
        Script::default(),
        Script::default(),
        Script::default(),
    ];
    let rules = rules(1, "Ann").with_allow_early_vote(false);
    let (session, calls, rx) = table(TABLE, SPY, scripts, rules);
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.turns().len(), 1);
    assert!(!calls_by(&calls, "Ann").contains(&"accuse".to_string()));
}

#[tokio::test]
async fn test_nominated_target_is_honored_and_initiative_passes() {
    let scripts = vec![
        Script {
            ask_target: "Cat".to_string(),
            ..Script::default()
        },
        Script::default(),
        Script {
            // Illegal: Ann just asked Cat.
            ask_target: "ann".to_string(),
            ..Script::default()
        },
        Script::default(),
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(2, "Ann"));
    let (result, events) = play(session, rx).await;
    let outcome = result.unwrap();

    let turns = outcome.turns();
    assert_eq!(turns[0].asker_id().index(), 0);
    assert_eq!(turns[0].target_id().index(), 2);
    assert_eq!(turns[1].asker_id().index(), 2);
    assert_ne!(turns[1].target_id().index(), 0);
    assert_ne!(turns[1].target_id().index(), 2);
    assert!(log_lines(&events).iter().any(|l| l.contains("could not ask 'ann'")));
}

#[tokio::test]
async fn test_two_player_game_runs_full_budget() {
    let scripts = vec![Script::voting("Bob"), Script::voting("Ann")];
    let (session, _calls, rx) = table(&["Ann", "Bob"], 1, scripts, rules(4, "Ann"));
    let (result, _) = play(session, rx).await;
    let outcome = result.unwrap();

    assert_eq!(outcome.turns().len(), 4);
    for turn in outcome.turns() {
        assert_ne!(turn.asker_id(), turn.target_id());
    }
}

#[tokio::test]
async fn test_reactions_come_from_bystanders_in_roster_order() {
    let scripts = vec![
        Script {
            ask_target: "Bob".to_string(),
            ..Script::default()
        },
        Script::default(),
        Script::default(),
        Script::default(),
    ];
    let rules = rules(1, "Ann").with_reactions(true);
    let (session, calls, rx) = table(TABLE, SPY, scripts, rules);
    let (result, events) = play(session, rx).await;
    result.unwrap();

    assert!(!calls_by(&calls, "Ann").contains(&"react".to_string()));
    assert!(!calls_by(&calls, "Bob").contains(&"react".to_string()));
    let reactors: Vec<String> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Reaction { player, .. } => Some(player.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(reactors, vec!["Cat", "Dan", "Cat", "Dan"]);
}

#[tokio::test]
async fn test_events_bracket_the_session() {
    let scripts = (0..4).map(|_| Script::voting("Dan")).collect();
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(2, "Ann"));
    let (result, events) = play(session, rx).await;
    result.unwrap();

    assert!(matches!(events.first(), Some(GameEvent::Started(_))));
    assert!(matches!(events.last(), Some(GameEvent::Closed)));
    assert!(matches!(events[events.len() - 2], GameEvent::Finished(_)));
    if let Some(GameEvent::Started(info)) = events.first() {
        assert_eq!(info.spy_name, "Dan");
        assert_eq!(info.location, "Airplane");
        assert_eq!(info.players.len(), 4);
    }
}

#[tokio::test]
async fn test_controller_failure_aborts_and_closes() {
    let scripts = vec![
        Script {
            ask_target: "Bob".to_string(),
            ..Script::default()
        },
        Script {
            fail_on: Some("answer"),
            ..Script::default()
        },
        Script::default(),
        Script::default(),
    ];
    let (session, _calls, rx) = table(TABLE, SPY, scripts, rules(3, "Ann"));
    let (result, events) = play(session, rx).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("lost connection"));
    assert!(matches!(events.last(), Some(GameEvent::Closed)));
    assert!(matches!(events[events.len() - 2], GameEvent::Aborted(_)));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::Finished(_))));
}

#[tokio::test]
async fn test_random_bot_games_keep_target_legality() {
    let pack = LocationPack::classic();
    for seed in 0..20u64 {
        let seats = ["Ava", "Ben", "Cleo", "Dev", "Eli"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let bot = SimpleAi::new(*name, pack.location_names(), seed * 10 + i as u64);
                Seat::new(SeatSpec::new(*name, false), Box::new(bot))
            })
            .collect();
        let rules = GameRules::new()
            .with_rounds(12)
            .with_reactions(false)
            .with_allow_early_vote(false)
            .with_seed(seed);
        let session = GameSession::new(seats, &pack, rules, EventSink::disabled()).unwrap();
        let outcome = session.run().await.unwrap();

        assert_eq!(outcome.turns().len(), 12, "seed {seed}");
        assert!(
            check_invariant::<[spyfall::Turn], TargetLegality>(outcome.turns()).is_ok(),
            "seed {seed}"
        );
    }
}

#[tokio::test]
async fn test_seeded_games_are_reproducible() {
    let pack = LocationPack::classic();
    let run = |seed: u64| {
        let pack = pack.clone();
        async move {
            let seats = ["Ava", "Ben", "Cleo"]
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let bot = SimpleAi::new(*name, pack.location_names(), i as u64);
                    Seat::new(SeatSpec::new(*name, false), Box::new(bot))
                })
                .collect();
            let rules = GameRules::new().with_rounds(5).with_seed(seed);
            GameSession::new(seats, &pack, rules, EventSink::disabled())
                .unwrap()
                .run()
                .await
                .unwrap()
        }
    };
    assert_eq!(run(99).await, run(99).await);
}
