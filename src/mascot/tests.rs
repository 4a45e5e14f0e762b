use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

// ── Helpers ────────────────────────────────────────────

fn seeded(seed: u64) -> MascotConfig {
    MascotConfig {
        seed: Some(seed),
        ..MascotConfig::default()
    }
}

fn fast(seed: u64, interval_ms: u64) -> MascotConfig {
    MascotConfig {
        roam_interval_min_ms: interval_ms,
        roam_interval_max_ms: interval_ms,
        ..seeded(seed)
    }
}

/// Records every event the mascot emits.
fn recorder(mascot: &Mascot) -> (Arc<Mutex<Vec<MascotEvent>>>, Subscription) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let sub = mascot.on_change(move |e| sink.lock().unwrap().push(e.clone()));
    (events, sub)
}

async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ── Construction ───────────────────────────────────────

#[test]
fn new_outside_runtime_is_an_error() {
    let err = Mascot::new(MascotConfig::default()).unwrap_err();
    assert!(matches!(err, MascotError::NoRuntime));
}

#[tokio::test]
async fn rejects_invalid_config() {
    let config = MascotConfig {
        roam_interval_min_ms: 0,
        ..MascotConfig::default()
    };
    assert!(matches!(
        Mascot::new(config),
        Err(MascotError::InvalidConfig(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn starts_idle_at_home() {
    let mascot = Mascot::new(seeded(1)).unwrap();
    let snap = mascot.get_current_state();
    assert_eq!(snap.state, AnimationState::Idle);
    assert_eq!(snap.position, mascot.config().home);
    assert_eq!(snap.revision, 0);
    assert!(!snap.roaming);
    assert_eq!(snap.ledger.energy, 100.0);
}

#[tokio::test(start_paused = true)]
async fn instances_do_not_share_state() {
    let a = Mascot::new(seeded(1)).unwrap();
    let b = Mascot::new(seeded(1)).unwrap();
    assert_ne!(a.id(), b.id());

    a.jump_to_chat();
    let snap = b.get_current_state();
    assert_eq!(snap.state, AnimationState::Idle);
    assert_eq!(snap.revision, 0);
    assert_eq!(snap.position, b.config().home);
}

// ── Roaming ────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn second_start_does_not_double_the_tick_rate() {
    let mascot = Mascot::new(fast(4, 1000)).unwrap();
    assert!(mascot.start_roaming());
    assert!(!mascot.start_roaming(), "already roaming");
    assert!(mascot.is_roaming());

    advance(1500).await;
    assert_eq!(mascot.ticks(), 1);

    advance(1000).await;
    assert_eq!(mascot.ticks(), 2);
}

#[tokio::test(start_paused = true)]
async fn stop_roaming_freezes_position_and_ledger() {
    let mascot = Mascot::new(fast(11, 100)).unwrap();
    mascot.start_roaming();
    advance(1050).await;
    assert!(mascot.stop_roaming());
    assert!(!mascot.stop_roaming(), "already stopped");

    let before = mascot.get_current_state();
    let ticks = mascot.ticks();
    assert!(ticks >= 10);

    // Long enough for any in-flight action or nap to finish.
    advance(20_000).await;
    let after = mascot.get_current_state();
    assert_eq!(mascot.ticks(), ticks);
    assert_eq!(after.position, before.position);
    assert_eq!(after.ledger, before.ledger);
    assert!(!after.roaming);
}

#[tokio::test(start_paused = true)]
async fn roaming_resumes_after_restart() {
    let mascot = Mascot::new(fast(2, 500)).unwrap();
    mascot.start_roaming();
    advance(600).await;
    mascot.stop_roaming();
    advance(5000).await;
    assert_eq!(mascot.ticks(), 1);

    assert!(mascot.start_roaming());
    advance(600).await;
    assert_eq!(mascot.ticks(), 2);
}

#[tokio::test(start_paused = true)]
async fn roaming_loop_stops_when_last_handle_dropped() {
    let mascot = Mascot::new(fast(3, 100)).unwrap();
    let (events, _sub) = recorder(&mascot);
    mascot.start_roaming();
    advance(250).await;
    drop(mascot);

    let seen = events.lock().unwrap().len();
    advance(1000).await;
    assert_eq!(events.lock().unwrap().len(), seen);
}

#[tokio::test(start_paused = true)]
async fn ticks_keep_the_ledger_in_bounds() {
    let mascot = Mascot::new(fast(21, 50)).unwrap();
    let (events, _sub) = recorder(&mascot);
    mascot.start_roaming();

    for _ in 0..40 {
        advance(250).await;
        let ledger = mascot.get_current_state().ledger;
        assert!((0.0..=100.0).contains(&ledger.energy));
        assert!((30.0..=100.0).contains(&ledger.mood));
        assert!((40.0..=100.0).contains(&ledger.happiness));
    }
    assert!(!events.lock().unwrap().is_empty());
}

// ── Decisions ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn exhausted_mascot_naps_then_wakes() {
    let mascot = Mascot::new(seeded(5)).unwrap();
    let (events, _sub) = recorder(&mascot);
    mascot.set_ledger(Ledger::with_values(5.0, 60.0, 60.0));

    let event = mascot.tick_now().expect("awake mascot decides");
    assert_eq!(event.state, AnimationState::Sleeping);
    assert_eq!(
        event.cause,
        ChangeCause::Decision {
            reason: DecisionReason::Exhausted
        }
    );
    assert_eq!(mascot.get_current_state().ledger.energy, 100.0);

    assert!(mascot.tick_now().is_none(), "ticks are skipped while asleep");
    assert_eq!(mascot.ticks(), 2);

    advance(7_900).await;
    assert_eq!(mascot.get_current_state().state, AnimationState::Sleeping);
    advance(200).await;

    let events = events.lock().unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.state, AnimationState::Idle);
    assert_eq!(last.previous_state, AnimationState::Sleeping);
    assert_eq!(last.cause, ChangeCause::Wake);
}

#[tokio::test(start_paused = true)]
async fn click_wakes_a_napping_mascot() {
    let mascot = Mascot::new(seeded(5)).unwrap();
    let (events, _sub) = recorder(&mascot);
    mascot.set_ledger(Ledger::with_values(1.0, 60.0, 60.0));
    mascot.tick_now();

    advance(1000).await;
    mascot.trigger_celebration();
    advance(2500).await;
    assert_eq!(mascot.get_current_state().state, AnimationState::Celebrating);

    advance(10_000).await;
    let events = events.lock().unwrap();
    assert!(
        !events.iter().any(|e| e.cause == ChangeCause::Wake),
        "the cancelled nap timer must not fire"
    );
    assert_eq!(events.last().unwrap().cause, ChangeCause::Revert);
}

// ── Triggers ───────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn celebration_always_lands_in_a_celebratory_state() {
    for seed in 0..20 {
        let mascot = Mascot::new(seeded(seed)).unwrap();
        mascot.set_ledger(Ledger::with_values(seed as f32 * 5.0, 30.0, 40.0));
        mascot.tick_now();

        let event = mascot.trigger_celebration();
        assert!(event.state.is_celebratory(), "seed {seed}: {:?}", event.state);
        assert!(mascot.get_current_state().state.is_celebratory());
    }
}

#[tokio::test(start_paused = true)]
async fn newer_action_is_not_cut_short_by_older_timer() {
    let mascot = Mascot::new(seeded(8)).unwrap();
    mascot.trigger_think();
    advance(1000).await;
    mascot.trigger_celebration();

    // The think timer would have fired at 3000ms.
    advance(2500).await;
    assert_eq!(mascot.get_current_state().state, AnimationState::Celebrating);

    advance(600).await;
    assert_eq!(mascot.get_current_state().state, AnimationState::Idle);
}

#[tokio::test(start_paused = true)]
async fn trigger_rewards_the_ledger() {
    let mascot = Mascot::new(seeded(9)).unwrap();
    mascot.set_ledger(Ledger::with_values(50.0, 50.0, 50.0));
    mascot.trigger_celebration();
    let ledger = mascot.get_current_state().ledger;
    assert_eq!(ledger.mood, 60.0);
    assert_eq!(ledger.happiness, 65.0);

    mascot.set_ledger(Ledger::with_values(50.0, 98.0, 99.0));
    mascot.trigger_celebration();
    let ledger = mascot.get_current_state().ledger;
    assert_eq!(ledger.mood, 100.0);
    assert_eq!(ledger.happiness, 100.0);
}

#[tokio::test(start_paused = true)]
async fn jump_to_chat_and_go_home_teleport() {
    let mascot = Mascot::new(seeded(10)).unwrap();

    let event = mascot.jump_to_chat();
    assert_eq!(event.state, AnimationState::Jumping);
    assert_eq!(event.position, mascot.config().chat);

    let event = mascot.go_home();
    assert_eq!(event.state, AnimationState::Waving);
    assert_eq!(event.position, mascot.config().home);
    assert_eq!(event.previous_state, AnimationState::Jumping);

    advance(3000).await;
    let snap = mascot.get_current_state();
    assert_eq!(snap.state, AnimationState::Idle);
    assert_eq!(snap.position, mascot.config().home);
}

#[tokio::test(start_paused = true)]
async fn every_trigger_reverts_to_idle() {
    let mascot = Mascot::new(seeded(12)).unwrap();
    for kind in TriggerKind::ALL {
        let event = mascot.trigger(kind);
        assert_eq!(event.state, kind.state());
        assert_eq!(event.cause, ChangeCause::Trigger { kind });
        advance(kind.duration(mascot.config()).as_millis() as u64 + 1).await;
        assert_eq!(
            mascot.get_current_state().state,
            AnimationState::Idle,
            "{kind:?} should revert"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn only_celebration_resets_boredom_by_default() {
    let mascot = Mascot::new(seeded(13)).unwrap();
    advance(70_000).await;
    assert!(mascot.idle_for() >= Duration::from_secs(70));

    mascot.trigger_laugh();
    mascot.trigger_sing();
    assert!(mascot.idle_for() >= Duration::from_secs(70));

    mascot.trigger_celebration();
    assert_eq!(mascot.idle_for(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn all_triggers_reset_boredom_when_configured() {
    let config = MascotConfig {
        interaction_refresh: InteractionRefresh::AllTriggers,
        ..seeded(13)
    };
    let mascot = Mascot::new(config).unwrap();
    advance(70_000).await;
    mascot.trigger_surprise();
    assert_eq!(mascot.idle_for(), Duration::ZERO);
}

// ── Observers ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn unsubscribed_listener_is_never_called_again() {
    let mascot = Mascot::new(seeded(14)).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let sub = mascot.on_change(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    mascot.trigger_laugh();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    assert!(sub.unsubscribe());
    assert_eq!(mascot.subscriber_count(), 0);
    mascot.trigger_sing();
    advance(10_000).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn events_carry_increasing_revisions() {
    let mascot = Mascot::new(fast(15, 200)).unwrap();
    let (events, _sub) = recorder(&mascot);
    mascot.start_roaming();
    advance(3000).await;
    mascot.trigger_surprise();
    advance(3000).await;

    let events = events.lock().unwrap();
    assert!(events.len() > 5);
    for pair in events.windows(2) {
        assert_eq!(pair[1].revision, pair[0].revision + 1);
        assert_eq!(pair[1].previous_state, pair[0].state);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn listeners_see_revisions_in_order_across_threads() {
    let mut config = seeded(18);
    config.durations.think_ms = 1;
    config.durations.laugh_ms = 1;
    let mascot = Mascot::new(config).unwrap();
    let (events, _sub) = recorder(&mascot);

    // Host threads trigger while revert timers fire on the workers.
    let callers: Vec<_> = (0..4)
        .map(|i| {
            let m = mascot.clone();
            tokio::task::spawn_blocking(move || {
                for _ in 0..2000 {
                    if i % 2 == 0 {
                        m.trigger_think();
                    } else {
                        m.trigger_laugh();
                    }
                }
            })
        })
        .collect();
    for caller in callers {
        caller.await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;

    let events = events.lock().unwrap();
    assert!(events.len() >= 8000, "only {} events", events.len());
    assert_eq!(events[0].revision, 1);
    for pair in events.windows(2) {
        assert_eq!(
            pair[1].revision,
            pair[0].revision + 1,
            "listener saw revision {} after {}",
            pair[1].revision,
            pair[0].revision
        );
    }
}

#[tokio::test(start_paused = true)]
async fn listener_may_trigger_without_deadlock() {
    let mascot = Mascot::new(seeded(19)).unwrap();
    let (events, _sub) = recorder(&mascot);
    let nested = mascot.clone();
    let _chain = mascot.on_change(move |e| {
        if e.state == AnimationState::Surprised {
            nested.trigger_laugh();
        }
    });

    mascot.trigger_surprise();
    let events = events.lock().unwrap();
    let states: Vec<_> = events.iter().map(|e| e.state).collect();
    assert_eq!(
        states,
        vec![AnimationState::Surprised, AnimationState::Laughing]
    );
    assert_eq!(events[1].revision, 2);
}

#[tokio::test(start_paused = true)]
async fn listener_may_read_state_without_deadlock() {
    let mascot = Mascot::new(seeded(16)).unwrap();
    let reader = mascot.clone();
    let seen = Arc::new(Mutex::new(None));
    let s = Arc::clone(&seen);
    let _sub = mascot.on_change(move |_| {
        *s.lock().unwrap() = Some(reader.get_current_state().state);
    });

    mascot.trigger_sing();
    assert_eq!(*seen.lock().unwrap(), Some(AnimationState::Singing));
}

// ── Snapshot ───────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn snapshot_serializes_for_the_frontend() {
    let mascot = Mascot::new(seeded(17)).unwrap();
    let json = serde_json::to_value(mascot.get_current_state()).unwrap();
    assert_eq!(json["state"], "idle");
    assert_eq!(json["position"]["x"], 88.0);
    assert_eq!(json["roaming"], false);
    assert!(json["ledger"]["energy"].is_number());

    let event = mascot.trigger_celebration();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["state"], "celebrating");
    assert_eq!(json["cause"]["type"], "trigger");
    assert_eq!(json["cause"]["kind"], "celebration");
}

// ── Soak ───────────────────────────────────────────────

#[cfg(feature = "stress")]
#[tokio::test(start_paused = true)]
async fn soak_many_mascots() {
    let mascots: Vec<Mascot> = (0..64)
        .map(|seed| Mascot::new(fast(seed, 20)).unwrap())
        .collect();
    for m in &mascots {
        m.start_roaming();
    }
    for round in 0..600 {
        advance(100).await;
        if round % 50 == 0 {
            for m in &mascots {
                m.trigger_celebration();
            }
        }
        for m in &mascots {
            let ledger = m.get_current_state().ledger;
            assert!((0.0..=100.0).contains(&ledger.energy));
            assert!((30.0..=100.0).contains(&ledger.mood));
            assert!((40.0..=100.0).contains(&ledger.happiness));
        }
    }
    for m in &mascots {
        assert!(m.ticks() > 1000);
        m.stop_roaming();
    }
}
