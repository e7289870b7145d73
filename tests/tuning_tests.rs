//! Unit tests for combat tuning configuration
//!
//! These tests verify that:
//! - The shipped RON file parses and passes validation
//! - The file agrees with the in-code defaults tests rely on
//! - Validation rejects out-of-range values

use crawlsim::sim::tuning::{load_tuning, Tuning};

#[test]
fn test_shipped_tuning_file_loads_and_validates() {
    let tuning = load_tuning().expect("assets/config/tuning.ron should load");
    tuning.validate().expect("shipped tuning should validate");
}

#[test]
fn test_shipped_tuning_matches_defaults() {
    let from_file = load_tuning().expect("assets/config/tuning.ron should load");
    let defaults = Tuning::default();

    assert_eq!(from_file.player.max_health, defaults.player.max_health);
    assert_eq!(from_file.player.max_stamina, defaults.player.max_stamina);
    assert_eq!(from_file.player.dash_cost, defaults.player.dash_cost);
    assert_eq!(from_file.enemy.attack_windup, defaults.enemy.attack_windup);
    assert_eq!(from_file.boss.phase2_threshold, defaults.boss.phase2_threshold);
    assert_eq!(
        from_file.destructible.stamina_drop_chance,
        defaults.destructible.stamina_drop_chance
    );
}

#[test]
fn test_expected_combat_values() {
    let tuning = Tuning::default();

    assert_eq!(tuning.player.max_health, 100);
    assert_eq!(tuning.player.max_stamina, 75);
    assert_eq!(tuning.player.dash_cost, 25);
    assert_eq!(tuning.player.attack_damage, 10);
    assert_eq!(tuning.player.attack_cooldown, 0.5);

    assert_eq!(tuning.enemy.attack_damage, 10);
    assert_eq!(tuning.enemy.attack_windup, 1.06);
    assert_eq!(tuning.enemy.chase_range, 5.0);

    assert_eq!(tuning.boss.attack_damage, 15);
    assert_eq!(tuning.boss.phase2_threshold, 50);
    assert_eq!(tuning.boss.phase2_speed_multiplier, 1.5);
    assert_eq!(tuning.boss.stun_duration, 2.0);

    assert_eq!(tuning.destructible.max_health, 3);
    assert_eq!(tuning.destructible.stamina_restore, 15);
    assert_eq!(tuning.destructible.health_restore, 20);
}

#[test]
fn test_validation_rejects_out_of_range_chance() {
    let mut tuning = Tuning::default();
    tuning.destructible.health_drop_chance = 1.5;
    assert!(tuning.validate().is_err());

    tuning.destructible.health_drop_chance = -0.1;
    assert!(tuning.validate().is_err());
}

#[test]
fn test_validation_rejects_non_positive_durations() {
    let mut tuning = Tuning::default();
    tuning.enemy.attack_windup = 0.0;
    assert!(tuning.validate().is_err());
}

#[test]
fn test_validation_rejects_threshold_at_or_above_max_health() {
    let mut tuning = Tuning::default();
    tuning.boss.phase2_threshold = tuning.boss.max_health;
    assert!(tuning.validate().is_err());
}
