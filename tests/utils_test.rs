use std::time::Duration;

use playrank::utils::*;
use tokio::time::Instant;

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    // Should be exactly 128 characters
    assert_eq!(verifier.len(), 128);

    // Should contain only alphanumeric characters
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));

    // Two generated verifiers should be different
    let verifier2 = generate_code_verifier();
    assert_ne!(verifier, verifier2);
}

#[test]
fn test_generate_code_challenge() {
    let verifier = "test_verifier_123";
    let challenge = generate_code_challenge(verifier);

    // Should be deterministic - same input produces same output
    assert_eq!(challenge, generate_code_challenge(verifier));

    // Different input should produce different output
    assert_ne!(challenge, generate_code_challenge("different_verifier"));

    // SHA-256 is 32 bytes, 43 chars in base64 without padding
    assert_eq!(challenge.len(), 43);
    assert!(
        challenge
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    );
}

#[test]
fn test_round_to_four_decimals() {
    assert_eq!(round_to(0.123449, 4), 0.1234);
    assert_eq!(round_to(0.12345678, 4), 0.1235);
    assert_eq!(round_to(3.0, 4), 3.0);
}

#[test]
fn test_round_half_away_from_zero() {
    // 0.5 is exactly representable, so these sit on the midpoint
    assert_eq!(round_to(0.5, 0), 1.0);
    assert_eq!(round_to(-0.5, 0), -1.0);
    assert_eq!(round_to(2.5, 0), 3.0);
    assert_eq!(round_to(-2.5, 0), -3.0);
}

#[tokio::test(start_paused = true)]
async fn test_pacer_first_call_is_immediate() {
    let pacer = Pacer::new(Duration::from_millis(800));
    let start = Instant::now();

    pacer.wait().await;

    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_pacer_spaces_consecutive_calls() {
    let mut pacer = Pacer::new(Duration::from_millis(800));
    let start = Instant::now();

    for _ in 0..3 {
        pacer.wait().await;
        pacer.finish();
    }

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1600), "{:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1700), "{:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_pacer_pauses_after_a_slow_call() {
    let mut pacer = Pacer::new(Duration::from_millis(800));
    pacer.wait().await;

    // a call that takes longer than the interval
    tokio::time::sleep(Duration::from_secs(2)).await;
    pacer.finish();

    let before = Instant::now();
    pacer.wait().await;

    assert!(before.elapsed() >= Duration::from_millis(800), "{:?}", before.elapsed());
}

#[tokio::test(start_paused = true)]
async fn test_pacer_does_not_sleep_when_interval_already_passed() {
    let mut pacer = Pacer::new(Duration::from_millis(800));
    pacer.wait().await;
    pacer.finish();

    tokio::time::sleep(Duration::from_secs(2)).await;
    let before = Instant::now();
    pacer.wait().await;

    assert_eq!(before.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_zero_interval_never_sleeps() {
    let mut pacer = Pacer::new(Duration::ZERO);
    let start = std::time::Instant::now();
    for _ in 0..100 {
        pacer.wait().await;
        pacer.finish();
    }
    assert!(start.elapsed() < Duration::from_secs(1));
}
