//! SDI streaming, flow control and the playback session.

#![allow(clippy::unwrap_used)]

mod common;

use platform::mocks::SciOp;
use platform::PinState;
use proptest::prelude::*;
use vs1003::{Error, SessionState};

#[test]
fn start_song_primes_with_ten_zeroes() {
    let (chip, mut vs) = common::booted();
    vs.start_song().unwrap();
    assert_eq!(chip.sdi_bytes(), vec![0u8; 10]);
    assert_eq!(vs.session_state(), SessionState::Streaming);
}

#[test]
fn stop_song_drains_with_2048_zeroes() {
    let (chip, mut vs) = common::booted();
    vs.start_song().unwrap();
    chip.clear_logs();
    vs.stop_song().unwrap();
    assert_eq!(chip.sdi_bytes(), vec![0u8; 2048]);
    assert_eq!(vs.session_state(), SessionState::Idle);
}

#[test]
fn play_chunk_outside_session_sends_nothing() {
    let (chip, mut vs) = common::booted();
    assert_eq!(vs.play_chunk(&[1, 2, 3]), Err(Error::SessionNotOpen));

    vs.start_song().unwrap();
    vs.stop_song().unwrap();
    chip.clear_logs();
    assert_eq!(vs.play_chunk(&[1, 2, 3]), Err(Error::SessionNotOpen));

    assert!(chip.sdi_bytes().is_empty());
    assert!(chip.line_events().is_empty());
}

#[test]
fn chunks_pass_through_unmodified() {
    let (chip, mut vs) = common::booted();
    vs.start_song().unwrap();
    chip.clear_logs();

    let song: Vec<u8> = (0..=255u8).cycle().take(3000).collect();
    for chunk in song.chunks(700) {
        vs.play_chunk(chunk).unwrap();
    }
    assert_eq!(chip.sdi_bytes(), song);
    assert!(chip.sci_log().iter().all(|op| !matches!(op, SciOp::Write { .. })));
}

#[test]
fn streaming_never_overruns_a_slow_decoder() {
    let (chip, mut vs) = common::booted();
    // Small FIFO that frees only 8 bytes per DREQ sample.
    chip.set_fifo(64, 8);
    let data = vec![0x5Au8; 1000];
    vs.send_buffer(&data).unwrap();
    vs.send_zeroes(500).unwrap();

    assert_eq!(chip.overruns(), 0);
    assert_eq!(chip.sdi_bytes().len(), 1500);
}

#[test]
fn bursts_larger_than_dreq_guarantee_can_overrun() {
    let (chip, mut vs) = common::driver_with(|c| c.with_chunk_size(64));
    vs.begin().unwrap();
    chip.set_fifo(64, 8);
    vs.send_buffer(&[0u8; 256]).unwrap();
    assert!(chip.overruns() > 0);
}

#[test]
fn busy_decoder_is_waited_for() {
    let (chip, mut vs) = common::booted();
    chip.hold_busy(50);
    vs.send_buffer(&[7u8; 40]).unwrap();
    assert!(chip.dreq_polls() >= 51);
    assert_eq!(chip.sdi_bytes(), vec![7u8; 40]);
}

#[test]
fn selects_are_exclusive_across_mixed_traffic() {
    let (chip, mut vs) = common::booted();
    let w = chip.wiring();
    vs.start_song().unwrap();
    vs.play_chunk(&[1u8; 100]).unwrap();
    vs.set_volume(0x40).unwrap();
    vs.play_chunk(&[2u8; 100]).unwrap();
    vs.decode_time().unwrap();
    vs.stop_song().unwrap();

    assert_eq!(chip.select_violations(), 0);
    assert_eq!(chip.stray_bytes(), 0);
    assert_eq!(chip.level(w.xcs), PinState::High);
    assert_eq!(chip.level(w.xdcs), PinState::High);
}

#[test]
fn custom_padding_lengths() {
    let (chip, mut vs) = common::driver_with(|c| c.with_padding(0, 100));
    vs.begin().unwrap();
    chip.clear_logs();
    vs.start_song().unwrap();
    assert!(chip.sdi_bytes().is_empty());
    vs.stop_song().unwrap();
    assert_eq!(chip.sdi_bytes().len(), 100);
}

proptest! {
    /// Whatever the decoder speed, the FIFO never overflows and every byte
    /// arrives in order.
    #[test]
    fn flow_control_holds_for_any_decoder_speed(
        capacity in 32usize..256,
        drain in 1usize..64,
        len in 0usize..2000,
    ) {
        let (chip, mut vs) = common::booted();
        chip.set_fifo(capacity, drain);
        let data: Vec<u8> = (0..len).map(|i| i.to_le_bytes()[0]).collect();
        vs.send_buffer(&data).unwrap();
        prop_assert_eq!(chip.overruns(), 0);
        prop_assert_eq!(chip.sdi_bytes(), data);
    }
}
