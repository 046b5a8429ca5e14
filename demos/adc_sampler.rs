//! ADC sampler example: an ISR streaming blocks to a host transfer loop
//!
//! This example demonstrates:
//! - A block-mode buffer split between a simulated ISR and the main loop
//! - A status byte replayed at the head of every host read
//! - Peek-then-commit reads that retire only what was "transmitted"
//! - A sequential lock keeping the ISR's gain/offset pair consistent

use embedded_irqsync::prelude::*;
use std::sync::atomic::{AtomicU8, AtomicU16, Ordering};
use std::thread;
use std::time::Duration;

const SAMPLES: u16 = 64;

// Sampling configuration, written by the main loop, read by the ISR
static GAIN: AtomicU16 = AtomicU16::new(1);
static OFFSET: AtomicU16 = AtomicU16::new(0);
static CONFIG_LOCK: SeqLock<GlobalIrq> = SeqLock::new(GlobalIrq);

// Device status byte: bit 0 = sampling active
static STATUS: [AtomicU8; 1] = [AtomicU8::new(0)];

fn main() {
    println!("=== ADC Sampler Example ===\n");

    let mut storage = [0u8; 32];
    let mut buf = CircBuffer::builder(&mut storage)
        .status(&STATUS)
        .block_size(4)
        .warning(8, 24)
        .build();
    let (mut producer, mut consumer) = buf.split();

    thread::scope(|s| {
        // Simulated conversion-complete ISR
        s.spawn(move || {
            STATUS[0].store(1, Ordering::Relaxed);

            let mut raw = 0u16;
            while raw < SAMPLES {
                let (gain, offset) = CONFIG_LOCK.read(|| {
                    (GAIN.load(Ordering::Relaxed), OFFSET.load(Ordering::Relaxed))
                });

                let stored = producer.with_block(|mut block| {
                    block.push_le(raw);
                    block.push_le(raw * gain + offset);
                    BlockWrite::Commit(())
                });

                if stored.is_some() {
                    raw += 1;
                } else {
                    // Host is behind; retry on the next tick
                    producer.clear_overflow();
                }
                thread::sleep(Duration::from_millis(1));
            }

            STATUS[0].store(0, Ordering::Relaxed);
            println!("ISR: {SAMPLES} conversions stored");
        });

        // Main loop: reconfigure once, then act as the host transfer
        thread::sleep(Duration::from_millis(10));
        CONFIG_LOCK.write(|| {
            GAIN.store(2, Ordering::Relaxed);
            OFFSET.store(10, Ordering::Relaxed);
        });
        println!("Main loop: gain=2 offset=10 committed");

        let mut received = 0u16;
        while received < SAMPLES {
            let frame = consumer.peek_frame::<9>();
            let warning = consumer.is_warning();

            // Status byte first, then whole samples only
            let samples = (frame.len().saturating_sub(1)) / 4;
            for chunk in frame[1..].chunks_exact(4).take(samples) {
                let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
                let scaled = u16::from_le_bytes([chunk[2], chunk[3]]);
                assert_eq!(raw, received);
                assert!(scaled == raw || scaled == raw * 2 + 10);
                received += 1;
            }

            consumer.stop_read(1 + samples * 4);
            if samples == 0 {
                thread::sleep(Duration::from_millis(2));
            } else if warning {
                println!("Main loop: backpressure warning, {received} samples in");
            }
        }

        println!("Main loop: received {received} samples");
    });

    println!("\nComplete - all samples arrived in order");
}
