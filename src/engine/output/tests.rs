use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, mpsc};
use std::thread;
use std::time::Duration;

use dpi::PhysicalSize;

use super::*;
use crate::engine::backend::mock::{MockBackend, MockGpu};
use crate::engine::backend::{FrameSlot, SetupRequest};
use crate::engine::config::BridgeConfig;
use crate::engine::events::WindowCallbacks;

fn connected(config: BridgeConfig, gpu: &MockGpu) -> (FrameConsumer<()>, VideoOutput<MockBackend>) {
    let consumer = FrameConsumer::new(config);
    assert!(consumer.context_ready(()));
    let mut output = VideoOutput::new(MockBackend::new(gpu), &consumer);
    output.setup(&SetupRequest::default()).expect("setup");
    (consumer, output)
}

fn ready(gpu: &MockGpu) -> (FrameConsumer<()>, VideoOutput<MockBackend>) {
    connected(BridgeConfig::default(), gpu)
}

fn wait_for_waiter(canceller: &SetupCanceller<()>) {
    for _ in 0..500 {
        if canceller.is_waiting() {
            return;
        }
        thread::sleep(Duration::from_millis(2));
    }
    panic!("setup never started waiting");
}

/// Drives one frame the way a decode framework would, through the callback trait only.
fn render_frame<O: OutputCallbacks>(output: &mut O, gpu: &MockGpu, marker: u64) {
    output.make_current(true).expect("make current");
    gpu.draw(marker);
    output.swap().expect("swap");
    output.make_current(false).expect("release");
}

#[test]
fn marker_frame_reaches_consumer_and_same_size_resize_is_noop() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);

    let config = OutputCallbacks::resize(&mut output, 640, 480).expect("resize");
    assert_eq!(config, OutputConfig::fixed(PhysicalSize::new(640, 480)));
    render_frame(&mut output, &gpu, 0xC0FFEE);

    let first = consumer.acquire_latest().expect("frame");
    assert!(first.updated);
    assert_eq!(gpu.read(first.texture), Some(0xC0FFEE));

    let second = consumer.acquire_latest().expect("frame");
    assert!(!second.updated);
    assert_eq!(second.texture, first.texture);

    let allocations = gpu.state().allocations;
    output.resize(PhysicalSize::new(640, 480)).expect("resize");
    assert_eq!(gpu.state().allocations, allocations);
    assert_eq!(gpu.state().live_textures(), 3);
    assert_eq!(consumer.acquire_latest().expect("frame").texture, first.texture);
}

#[test]
fn consumer_sees_only_the_last_of_several_frames() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(32, 32)).expect("resize");

    for marker in 1..=5 {
        render_frame(&mut output, &gpu, marker);
    }

    let frame = consumer.acquire_latest().expect("frame");
    assert_eq!(gpu.read(frame.texture), Some(5));
    assert_eq!(gpu.state().barriers, 5);
}

#[test]
fn resize_replaces_all_three_slots() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);

    output.resize(PhysicalSize::new(320, 200)).expect("resize");
    output.resize(PhysicalSize::new(1280, 720)).expect("resize");

    let size = PhysicalSize::new(1280, 720);
    for index in 0..3 {
        let slot = output.slots.get(index).expect("slot");
        assert_eq!(slot.size(), size);
    }
    assert_eq!(gpu.state().allocations, 6);
    assert_eq!(gpu.state().live_textures(), 3);
    assert_eq!(output.size(), size);
    assert_eq!(output.state(), LifecycleState::FramesAllocated);

    let frame = consumer.acquire_latest().expect("frame");
    assert_eq!(frame.size, size);
    assert!(!frame.updated);
}

#[test]
fn failed_allocation_leaves_no_slots_and_is_retryable() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(64, 64)).expect("resize");

    gpu.state().fail_at = Some(2);
    let err = output
        .resize(PhysicalSize::new(128, 128))
        .expect_err("third slot fails");
    assert!(matches!(err, BridgeError::AllocationFailure { index: 2, .. }));
    assert_eq!(gpu.state().live_textures(), 0);
    assert_eq!(output.size(), PhysicalSize::new(0, 0));
    assert_eq!(output.state(), LifecycleState::DeviceReady);
    assert!(consumer.acquire_latest().is_none());
    assert!(output.swap().is_err());

    output.resize(PhysicalSize::new(128, 128)).expect("retry");
    assert_eq!(gpu.state().live_textures(), 3);
}

#[test]
fn zero_size_is_an_allocation_failure() {
    let gpu = MockGpu::default();
    let (_consumer, mut output) = ready(&gpu);

    let err = output.resize(PhysicalSize::new(0, 480)).expect_err("empty");
    assert!(matches!(err, BridgeError::AllocationFailure { .. }));
    assert_eq!(gpu.state().allocations, 0);
}

#[test]
fn setup_fails_without_threaded_contexts() {
    let gpu = MockGpu::default();
    let consumer = FrameConsumer::new(BridgeConfig::default());
    assert!(consumer.context_ready(()));
    let mut output = VideoOutput::new(MockBackend::without_threaded_contexts(&gpu), &consumer);

    let err = output.setup(&SetupRequest::default()).expect_err("no capability");
    assert!(matches!(err, BridgeError::CapabilityUnavailable(_)));
    assert_eq!(output.state(), LifecycleState::Uninitialized);
    assert!(matches!(
        output.resize(PhysicalSize::new(8, 8)),
        Err(BridgeError::InvalidState { .. })
    ));
    assert_eq!(gpu.state().opens, 0);
}

#[test]
fn setup_blocks_until_consumer_context_is_ready() {
    let gpu = MockGpu::default();
    let consumer = FrameConsumer::<()>::new(BridgeConfig::default());
    let mut output = VideoOutput::new(MockBackend::new(&gpu), &consumer);
    let canceller = output.setup_canceller();

    let producer = thread::spawn(move || {
        let result = output.setup(&SetupRequest::default());
        (result.is_ok(), output.state())
    });
    wait_for_waiter(&canceller);
    assert!(consumer.context_ready(()));

    let (ok, state) = producer.join().expect("producer thread");
    assert!(ok);
    assert_eq!(state, LifecycleState::DeviceReady);
}

#[test]
fn cancelling_unblocks_setup() {
    let gpu = MockGpu::default();
    let consumer = FrameConsumer::<()>::new(BridgeConfig::default());
    let mut output = VideoOutput::new(MockBackend::new(&gpu), &consumer);
    let canceller = output.setup_canceller();

    let producer = thread::spawn(move || output.setup(&SetupRequest::default()).is_err());
    wait_for_waiter(&canceller);
    canceller.cancel();

    assert!(producer.join().expect("producer thread"));
    assert_eq!(gpu.state().opens, 0);
}

#[test]
fn repeated_cancels_do_not_fail_the_next_setup() {
    let gpu = MockGpu::default();
    let consumer = FrameConsumer::<()>::new(BridgeConfig::default());
    let mut output = VideoOutput::new(MockBackend::new(&gpu), &consumer);
    let canceller = output.setup_canceller();

    let producer = thread::spawn(move || {
        let cancelled = output.setup(&SetupRequest::default()).is_err();
        (cancelled, output)
    });
    wait_for_waiter(&canceller);
    canceller.cancel();
    canceller.cancel();
    canceller.cancel();
    let (cancelled, mut output) = producer.join().expect("producer thread");
    assert!(cancelled);
    assert!(!canceller.cancel());

    let publisher = {
        let consumer = consumer.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            consumer.context_ready(())
        })
    };
    output.setup(&SetupRequest::default()).expect("setup after cancels");
    assert!(publisher.join().expect("publisher thread"));
    assert_eq!(output.state(), LifecycleState::DeviceReady);
}

#[test]
fn consumer_shutdown_unblocks_setup() {
    let gpu = MockGpu::default();
    let consumer = FrameConsumer::<()>::new(BridgeConfig::default());
    let mut output = VideoOutput::new(MockBackend::new(&gpu), &consumer);
    let canceller = output.setup_canceller();

    let producer = thread::spawn(move || output.setup(&SetupRequest::default()).is_err());
    wait_for_waiter(&canceller);
    consumer.shutdown();

    assert!(producer.join().expect("producer thread"));
}

#[test]
fn setup_times_out_when_configured() {
    let gpu = MockGpu::default();
    let config = BridgeConfig {
        setup_timeout: Some(Duration::from_millis(20)),
        ..BridgeConfig::default()
    };
    let consumer = FrameConsumer::<()>::new(config);
    let mut output = VideoOutput::new(MockBackend::new(&gpu), &consumer);

    let err = output.setup(&SetupRequest::default()).expect_err("timeout");
    assert!(matches!(err, BridgeError::CapabilityUnavailable(_)));
}

#[test]
fn early_cleanup_does_not_cancel_a_later_setup() {
    let gpu = MockGpu::default();
    let consumer = FrameConsumer::<()>::new(BridgeConfig::default());
    let mut output = VideoOutput::new(MockBackend::new(&gpu), &consumer);
    output.cleanup().expect("cleanup");

    let publisher = {
        let consumer = consumer.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            consumer.context_ready(())
        })
    };
    output.setup(&SetupRequest::default()).expect("setup");
    assert!(publisher.join().expect("publisher thread"));
}

#[test]
fn cleanup_is_idempotent_and_keeps_the_device() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(64, 64)).expect("resize");

    output.cleanup().expect("cleanup");
    output.cleanup().expect("cleanup again");
    assert_eq!(output.state(), LifecycleState::DeviceReady);
    assert_eq!(gpu.state().live_textures(), 0);
    assert!(consumer.acquire_latest().is_none());

    output.resize(PhysicalSize::new(64, 64)).expect("resize after cleanup");
    assert_eq!(gpu.state().allocations, 6);
}

#[test]
fn repeated_setup_reuses_context_and_forgets_size() {
    let gpu = MockGpu::default();
    let (_consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(64, 64)).expect("resize");
    output.cleanup().expect("cleanup");

    output.setup(&SetupRequest::default()).expect("second setup");
    assert_eq!(gpu.state().opens, 1);
    assert_eq!(output.size(), PhysicalSize::new(0, 0));

    output.resize(PhysicalSize::new(64, 64)).expect("resize");
    assert_eq!(gpu.state().allocations, 6);
}

#[test]
fn repeated_setup_binds_context_to_release_slots() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);
    output.make_current(true).expect("bind");
    output.resize(PhysicalSize::new(64, 64)).expect("resize");
    output.make_current(false).expect("release");

    output.setup(&SetupRequest::default()).expect("second setup");
    let state = gpu.state();
    assert_eq!(state.live_textures(), 0);
    assert_eq!(state.releases_without_context, 0);
    assert!(!state.current);
    drop(state);
    assert!(consumer.acquire_latest().is_none());
}

#[test]
fn teardown_completes_when_unbind_fails() {
    let gpu = MockGpu::default();
    let (_consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(16, 16)).expect("resize");
    gpu.state().fail_unbind = true;

    output.teardown();
    assert_eq!(output.state(), LifecycleState::TornDown);
    let state = gpu.state();
    assert_eq!(state.live_textures(), 0);
    assert_eq!(state.releases_without_context, 0);
    assert!(!state.open);
}

#[test]
fn drop_releases_slots_and_context() {
    let gpu = MockGpu::default();
    let (_consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(16, 16)).expect("resize");

    drop(output);
    let state = gpu.state();
    assert_eq!(state.live_textures(), 0);
    assert!(!state.open);
}

#[test]
fn torn_down_output_rejects_every_call() {
    let gpu = MockGpu::default();
    let (_consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(16, 16)).expect("resize");
    output.teardown();
    output.teardown();

    assert_eq!(output.state(), LifecycleState::TornDown);
    assert!(matches!(
        output.swap(),
        Err(BridgeError::InvalidState {
            state: LifecycleState::TornDown,
            ..
        })
    ));
    assert!(output.setup(&SetupRequest::default()).is_err());
    assert!(output.cleanup().is_err());
    assert!(output.make_current(false).is_err());
    assert!(output.get_proc_address(c"glClear").is_null());
}

#[test]
fn swap_before_resize_is_rejected() {
    let gpu = MockGpu::default();
    let (_consumer, mut output) = ready(&gpu);
    assert!(matches!(
        output.swap(),
        Err(BridgeError::InvalidState { operation: "swap", .. })
    ));
}

#[test]
fn make_current_requires_a_device() {
    let gpu = MockGpu::default();
    let consumer = FrameConsumer::<()>::new(BridgeConfig::default());
    let mut output = VideoOutput::new(MockBackend::new(&gpu), &consumer);
    assert!(output.make_current(true).is_err());

    assert!(consumer.context_ready(()));
    output.setup(&SetupRequest::default()).expect("setup");
    output.make_current(true).expect("bind");
    assert!(gpu.state().current);
    output.make_current(false).expect("release");
    assert!(!gpu.state().current);
}

#[test]
fn egl_symbols_are_hidden_when_configured() {
    let gpu = MockGpu::default();
    let (_consumer, plain) = ready(&gpu);
    assert!(!plain.get_proc_address(c"eglGetCurrentContext").is_null());

    let config = BridgeConfig {
        hide_egl_symbols: true,
        ..BridgeConfig::default()
    };
    let (_consumer, hiding) = connected(config, &gpu);
    assert!(hiding.get_proc_address(c"eglGetCurrentContext").is_null());
    assert!(!hiding.get_proc_address(c"glClear").is_null());
}

#[test]
fn swap_notifies_redraw() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);
    let redraws = Arc::new(AtomicUsize::new(0));
    {
        let redraws = Arc::clone(&redraws);
        consumer.set_redraw_notifier(move || {
            redraws.fetch_add(1, Ordering::Relaxed);
        });
    }
    output.resize(PhysicalSize::new(8, 8)).expect("resize");
    render_frame(&mut output, &gpu, 1);
    render_frame(&mut output, &gpu, 2);

    assert_eq!(redraws.load(Ordering::Relaxed), 2);
}

#[test]
fn window_callbacks_get_size_reported_before_registration() {
    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);
    consumer.on_resize(800, 600);

    let sizes = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let sizes = Arc::clone(&sizes);
        WindowCallbacks::new().on_resize(move |w, h| sizes.lock().unwrap().push((w, h)))
    };
    output.set_window_callbacks(Some(Box::new(sink))).expect("callbacks");
    consumer.on_resize(1024, 768);
    output.teardown();
    consumer.on_resize(1, 1);

    assert_eq!(*sizes.lock().unwrap(), vec![(800, 600), (1024, 768)]);
}

#[test]
fn concurrent_consumer_never_sees_an_older_frame() {
    const FRAMES: u64 = 2_000;

    let gpu = MockGpu::default();
    let (consumer, mut output) = ready(&gpu);
    output.resize(PhysicalSize::new(4, 4)).expect("resize");

    let (done_tx, done_rx) = mpsc::channel();
    let producer = {
        let gpu = gpu.clone();
        thread::spawn(move || {
            for marker in 1..=FRAMES {
                render_frame(&mut output, &gpu, marker);
            }
            done_tx.send(()).expect("signal done");
            output
        })
    };

    let mut last = 0;
    loop {
        let finished = done_rx.try_recv().is_ok();
        let frame = consumer.acquire_latest().expect("frame");
        let marker = gpu.read(frame.texture).expect("live texture");
        assert!(marker >= last, "frame {marker} shown after {last}");
        last = marker;
        if finished {
            break;
        }
    }

    let output = producer.join().expect("producer thread");
    assert_eq!(last, FRAMES);
    assert!(output.shared.frames.rotator_snapshot().is_permutation());
}
