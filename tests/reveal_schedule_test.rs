// tests/reveal_schedule_test.rs

use approx::assert_relative_eq;
use ndarray::Array1;

use plot_animate::animation::{delay_frames, LineOptions};
use plot_animate::lines::{hline, vline};
use plot_animate::{
    AnimateError, AnimationController, ControllerState, RecordingRenderer, RunOptions,
};

fn controller() -> AnimationController<RecordingRenderer> {
    AnimationController::new(RecordingRenderer::new())
}

#[test]
fn test_identity_reveals_frame_index() {
    let mut ctl = controller();
    ctl.set_domain(0.0, 10.0, 500, 0.0).unwrap();
    ctl.register(|x: &Array1<f64>| x.clone()).unwrap();

    let updated = ctl.advance(250).unwrap();
    assert_eq!(ctl.reveal_counts(), vec![250]);

    let line = ctl.renderer().line(updated[0]).unwrap();
    assert_eq!(line.xs.len(), 250);
    let expected = ctl.domain().values().slice(ndarray::s![..250]).to_vec();
    for (x, e) in line.xs.iter().zip(expected.iter()) {
        assert_relative_eq!(*x, *e);
    }
    assert_eq!(line.xs, line.ys);
}

#[test]
fn test_delayed_line_holds_then_catches_up() {
    let mut ctl = controller();
    ctl.set_domain(0.0, 10.0, 500, 0.0).unwrap();
    ctl.register_with(|x: &Array1<f64>| x.clone(), LineOptions::default().delay(50))
        .unwrap();

    ctl.advance(30).unwrap();
    assert_eq!(ctl.reveal_counts(), vec![0]);
    ctl.advance(80).unwrap();
    assert_eq!(ctl.reveal_counts(), vec![30]);
}

#[test]
fn test_reveal_is_monotonic_and_capped() {
    let mut ctl = controller();
    ctl.set_domain(0.0, 1.0, 20, 0.0).unwrap();
    ctl.register(|x: &Array1<f64>| x.mapv(f64::sin)).unwrap();
    ctl.register_with(|x: &Array1<f64>| x.mapv(f64::cos), LineOptions::default().delay(5))
        .unwrap();

    let total = ctl.compute_total_frames();
    assert_eq!(total, 26);

    let mut previous = vec![0, 0];
    for frame_index in 0..total {
        ctl.advance(frame_index).unwrap();
        let reveals = ctl.reveal_counts();
        for (now, before) in reveals.iter().zip(previous.iter()) {
            assert!(now >= before, "reveal went back at frame {frame_index}");
            assert!(*now <= 20);
        }
        previous = reveals;
    }
    assert_eq!(previous, vec![20, 20]);
}

#[test]
fn test_inverted_line_swaps_axes() {
    let mut ctl = controller();
    ctl.set_domain(-1.0, 1.0, 11, 0.0).unwrap();
    ctl.register_with(vline(0.5), LineOptions::default().inverted(true))
        .unwrap();
    ctl.register(hline(0.25)).unwrap();

    let handles = ctl.advance(11).unwrap();
    let vertical = ctl.renderer().line(handles[0]).unwrap();
    assert!(vertical.xs.iter().all(|&x| x == 0.5));
    assert_relative_eq!(vertical.ys[0], -1.0);
    assert_relative_eq!(vertical.ys[10], 1.0);

    let horizontal = ctl.renderer().line(handles[1]).unwrap();
    assert!(horizontal.ys.iter().all(|&y| y == 0.25));
    assert_relative_eq!(horizontal.xs[10], 1.0);
}

#[test]
fn test_each_cycle_starts_empty() {
    let mut ctl = controller();
    ctl.set_domain(0.0, 1.0, 5, 0.0).unwrap();
    ctl.register(|x: &Array1<f64>| x.clone()).unwrap();

    let options = RunOptions {
        interval_ms: 0,
        max_cycles: Some(2),
        ..RunOptions::default()
    };
    let summary = ctl.run(&options).unwrap();
    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.frames_presented, 10);
    assert_eq!(ctl.state(), ControllerState::Idle);

    // One empty update from each rewind plus five frames per cycle
    let renderer = ctl.renderer();
    assert_eq!(renderer.lines[0].updates, 12);
    assert_eq!(renderer.frames_presented, 10);
    assert_eq!(renderer.lines[0].xs.len(), 4);
}

#[test]
fn test_huge_delay_in_seconds_is_rejected() {
    let mut ctl = controller();
    ctl.set_domain(0.0, 1.0, 10, 0.0).unwrap();
    let delay = delay_frames(1e30, 20);
    assert!(matches!(
        ctl.register_with(|x: &Array1<f64>| x.clone(), LineOptions::default().delay(delay)),
        Err(AnimateError::DelayOutOfRange {
            frame_count: 10,
            ..
        })
    ));
    assert_eq!(ctl.compute_total_frames(), 10);
    assert!(matches!(
        ctl.run(&RunOptions::default()),
        Err(AnimateError::NoLines)
    ));
}

#[test]
fn test_nan_delay_means_no_delay() {
    let mut ctl = controller();
    ctl.set_domain(0.0, 1.0, 10, 0.0).unwrap();
    ctl.register_with(
        |x: &Array1<f64>| x.clone(),
        LineOptions::default().delay(delay_frames(f64::NAN, 20)),
    )
    .unwrap();
    assert_eq!(ctl.compute_total_frames(), 10);
    ctl.advance(9).unwrap();
    assert_eq!(ctl.reveal_counts(), vec![9]);
}
