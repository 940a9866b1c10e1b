// tests/property_status.rs

use std::sync::Arc;

use gitexec::config::SpinnerSettings;
use gitexec::status::StatusController;
use gitexec_test_utils::CountingRepaint;
use proptest::prelude::*;

proptest! {
    // Whatever mix of successes and failures the bracketed work produces,
    // the indicator is idle between runs and the guard pairs its repaints.
    #[test]
    fn waiting_status_always_released(outcomes in proptest::collection::vec(any::<bool>(), 1..20)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let repaint = Arc::new(CountingRepaint::default());
        let status = StatusController::new(SpinnerSettings::default(), repaint.clone());

        for (i, ok) in outcomes.iter().copied().enumerate() {
            let inner = status.clone();
            let label = format!("step {i}");
            let res: Result<Option<String>, String> = rt.block_on(status.with_waiting_status(&label, async move {
                let seen = inner.label();
                if ok { Ok(seen) } else { Err("boom".to_string()) }
            }));

            match res {
                Ok(seen) => prop_assert_eq!(seen, Some(label)),
                Err(e) => prop_assert_eq!(e, "boom"),
            }
            prop_assert!(!status.is_busy());
        }

        prop_assert_eq!(repaint.count(), outcomes.len() * 2);
    }

    #[test]
    fn spinner_frame_is_always_one_of_the_frames(elapsed_ms in 0u64..1_000_000, rate_ms in 1u64..500) {
        let spinner = SpinnerSettings {
            rate: std::time::Duration::from_millis(rate_ms),
            ..SpinnerSettings::default()
        };

        let frame = spinner.frame_at(std::time::Duration::from_millis(elapsed_ms));
        prop_assert!(spinner.frames.iter().any(|f| f == frame));
    }
}
