use serde::{Deserialize, Serialize};

/// Quiet window for coalescing host navigation events into one
/// `TGO_HOST_PAGE_INFO` push. SPA routers commonly fire several history and
/// hash events for one logical navigation.
pub const PAGE_INFO_DEBOUNCE_MS: u64 = 300;

/// Minimum spacing between `TGO_HOST_PAGE_EXIT` dispatches; `beforeunload`
/// handlers can overlap and double-fire.
pub const PAGE_EXIT_MIN_INTERVAL_MS: u64 = 500;

/// Snapshot of the host page forwarded to the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostPageInfo {
    pub page_url: String,
    pub title: String,
    pub referrer: String,
}

/// Generation stamp behind the debounced page-info notifier. Each navigation
/// event arms a new generation; a timer that wakes up holding a stale
/// generation was superseded and must not fire.
#[derive(Debug, Default)]
pub struct PageInfoCoalescer {
    generation: u64,
}

impl PageInfoCoalescer {
    pub fn arm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn should_fire(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

/// Wall-clock throttle for exit notifications.
#[derive(Debug, Default)]
pub struct ExitThrottle {
    last_fired_at_ms: Option<u64>,
}

impl ExitThrottle {
    pub fn try_fire(&mut self, now_ms: u64) -> bool {
        if let Some(last) = self.last_fired_at_ms {
            if now_ms.saturating_sub(last) < PAGE_EXIT_MIN_INTERVAL_MS {
                return false;
            }
        }
        self.last_fired_at_ms = Some(now_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_generation_fires() {
        // Three navigations inside one debounce window: the two earlier
        // timers wake up stale and exactly one page-info push goes out.
        let mut coalescer = PageInfoCoalescer::default();
        let first = coalescer.arm();
        let second = coalescer.arm();
        let third = coalescer.arm();

        let fired = [first, second, third]
            .into_iter()
            .filter(|generation| coalescer.should_fire(*generation))
            .count();
        assert_eq!(fired, 1);
        assert!(coalescer.should_fire(third));
    }

    #[test]
    fn a_quiet_window_lets_each_navigation_fire() {
        let mut coalescer = PageInfoCoalescer::default();
        let first = coalescer.arm();
        assert!(coalescer.should_fire(first));
        let second = coalescer.arm();
        assert!(!coalescer.should_fire(first));
        assert!(coalescer.should_fire(second));
    }

    #[test]
    fn exit_throttle_collapses_overlapping_dispatches() {
        let mut throttle = ExitThrottle::default();
        assert!(throttle.try_fire(1_000));
        assert!(!throttle.try_fire(1_200));
        assert!(!throttle.try_fire(1_499));
        assert!(throttle.try_fire(1_500));
    }

    #[test]
    fn exit_throttle_fires_immediately_on_first_use() {
        let mut throttle = ExitThrottle::default();
        assert!(throttle.try_fire(0));
    }
}
