//! 壁時計と固定ステップの tick クロック。
//!
//! ホスト（ブラウザのフレームループ、タイマー、テスト）は任意の間隔でタイムスタンプを渡す。
//! `TickClock` はそれを 100ms 単位のゲーム tick に変換し、進行を一定の刻みで回す。

/// 1 フレームで進める最大時間 (ms)。長い不在はロード時のキャッチアップで扱う。
pub const MAX_FRAME_MS: f64 = 500.0;

/// デフォルトの tick 間隔 (ms)。
pub const TICK_MS: f64 = 100.0;

/// Unix エポックからのミリ秒。
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Unix エポックからのミリ秒。
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

pub struct TickClock {
    ms_per_tick: f64,
    /// まだ tick に変換していない端数 (ms)。
    accumulator: f64,
    pub total_ticks: u64,
    /// 最初のタイムスタンプが来るまでは None。
    last_timestamp: Option<f64>,
}

impl TickClock {
    pub fn new(ms_per_tick: f64) -> Self {
        Self {
            ms_per_tick: if ms_per_tick > 0.0 { ms_per_tick } else { TICK_MS },
            accumulator: 0.0,
            total_ticks: 0,
            last_timestamp: None,
        }
    }

    pub fn ms_per_tick(&self) -> f64 {
        self.ms_per_tick
    }

    /// タイムスタンプを渡し、進めるべき tick 数を返す。
    /// 初回呼び出しは記録するだけ。
    pub fn update(&mut self, now_ms: f64) -> u32 {
        let delta = match self.last_timestamp {
            Some(prev) if now_ms.is_finite() => (now_ms - prev).clamp(0.0, MAX_FRAME_MS),
            _ => 0.0,
        };
        if now_ms.is_finite() {
            self.last_timestamp = Some(now_ms);
        }

        self.accumulator += delta;
        let ticks = (self.accumulator / self.ms_per_tick) as u32;
        self.accumulator -= ticks as f64 * self.ms_per_tick;
        self.total_ticks += ticks as u64;
        ticks
    }

    /// 直前のタイムスタンプを忘れる（リセット後など）。次の update は 0 tick。
    pub fn restart(&mut self) {
        self.accumulator = 0.0;
        self.last_timestamp = None;
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TICK_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_update_only_anchors() {
        let mut clock = TickClock::default();
        let start = 1.76e12;
        assert_eq!(clock.update(start), 0);
        assert_eq!(clock.update(start + 300.0), 3);
        assert_eq!(clock.total_ticks, 3);
    }

    #[test]
    fn short_frames_add_up_to_a_tick() {
        let mut clock = TickClock::default();
        clock.update(0.0);
        let ticks: Vec<u32> = (1..=5).map(|i| clock.update(i as f64 * 20.0)).collect();
        assert_eq!(ticks, vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn hidden_tab_gap_counts_as_one_long_frame() {
        let mut clock = TickClock::default();
        clock.update(0.0);
        assert_eq!(clock.update(60_000.0), (MAX_FRAME_MS / TICK_MS) as u32);
        // Nothing left over from the dropped part of the gap.
        assert_eq!(clock.update(60_050.0), 0);
        assert_eq!(clock.update(60_100.0), 1);
    }

    #[test]
    fn custom_tick_length() {
        let mut clock = TickClock::new(250.0);
        clock.update(0.0);
        assert_eq!(clock.update(400.0), 1);
        assert_eq!(clock.update(500.0), 1);
        assert_eq!(clock.total_ticks, 2);
    }

    #[test]
    fn backwards_time_yields_nothing() {
        let mut clock = TickClock::default();
        clock.update(5_000.0);
        assert_eq!(clock.update(4_000.0), 0);
        assert_eq!(clock.update(4_100.0), 1);
    }

    #[test]
    fn non_finite_timestamp_is_ignored() {
        let mut clock = TickClock::default();
        clock.update(0.0);
        assert_eq!(clock.update(f64::NAN), 0);
        assert_eq!(clock.update(200.0), 2);
    }

    #[test]
    fn restart_drops_pending_time() {
        let mut clock = TickClock::default();
        clock.update(0.0);
        clock.update(90.0);
        clock.restart();
        assert_eq!(clock.update(1_000.0), 0);
        assert_eq!(clock.update(1_010.0), 0);
    }

    #[test]
    fn invalid_tick_length_falls_back() {
        assert_eq!(TickClock::new(0.0).ms_per_tick(), TICK_MS);
        assert_eq!(TickClock::new(-5.0).ms_per_tick(), TICK_MS);
    }

    #[test]
    fn wall_clock_is_after_2020() {
        assert!(now_ms() > 1_577_836_800_000.0);
    }
}
