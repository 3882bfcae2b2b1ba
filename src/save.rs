//! Goose University セーブ/ロード機能。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールドの意味を変えたときにインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: マイグレーションで読み込める最小バージョン。
//!   フィールド追加だけならこの値は変えない。`migrate` で旧形式を変換できなくなる
//!   破壊的変更を入れたときだけインクリメントする。
//! - `saveVersion` を持たないセーブはバージョン 0（バージョン導入前のブラウザ版の形式）。
//!
//! ロードは失敗しない。読めないデータや互換範囲外のデータは破棄して新規ゲームを始める。
//! 読めるデータはフィールド単位でマイグレーションし、不足フィールドはデフォルト値で補完し、
//! 離れていた時間を 1 回のキャッチアップ tick で反映する。

use serde_json::{Map, Value};
use thiserror::Error;

use crate::catalog::Catalog;
use crate::logic::tick;
use crate::rate::compute_rate;
use crate::state::GameState;

/// セーブデータのフォーマットバージョン。
pub const SAVE_VERSION: u32 = 1;

/// 読み込みを許可する最小バージョン。
/// バージョン 0 の旧形式も `migrate` で変換できるので 0 のまま。
pub const MIN_COMPATIBLE_VERSION: u32 = 0;

/// localStorage のキー。
pub const STORAGE_KEY: &str = "goose_university_save";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize save: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write save: {0}")]
    Write(String),
}

/// 1 つのセーブデータを保持するキー・バリュー領域。
pub trait BlobStore {
    fn read(&self) -> Option<String>;
    fn write(&mut self, blob: &str) -> Result<(), StoreError>;
    fn remove(&mut self);
}

/// テストやヘッドレス実行用のメモリ上ストア。
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Some(blob.into()),
        }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl BlobStore for MemoryStore {
    fn read(&self) -> Option<String> {
        self.blob.clone()
    }

    fn write(&mut self, blob: &str) -> Result<(), StoreError> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn remove(&mut self) {
        self.blob = None;
    }
}

/// ブラウザの localStorage。WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new() -> Self {
        Self::with_key(STORAGE_KEY)
    }

    pub fn with_key(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl BlobStore for LocalStorageStore {
    fn read(&self) -> Option<String> {
        Self::storage()?.get_item(&self.key).ok()?
    }

    fn write(&mut self, blob: &str) -> Result<(), StoreError> {
        let storage = Self::storage()
            .ok_or_else(|| StoreError::Write("localStorage is unavailable".to_string()))?;
        storage.set_item(&self.key, blob).map_err(|e| {
            web_sys::console::warn_1(
                &format!("Goose University: failed to write localStorage: {e:?}").into(),
            );
            StoreError::Write(format!("{e:?}"))
        })
    }

    fn remove(&mut self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(&self.key);
        }
    }
}

/// ストア上のセーブのロード・保存・削除。
pub struct SaveSlot<S> {
    store: S,
}

impl<S: BlobStore> SaveSlot<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// セーブを復元する。無ければ新規ゲームを返す。
    ///
    /// セーブ時刻から `now_ms` までの経過時間を反映してから返す。
    /// セーブ時刻が無い（0 扱いの）旧データはキャッチアップしない。
    pub fn load(&mut self, catalog: &Catalog, now_ms: f64) -> GameState {
        let blob = match self.store.read() {
            Some(b) => b,
            None => return GameState::new(catalog, now_ms),
        };
        let mut state = match decode(&blob, catalog) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("discarding unreadable save: {e}");
                self.store.remove();
                return GameState::new(catalog, now_ms);
            }
        };

        if !(state.last_save_time.is_finite() && state.last_save_time > 0.0) {
            state.last_save_time = now_ms;
        }
        let away_ms = now_ms - state.last_save_time;
        if away_ms > 0.0 {
            log::debug!("catching up {:.0} ms of offline progress", away_ms);
            tick(&state, catalog, away_ms)
        } else {
            state
        }
    }

    /// `now_ms` を刻んだコピーを保存する。引数の state は変更しない。
    pub fn save(&mut self, state: &GameState, now_ms: f64) -> Result<(), StoreError> {
        let mut stamped = state.clone();
        stamped.save_version = SAVE_VERSION;
        stamped.last_save_time = now_ms;
        let json = serde_json::to_string(&stamped)?;
        self.store.write(&json)
    }

    pub fn clear(&mut self) {
        self.store.remove();
    }
}

/// ストアを介さずにセーブ文字列をパースしてマイグレーションする。
pub fn decode(blob: &str, catalog: &Catalog) -> Result<GameState, serde_json::Error> {
    use serde::de::Error as _;

    let mut value: Value = serde_json::from_str(blob)?;
    let map = value
        .as_object_mut()
        .ok_or_else(|| serde_json::Error::custom("save blob is not an object"))?;
    let version = saved_version(map);
    if !(u64::from(MIN_COMPATIBLE_VERSION)..).contains(&version) {
        return Err(serde_json::Error::custom(format!(
            "save version {version} is older than {MIN_COMPATIBLE_VERSION}"
        )));
    }
    migrate(map, version);
    let mut state: GameState = serde_json::from_value(value)?;
    backfill(&mut state, catalog);
    Ok(state)
}

/// `saveVersion` が無ければ 0。
fn saved_version(map: &Map<String, Value>) -> u64 {
    map.get("saveVersion").and_then(Value::as_u64).unwrap_or(0)
}

/// 型付きデシリアライズの前に JSON のまま直す項目。
fn migrate(map: &mut Map<String, Value>, version: u64) {
    if version < SAVE_VERSION as u64 {
        log::info!("migrating save from version {} to {}", version, SAVE_VERSION);
    }

    // null はどのフィールドでもデフォルト扱い。
    map.retain(|_, v| !v.is_null());

    if !map.contains_key("totalHonksEarned") {
        if let Some(honks) = map.get("honks").cloned() {
            map.insert("totalHonksEarned".to_string(), honks);
        }
    }

    for key in ["upgrades", "legacyUpgrades"] {
        coerce_map(map, key, coerce_level);
    }
    coerce_map(map, "unlocks", |v| Value::Bool(truthy(v)));
    for key in ["goldenFeathers", "totalUpgradesPurchased", "totalAuditsPerformed"] {
        if let Some(v) = map.get_mut(key) {
            *v = coerce_level(v);
        }
    }

    map.insert("saveVersion".to_string(), Value::from(SAVE_VERSION));
}

/// ID をキーにしたマップの各要素を書き換える。マップでなければフィールドごと捨てる。
fn coerce_map(map: &mut Map<String, Value>, key: &str, f: impl Fn(&Value) -> Value) {
    match map.get_mut(key) {
        Some(Value::Object(entries)) => {
            for v in entries.values_mut() {
                *v = f(v);
            }
        }
        Some(_) => {
            map.remove(key);
        }
        None => {}
    }
}

/// `true` は 1、数値は切り捨てて `u32` に収め、それ以外は 0。
fn coerce_level(v: &Value) -> Value {
    let level = match v {
        Value::Bool(true) => 1.0,
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    };
    if level.is_finite() && level > 0.0 {
        Value::from(level.floor().min(u32::MAX as f64) as u32)
    } else {
        Value::from(0u32)
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |x| x != 0.0),
        _ => false,
    }
}

/// カタログを参照して直す項目。
fn backfill(state: &mut GameState, catalog: &Catalog) {
    for college in &catalog.colleges {
        state.colleges.entry(college.id.clone()).or_default();
    }
    for progress in state.colleges.values_mut() {
        progress.level = progress.level.max(1);
        if !progress.experience.is_finite() || progress.experience < 0.0 {
            progress.experience = 0.0;
        }
    }

    if state.selected_college_ids.is_empty() {
        state.selected_college_ids = vec![catalog.start.college_id.clone()];
    }
    state.selected_college_ids.truncate(1);

    if state.current_region_id.is_empty() {
        state.current_region_id = catalog.start.region_id.clone();
    }
    if !state.owns_costume(&catalog.start.costume_id) {
        state
            .unlocked_costumes
            .insert(0, catalog.start.costume_id.clone());
    }
    if state.selected_costume.is_empty() {
        state.selected_costume = catalog.start.costume_id.clone();
    }

    state.rival_power_multipliers.retain(|_, m| m.is_finite());
    for m in state.rival_power_multipliers.values_mut() {
        *m = m.max(1.0);
    }

    let cooldown = state.battle_state.cooldown;
    if !cooldown.is_finite() || cooldown < 0.0 {
        state.battle_state.cooldown = 0.0;
    }

    if !state.total_honks_earned.is_finite() || state.total_honks_earned < 0.0 {
        state.total_honks_earned = 0.0;
    }
    state.save_version = SAVE_VERSION;
    state.honks_per_second = compute_rate(state, catalog);
}
