//! Bee-Kay Academy save/load.
//!
//! ## Versioning
//!
//! Every save is `{ "version": N, "game": { ... } }`. Loading parses the raw
//! JSON into a `serde_json::Value`, runs it through the migration chain from
//! its version up to `SAVE_VERSION`, and only then deserializes it into the
//! current shape.
//!
//! - Version 0 is the unversioned camelCase snapshot written by the first
//!   release of the game. It has no `version` key at all.
//! - Version 1 is the current shape.
//!
//! To change the format: bump `SAVE_VERSION` and append a `migrate_vN_to_vN+1`
//! step to `MIGRATIONS`. Adding an optional field needs no migration since
//! `GameSave` defaults missing fields.
//!
//! Unknown unit or blueprint ids fail deserialization. The caller treats
//! that like any other corrupt save.

#[cfg(any(target_arch = "wasm32", test))]
use std::collections::BTreeMap;

#[cfg(any(target_arch = "wasm32", test))]
use serde::{Deserialize, Serialize};
#[cfg(any(target_arch = "wasm32", test))]
use serde_json::{json, Map, Value};

#[cfg(any(target_arch = "wasm32", test))]
use super::state::{ActiveBuff, Blueprint, EconomyState, Timestamp, UnitKind};

/// Current save format version.
#[cfg(any(target_arch = "wasm32", test))]
pub const SAVE_VERSION: u32 = 1;

/// localStorage key. Shared with version 0 saves.
#[cfg(target_arch = "wasm32")]
const STORAGE_KEY: &str = "bk-academy-save";

/// Autosave interval in ticks. 10 ticks/sec × 5 s.
pub const AUTOSAVE_INTERVAL: u64 = 50;

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("save data is not valid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save version {found} is newer than this build understands (max {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },
    #[error("save data is not a JSON object")]
    NotAnObject,
    #[error("save version is not a whole number: {0}")]
    BadVersion(serde_json::Value),
    #[error("localStorage unavailable: {0}")]
    Storage(String),
}

#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

/// Persisted subset of `EconomyState`. Critical study never lands here.
#[cfg(any(target_arch = "wasm32", test))]
#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    current_papers: f64,
    total_papers_lifetime: f64,
    golden_splinters: u64,
    total_splinters_earned: u64,
    unlocked_blueprints: Vec<Blueprint>,
    units: BTreeMap<UnitKind, u32>,
    buffs: Vec<ActiveBuff>,
    auto_boost_purchased: bool,
    auto_boost_enabled: bool,
    prestige_tier: u8,
    antagonists_defeated: u32,
    highest_goal_reached: u32,
    has_seen_victory: bool,
    has_seen_intro: bool,
    /// 0 means "unknown"; loading substitutes the current time.
    last_save_timestamp: Timestamp,
}

#[cfg(any(target_arch = "wasm32", test))]
fn extract_save(state: &EconomyState) -> SaveData {
    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            current_papers: state.current_papers,
            total_papers_lifetime: state.total_papers_lifetime,
            golden_splinters: state.golden_splinters,
            total_splinters_earned: state.total_splinters_earned,
            unlocked_blueprints: state.unlocked_blueprints.clone(),
            units: state.units.clone(),
            buffs: state
                .buffs
                .iter()
                .filter(|b| b.kind.persists())
                .copied()
                .collect(),
            auto_boost_purchased: state.auto_boost_purchased,
            auto_boost_enabled: state.auto_boost_enabled,
            prestige_tier: state.prestige_tier,
            antagonists_defeated: state.antagonists_defeated,
            highest_goal_reached: state.highest_goal_reached,
            has_seen_victory: state.has_seen_victory,
            has_seen_intro: state.has_seen_intro,
            last_save_timestamp: state.last_save_timestamp,
        },
    }
}

#[cfg(any(target_arch = "wasm32", test))]
fn apply_save(save: GameSave, now: Timestamp) -> EconomyState {
    let mut state = EconomyState::new(now);
    state.current_papers = save.current_papers;
    state.total_papers_lifetime = save.total_papers_lifetime;
    state.golden_splinters = save.golden_splinters;
    state.total_splinters_earned = save.total_splinters_earned;

    for bp in save.unlocked_blueprints {
        if !state.unlocked_blueprints.contains(&bp) {
            state.unlocked_blueprints.push(bp);
        }
    }
    state.units = save.units;
    state.buffs = save.buffs.into_iter().filter(|b| b.kind.persists()).collect();

    state.auto_boost_purchased = save.auto_boost_purchased;
    state.auto_boost_enabled = save.auto_boost_purchased && save.auto_boost_enabled;
    state.prestige_tier = save.prestige_tier.min(super::state::MAX_PRESTIGE_TIER);
    state.antagonists_defeated = save.antagonists_defeated;
    state.highest_goal_reached = save.highest_goal_reached;
    state.has_seen_victory = save.has_seen_victory;
    state.has_seen_intro = save.has_seen_intro;
    if save.last_save_timestamp != 0 {
        state.last_save_timestamp = save.last_save_timestamp;
    }
    state
}

// ── Migration chain ────────────────────────────────────────────

#[cfg(any(target_arch = "wasm32", test))]
type Migration = fn(Value) -> Result<Value, SaveError>;

/// `MIGRATIONS[n]` upgrades a version-n save to version n+1.
#[cfg(any(target_arch = "wasm32", test))]
const MIGRATIONS: [Migration; SAVE_VERSION as usize] = [migrate_v0_to_v1];

/// Version 0: flat camelCase object with flag/end-time pairs per buff.
#[cfg(any(target_arch = "wasm32", test))]
fn migrate_v0_to_v1(legacy: Value) -> Result<Value, SaveError> {
    let Value::Object(old) = legacy else {
        return Err(SaveError::NotAnObject);
    };
    let num = |key: &str| old.get(key).and_then(Value::as_f64).unwrap_or(0.0);
    let count = |key: &str| num(key).max(0.0).floor() as u64;
    let flag = |key: &str| old.get(key).and_then(Value::as_bool).unwrap_or(false);

    // Old saves predate the earned counter; fall back to what is held.
    let earned = match count("totalSplintersEarned") {
        0 => count("goldenSplinters"),
        n => n,
    };

    let mut buffs = Vec::new();
    if flag("fruitSnackActive") {
        buffs.push(json!({ "kind": "fruit-snack", "expires_at": count("fruitSnackEndTime") }));
    }
    if flag("antagonistPaused") {
        buffs.push(json!({ "kind": "production-halt", "expires_at": count("antagonistPausedUntil") }));
    }

    let mut game = Map::new();
    game.insert("current_papers".into(), json!(num("currentPapers")));
    game.insert("total_papers_lifetime".into(), json!(num("totalPapersLifetime")));
    game.insert("golden_splinters".into(), json!(count("goldenSplinters")));
    game.insert("total_splinters_earned".into(), json!(earned));
    game.insert(
        "unlocked_blueprints".into(),
        old.get("unlockedBlueprints").cloned().unwrap_or_else(|| json!([])),
    );
    game.insert(
        "units".into(),
        old.get("units").cloned().unwrap_or_else(|| json!({})),
    );
    game.insert("buffs".into(), Value::Array(buffs));
    game.insert("auto_boost_purchased".into(), json!(flag("autoBoostPurchased")));
    game.insert("auto_boost_enabled".into(), json!(flag("autoBoostEnabled")));
    game.insert("prestige_tier".into(), json!(count("prestigeTier")));
    game.insert("antagonists_defeated".into(), json!(count("antagonistsDefeated")));
    game.insert("highest_goal_reached".into(), json!(count("highestGoalReached")));
    game.insert("has_seen_victory".into(), json!(flag("hasSeenVictory")));
    game.insert("has_seen_intro".into(), json!(flag("hasSeenIntro")));
    game.insert("last_save_timestamp".into(), json!(count("lastSaveTimestamp")));

    Ok(json!({ "version": 1, "game": game }))
}

/// Version of a raw save. A missing key means version 0; anything but a
/// whole number is refused rather than read as a legacy save.
#[cfg(any(target_arch = "wasm32", test))]
fn version_of(value: &Value) -> Result<u64, SaveError> {
    let obj = value.as_object().ok_or(SaveError::NotAnObject)?;
    match obj.get("version") {
        None => Ok(0),
        Some(v) => v.as_u64().ok_or_else(|| SaveError::BadVersion(v.clone())),
    }
}

#[cfg(any(target_arch = "wasm32", test))]
fn upgrade(mut value: Value) -> Result<SaveData, SaveError> {
    let found = version_of(&value)?;
    if found > SAVE_VERSION as u64 {
        return Err(SaveError::UnsupportedVersion {
            found,
            supported: SAVE_VERSION,
        });
    }
    for step in &MIGRATIONS[found as usize..] {
        value = step(value)?;
    }
    Ok(serde_json::from_value(value)?)
}

/// Serialize the persisted part of `state`.
#[cfg(any(target_arch = "wasm32", test))]
pub fn encode(state: &EconomyState) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&extract_save(state))?)
}

/// Parse a save of any supported version into a fresh state.
#[cfg(any(target_arch = "wasm32", test))]
pub fn decode(json: &str, now: Timestamp) -> Result<EconomyState, SaveError> {
    let value: Value = serde_json::from_str(json)?;
    let found = version_of(&value)?;
    let save = upgrade(value)?;
    if found < SAVE_VERSION as u64 {
        log::info!("migrated save from version {found} to {SAVE_VERSION}");
    }
    Ok(apply_save(save.game, now))
}

// ── Browser storage ────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Result<web_sys::Storage, SaveError> {
    web_sys::window()
        .ok_or_else(|| SaveError::Storage("no window".into()))?
        .local_storage()
        .map_err(|e| SaveError::Storage(format!("{e:?}")))?
        .ok_or_else(|| SaveError::Storage("localStorage disabled".into()))
}

/// Write the snapshot. Failures are logged and otherwise ignored.
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &EconomyState) {
    let result = encode(state).and_then(|json| {
        get_storage()?
            .set_item(STORAGE_KEY, &json)
            .map_err(|e| SaveError::Storage(format!("{e:?}")))
    });
    if let Err(e) = result {
        log::warn!("save failed: {e}");
    }
}

/// Load the stored snapshot. Anything unreadable is discarded and `None`
/// returned, so the game starts fresh.
#[cfg(target_arch = "wasm32")]
pub fn load_game(now: Timestamp) -> Option<EconomyState> {
    let storage = match get_storage() {
        Ok(s) => s,
        Err(e) => {
            log::warn!("{e}");
            return None;
        }
    };
    let json = storage.get_item(STORAGE_KEY).ok()??;

    match decode(&json, now) {
        Ok(state) => Some(state),
        Err(e @ (SaveError::UnsupportedVersion { .. } | SaveError::BadVersion(_))) => {
            // Keep it: a newer build may still read it.
            log::warn!("{e}; starting a new game");
            None
        }
        Err(e) => {
            log::warn!("discarding corrupt save: {e}");
            let _ = storage.remove_item(STORAGE_KEY);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Ok(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::academy::state::BuffKind;

    const NOW: Timestamp = 1_700_000_000_000;

    fn populated() -> EconomyState {
        let mut s = EconomyState::new(NOW - 60_000);
        s.current_papers = 12_345.5;
        s.total_papers_lifetime = 99_999.0;
        s.golden_splinters = 42;
        s.total_splinters_earned = 300;
        s.unlocked_blueprints = vec![Blueprint::Steps, Blueprint::Slide];
        s.units.insert(UnitKind::Daydreamer, 10);
        s.units.insert(UnitKind::RogueGraduate, 2);
        s.start_buff(BuffKind::FruitSnack, NOW, 30_000);
        s.auto_boost_purchased = true;
        s.auto_boost_enabled = true;
        s.prestige_tier = 2;
        s.antagonists_defeated = 9;
        s.highest_goal_reached = 6;
        s.has_seen_intro = true;
        s
    }

    #[test]
    fn encode_decode_roundtrip() {
        let original = populated();
        let json = encode(&original).unwrap();
        let restored = decode(&json, NOW).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn encoded_shape_is_versioned_snake_case() {
        let json = encode(&populated()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["version"], 1);
        assert_eq!(v["game"]["units"]["rogue-graduate"], 2);
        assert_eq!(v["game"]["unlocked_blueprints"], json!(["steps", "slide"]));
        assert_eq!(v["game"]["buffs"][0]["kind"], "fruit-snack");
    }

    #[test]
    fn critical_study_is_not_saved() {
        let mut s = populated();
        s.start_buff(BuffKind::CriticalStudy, NOW, 10_000);
        let json = encode(&s).unwrap();
        assert!(!json.contains("critical"));
        let restored = decode(&json, NOW).unwrap();
        assert!(!restored.buff_active(BuffKind::CriticalStudy, NOW));
        assert!(restored.buff_active(BuffKind::FruitSnack, NOW));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{"version":1,"game":{"current_papers":77.0,"golden_splinters":5}}"#;
        let s = decode(json, NOW).unwrap();
        assert_eq!(s.current_papers, 77.0);
        assert_eq!(s.golden_splinters, 5);
        assert_eq!(s.prestige_tier, 0);
        assert!(s.units.is_empty());
        assert_eq!(s.last_save_timestamp, NOW);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let json = r#"{"version":1,"game":{"current_papers":1.0,"hall_pass":true}}"#;
        assert!(decode(json, NOW).is_ok());
    }

    #[test]
    fn unknown_unit_id_is_rejected() {
        let json = r#"{"version":1,"game":{"units":{"hall-monitor":3}}}"#;
        assert!(matches!(decode(json, NOW), Err(SaveError::Json(_))));
    }

    #[test]
    fn unknown_blueprint_id_is_rejected() {
        let json = r#"{"version":1,"game":{"unlocked_blueprints":["steps","sandbox"]}}"#;
        assert!(matches!(decode(json, NOW), Err(SaveError::Json(_))));
    }

    #[test]
    fn non_integer_version_is_not_read_as_legacy() {
        for version in [r#""1""#, "1.5", "-1", "null"] {
            let json = format!(r#"{{"version":{version},"game":{{"current_papers":500.0}}}}"#);
            assert!(
                matches!(decode(&json, NOW), Err(SaveError::BadVersion(_))),
                "version {version}"
            );
        }
    }

    #[test]
    fn future_version_is_rejected() {
        let json = r#"{"version":7,"game":{}}"#;
        match decode(json, NOW) {
            Err(SaveError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 7);
                assert_eq!(supported, SAVE_VERSION);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn corrupt_json_is_an_error() {
        assert!(matches!(decode("{not json", NOW), Err(SaveError::Json(_))));
        assert!(matches!(decode("[1,2,3]", NOW), Err(SaveError::NotAnObject)));
    }

    #[test]
    fn legacy_save_migrates() {
        let legacy = r#"{
            "currentPapers": 1500.5,
            "totalPapersLifetime": 20000,
            "goldenSplinters": 12,
            "unlockedBlueprints": ["steps"],
            "units": {"daydreamer": 4, "ai-whiz": 1},
            "fruitSnackActive": true,
            "fruitSnackEndTime": 1700000020000,
            "lastSaveTimestamp": 1700000000000,
            "antagonistPaused": false,
            "antagonistPausedUntil": 0,
            "hasSeenVictory": false,
            "criticalStudyActive": true,
            "criticalStudyEndTime": 1700000005000
        }"#;
        let s = decode(legacy, NOW).unwrap();
        assert_eq!(s.current_papers, 1500.5);
        assert_eq!(s.total_papers_lifetime, 20_000.0);
        assert_eq!(s.golden_splinters, 12);
        // Backfilled from held splinters.
        assert_eq!(s.total_splinters_earned, 12);
        assert_eq!(s.unlocked_blueprints, vec![Blueprint::Steps]);
        assert_eq!(s.owned(UnitKind::Daydreamer), 4);
        assert_eq!(s.owned(UnitKind::AiWhiz), 1);
        assert_eq!(s.buff_remaining_ms(BuffKind::FruitSnack, NOW), 20_000);
        assert!(!s.buff_active(BuffKind::CriticalStudy, NOW));
        assert_eq!(s.prestige_tier, 0);
        assert!(!s.auto_boost_purchased);
        assert_eq!(s.antagonists_defeated, 0);
        assert_eq!(s.last_save_timestamp, 1_700_000_000_000);
    }

    #[test]
    fn legacy_earned_counter_kept_when_present() {
        let legacy = r#"{"goldenSplinters": 3, "totalSplintersEarned": 50}"#;
        let s = decode(legacy, NOW).unwrap();
        assert_eq!(s.total_splinters_earned, 50);
    }

    #[test]
    fn legacy_pause_becomes_production_halt() {
        let legacy = format!(
            r#"{{"antagonistPaused": true, "antagonistPausedUntil": {}}}"#,
            NOW + 15_000
        );
        let s = decode(&legacy, NOW).unwrap();
        assert_eq!(s.buff_remaining_ms(BuffKind::ProductionHalt, NOW), 15_000);
    }

    #[test]
    fn legacy_unknown_unit_is_rejected() {
        let legacy = r#"{"units": {"janitor": 1}}"#;
        assert!(decode(legacy, NOW).is_err());
    }

    #[test]
    fn duplicate_blueprints_collapse() {
        let json = r#"{"version":1,"game":{"unlocked_blueprints":["steps","steps","walls"]}}"#;
        let s = decode(json, NOW).unwrap();
        assert_eq!(s.unlocked_blueprints, vec![Blueprint::Steps, Blueprint::Walls]);
    }

    #[test]
    fn auto_boost_enabled_requires_purchase() {
        let json = r#"{"version":1,"game":{"auto_boost_enabled":true}}"#;
        let s = decode(json, NOW).unwrap();
        assert!(!s.auto_boost_enabled);
    }

    #[test]
    fn migration_table_covers_every_version() {
        assert_eq!(MIGRATIONS.len(), SAVE_VERSION as usize);
    }
}
